//! Sequence controller.
//!
//! `SequenceController` owns the GPIO register file and the clock. A run is:
//! configure directions → all lamps off → each phase of [`SEQUENCE`] once →
//! all lamps off.

use crate::button::{WaitOutcome, wait_for_press_or_timeout};
use crate::phase::{LAMP_PINS, Lamps, Phase, PhaseExit, SEQUENCE};
use signal_common::clock::Clock;
use signal_common::consts::{BUTTON, GREEN_LED, RED_LED, YELLOW_LED};
use signal_hal::{Gpio, RegisterFile};
use std::time::Duration;
use tracing::{debug, info};

/// What happened in one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRecord {
    /// Phase number
    pub number: u8,
    /// Time spent in the phase
    pub duration: Duration,
    /// Button wait result, for the waiting phase only
    pub wait: Option<WaitOutcome>,
}

/// Summary of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One record per phase, in order
    pub phases: Vec<PhaseRecord>,
}

impl RunReport {
    /// Total time across all phases.
    pub fn total(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }

    /// Outcome of the button wait, if the sequence had one.
    pub fn wait_outcome(&self) -> Option<WaitOutcome> {
        self.phases.iter().find_map(|p| p.wait)
    }
}

/// Drives the fixed traffic-light sequence.
pub struct SequenceController<R: RegisterFile, C: Clock> {
    gpio: Gpio<R>,
    clock: C,
}

impl<R: RegisterFile, C: Clock> SequenceController<R, C> {
    /// Take ownership of a register file and a clock.
    pub fn new(regs: R, clock: C) -> Self {
        Self {
            gpio: Gpio::new(regs),
            clock,
        }
    }

    /// Borrow the GPIO controller.
    pub fn gpio(&self) -> &Gpio<R> {
        &self.gpio
    }

    /// Configure pin directions and drive every lamp low.
    pub fn initialize(&mut self) {
        self.gpio.configure_outputs(&[RED_LED, YELLOW_LED, GREEN_LED]);
        self.gpio.configure_input(BUTTON);
        self.all_off();

        info!("GPIO initialized successfully.");
        info!("Red LED: GPIO {} (BCM)", RED_LED);
        info!("Yellow LED: GPIO {} (BCM)", YELLOW_LED);
        info!("Green LED: GPIO {} (BCM)", GREEN_LED);
        info!("Button (optional): GPIO {} (BCM)", BUTTON);
    }

    /// Drive the lamps in `lit` high and every other lamp low.
    pub fn set_lamps(&mut self, lit: Lamps) {
        for &(lamp, pin) in &LAMP_PINS {
            self.gpio.write(pin, lit.contains(lamp));
        }
    }

    /// Drive the lamps in `lamps` to `on`, leaving the others untouched.
    pub fn switch(&mut self, lamps: Lamps, on: bool) {
        for &(lamp, pin) in &LAMP_PINS {
            if lamps.contains(lamp) {
                self.gpio.write(pin, on);
            }
        }
    }

    /// Every lamp low.
    pub fn all_off(&mut self) {
        self.set_lamps(Lamps::empty());
    }

    /// Enter `phase` and block until its exit condition is met.
    pub fn run_phase(&mut self, phase: &Phase) -> PhaseRecord {
        info!("Phase {}: {}", phase.number, phase.label);
        self.set_lamps(phase.lamps);

        let (duration, wait) = match phase.exit {
            PhaseExit::Hold(duration) => {
                self.clock.sleep(duration);
                (duration, None)
            }
            PhaseExit::AwaitButton { pin, timeout } => {
                let outcome = wait_for_press_or_timeout(&self.gpio, &self.clock, pin, timeout);
                (outcome.duration(timeout), Some(outcome))
            }
            PhaseExit::Blink {
                lamp,
                cycles,
                on,
                off,
            } => {
                for cycle in 0..cycles {
                    debug!("Blink {}/{}", cycle + 1, cycles);
                    self.switch(lamp, true);
                    self.clock.sleep(on);
                    self.switch(lamp, false);
                    self.clock.sleep(off);
                }
                ((on + off) * cycles, None)
            }
        };

        PhaseRecord {
            number: phase.number,
            duration,
            wait,
        }
    }

    /// Run `phases` in order.
    pub fn run_sequence(&mut self, phases: &[Phase]) -> RunReport {
        info!("=== Traffic Light Sequence Starting ===");
        let phases = phases.iter().map(|phase| self.run_phase(phase)).collect();
        info!("=== Sequence Complete ===");
        RunReport { phases }
    }

    /// Initialize, run [`SEQUENCE`] once, switch everything off.
    ///
    /// Consumes the controller; the register file is handed back.
    pub fn run(mut self) -> (RunReport, R) {
        self.initialize();
        let report = self.run_sequence(&SEQUENCE);
        self.all_off();
        info!("Program finished. All LEDs turned off.");
        (report, self.gpio.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_common::clock::SimulatedClock;
    use signal_hal::{MemoryRegisters, RegisterOffset};

    fn controller() -> SequenceController<MemoryRegisters, SimulatedClock> {
        let clock = SimulatedClock::new();
        let regs = MemoryRegisters::with_clock(clock.clone());
        SequenceController::new(regs, clock)
    }

    #[test]
    fn set_lamps_writes_each_lamp_once() {
        let mut ctl = controller();
        ctl.initialize();
        let before = ctl.gpio().registers().journal().len();

        ctl.set_lamps(Lamps::RED | Lamps::YELLOW);

        let writes = &ctl.gpio().registers().journal()[before..];
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0].offset, RegisterOffset::GPSET0);
        assert_eq!(writes[1].offset, RegisterOffset::GPSET0);
        assert_eq!(writes[2].offset, RegisterOffset::GPCLR0);
        assert_eq!(
            ctl.gpio().registers().latch(),
            (Lamps::RED | Lamps::YELLOW).pin_mask()
        );
    }

    #[test]
    fn initialize_leaves_all_lamps_dark() {
        let mut ctl = controller();
        ctl.initialize();
        assert_eq!(ctl.gpio().registers().latch(), 0);
        assert!(!ctl.gpio().is_button_pressed(BUTTON));
    }

    #[test]
    fn hold_phase_sleeps_its_duration() {
        let mut ctl = controller();
        ctl.initialize();

        let record = ctl.run_phase(&SEQUENCE[1]);

        assert_eq!(record.duration, Duration::from_secs(2));
        assert_eq!(record.wait, None);
        assert_eq!(ctl.clock.elapsed(), Duration::from_secs(2));
    }
}
