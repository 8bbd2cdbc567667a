//! In-memory register backend.
//!
//! `MemoryRegisters` stands in for the mapped GPIO block:
//! - function-select and other plain words are stored as written
//! - GPSET0 / GPCLR0 writes update an output latch instead of being stored
//! - GPLEV0 reads the latch for output pins; input pins read high (pull-up)
//!   unless a scripted button press is active
//!
//! Every write is appended to a journal stamped with the simulated time, so
//! tests can replay the lamp state at any instant.

use crate::gpio::PinMode;
use crate::registers::{RegisterFile, RegisterOffset, fsel_mask, fsel_shift, pin_to_bitmask};
use signal_common::clock::SimulatedClock;
use signal_common::consts::{BLOCK_WORDS, MAX_BANK0_PIN};
use std::time::Duration;
use tracing::trace;

/// One journalled register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    /// Simulated time of the write
    pub at: Duration,
    /// Target register
    pub offset: RegisterOffset,
    /// Written word
    pub value: u32,
}

/// Scripted low level on an input pin.
#[derive(Debug, Clone, Copy)]
struct ButtonPress {
    pin: u8,
    from: Duration,
    until: Option<Duration>,
}

impl ButtonPress {
    fn active(&self, now: Duration) -> bool {
        now >= self.from && self.until.is_none_or(|until| now < until)
    }
}

/// Simulated GPIO register block.
#[derive(Debug)]
pub struct MemoryRegisters {
    words: Vec<u32>,
    latch: u32,
    journal: Vec<RegisterWrite>,
    presses: Vec<ButtonPress>,
    clock: Option<SimulatedClock>,
}

impl Default for MemoryRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegisters {
    /// Zeroed block (all pins inputs, all outputs low) at time zero.
    pub fn new() -> Self {
        Self {
            words: vec![0; BLOCK_WORDS],
            latch: 0,
            journal: Vec::new(),
            presses: Vec::new(),
            clock: None,
        }
    }

    /// Zeroed block that stamps writes and evaluates presses on `clock`.
    pub fn with_clock(clock: SimulatedClock) -> Self {
        Self {
            clock: Some(clock),
            ..Self::new()
        }
    }

    /// Set a word without journalling it (power-on contents).
    pub fn preset(&mut self, offset: RegisterOffset, value: u32) {
        self.words[offset.index()] = value;
    }

    /// Hold `pin` low from `at` onwards.
    pub fn press_at(&mut self, pin: u8, at: Duration) {
        self.presses.push(ButtonPress {
            pin,
            from: at,
            until: None,
        });
    }

    /// Hold `pin` low during `[from, until)`.
    pub fn press_between(&mut self, pin: u8, from: Duration, until: Duration) {
        self.presses.push(ButtonPress {
            pin,
            from,
            until: Some(until),
        });
    }

    /// Every write so far, in order.
    pub fn journal(&self) -> &[RegisterWrite] {
        &self.journal
    }

    /// Current output latch (bit per pin driven high).
    pub fn latch(&self) -> u32 {
        self.latch
    }

    /// Output latch after applying every write stamped at or before `at`.
    pub fn latch_at(&self, at: Duration) -> u32 {
        self.journal
            .iter()
            .take_while(|w| w.at <= at)
            .fold(0, |latch, w| apply_output_write(latch, w.offset, w.value))
    }

    fn now(&self) -> Duration {
        self.clock
            .as_ref()
            .map(SimulatedClock::elapsed)
            .unwrap_or_default()
    }

    fn is_input(&self, pin: u8) -> bool {
        let word = self.words[RegisterOffset::fsel_for(pin).index()];
        PinMode::from_field((word & fsel_mask(pin)) >> fsel_shift(pin)) == Some(PinMode::Input)
    }

    fn level(&self) -> u32 {
        let now = self.now();
        (0..=MAX_BANK0_PIN).fold(0, |level, pin| {
            let high = if self.is_input(pin) {
                !self.presses.iter().any(|p| p.pin == pin && p.active(now))
            } else {
                self.latch & pin_to_bitmask(pin) != 0
            };
            if high { level | pin_to_bitmask(pin) } else { level }
        })
    }
}

fn apply_output_write(latch: u32, offset: RegisterOffset, value: u32) -> u32 {
    match offset {
        RegisterOffset::GPSET0 => latch | value,
        RegisterOffset::GPCLR0 => latch & !value,
        _ => latch,
    }
}

impl RegisterFile for MemoryRegisters {
    fn read(&self, offset: RegisterOffset) -> u32 {
        match offset {
            RegisterOffset::GPLEV0 => self.level(),
            // Write-only on hardware
            RegisterOffset::GPSET0 | RegisterOffset::GPCLR0 => 0,
            _ => self.words[offset.index()],
        }
    }

    fn write(&mut self, offset: RegisterOffset, value: u32) {
        let at = self.now();
        trace!("[sim {:?}] {} <- {:#010x}", at, offset, value);
        self.journal.push(RegisterWrite { at, offset, value });
        match offset {
            RegisterOffset::GPSET0 | RegisterOffset::GPCLR0 => {
                self.latch = apply_output_write(self.latch, offset, value);
            }
            // Read-only on hardware
            RegisterOffset::GPLEV0 => {}
            _ => self.words[offset.index()] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_common::clock::Clock;

    #[test]
    fn set_and_clear_only_touch_one_bits() {
        let mut regs = MemoryRegisters::new();
        regs.write(RegisterOffset::GPSET0, 0b1010);
        regs.write(RegisterOffset::GPSET0, 0b0100);
        regs.write(RegisterOffset::GPCLR0, 0b0010);
        assert_eq!(regs.latch(), 0b1100);
        assert_eq!(regs.journal().len(), 3);
    }

    #[test]
    fn level_reflects_latch_for_outputs_and_pull_up_for_inputs() {
        let mut regs = MemoryRegisters::new();
        // Pin 10 output, everything else input.
        regs.write(RegisterOffset::GPFSEL1, 0b001);

        let level = regs.read(RegisterOffset::GPLEV0);
        assert_eq!(level & pin_to_bitmask(10), 0);
        assert_ne!(level & pin_to_bitmask(26), 0);

        regs.write(RegisterOffset::GPSET0, pin_to_bitmask(10));
        assert_ne!(regs.read(RegisterOffset::GPLEV0) & pin_to_bitmask(10), 0);
    }

    #[test]
    fn scripted_press_follows_the_clock() {
        let clock = SimulatedClock::new();
        let mut regs = MemoryRegisters::with_clock(clock.clone());
        regs.press_between(26, Duration::from_secs(1), Duration::from_secs(2));

        let pressed = |regs: &MemoryRegisters| {
            regs.read(RegisterOffset::GPLEV0) & pin_to_bitmask(26) == 0
        };

        assert!(!pressed(&regs));
        clock.sleep(Duration::from_secs(1));
        assert!(pressed(&regs));
        clock.sleep(Duration::from_secs(1));
        assert!(!pressed(&regs));
    }

    #[test]
    fn latch_at_replays_journal() {
        let clock = SimulatedClock::new();
        let mut regs = MemoryRegisters::with_clock(clock.clone());
        regs.write(RegisterOffset::GPSET0, 0b1);
        clock.sleep(Duration::from_secs(1));
        regs.write(RegisterOffset::GPSET0, 0b10);
        clock.sleep(Duration::from_secs(1));
        regs.write(RegisterOffset::GPCLR0, 0b11);

        assert_eq!(regs.latch_at(Duration::ZERO), 0b1);
        assert_eq!(regs.latch_at(Duration::from_millis(1500)), 0b11);
        assert_eq!(regs.latch_at(Duration::from_secs(2)), 0);
    }
}
