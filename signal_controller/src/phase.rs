//! Phase descriptors.
//!
//! A phase is a target lamp set plus an exit condition. The whole run is the
//! ordered [`SEQUENCE`]; there are no back-edges.

use bitflags::bitflags;
use signal_common::consts::{
    BUTTON, BUTTON_WAIT_TIMEOUT, GREEN_CONTINUE_DURATION, GREEN_DURATION, GREEN_LED,
    RED_DURATION, RED_LED, RED_YELLOW_DURATION, YELLOW_BLINK_COUNT, YELLOW_BLINK_DELAY,
    YELLOW_LED,
};
use signal_hal::pin_to_bitmask;
use std::time::Duration;

bitflags! {
    /// Set of lit lamps.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Lamps: u8 {
        /// Red (GPIO 10)
        const RED = 0b001;
        /// Yellow (GPIO 11)
        const YELLOW = 0b010;
        /// Green (GPIO 13)
        const GREEN = 0b100;
    }
}

/// Lamp to output pin, in write order.
pub const LAMP_PINS: [(Lamps, u8); 3] = [
    (Lamps::RED, RED_LED),
    (Lamps::YELLOW, YELLOW_LED),
    (Lamps::GREEN, GREEN_LED),
];

impl Lamps {
    /// GPSET0/GPLEV0 bits of the lamps in this set.
    pub fn pin_mask(self) -> u32 {
        LAMP_PINS
            .iter()
            .filter(|(lamp, _)| self.contains(*lamp))
            .fold(0, |mask, &(_, pin)| mask | pin_to_bitmask(pin))
    }

    /// Lamp set whose pins are high in `word`.
    pub fn from_pin_mask(word: u32) -> Self {
        LAMP_PINS
            .iter()
            .filter(|&&(_, pin)| word & pin_to_bitmask(pin) != 0)
            .fold(Self::empty(), |lamps, &(lamp, _)| lamps | lamp)
    }
}

/// How a phase ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseExit {
    /// Fixed hold.
    Hold(Duration),
    /// Poll `pin` until pressed or `timeout` elapses.
    AwaitButton {
        /// Active-low input
        pin: u8,
        /// Upper bound of the wait
        timeout: Duration,
    },
    /// Toggle `lamp` on for `on`, off for `off`, `cycles` times.
    Blink {
        /// Blinking lamp
        lamp: Lamps,
        /// On/off cycle count
        cycles: u32,
        /// On-time per cycle
        on: Duration,
        /// Off-time per cycle
        off: Duration,
    },
}

impl PhaseExit {
    /// Duration when it does not depend on input.
    pub fn fixed_duration(&self) -> Option<Duration> {
        match *self {
            Self::Hold(duration) => Some(duration),
            Self::AwaitButton { .. } => None,
            Self::Blink {
                cycles, on, off, ..
            } => Some((on + off) * cycles),
        }
    }
}

/// One step of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    /// 1-based position in the sequence
    pub number: u8,
    /// Operator-facing description
    pub label: &'static str,
    /// Lamps driven on entry; every other lamp is driven low
    pub lamps: Lamps,
    /// Exit condition
    pub exit: PhaseExit,
}

/// The fixed run.
pub const SEQUENCE: [Phase; 7] = [
    Phase {
        number: 1,
        label: "RED ON (STOP)",
        lamps: Lamps::RED,
        exit: PhaseExit::Hold(RED_DURATION),
    },
    Phase {
        number: 2,
        label: "RED + YELLOW ON (ATTENTION - PREPARE TO GO)",
        lamps: Lamps::RED.union(Lamps::YELLOW),
        exit: PhaseExit::Hold(RED_YELLOW_DURATION),
    },
    Phase {
        number: 3,
        label: "GREEN ON (GO)",
        lamps: Lamps::GREEN,
        exit: PhaseExit::Hold(GREEN_DURATION),
    },
    // Same lamps as phases 3 and 5; only the exit differs.
    Phase {
        number: 4,
        label: "GREEN ON (PEDESTRIAN WAIT)",
        lamps: Lamps::GREEN,
        exit: PhaseExit::AwaitButton {
            pin: BUTTON,
            timeout: BUTTON_WAIT_TIMEOUT,
        },
    },
    Phase {
        number: 5,
        label: "GREEN ON (CONTINUE GO)",
        lamps: Lamps::GREEN,
        exit: PhaseExit::Hold(GREEN_CONTINUE_DURATION),
    },
    Phase {
        number: 6,
        label: "YELLOW BLINKING (ATTENTION - PREPARE TO STOP)",
        lamps: Lamps::empty(),
        exit: PhaseExit::Blink {
            lamp: Lamps::YELLOW,
            cycles: YELLOW_BLINK_COUNT,
            on: YELLOW_BLINK_DELAY,
            off: YELLOW_BLINK_DELAY,
        },
    },
    Phase {
        number: 7,
        label: "RED ON (STOP)",
        lamps: Lamps::RED,
        exit: PhaseExit::Hold(RED_DURATION),
    },
];

/// Sum of all input-independent phase durations.
pub fn fixed_duration(phases: &[Phase]) -> Duration {
    phases
        .iter()
        .filter_map(|p| p.exit.fixed_duration())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_numbered_in_order() {
        for (idx, phase) in SEQUENCE.iter().enumerate() {
            assert_eq!(phase.number as usize, idx + 1);
        }
    }

    #[test]
    fn fixed_time_is_eighteen_seconds() {
        assert_eq!(fixed_duration(&SEQUENCE), Duration::from_secs(18));
    }

    #[test]
    fn exactly_one_phase_waits_for_input() {
        let waits: Vec<_> = SEQUENCE
            .iter()
            .filter(|p| p.exit.fixed_duration().is_none())
            .map(|p| p.number)
            .collect();
        assert_eq!(waits, vec![4]);
    }

    #[test]
    fn lamp_masks_map_to_pins() {
        assert_eq!(Lamps::RED.pin_mask(), 1 << 10);
        assert_eq!((Lamps::RED | Lamps::YELLOW).pin_mask(), (1 << 10) | (1 << 11));
        assert_eq!(Lamps::all().pin_mask(), (1 << 10) | (1 << 11) | (1 << 13));
        assert_eq!(Lamps::from_pin_mask((1 << 13) | (1 << 26)), Lamps::GREEN);
        assert_eq!(Lamps::from_pin_mask(0), Lamps::empty());
    }
}
