//! GPIO register file layout.
//!
//! ## Layout
//!
//! The mapped block is an array of 32-bit words. Offsets are word indices:
//!
//! | Register | Offset | Access | Meaning                              |
//! |----------|--------|--------|--------------------------------------|
//! | GPFSELn  | 0..=5  | R/W    | 3-bit function field per pin, 10/word |
//! | GPSET0   | 7      | W      | 1 bits drive pins 0..=31 high        |
//! | GPCLR0   | 10     | W      | 1 bits drive pins 0..=31 low         |
//! | GPLEV0   | 13     | R      | current level of pins 0..=31         |
//!
//! Writing 0 bits to GPSET0/GPCLR0 has no effect on the corresponding pins.

use signal_common::consts::{BLOCK_WORDS, FSEL_FIELD_BITS, MAX_BANK0_PIN, PINS_PER_FSEL_WORD};
use std::fmt;

/// Word index into the register block, validated against the block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterOffset(usize);

impl RegisterOffset {
    /// Function select, pins 0..=9
    pub const GPFSEL0: Self = Self(0);
    /// Function select, pins 10..=19
    pub const GPFSEL1: Self = Self(1);
    /// Function select, pins 20..=29
    pub const GPFSEL2: Self = Self(2);
    /// Function select, pins 30..=39
    pub const GPFSEL3: Self = Self(3);
    /// Function select, pins 40..=49
    pub const GPFSEL4: Self = Self(4);
    /// Function select, pins 50..=53
    pub const GPFSEL5: Self = Self(5);
    /// Output set, pins 0..=31
    pub const GPSET0: Self = Self(7);
    /// Output clear, pins 0..=31
    pub const GPCLR0: Self = Self(10);
    /// Pin level, pins 0..=31
    pub const GPLEV0: Self = Self(13);

    /// Validate a raw word index.
    ///
    /// Returns `None` if `index` lies outside the mapped block.
    pub const fn new(index: usize) -> Option<Self> {
        if index < BLOCK_WORDS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Function-select word holding `pin`'s field.
    pub const fn fsel_for(pin: u8) -> Self {
        Self((pin / PINS_PER_FSEL_WORD) as usize)
    }

    /// Raw word index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Byte offset from the start of the block.
    #[inline]
    pub const fn byte_offset(self) -> usize {
        self.0 * core::mem::size_of::<u32>()
    }
}

impl fmt::Display for RegisterOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::GPSET0 => write!(f, "GPSET0"),
            Self::GPCLR0 => write!(f, "GPCLR0"),
            Self::GPLEV0 => write!(f, "GPLEV0"),
            Self(n) if n <= 5 => write!(f, "GPFSEL{n}"),
            Self(n) => write!(f, "+{:#05x}", n * 4),
        }
    }
}

/// Word-addressable view of the GPIO register block.
///
/// Every call is a single volatile word access. Implementations never fail:
/// a `RegisterOffset` is always inside the block.
pub trait RegisterFile {
    /// Read one word.
    fn read(&self, offset: RegisterOffset) -> u32;

    /// Write one word.
    fn write(&mut self, offset: RegisterOffset, value: u32);
}

impl<R: RegisterFile + ?Sized> RegisterFile for Box<R> {
    fn read(&self, offset: RegisterOffset) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: RegisterOffset, value: u32) {
        (**self).write(offset, value)
    }
}

/// Single-bit mask for `pin` in the bank 0 set/clear/level words.
///
/// Pins above 31 live in bank 1 and yield an empty mask.
#[inline]
pub const fn pin_to_bitmask(pin: u8) -> u32 {
    debug_assert!(pin <= MAX_BANK0_PIN);
    match 1u32.checked_shl(pin as u32) {
        Some(mask) => mask,
        None => 0,
    }
}

/// Bit position of `pin`'s function field within its select word.
#[inline]
pub const fn fsel_shift(pin: u8) -> u32 {
    (pin % PINS_PER_FSEL_WORD) as u32 * FSEL_FIELD_BITS
}

/// Mask covering `pin`'s function field within its select word.
#[inline]
pub const fn fsel_mask(pin: u8) -> u32 {
    0b111 << fsel_shift(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmask_matches_literal_pin_masks() {
        assert_eq!(pin_to_bitmask(10), 0b100_0000_0000);
        assert_eq!(pin_to_bitmask(11), 0b1000_0000_0000);
        assert_eq!(pin_to_bitmask(13), 0b10_0000_0000_0000);
        assert_eq!(pin_to_bitmask(26), 0b100_0000_0000_0000_0000_0000_0000);
        assert_eq!(pin_to_bitmask(0), 1);
        assert_eq!(pin_to_bitmask(31), 0x8000_0000);
    }

    #[test]
    fn fsel_word_and_shift() {
        assert_eq!(RegisterOffset::fsel_for(0), RegisterOffset::GPFSEL0);
        assert_eq!(RegisterOffset::fsel_for(9), RegisterOffset::GPFSEL0);
        assert_eq!(RegisterOffset::fsel_for(10), RegisterOffset::GPFSEL1);
        assert_eq!(RegisterOffset::fsel_for(13), RegisterOffset::GPFSEL1);
        assert_eq!(RegisterOffset::fsel_for(26), RegisterOffset::GPFSEL2);
        assert_eq!(RegisterOffset::fsel_for(53), RegisterOffset::GPFSEL5);

        assert_eq!(fsel_shift(10), 0);
        assert_eq!(fsel_shift(11), 3);
        assert_eq!(fsel_shift(13), 9);
        assert_eq!(fsel_shift(26), 18);
        assert_eq!(fsel_mask(26), 0b111 << 18);
    }

    #[test]
    fn offsets_are_bounds_checked() {
        assert_eq!(RegisterOffset::new(13), Some(RegisterOffset::GPLEV0));
        assert_eq!(RegisterOffset::new(1023).map(RegisterOffset::index), Some(1023));
        assert_eq!(RegisterOffset::new(1024), None);
        assert_eq!(RegisterOffset::GPCLR0.byte_offset(), 0x28);
    }

    #[test]
    fn offsets_display_register_names() {
        assert_eq!(RegisterOffset::GPFSEL2.to_string(), "GPFSEL2");
        assert_eq!(RegisterOffset::GPSET0.to_string(), "GPSET0");
        assert_eq!(RegisterOffset::GPLEV0.to_string(), "GPLEV0");
    }
}
