//! Pin configuration and I/O primitives.
//!
//! `Gpio` owns a [`RegisterFile`] and addresses it with precomputed masks.
//! There is no per-pin object: every call re-derives the word and bit from
//! the pin number.

use crate::registers::{RegisterFile, RegisterOffset, fsel_mask, fsel_shift, pin_to_bitmask};
use tracing::{debug, trace};

/// Pin function encodings used by this controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PinMode {
    /// `000`
    Input = 0b000,
    /// `001`
    Output = 0b001,
}

impl PinMode {
    /// Decode a 3-bit function field. Alternate functions yield `None`.
    pub const fn from_field(field: u32) -> Option<Self> {
        match field & 0b111 {
            0b000 => Some(Self::Input),
            0b001 => Some(Self::Output),
            _ => None,
        }
    }
}

/// GPIO controller over an owned register file.
#[derive(Debug)]
pub struct Gpio<R: RegisterFile> {
    regs: R,
}

impl<R: RegisterFile> Gpio<R> {
    /// Take ownership of a register file.
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Borrow the underlying register file.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Release the underlying register file.
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Raw function-select word.
    pub fn read_function_select(&self, word: RegisterOffset) -> u32 {
        self.regs.read(word)
    }

    /// Overwrite a function-select word.
    pub fn write_function_select(&mut self, word: RegisterOffset, value: u32) {
        trace!("{} <- {:#034b}", word, value);
        self.regs.write(word, value);
    }

    /// Current 3-bit function field of `pin`.
    pub fn function_field(&self, pin: u8) -> u32 {
        let word = self.read_function_select(RegisterOffset::fsel_for(pin));
        (word & fsel_mask(pin)) >> fsel_shift(pin)
    }

    /// Decoded mode of `pin`, if it is plain input or output.
    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        PinMode::from_field(self.function_field(pin))
    }

    /// Read-modify-write `pin`'s function field, preserving the other pins.
    pub fn set_mode(&mut self, pin: u8, mode: PinMode) {
        let word = RegisterOffset::fsel_for(pin);
        let mut value = self.read_function_select(word);
        value &= !fsel_mask(pin);
        value |= (mode as u32) << fsel_shift(pin);
        self.write_function_select(word, value);
        debug!("GPIO {} configured as {:?} ({})", pin, mode, word);
    }

    /// Configure `pin` as an output.
    pub fn configure_output(&mut self, pin: u8) {
        self.set_mode(pin, PinMode::Output);
    }

    /// Configure each of `pins` as an output.
    pub fn configure_outputs(&mut self, pins: &[u8]) {
        for &pin in pins {
            self.configure_output(pin);
        }
    }

    /// Configure `pin` as an input.
    pub fn configure_input(&mut self, pin: u8) {
        self.set_mode(pin, PinMode::Input);
    }

    /// Drive `pin` high.
    #[inline]
    pub fn set_high(&mut self, pin: u8) {
        trace!("GPSET0 <- GPIO {}", pin);
        self.regs.write(RegisterOffset::GPSET0, pin_to_bitmask(pin));
    }

    /// Drive `pin` low.
    #[inline]
    pub fn set_low(&mut self, pin: u8) {
        trace!("GPCLR0 <- GPIO {}", pin);
        self.regs.write(RegisterOffset::GPCLR0, pin_to_bitmask(pin));
    }

    /// Drive `pin` to `high`.
    #[inline]
    pub fn write(&mut self, pin: u8, high: bool) {
        if high {
            self.set_high(pin);
        } else {
            self.set_low(pin);
        }
    }

    /// Current electrical level of `pin`.
    #[inline]
    pub fn read_level(&self, pin: u8) -> bool {
        self.regs.read(RegisterOffset::GPLEV0) & pin_to_bitmask(pin) != 0
    }

    /// Active-low button: pressed when the pulled-up input reads low.
    #[inline]
    pub fn is_button_pressed(&self, pin: u8) -> bool {
        !self.read_level(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::MemoryRegisters;

    #[test]
    fn set_mode_touches_only_the_pin_field() {
        let mut regs = MemoryRegisters::new();
        regs.preset(RegisterOffset::GPFSEL1, 0xFFFF_FFFF);
        let mut gpio = Gpio::new(regs);

        gpio.configure_output(11);

        let word = gpio.read_function_select(RegisterOffset::GPFSEL1);
        assert_eq!(word, 0xFFFF_FFFF & !(0b110 << 3));
        assert_eq!(gpio.mode(11), Some(PinMode::Output));
        assert_eq!(gpio.mode(10), None);
    }

    #[test]
    fn input_clears_field() {
        let mut regs = MemoryRegisters::new();
        regs.preset(RegisterOffset::GPFSEL2, 0b101 << 18 | 0b1);
        let mut gpio = Gpio::new(regs);

        gpio.configure_input(26);

        assert_eq!(gpio.read_function_select(RegisterOffset::GPFSEL2), 0b1);
        assert_eq!(gpio.mode(26), Some(PinMode::Input));
    }

    #[test]
    fn set_and_clear_write_single_bit_masks() {
        let mut gpio = Gpio::new(MemoryRegisters::new());
        gpio.configure_output(13);

        gpio.set_high(13);
        assert!(gpio.read_level(13));
        gpio.set_low(13);
        assert!(!gpio.read_level(13));

        let writes: Vec<_> = gpio
            .registers()
            .journal()
            .iter()
            .filter(|w| w.offset != RegisterOffset::GPFSEL1)
            .map(|w| (w.offset, w.value))
            .collect();
        assert_eq!(
            writes,
            vec![
                (RegisterOffset::GPSET0, 1 << 13),
                (RegisterOffset::GPCLR0, 1 << 13),
            ]
        );
    }

    #[test]
    fn unconnected_button_reads_released() {
        let mut gpio = Gpio::new(MemoryRegisters::new());
        gpio.configure_input(26);

        assert!(gpio.read_level(26));
        assert!(!gpio.is_button_pressed(26));
    }
}
