//! GPIO register arithmetic against the simulated register block.
//!
//! Covers function-select read-modify-write preservation, the set/clear
//! contract and active-low button sampling.

use signal_common::clock::{Clock, SimulatedClock};
use signal_common::consts::{BUTTON, GREEN_LED, RED_LED, YELLOW_LED};
use signal_hal::drivers::Backend;
use signal_hal::registers::fsel_mask;
use signal_hal::{Gpio, MemoryRegisters, PinMode, RegisterFile, RegisterOffset, pin_to_bitmask};
use std::time::Duration;

const FSEL1_POWER_ON: u32 = 0xA5A5_A5A5;
const FSEL2_POWER_ON: u32 = 0x3FFF_FFFF;

fn preset_gpio() -> Gpio<MemoryRegisters> {
    let mut regs = MemoryRegisters::new();
    regs.preset(RegisterOffset::GPFSEL1, FSEL1_POWER_ON);
    regs.preset(RegisterOffset::GPFSEL2, FSEL2_POWER_ON);
    Gpio::new(regs)
}

#[test]
fn test_direction_setup_preserves_unrelated_fields() {
    let mut gpio = preset_gpio();

    gpio.configure_outputs(&[RED_LED, YELLOW_LED, GREEN_LED]);
    gpio.configure_input(BUTTON);

    for pin in [RED_LED, YELLOW_LED, GREEN_LED] {
        assert_eq!(gpio.function_field(pin), 0b001, "pin {pin}");
        assert_eq!(gpio.mode(pin), Some(PinMode::Output));
    }
    assert_eq!(gpio.function_field(BUTTON), 0b000);
    assert_eq!(gpio.mode(BUTTON), Some(PinMode::Input));

    let touched1 = fsel_mask(RED_LED) | fsel_mask(YELLOW_LED) | fsel_mask(GREEN_LED);
    let fsel1 = gpio.read_function_select(RegisterOffset::GPFSEL1);
    assert_eq!(fsel1 & !touched1, FSEL1_POWER_ON & !touched1);

    let touched2 = fsel_mask(BUTTON);
    let fsel2 = gpio.read_function_select(RegisterOffset::GPFSEL2);
    assert_eq!(fsel2 & !touched2, FSEL2_POWER_ON & !touched2);

    // Words outside GPFSEL1/2 are never written.
    assert!(
        gpio.registers()
            .journal()
            .iter()
            .all(|w| w.offset == RegisterOffset::GPFSEL1 || w.offset == RegisterOffset::GPFSEL2)
    );
}

#[test]
fn test_outputs_are_independent() {
    let mut gpio = Gpio::new(MemoryRegisters::new());
    gpio.configure_outputs(&[RED_LED, YELLOW_LED, GREEN_LED]);

    gpio.set_high(RED_LED);
    gpio.set_high(GREEN_LED);
    gpio.set_low(RED_LED);

    assert_eq!(gpio.registers().latch(), pin_to_bitmask(GREEN_LED));
    assert!(!gpio.read_level(RED_LED));
    assert!(!gpio.read_level(YELLOW_LED));
    assert!(gpio.read_level(GREEN_LED));
}

#[test]
fn test_button_is_active_low() {
    let clock = SimulatedClock::new();
    let mut regs = MemoryRegisters::with_clock(clock.clone());
    regs.press_at(BUTTON, Duration::from_millis(500));
    let mut gpio = Gpio::new(regs);
    gpio.configure_input(BUTTON);

    assert!(gpio.read_level(BUTTON));
    assert!(!gpio.is_button_pressed(BUTTON));

    clock.sleep(Duration::from_millis(500));
    assert!(!gpio.read_level(BUTTON));
    assert!(gpio.is_button_pressed(BUTTON));
}

#[test]
fn test_simulation_backend_opens_without_hardware() {
    let config = signal_common::config::HardwareConfig::default();
    let mut regs = Backend::Simulation.open(&config).expect("simulation backend");

    regs.write(RegisterOffset::GPFSEL1, 0b001);
    assert_eq!(regs.read(RegisterOffset::GPFSEL1), 0b001);
}

#[test]
fn test_devmem_backend_reports_missing_device() {
    let config = signal_common::config::HardwareConfig {
        device: "/nonexistent/dev/mem".into(),
        ..Default::default()
    };
    let err = Backend::DevMem.open(&config).err().expect("open must fail");
    assert!(matches!(err, signal_hal::GpioError::OpenFailed { .. }));
}
