//! Traffic signal constants.
//!
//! Pin assignments (BCM numbering), phase timings and the geometry of the
//! GPIO register block. None of these are configurable at runtime.

use static_assertions::const_assert;
use std::time::Duration;

/// Canonical service name (used for logging).
pub const SERVICE_NAME: &str = "traffic_lights";

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/traffic_lights/config.toml";

/// Default physical memory device
pub const DEFAULT_DEVICE_PATH: &str = "/dev/mem";

// ─── Register block ─────────────────────────────────────────────────

/// Offset of the GPIO controller from the peripheral base address.
pub const GPIO_OFFSET: u64 = 0x20_0000;

/// Size of the mapped GPIO register block in bytes.
pub const BLOCK_SIZE: usize = 4 * 1024;

/// Number of 32-bit words in the mapped block.
pub const BLOCK_WORDS: usize = BLOCK_SIZE / core::mem::size_of::<u32>();

/// Pins covered by one function-select word.
pub const PINS_PER_FSEL_WORD: u8 = 10;

/// Width of one function-select field in bits.
pub const FSEL_FIELD_BITS: u32 = 3;

/// Highest pin addressable through the bank 0 set/clear/level words.
pub const MAX_BANK0_PIN: u8 = 31;

// ─── Pins ───────────────────────────────────────────────────────────

/// Red lamp output
pub const RED_LED: u8 = 10;

/// Yellow lamp output
pub const YELLOW_LED: u8 = 11;

/// Green lamp output
pub const GREEN_LED: u8 = 13;

/// Pedestrian button input (active low, pull-up)
pub const BUTTON: u8 = 26;

const_assert!(RED_LED <= MAX_BANK0_PIN);
const_assert!(YELLOW_LED <= MAX_BANK0_PIN);
const_assert!(GREEN_LED <= MAX_BANK0_PIN);
const_assert!(BUTTON <= MAX_BANK0_PIN);
const_assert!(BLOCK_WORDS == 1024);

// ─── Timings ────────────────────────────────────────────────────────

/// Red hold (phases 1 and 7)
pub const RED_DURATION: Duration = Duration::from_secs(3);

/// Red + yellow hold (phase 2)
pub const RED_YELLOW_DURATION: Duration = Duration::from_secs(2);

/// Green hold (phase 3)
pub const GREEN_DURATION: Duration = Duration::from_secs(5);

/// Upper bound of the pedestrian wait (phase 4)
pub const BUTTON_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Green hold after the pedestrian wait (phase 5)
pub const GREEN_CONTINUE_DURATION: Duration = Duration::from_secs(2);

/// Number of yellow on/off cycles (phase 6)
pub const YELLOW_BLINK_COUNT: u32 = 3;

/// Yellow on-time and off-time within one blink cycle
pub const YELLOW_BLINK_DELAY: Duration = Duration::from_millis(500);

/// Button sampling interval
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settle delay after a detected press
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);
