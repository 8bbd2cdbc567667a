//! Debounced poll-with-timeout.

use signal_common::clock::Clock;
use signal_common::consts::{DEBOUNCE_DELAY, POLL_INTERVAL};
use signal_hal::{Gpio, RegisterFile};
use std::time::Duration;
use tracing::{debug, info};

/// How the wait ended. Both outcomes continue the sequence identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Press detected after `after` of polling (settle delay not included).
    Pressed {
        /// Polling time before the press was sampled
        after: Duration,
    },
    /// No press within the timeout.
    TimedOut,
}

impl WaitOutcome {
    /// Time spent in the wait, including the settle delay after a press.
    pub fn duration(&self, timeout: Duration) -> Duration {
        match *self {
            Self::Pressed { after } => after + DEBOUNCE_DELAY,
            Self::TimedOut => timeout,
        }
    }
}

/// Block until `pin` reads pressed or `timeout` of polling has elapsed.
///
/// Samples every [`POLL_INTERVAL`]. A detected press is followed by
/// [`DEBOUNCE_DELAY`] before returning.
pub fn wait_for_press_or_timeout<R, C>(
    gpio: &Gpio<R>,
    clock: &C,
    pin: u8,
    timeout: Duration,
) -> WaitOutcome
where
    R: RegisterFile,
    C: Clock,
{
    info!(
        "Waiting for pedestrian button or timeout ({} seconds)...",
        timeout.as_secs()
    );

    let mut elapsed = Duration::ZERO;
    while elapsed < timeout {
        if gpio.is_button_pressed(pin) {
            info!("Button pressed! Changing lights...");
            debug!("Press sampled after {:?}, settling {:?}", elapsed, DEBOUNCE_DELAY);
            clock.sleep(DEBOUNCE_DELAY);
            return WaitOutcome::Pressed { after: elapsed };
        }
        clock.sleep(POLL_INTERVAL);
        elapsed += POLL_INTERVAL;
    }

    info!("Timeout - changing lights...");
    WaitOutcome::TimedOut
}
