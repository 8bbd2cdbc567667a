//! One-shot entry point: acquire registers, run once, release.

use crate::sequence::{RunReport, SequenceController};
use signal_common::clock::Clock;
use signal_hal::RegisterFile;
use signal_hal::error::{GpioError, GpioResult};

/// Process status after a completed sequence.
pub const EXIT_SUCCESS: i32 = 0;

/// Process status when the register block cannot be acquired.
pub const EXIT_SETUP_FAILURE: i32 = 1;

/// Acquire a register file with `open` and run the sequence once.
///
/// If `open` fails nothing is written and the error is returned unchanged.
pub fn run_once<R, C, F>(open: F, clock: C) -> Result<RunReport, GpioError>
where
    R: RegisterFile,
    C: Clock,
    F: FnOnce() -> GpioResult<R>,
{
    let regs = open()?;
    let (report, _regs) = SequenceController::new(regs, clock).run();
    Ok(report)
}

/// Process status for the outcome of [`run_once`].
pub fn exit_status(result: &Result<RunReport, GpioError>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_SETUP_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn setup_failures_map_to_status_one() {
        let map_failed = Err(GpioError::MapFailed {
            base: 0x3F20_0000,
            source: io::Error::other("mmap failed"),
        });
        let denied = Err(GpioError::PermissionDenied {
            path: PathBuf::from("/dev/mem"),
            hint: "",
        });

        assert_eq!(exit_status(&map_failed), EXIT_SETUP_FAILURE);
        assert_eq!(exit_status(&denied), 1);
    }

    #[test]
    fn completed_run_maps_to_status_zero() {
        assert_eq!(exit_status(&Ok(RunReport::default())), EXIT_SUCCESS);
        assert_eq!(EXIT_SUCCESS, 0);
    }
}
