//! Error types for register setup.
//!
//! Only acquiring the register block can fail. Once the mapping is live,
//! register reads and writes have no error path.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while establishing the register mapping.
#[derive(Error, Debug)]
pub enum GpioError {
    /// The device exists but the process lacks the privilege to open it.
    #[error("Permission denied opening {path:?}{hint}")]
    PermissionDenied {
        /// Device path
        path: PathBuf,
        /// Suggestion appended to the message
        hint: &'static str,
    },

    /// The device could not be opened for another reason.
    #[error("Can't open {path:?}: {source}")]
    OpenFailed {
        /// Device path
        path: PathBuf,
        /// Source IO error
        #[source]
        source: io::Error,
    },

    /// mmap of the register block failed.
    #[error("mmap of GPIO block at {base:#x} failed: {source}")]
    MapFailed {
        /// Physical base address
        base: u64,
        /// Source IO error
        #[source]
        source: io::Error,
    },
}

impl GpioError {
    /// Classify a failed `open` of `path`.
    pub fn open_failed(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            GpioError::PermissionDenied {
                path: path.to_path_buf(),
                hint: privilege_hint(),
            }
        } else {
            GpioError::OpenFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

fn privilege_hint() -> &'static str {
    if nix::unistd::geteuid().is_root() {
        ""
    } else {
        " (try running with sudo)"
    }
}

/// Result type for register setup.
pub type GpioResult<T> = Result<T, GpioError>;
