//! Register backends.
//!
//! - [`devmem`] - GPIO block mapped from the physical-memory device
//! - [`simulation`] - In-memory block for dry runs and tests

pub mod devmem;
pub mod simulation;

use crate::error::GpioResult;
use crate::registers::RegisterFile;
use signal_common::config::HardwareConfig;
use tracing::info;

/// Selectable register backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Physical registers via `mmap`
    #[default]
    DevMem,
    /// In-memory registers
    Simulation,
}

impl Backend {
    /// Backend identifier for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DevMem => "devmem",
            Self::Simulation => "simulation",
        }
    }

    /// Acquire the register file for this backend.
    ///
    /// # Errors
    /// Only `DevMem` can fail; see [`devmem::MappedRegisters::open`].
    pub fn open(self, config: &HardwareConfig) -> GpioResult<Box<dyn RegisterFile>> {
        info!("Using {} register backend", self.name());
        match self {
            Self::DevMem => Ok(Box::new(devmem::open_register_space(config)?)),
            Self::Simulation => Ok(Box::new(simulation::MemoryRegisters::new())),
        }
    }
}
