//! Physical memory backend.
//!
//! Maps the GPIO register block of the physical-memory device into the
//! process. The device handle is closed right after mapping; the mapping
//! itself lives until `MappedRegisters` is dropped.

use crate::error::{GpioError, GpioResult};
use crate::registers::{RegisterFile, RegisterOffset};
use memmap2::{MmapMut, MmapOptions};
use signal_common::config::HardwareConfig;
use signal_common::consts::BLOCK_SIZE;
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::{debug, info};

/// GPIO registers mapped from a physical-memory device.
pub struct MappedRegisters {
    mmap: MmapMut,
    base: u64,
}

impl MappedRegisters {
    /// Map `BLOCK_SIZE` bytes of `device` starting at physical address `base`.
    ///
    /// # Errors
    /// - `GpioError::PermissionDenied` / `GpioError::OpenFailed` if the
    ///   device cannot be opened read/write
    /// - `GpioError::MapFailed` if the mmap call fails
    pub fn open(device: &Path, base: u64) -> GpioResult<Self> {
        debug!("Opening {:?} (O_RDWR | O_SYNC)", device);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|e| GpioError::open_failed(device, e))?;

        let mmap = unsafe { MmapOptions::new().offset(base).len(BLOCK_SIZE).map_mut(&file) }
            .map_err(|source| GpioError::MapFailed { base, source })?;

        // Mapping survives closing the descriptor.
        drop(file);

        info!("Mapped {} bytes of GPIO registers at {:#x}", BLOCK_SIZE, base);
        Ok(Self { mmap, base })
    }

    /// Physical base address of the mapping.
    pub fn base(&self) -> u64 {
        self.base
    }
}

/// Map the GPIO block described by `config`.
pub fn open_register_space(config: &HardwareConfig) -> GpioResult<MappedRegisters> {
    MappedRegisters::open(&config.device, config.platform.gpio_base())
}

impl RegisterFile for MappedRegisters {
    #[inline]
    fn read(&self, offset: RegisterOffset) -> u32 {
        // SAFETY: the mapping is page aligned and BLOCK_SIZE long, and
        // RegisterOffset is always < BLOCK_WORDS.
        unsafe {
            let word = self.mmap.as_ptr().cast::<u32>().add(offset.index());
            std::ptr::read_volatile(word)
        }
    }

    #[inline]
    fn write(&mut self, offset: RegisterOffset, value: u32) {
        // SAFETY: see `read`.
        unsafe {
            let word = self.mmap.as_mut_ptr().cast::<u32>().add(offset.index());
            std::ptr::write_volatile(word, value);
        }
    }
}

impl std::fmt::Debug for MappedRegisters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegisters")
            .field("base", &format_args!("{:#x}", self.base))
            .field("len", &self.mmap.len())
            .finish()
    }
}
