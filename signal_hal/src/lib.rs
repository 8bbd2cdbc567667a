//! # Signal HAL Library
//!
//! Register access layer for the GPIO controller of a BCM283x/BCM2711 SoC.
//!
//! # Module Structure
//!
//! - [`registers`] - Register offsets, the `RegisterFile` trait, pin arithmetic
//! - [`gpio`] - Pin configuration and I/O primitives over a `RegisterFile`
//! - [`drivers`] - Register backends (`/dev/mem` mapping, in-memory simulation)
//! - [`error`] - Setup error types
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      signal_hal                       │
//! │  ┌──────────────┐     ┌───────────────────────────┐   │
//! │  │  Gpio<R>     │────►│  RegisterFile (trait)     │   │
//! │  │  pin ops     │     └────────────┬──────────────┘   │
//! │  └──────────────┘           ┌──────┴──────┐           │
//! │                             ▼             ▼           │
//! │                   MappedRegisters   MemoryRegisters   │
//! │                     (/dev/mem)       (simulation)     │
//! └───────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod drivers;
pub mod error;
pub mod gpio;
pub mod registers;

pub use crate::drivers::devmem::MappedRegisters;
pub use crate::drivers::simulation::MemoryRegisters;
pub use crate::error::GpioError;
pub use crate::gpio::{Gpio, PinMode};
pub use crate::registers::{RegisterFile, RegisterOffset, pin_to_bitmask};
