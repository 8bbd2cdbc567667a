//! Signal Common Library
//!
//! Shared constants, configuration loading and timing utilities for the
//! traffic signal workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Pin assignments, phase timings, register block geometry
//! - [`config`] - Configuration loading traits and types
//! - [`clock`] - Blocking clock abstraction (real and simulated)
//!
//! # Usage
//!
//! ```rust
//! use signal_common::consts::{RED_LED, RED_DURATION};
//! use signal_common::config::{ConfigLoader, ControllerConfig};
//! ```

pub mod clock;
pub mod config;
pub mod consts;
