//! Configuration loading traits and types.
//!
//! The controller reads an optional TOML file. Only logging and the hardware
//! platform are configurable; pin assignments and phase timings are fixed in
//! [`crate::consts`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use signal_common::config::{ConfigError, ControllerConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = ControllerConfig::load_or_default(Path::new("config.toml"))?;
//!     println!("GPIO base: {:#x}", config.hardware.platform.gpio_base());
//!     Ok(())
//! }
//! ```

use crate::consts::{DEFAULT_DEVICE_PATH, GPIO_OFFSET, SERVICE_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, individual register writes.
    Trace,
    /// Register-level detail.
    Debug,
    /// Phase progress.
    #[default]
    Info,
    /// Warning messages.
    Warn,
    /// Fatal diagnostics only.
    Error,
}

impl LogLevel {
    /// Corresponding `tracing` level.
    pub const fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

fn default_service_name() -> String {
    SERVICE_NAME.to_string()
}

/// Common logging and identity fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "crossing-north"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// SoC family, which fixes the peripheral base physical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Raspberry Pi 1 / Zero
    Bcm2835,
    /// Raspberry Pi 2
    #[default]
    Bcm2836,
    /// Raspberry Pi 3
    Bcm2837,
    /// Raspberry Pi 4
    Bcm2711,
}

impl Platform {
    /// Physical address of the peripheral window.
    pub const fn peripheral_base(self) -> u64 {
        match self {
            Self::Bcm2835 => 0x2000_0000,
            Self::Bcm2836 | Self::Bcm2837 => 0x3F00_0000,
            Self::Bcm2711 => 0xFE00_0000,
        }
    }

    /// Physical address of the GPIO register block.
    pub const fn gpio_base(self) -> u64 {
        self.peripheral_base() + GPIO_OFFSET
    }
}

fn default_device() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE_PATH)
}

/// Hardware access settings.
///
/// # TOML Example
///
/// ```toml
/// [hardware]
/// platform = "bcm2837"
/// device = "/dev/mem"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// SoC family.
    #[serde(default)]
    pub platform: Platform,

    /// Physical memory device to map registers from.
    #[serde(default = "default_device")]
    pub device: PathBuf,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            device: default_device(),
        }
    }
}

impl HardwareConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `device` is not absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.device.is_absolute() {
            return Err(ConfigError::ValidationError(format!(
                "device must be an absolute path, got {:?}",
                self.device
            )));
        }
        Ok(())
    }
}

/// Top-level controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Logging and identity.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Register access.
    #[serde(default)]
    pub hardware: HardwareConfig,
}

impl ControllerConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.hardware.validate()
    }

    /// Load and validate `path`, falling back to defaults when the file does
    /// not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound) => {
                debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
