//! # Error Types
//!
//! Custom error types for Sim Gimbal using `thiserror`.

use thiserror::Error;

/// Main error type for Sim Gimbal
#[derive(Debug, Error)]
pub enum GimbalError {
    /// Malformed calibration profile or incomplete device layout
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Controller device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Sim Gimbal
pub type Result<T> = std::result::Result<T, GimbalError>;
