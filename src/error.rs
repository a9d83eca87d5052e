//! # Error Types
//!
//! Custom error types for the virtual DualSense using `thiserror`.

use thiserror::Error;

/// Main error type for the virtual DualSense
#[derive(Debug, Error)]
pub enum DualSenseError {
    /// The virtual HID device could not be created
    #[error("Device creation failed: {0}")]
    DeviceCreation(String),

    /// Hardware address is not six colon separated hex bytes
    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// Output report shorter than the fixed USB layout
    #[error("Output report too short: expected {expected} bytes, got {actual}")]
    ReportTooShort {
        /// Minimum size of the report
        expected: usize,
        /// Size actually received
        actual: usize,
    },

    /// Finger index outside the two touchpad slots
    #[error("Unknown touchpad finger index: {0}")]
    UnknownFinger(usize),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the virtual DualSense
pub type Result<T> = std::result::Result<T, DualSenseError>;
