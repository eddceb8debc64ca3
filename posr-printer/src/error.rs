//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// A driver config is missing a field its transport requires
    #[error("missing required field `{field}` for {driver} printer")]
    MissingField {
        driver: &'static str,
        field: &'static str,
    },

    /// The `type` string does not name a known transport
    #[error("unknown driver type: {0}")]
    UnknownDriver(String),

    /// The transport exists but its native backend is absent on this
    /// platform or build
    #[error("driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Network connection error
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the device
    #[error("timeout: {0}")]
    Timeout(String),

    /// Write/close attempted before a successful open
    #[error("device not open")]
    NotOpen,

    /// IO error during printing
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
