//! Error types for bluestorm

use crate::BdAddr;
use thiserror::Error;

/// Result type alias for bluestorm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bluestorm
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more required external tools are not installed
    #[error("required tools not found: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),

    /// The process is not running as root
    #[error("root privileges required")]
    InsufficientPrivileges,

    /// Adapter does not exist
    #[error("bluetooth adapter '{0}' not found")]
    AdapterNotFound(String),

    /// Adapter exists but could not be enabled
    #[error("bluetooth adapter '{0}' could not be brought up")]
    AdapterDown(String),

    /// Device scan failed
    #[error("device scan failed: {0}")]
    ScanFailed(String),

    /// An attack against this target is already running
    #[error("an attack against {0} is already active")]
    AlreadyActive(BdAddr),

    /// No attack against this target is running
    #[error("no active attack against {0}")]
    NotActive(BdAddr),

    /// User-supplied value could not be parsed
    #[error("invalid {field}: '{value}'")]
    InvalidInput { field: String, value: String },

    /// Attack job error
    #[error("attack job error: {0}")]
    Job(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(field: S, value: S) -> Self {
        Error::InvalidInput {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an attack job error with a custom message
    pub fn job<S: Into<String>>(msg: S) -> Self {
        Error::Job(msg.into())
    }
}
