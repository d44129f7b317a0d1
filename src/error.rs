//! Error types for oracle-select.

use thiserror::Error;

/// Result type alias for oracle-select operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for oracle-select operations.
///
/// Driver adapters report client-library failures as [`Error::Oracle`] or
/// [`Error::Driver`]; `Db::select` hands them back to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Oracle database error.
    #[error("ORA-{code:05}: {message}")]
    Oracle { code: u32, message: String },

    /// Client-side driver failure that carries no ORA code.
    #[error("Driver error: {message}")]
    Driver { message: String },

    /// Operation attempted on a connection or cursor that was already closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Too many items for an Oracle IN list.
    #[error("Lists are limited to {limit} items (got {count})")]
    TooManyItems { count: usize, limit: usize },

    /// A monitored process ended in a failed status.
    #[error("A job failure was detected (process instances: {instances:?})")]
    ProcessFailed { instances: Vec<String> },

    /// The process monitor gave up before every process finished.
    #[error("Timeout reached after {timeout:?} while monitoring processes")]
    MonitorTimeout { timeout: std::time::Duration },

    /// The process monitor saw a status set it cannot classify.
    #[error("Process monitor is inconsistent: {message}")]
    MonitorInconsistent { message: String },
}

impl Error {
    /// Create an Oracle database error.
    pub fn oracle(code: u32, message: impl Into<String>) -> Self {
        Self::Oracle {
            code,
            message: message.into(),
        }
    }

    /// Create a driver error.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// ORA error code, if this error came from the server.
    pub fn ora_code(&self) -> Option<u32> {
        match self {
            Self::Oracle { code, .. } => Some(*code),
            _ => None,
        }
    }
}
