//! Backend error type

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by a backend
///
/// Carries the server error code and SQL state when the server produced the
/// error. Driver, I/O and URL failures have neither.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    /// MySQL error number (e.g. 1007)
    pub code: Option<u16>,
    /// SQLSTATE (e.g. "HY000")
    pub state: Option<String>,
    /// Message text, verbatim
    pub message: String,
}

impl BackendError {
    /// Error reported by the server with a numeric code
    pub fn server(code: u16, state: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError {
            code: Some(code),
            state: Some(state.into()),
            message: message.into(),
        }
    }

    /// Error without a server code (connection drop, driver failure, ...)
    pub fn other(message: impl Into<String>) -> Self {
        BackendError {
            code: None,
            state: None,
            message: message.into(),
        }
    }
}

impl From<mysql_async::Error> for BackendError {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            mysql_async::Error::Server(e) => BackendError::server(e.code, e.state, e.message),
            other => BackendError::other(other.to_string()),
        }
    }
}
