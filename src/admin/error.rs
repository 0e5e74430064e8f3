//! Domain error types

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;

use super::classify::Operation;

/// Result type for administrative operations
pub type AdminResult<T> = Result<T, AdminError>;

/// Kind of administrative object an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Database,
    User,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Database => write!(f, "database"),
            ObjectKind::User => write!(f, "user"),
        }
    }
}

/// Caller-supplied value that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DatabaseName,
    Username,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::DatabaseName => write!(f, "database name"),
            Field::Username => write!(f, "username"),
            Field::Password => write!(f, "password"),
        }
    }
}

/// Why a value was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Reserved(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "cannot be empty"),
            Rejection::Reserved(name) => write!(f, "'{}' is reserved", name),
        }
    }
}

/// Administrative errors
///
/// Every failure of a public operation is one of these. Callers that only
/// care about the outcome class should branch on [`AdminError::kind`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    /// Identifier or password rejected before reaching the backend
    #[error("invalid {field}: {reason}")]
    Validation { field: Field, reason: Rejection },

    /// Grant kind is not in the privilege catalog
    #[error("invalid grant: '{0}'")]
    InvalidGrant(String),

    /// Create hit an object that is already there
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: ObjectKind, name: String },

    /// Write targeted an object that is not there
    #[error("{kind} '{name}' does not exist")]
    DoesNotExist { kind: ObjectKind, name: String },

    /// Any other backend failure, message preserved verbatim
    #[error("{op} failed: {source}")]
    Backend {
        op: Operation,
        #[source]
        source: BackendError,
    },
}

/// Outcome class of an [`AdminError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    InvalidGrant,
    AlreadyExists,
    DoesNotExist,
    BackendFailure,
}

impl AdminError {
    /// Outcome class, ignoring the payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Validation { .. } => ErrorKind::ValidationFailed,
            AdminError::InvalidGrant(_) => ErrorKind::InvalidGrant,
            AdminError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AdminError::DoesNotExist { .. } => ErrorKind::DoesNotExist,
            AdminError::Backend { .. } => ErrorKind::BackendFailure,
        }
    }

    /// Object kind for AlreadyExists / DoesNotExist
    pub fn object_kind(&self) -> Option<ObjectKind> {
        match self {
            AdminError::AlreadyExists { kind, .. } | AdminError::DoesNotExist { kind, .. } => {
                Some(*kind)
            }
            _ => None,
        }
    }

    pub(crate) fn validation(field: Field, reason: Rejection) -> Self {
        AdminError::Validation { field, reason }
    }

    pub(crate) fn backend(op: Operation, source: BackendError) -> Self {
        AdminError::Backend { op, source }
    }
}
