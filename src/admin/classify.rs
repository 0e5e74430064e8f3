//! Backend error classification
//!
//! Each write operation has exactly one "already in the conflicting state"
//! outcome the server signals with a documented error number. This module
//! is the only place that knows those numbers.
//!
//! Matching policy: the structured server code is authoritative. Only when
//! an error carries no code (e.g. it was re-wrapped by a proxy as plain text)
//! do we look for the driver's `Error NNNN` / `ERROR NNNN` prefix in the
//! message. Nothing else in the message text is ever interpreted.

use std::fmt;

use tracing::warn;

use crate::backend::BackendError;

use super::error::{AdminError, ObjectKind};

/// MySQL error codes
pub mod codes {
    /// Can't create database; database exists
    pub const ER_DB_CREATE_EXISTS: u16 = 1007;
    /// Can't drop database; database doesn't exist
    pub const ER_DB_DROP_EXISTS: u16 = 1008;
    /// Can't find any matching row in the user table
    pub const ER_PASSWORD_NO_MATCH: u16 = 1133;
    /// There is no such grant defined
    pub const ER_NONEXISTING_GRANT: u16 = 1141;
    /// Operation CREATE USER / DROP USER / ALTER USER failed
    pub const ER_CANNOT_USER: u16 = 1396;
}

/// Administrative operation that talked to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDatabase,
    DropDatabase,
    DatabaseExists,
    ListDatabases,
    DatabaseSize,
    ListTables,
    CreateUser,
    UpdatePassword,
    DropUser,
    UserExists,
    ListUsers,
    SetConnectionLimit,
    GetConnectionLimit,
    GrantAll,
    RevokeAll,
    Grant,
    Revoke,
    GrantExists,
    Close,
}

impl Operation {
    /// Human-readable operation name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateDatabase => "create database",
            Operation::DropDatabase => "drop database",
            Operation::DatabaseExists => "check database",
            Operation::ListDatabases => "list databases",
            Operation::DatabaseSize => "database size",
            Operation::ListTables => "list tables",
            Operation::CreateUser => "create user",
            Operation::UpdatePassword => "update password",
            Operation::DropUser => "drop user",
            Operation::UserExists => "check user",
            Operation::ListUsers => "list users",
            Operation::SetConnectionLimit => "set connection limit",
            Operation::GetConnectionLimit => "get connection limit",
            Operation::GrantAll => "grant all privileges",
            Operation::RevokeAll => "revoke all privileges",
            Operation::Grant => "grant",
            Operation::Revoke => "revoke",
            Operation::GrantExists => "check grant",
            Operation::Close => "close",
        }
    }

    /// The conflict this operation can run into, if any
    ///
    /// Returns the signalling error code and the domain error to produce.
    fn conflict(&self) -> Option<(u16, Conflict)> {
        match self {
            Operation::CreateDatabase => Some((
                codes::ER_DB_CREATE_EXISTS,
                Conflict::AlreadyExists(ObjectKind::Database),
            )),
            Operation::DropDatabase => Some((
                codes::ER_DB_DROP_EXISTS,
                Conflict::DoesNotExist(ObjectKind::Database),
            )),
            Operation::CreateUser => Some((
                codes::ER_CANNOT_USER,
                Conflict::AlreadyExists(ObjectKind::User),
            )),
            Operation::UpdatePassword => Some((
                codes::ER_PASSWORD_NO_MATCH,
                Conflict::DoesNotExist(ObjectKind::User),
            )),
            Operation::SetConnectionLimit | Operation::DropUser => Some((
                codes::ER_CANNOT_USER,
                Conflict::DoesNotExist(ObjectKind::User),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum Conflict {
    AlreadyExists(ObjectKind),
    DoesNotExist(ObjectKind),
}

/// Map a backend failure of `op` on object `name` to a domain error
pub fn classify(op: Operation, name: &str, err: BackendError) -> AdminError {
    if let Some((code, conflict)) = op.conflict() {
        if error_code(&err) == Some(code) {
            let name = name.to_string();
            return match conflict {
                Conflict::AlreadyExists(kind) => AdminError::AlreadyExists { kind, name },
                Conflict::DoesNotExist(kind) => AdminError::DoesNotExist { kind, name },
            };
        }
    }

    warn!(operation = %op, code = ?err.code, error = %err.message, "backend failure");
    AdminError::backend(op, err)
}

/// Server error code, from the structured field or the driver's message prefix
fn error_code(err: &BackendError) -> Option<u16> {
    if err.code.is_some() {
        return err.code;
    }

    let message = err.message.trim_start();
    let rest = message
        .strip_prefix("ERROR ")
        .or_else(|| message.strip_prefix("Error "))?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
