//! Administrative lifecycle operations
//!
//! [`AdminController`] creates and deletes databases and accounts and manages
//! database-level grants. Every operation validates its inputs first, issues
//! a single statement (or a fixed short sequence for `grant_all`), and maps
//! backend failures through [`classify`](classify::classify).
//!
//! The controller holds no state besides the backend handle and the reserved
//! names; every read goes to the server.

pub mod classify;
pub mod database;
pub mod error;
pub mod grant;
pub mod privileges;
pub mod statements;
pub mod user;
pub mod validate;

pub use classify::Operation;
pub use error::{AdminError, AdminResult, ErrorKind, Field, ObjectKind, Rejection};
pub use privileges::GrantKind;
pub use validate::ReservedNames;

use std::sync::Arc;

use tracing::debug;

use crate::backend::{Backend, BackendError, Datum, MySqlBackend, Row};
use crate::config::{AdminConfig, ConfigError};

use classify::classify;

/// Administrative controller for one server
pub struct AdminController {
    backend: Arc<dyn Backend>,
    reserved: ReservedNames,
}

impl AdminController {
    /// Create a controller over an existing backend
    pub fn new(backend: Arc<dyn Backend>, reserved: ReservedNames) -> Self {
        AdminController { backend, reserved }
    }

    /// Create a controller talking to the MySQL server named in `config`
    pub fn connect(config: &AdminConfig) -> Result<Self, ConfigError> {
        let backend = MySqlBackend::connect(&config.url)
            .map_err(|e| ConfigError::InvalidUrl(e.message))?;
        Ok(Self::new(Arc::new(backend), config.reserved_names()))
    }

    /// Reserved names in effect for this controller
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }

    /// Release the backend connection(s)
    pub async fn close(&self) -> AdminResult<()> {
        self.backend
            .close()
            .await
            .map_err(|e| AdminError::backend(Operation::Close, e))
    }

    /// Run a write statement, classifying failures against `name`
    async fn execute(&self, op: Operation, name: &str, sql: &str) -> AdminResult<()> {
        debug!(operation = %op, sql, "issuing statement");
        self.backend
            .execute(sql)
            .await
            .map_err(|e| classify(op, name, e))
    }

    /// Run a read query; reads have no conflict outcome
    async fn query(&self, op: Operation, sql: &str, params: Vec<Datum>) -> AdminResult<Vec<Row>> {
        debug!(operation = %op, sql, "issuing query");
        self.backend
            .query(sql, params)
            .await
            .map_err(|e| classify(op, "", e))
    }
}

/// First column of the first row
fn scalar(rows: &[Row]) -> Option<&Datum> {
    rows.first().and_then(|row| row.get(0))
}

/// First column of every row as a string, skipping NULLs
fn first_column_strings(rows: Vec<Row>) -> Vec<String> {
    rows.into_iter()
        .filter_map(|row| row.into_values().into_iter().next())
        .filter_map(|datum| match datum {
            Datum::Null => None,
            Datum::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .collect()
}

/// Backend returned a value of the wrong shape
fn unexpected(op: Operation, what: &str, datum: &Datum) -> AdminError {
    AdminError::backend(
        op,
        BackendError::other(format!("unexpected {} value: {}", what, datum)),
    )
}
