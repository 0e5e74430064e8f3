//! Backend trait definition

use async_trait::async_trait;

use super::datum::{Datum, Row};
use super::error::BackendResult;

/// Handle to a database server
///
/// The administrative layer only needs two primitives: run a statement that
/// returns no rows, and run a parameterised query. Implementations report
/// failures as [`BackendError`](super::BackendError) carrying the server's
/// error code where there is one.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute a statement with no result set
    async fn execute(&self, sql: &str) -> BackendResult<()>;

    /// Execute a query with positional (`?`) parameters
    ///
    /// Returns rows in the order the server produced them.
    async fn query(&self, sql: &str, params: Vec<Datum>) -> BackendResult<Vec<Row>>;

    /// Release the underlying connection(s)
    async fn close(&self) -> BackendResult<()>;
}
