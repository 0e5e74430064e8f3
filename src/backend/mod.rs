//! Backend subsystem
//!
//! The I/O side of the administrative layer: a [`Backend`] trait, the MySQL
//! implementation, and the value/error types that cross it.

pub mod datum;
pub mod error;
pub mod mysql;
pub mod traits;

pub use datum::{Datum, Row};
pub use error::{BackendError, BackendResult};
pub use mysql::MySqlBackend;
pub use traits::Backend;
