//! sqladm - administrative control surface for MySQL-compatible servers
//!
//! Features:
//! - Database create/drop/list/size with reserved-schema protection
//! - Account create/drop/password/connection-limit management
//! - Database-level grants over a closed privilege catalog
//! - Server errors mapped onto a small, stable set of outcomes

pub mod admin;
pub mod backend;
pub mod config;

pub use admin::{AdminController, AdminError, AdminResult, ErrorKind, GrantKind, ObjectKind};
pub use backend::{Backend, BackendError, MySqlBackend};
pub use config::{AdminConfig, ConfigError};
