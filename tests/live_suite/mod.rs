//! Live server integration tests.
//!
//! Organised by operation family:
//! - databases: create/delete/exists/list/size/tables
//! - users: create/update/delete/exists/list/connection limits
//! - grants: grant/revoke, single privileges, connection checks



pub use harness::LiveServer;
