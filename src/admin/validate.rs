//! Identifier validation
//!
//! Pure predicates run before any backend call. A rejected value never
//! reaches the server.

use super::error::{AdminError, AdminResult, Field, Rejection};
use super::privileges::GrantKind;

/// Databases created by the server itself
pub const RESERVED_DATABASES: &[&str] = &["information_schema", "mysql", "performance_schema", "sys"];

/// Built-in system accounts
pub const RESERVED_USERS: &[&str] = &["root", "mysql.sys", "mysql.session", "mysql.infoschema"];

/// Identifiers protected from create/delete
///
/// Built once when the controller is constructed; there is no way to add
/// names afterwards.
#[derive(Debug, Clone)]
pub struct ReservedNames {
    databases: Vec<String>,
    users: Vec<String>,
}

impl ReservedNames {
    /// Built-in reserved names plus extra reserved usernames
    pub fn new<I, S>(extra_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let databases = RESERVED_DATABASES.iter().map(|s| s.to_string()).collect();
        let mut users: Vec<String> = RESERVED_USERS.iter().map(|s| s.to_string()).collect();
        for user in extra_users {
            let user = user.into();
            if !users.contains(&user) {
                users.push(user);
            }
        }
        ReservedNames { databases, users }
    }

    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Check if a database name is reserved (case-sensitive)
    pub fn is_reserved_database(&self, name: &str) -> bool {
        self.databases.iter().any(|d| d == name)
    }

    /// Check if a username is reserved (case-sensitive)
    pub fn is_reserved_user(&self, name: &str) -> bool {
        self.users.iter().any(|u| u == name)
    }

    /// Validate a database name
    pub fn validate_database(&self, name: &str) -> AdminResult<()> {
        validate_identifier(Field::DatabaseName, name, self.is_reserved_database(name))
    }

    /// Validate a username
    pub fn validate_user(&self, name: &str) -> AdminResult<()> {
        validate_identifier(Field::Username, name, self.is_reserved_user(name))
    }

    /// Drop reserved databases from a listing, preserving order
    pub fn filter_databases(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|n| !self.is_reserved_database(n))
            .collect()
    }

    /// Drop reserved users from a listing, preserving order
    pub fn filter_users(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|n| !self.is_reserved_user(n))
            .collect()
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        ReservedNames::new(Vec::<String>::new())
    }
}

fn validate_identifier(field: Field, name: &str, reserved: bool) -> AdminResult<()> {
    if name.is_empty() {
        return Err(AdminError::validation(field, Rejection::Empty));
    }
    if reserved {
        return Err(AdminError::validation(
            field,
            Rejection::Reserved(name.to_string()),
        ));
    }
    Ok(())
}

/// Validate a password
///
/// Only emptiness is checked; strength policy belongs to the server.
pub fn validate_password(password: &str) -> AdminResult<()> {
    if password.is_empty() {
        return Err(AdminError::validation(Field::Password, Rejection::Empty));
    }
    Ok(())
}

/// Validate and canonicalise a grant kind token
pub fn validate_grant(token: &str) -> AdminResult<GrantKind> {
    token.parse()
}
