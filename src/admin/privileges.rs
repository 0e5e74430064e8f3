//! Privilege catalog
//!
//! The closed set of database-level privileges this layer can grant, revoke
//! and inspect. Each kind maps to the `mysql.db` column that records whether
//! an account holds it on a given database.

use std::fmt;

use serde::{Serialize, Serializer};

use super::error::{AdminError, AdminResult};

/// Database-level privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrantKind {
    Alter,
    AlterRoutine,
    Create,
    CreateRoutine,
    CreateTemporaryTables,
    CreateView,
    Delete,
    Drop,
    Event,
    Execute,
    Index,
    Insert,
    LockTables,
    References,
    Select,
    ShowView,
    Trigger,
    Update,
}

impl GrantKind {
    /// Every grant kind, ordered by token
    pub const ALL: [GrantKind; 18] = [
        GrantKind::Alter,
        GrantKind::AlterRoutine,
        GrantKind::Create,
        GrantKind::CreateRoutine,
        GrantKind::CreateTemporaryTables,
        GrantKind::CreateView,
        GrantKind::Delete,
        GrantKind::Drop,
        GrantKind::Event,
        GrantKind::Execute,
        GrantKind::Index,
        GrantKind::Insert,
        GrantKind::LockTables,
        GrantKind::References,
        GrantKind::Select,
        GrantKind::ShowView,
        GrantKind::Trigger,
        GrantKind::Update,
    ];

    /// Parse a grant token (case-insensitive, whitespace-normalised)
    pub fn parse(token: &str) -> Option<Self> {
        let canonical = canonicalize(token);
        GrantKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == canonical)
    }

    /// Token as written in GRANT/REVOKE statements
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantKind::Alter => "ALTER",
            GrantKind::AlterRoutine => "ALTER ROUTINE",
            GrantKind::Create => "CREATE",
            GrantKind::CreateRoutine => "CREATE ROUTINE",
            GrantKind::CreateTemporaryTables => "CREATE TEMPORARY TABLES",
            GrantKind::CreateView => "CREATE VIEW",
            GrantKind::Delete => "DELETE",
            GrantKind::Drop => "DROP",
            GrantKind::Event => "EVENT",
            GrantKind::Execute => "EXECUTE",
            GrantKind::Index => "INDEX",
            GrantKind::Insert => "INSERT",
            GrantKind::LockTables => "LOCK TABLES",
            GrantKind::References => "REFERENCES",
            GrantKind::Select => "SELECT",
            GrantKind::ShowView => "SHOW VIEW",
            GrantKind::Trigger => "TRIGGER",
            GrantKind::Update => "UPDATE",
        }
    }

    /// `mysql.db` column holding this privilege
    pub fn column(&self) -> &'static str {
        match self {
            GrantKind::Alter => "Alter_priv",
            GrantKind::AlterRoutine => "Alter_routine_priv",
            GrantKind::Create => "Create_priv",
            GrantKind::CreateRoutine => "Create_routine_priv",
            GrantKind::CreateTemporaryTables => "Create_tmp_table_priv",
            GrantKind::CreateView => "Create_view_priv",
            GrantKind::Delete => "Delete_priv",
            GrantKind::Drop => "Drop_priv",
            GrantKind::Event => "Event_priv",
            GrantKind::Execute => "Execute_priv",
            GrantKind::Index => "Index_priv",
            GrantKind::Insert => "Insert_priv",
            GrantKind::LockTables => "Lock_tables_priv",
            GrantKind::References => "References_priv",
            GrantKind::Select => "Select_priv",
            GrantKind::ShowView => "Show_view_priv",
            GrantKind::Trigger => "Trigger_priv",
            GrantKind::Update => "Update_priv",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GrantKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::str::FromStr for GrantKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrantKind::parse(s).ok_or_else(|| AdminError::InvalidGrant(s.to_string()))
    }
}

/// Upper-case and collapse whitespace runs: `" create   view "` -> `"CREATE VIEW"`
pub fn canonicalize(token: &str) -> String {
    token
        .split_whitespace()
        .map(|word| word.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a token names a catalog privilege
pub fn is_valid(token: &str) -> bool {
    GrantKind::parse(token).is_some()
}

/// All catalog tokens, in catalog order
pub fn all_kinds() -> impl Iterator<Item = &'static str> {
    GrantKind::ALL.into_iter().map(|kind| kind.as_str())
}

/// `mysql.db` column for a token
pub fn backend_representation(token: &str) -> AdminResult<&'static str> {
    token.parse::<GrantKind>().map(|kind| kind.column())
}
