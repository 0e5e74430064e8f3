//! Administrative statement text
//!
//! Statements that name objects (CREATE/DROP/GRANT/...) cannot take bound
//! parameters, so identifiers and string literals are quoted here. Every
//! lookup that compares against a value uses a `?` placeholder instead.

use super::privileges::GrantKind;

/// Host part of every managed account
pub const DEFAULT_HOST: &str = "%";

pub const LIST_DATABASES: &str = "SHOW DATABASES";

pub const DATABASE_EXISTS: &str =
    "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = ?";

pub const DATABASE_SIZE: &str = "SELECT SUM(data_length + index_length) \
     FROM information_schema.tables WHERE table_schema = ?";

pub const LIST_TABLES: &str =
    "SELECT table_name FROM information_schema.tables WHERE table_schema = ?";

pub const LIST_USERS: &str = "SELECT User FROM mysql.user WHERE Host = '%'";

pub const USER_EXISTS: &str =
    "SELECT EXISTS(SELECT 1 FROM mysql.user WHERE User = ? AND Host = '%')";

pub const GET_CONNECTION_LIMIT: &str =
    "SELECT max_user_connections FROM mysql.user WHERE User = ? AND Host = '%'";

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a string literal with single quotes
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `'user'@'%'`
pub fn account(user: &str) -> String {
    format!("{}@{}", quote_literal(user), quote_literal(DEFAULT_HOST))
}

pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", quote_ident(name))
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {}", quote_ident(name))
}

/// CREATE USER, optionally with a connection limit
pub fn create_user(user: &str, password: &str, max_connections: Option<u32>) -> String {
    let mut sql = format!(
        "CREATE USER {} IDENTIFIED BY {}",
        account(user),
        quote_literal(password)
    );
    if let Some(limit) = max_connections {
        sql.push_str(&format!(" WITH MAX_USER_CONNECTIONS {}", limit));
    }
    sql
}

pub fn set_password(user: &str, password: &str) -> String {
    format!(
        "SET PASSWORD FOR {} = {}",
        account(user),
        quote_literal(password)
    )
}

pub fn set_connection_limit(user: &str, limit: u32) -> String {
    format!(
        "ALTER USER {} WITH MAX_USER_CONNECTIONS {}",
        account(user),
        limit
    )
}

pub fn drop_user(user: &str) -> String {
    format!("DROP USER {}", account(user))
}

pub fn grant_all(database: &str, user: &str) -> String {
    format!(
        "GRANT ALL PRIVILEGES ON {}.* TO {}",
        quote_ident(database),
        account(user)
    )
}

pub fn revoke_all(database: &str, user: &str) -> String {
    format!(
        "REVOKE ALL PRIVILEGES ON {}.* FROM {}",
        quote_ident(database),
        account(user)
    )
}

pub fn grant(kind: GrantKind, database: &str, user: &str) -> String {
    format!(
        "GRANT {} ON {}.* TO {}",
        kind.as_str(),
        quote_ident(database),
        account(user)
    )
}

pub fn revoke(kind: GrantKind, database: &str, user: &str) -> String {
    format!(
        "REVOKE {} ON {}.* FROM {}",
        kind.as_str(),
        quote_ident(database),
        account(user)
    )
}

/// Point lookup of one privilege column in `mysql.db`
///
/// The column name comes from the closed catalog, never from input.
pub fn grant_exists(kind: GrantKind) -> String {
    format!(
        "SELECT {} FROM mysql.db WHERE Db = ? AND User = ? AND Host = '%'",
        kind.column()
    )
}
