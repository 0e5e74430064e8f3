//! Database lifecycle

use tracing::info;

use crate::backend::Datum;

use super::classify::Operation;
use super::error::AdminResult;
use super::{first_column_strings, scalar, statements, unexpected, AdminController};

impl AdminController {
    /// Create a database
    ///
    /// Returns `AlreadyExists` if the server already has it. Two concurrent
    /// creates of the same name race on the server; the loser sees
    /// `AlreadyExists`.
    pub async fn create_database(&self, name: &str) -> AdminResult<()> {
        self.reserved.validate_database(name)?;
        self.execute(
            Operation::CreateDatabase,
            name,
            &statements::create_database(name),
        )
        .await?;
        info!(database = name, "database created");
        Ok(())
    }

    /// Drop a database, returning `DoesNotExist` if it is absent
    pub async fn delete_database(&self, name: &str) -> AdminResult<()> {
        self.reserved.validate_database(name)?;
        self.execute(
            Operation::DropDatabase,
            name,
            &statements::drop_database(name),
        )
        .await?;
        info!(database = name, "database dropped");
        Ok(())
    }

    /// Check if a database exists
    pub async fn database_exists(&self, name: &str) -> AdminResult<bool> {
        self.reserved.validate_database(name)?;
        let rows = self
            .query(
                Operation::DatabaseExists,
                statements::DATABASE_EXISTS,
                vec![Datum::from(name)],
            )
            .await?;

        match scalar(&rows) {
            None | Some(Datum::Null) => Ok(false),
            Some(d) => d
                .as_i64()
                .map(|count| count > 0)
                .ok_or_else(|| unexpected(Operation::DatabaseExists, "count", d)),
        }
    }

    /// All non-reserved databases, in server order
    pub async fn list_databases(&self) -> AdminResult<Vec<String>> {
        let rows = self
            .query(Operation::ListDatabases, statements::LIST_DATABASES, Vec::new())
            .await?;
        Ok(self.reserved.filter_databases(first_column_strings(rows)))
    }

    /// Total data + index bytes across the database's tables
    ///
    /// A database without tables (or one that does not exist) reports 0.
    pub async fn database_size(&self, name: &str) -> AdminResult<u64> {
        self.reserved.validate_database(name)?;
        let rows = self
            .query(
                Operation::DatabaseSize,
                statements::DATABASE_SIZE,
                vec![Datum::from(name)],
            )
            .await?;

        match scalar(&rows) {
            None | Some(Datum::Null) => Ok(0),
            Some(d) => d
                .as_u64()
                .ok_or_else(|| unexpected(Operation::DatabaseSize, "size", d)),
        }
    }

    /// Names of the tables in a database, in server order
    pub async fn database_tables(&self, name: &str) -> AdminResult<Vec<String>> {
        self.reserved.validate_database(name)?;
        let rows = self
            .query(
                Operation::ListTables,
                statements::LIST_TABLES,
                vec![Datum::from(name)],
            )
            .await?;
        Ok(first_column_strings(rows))
    }
}
