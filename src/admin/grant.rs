//! Database-level grants

use tracing::info;

use crate::backend::Datum;

use super::classify::Operation;
use super::error::{AdminError, AdminResult, ObjectKind};
use super::validate::validate_grant;
use super::{scalar, statements, unexpected, AdminController};

impl AdminController {
    /// Grant every privilege on `database` to `username`
    ///
    /// Both must exist. The user is checked first, then the database; the
    /// grant is only issued when both checks pass.
    pub async fn grant_all(&self, database: &str, username: &str) -> AdminResult<()> {
        self.reserved.validate_database(database)?;
        self.reserved.validate_user(username)?;

        if !self.user_exists(username).await? {
            return Err(AdminError::DoesNotExist {
                kind: ObjectKind::User,
                name: username.to_string(),
            });
        }
        if !self.database_exists(database).await? {
            return Err(AdminError::DoesNotExist {
                kind: ObjectKind::Database,
                name: database.to_string(),
            });
        }

        self.execute(
            Operation::GrantAll,
            database,
            &statements::grant_all(database, username),
        )
        .await?;
        info!(database, user = username, "all privileges granted");
        Ok(())
    }

    /// Revoke every privilege on `database` from `username`
    ///
    /// No existence checks; whatever the server says about a missing grantee
    /// is returned as a backend failure.
    pub async fn revoke_all(&self, database: &str, username: &str) -> AdminResult<()> {
        self.reserved.validate_database(database)?;
        self.reserved.validate_user(username)?;
        self.execute(
            Operation::RevokeAll,
            database,
            &statements::revoke_all(database, username),
        )
        .await?;
        info!(database, user = username, "all privileges revoked");
        Ok(())
    }

    /// Grant a single privilege, e.g. `"select"` or `"CREATE VIEW"`
    pub async fn grant(&self, grant: &str, database: &str, username: &str) -> AdminResult<()> {
        self.reserved.validate_database(database)?;
        self.reserved.validate_user(username)?;
        let kind = validate_grant(grant)?;

        self.execute(
            Operation::Grant,
            database,
            &statements::grant(kind, database, username),
        )
        .await?;
        info!(database, user = username, privilege = %kind, "privilege granted");
        Ok(())
    }

    /// Revoke a single privilege
    pub async fn revoke(&self, grant: &str, database: &str, username: &str) -> AdminResult<()> {
        self.reserved.validate_database(database)?;
        self.reserved.validate_user(username)?;
        let kind = validate_grant(grant)?;

        self.execute(
            Operation::Revoke,
            database,
            &statements::revoke(kind, database, username),
        )
        .await?;
        info!(database, user = username, privilege = %kind, "privilege revoked");
        Ok(())
    }

    /// Check if `username` holds a privilege on `database`
    ///
    /// Reads the privilege's column from `mysql.db`. No row means no grant.
    pub async fn grant_exists(
        &self,
        grant: &str,
        database: &str,
        username: &str,
    ) -> AdminResult<bool> {
        self.reserved.validate_database(database)?;
        self.reserved.validate_user(username)?;
        let kind = validate_grant(grant)?;

        let rows = self
            .query(
                Operation::GrantExists,
                &statements::grant_exists(kind),
                vec![Datum::from(database), Datum::from(username)],
            )
            .await?;

        match scalar(&rows) {
            None | Some(Datum::Null) => Ok(false),
            Some(d) => d
                .as_bool()
                .ok_or_else(|| unexpected(Operation::GrantExists, "privilege", d)),
        }
    }
}
