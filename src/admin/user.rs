//! User account lifecycle
//!
//! Accounts are always `'<name>'@'%'`.

use tracing::info;

use crate::backend::Datum;

use super::classify::Operation;
use super::error::AdminResult;
use super::validate::validate_password;
use super::{first_column_strings, scalar, statements, unexpected, AdminController};

impl AdminController {
    /// Create an account
    pub async fn create_user(&self, username: &str, password: &str) -> AdminResult<()> {
        self.create_account(username, password, None).await
    }

    /// Create an account capped at `limit` simultaneous connections
    ///
    /// A limit of 0 means unlimited, as on the server.
    pub async fn create_user_with_connection_limit(
        &self,
        username: &str,
        password: &str,
        limit: u32,
    ) -> AdminResult<()> {
        self.create_account(username, password, Some(limit)).await
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
        limit: Option<u32>,
    ) -> AdminResult<()> {
        self.reserved.validate_user(username)?;
        validate_password(password)?;
        self.execute(
            Operation::CreateUser,
            username,
            &statements::create_user(username, password, limit),
        )
        .await?;
        info!(user = username, max_connections = ?limit, "user created");
        Ok(())
    }

    /// Change an account's password
    pub async fn update_user_password(&self, username: &str, password: &str) -> AdminResult<()> {
        self.reserved.validate_user(username)?;
        validate_password(password)?;
        self.execute(
            Operation::UpdatePassword,
            username,
            &statements::set_password(username, password),
        )
        .await?;
        info!(user = username, "password updated");
        Ok(())
    }

    /// Drop an account, returning `DoesNotExist` if it is absent
    pub async fn delete_user(&self, username: &str) -> AdminResult<()> {
        self.reserved.validate_user(username)?;
        self.execute(
            Operation::DropUser,
            username,
            &statements::drop_user(username),
        )
        .await?;
        info!(user = username, "user dropped");
        Ok(())
    }

    /// All non-reserved accounts on host `%`, in server order
    pub async fn list_users(&self) -> AdminResult<Vec<String>> {
        let rows = self
            .query(Operation::ListUsers, statements::LIST_USERS, Vec::new())
            .await?;
        Ok(self.reserved.filter_users(first_column_strings(rows)))
    }

    /// Check if an account exists
    pub async fn user_exists(&self, username: &str) -> AdminResult<bool> {
        self.reserved.validate_user(username)?;
        let rows = self
            .query(
                Operation::UserExists,
                statements::USER_EXISTS,
                vec![Datum::from(username)],
            )
            .await?;

        match scalar(&rows) {
            None | Some(Datum::Null) => Ok(false),
            Some(d) => d
                .as_bool()
                .ok_or_else(|| unexpected(Operation::UserExists, "exists", d)),
        }
    }

    /// Change an account's connection cap
    pub async fn set_connection_limit(&self, username: &str, limit: u32) -> AdminResult<()> {
        self.reserved.validate_user(username)?;
        self.execute(
            Operation::SetConnectionLimit,
            username,
            &statements::set_connection_limit(username, limit),
        )
        .await?;
        info!(user = username, max_connections = limit, "connection limit updated");
        Ok(())
    }

    /// An account's connection cap
    ///
    /// Unknown accounts report 0, the same as an uncapped account.
    pub async fn get_connection_limit(&self, username: &str) -> AdminResult<u32> {
        self.reserved.validate_user(username)?;
        let rows = self
            .query(
                Operation::GetConnectionLimit,
                statements::GET_CONNECTION_LIMIT,
                vec![Datum::from(username)],
            )
            .await?;

        match scalar(&rows) {
            None | Some(Datum::Null) => Ok(0),
            Some(d) => d
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| unexpected(Operation::GetConnectionLimit, "connection limit", d)),
        }
    }
}
