//! SQL implementation of the user directory.

use async_trait::async_trait;
use sqlx::{AnyPool, Row, any::AnyRow};
use tracing::{debug, info};

use super::db_error::is_duplicate_constraint;
use super::dialect::{Dialect, Query, require_sql};
use crate::domain::entities::User;
use crate::domain::entities::route::{format_timestamp, is_valid_principal, now};
use crate::domain::repositories::UserDirectory;
use crate::error::{StoreError, StoreResult};

/// Principal directory backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SqlUserDirectory {
    dialect: Dialect,
    pool: AnyPool,
}

impl SqlUserDirectory {
    pub fn new(dialect: Dialect, pool: AnyPool) -> Self {
        Self { dialect, pool }
    }

    /// Looks a principal up without creating it.
    pub async fn find(&self, principal: &str) -> StoreResult<Option<User>> {
        let sql = require_sql(self.dialect, Query::GetUserByName)?;
        let row = sqlx::query(sql)
            .bind(principal)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Inserts a non-admin user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] when another caller created the
    /// same principal first, so the caller can repeat the lookup.
    pub async fn create(&self, principal: &str) -> StoreResult<User> {
        let sql = require_sql(self.dialect, Query::InsertUser)?;
        let result = sqlx::query(sql)
            .bind(principal)
            .bind(format_timestamp(&now()))
            .bind(0_i64)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_constraint(self.dialect, &e) {
                    StoreError::DuplicateKey(principal.to_string())
                } else {
                    StoreError::Storage(e)
                }
            })?;

        match result.last_insert_id() {
            Some(id) => {
                debug!(user_id = id, "Created user {}", principal);
                Ok(User::new(id, principal, false))
            }
            None => self
                .find(principal)
                .await?
                .ok_or_else(|| StoreError::NotFound(principal.to_string())),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

fn user_from_row(row: &AnyRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        is_admin: row.try_get::<i64, _>("isadmin")? != 0,
    })
}

fn require_principal(principal: &str) -> StoreResult<()> {
    if is_valid_principal(principal) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "Invalid or bad format principal '{principal}'"
        )))
    }
}

#[async_trait]
impl UserDirectory for SqlUserDirectory {
    async fn get_or_create(&self, principal: &str) -> StoreResult<User> {
        require_principal(principal)?;

        if let Some(user) = self.find(principal).await? {
            return Ok(user);
        }

        match self.create(principal).await {
            Err(StoreError::DuplicateKey(_)) => {
                debug!("Lost user creation race for {}, re-reading", principal);
                self.find(principal)
                    .await?
                    .ok_or_else(|| StoreError::NotFound(principal.to_string()))
            }
            other => other,
        }
    }

    async fn promote_to_admin(&self, acting: &str, target: &str) -> StoreResult<u64> {
        let admin = self.get_or_create(acting).await?;
        if !admin.is_admin {
            return Err(StoreError::unauthorized(acting, "promote"));
        }

        let user = self.get_or_create(target).await?;
        let sql = require_sql(self.dialect, Query::PromoteUserToAdmin)?;
        let result = sqlx::query(sql)
            .bind(format_timestamp(&now()))
            .bind(admin.id)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        info!("{} promoted {} to admin", acting, target);
        Ok(result.rows_affected())
    }

    async fn bootstrap_admin(&self, principal: &str) -> StoreResult<u64> {
        self.get_or_create(principal).await?;

        let sql = require_sql(self.dialect, Query::BootstrapAdmin)?;
        let result = sqlx::query(sql)
            .bind(format_timestamp(&now()))
            .bind(principal)
            .execute(&self.pool)
            .await?;

        info!("Bootstrapped {} as admin", principal);
        Ok(result.rows_affected())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let sql = require_sql(self.dialect, Query::GetAllUsers)?;
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }
}
