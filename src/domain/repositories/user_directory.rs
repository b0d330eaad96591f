//! Directory of principals.

use crate::domain::entities::User;
use crate::error::StoreResult;
use async_trait::async_trait;

/// Maps principal strings to durable identities and admin flags.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqlUserDirectory`] - SQLite/MySQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up `principal`, creating a non-admin user on first reference.
    async fn get_or_create(&self, principal: &str) -> StoreResult<User>;

    /// Grants admin rights to `target` on behalf of `acting`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError::Unauthorized`] unless `acting` is an admin.
    async fn promote_to_admin(&self, acting: &str, target: &str) -> StoreResult<u64>;

    /// Grants admin rights without an acting admin. Operator use only.
    async fn bootstrap_admin(&self, principal: &str) -> StoreResult<u64>;

    async fn list(&self) -> StoreResult<Vec<User>>;
}
