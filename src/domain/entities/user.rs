//! User entity: a principal known to the directory.

use serde::Serialize;

/// A principal with a durable, database-assigned identity.
///
/// Users are created lazily the first time a principal is referenced and are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub is_admin: bool,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_admin,
        }
    }
}
