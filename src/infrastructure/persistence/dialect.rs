//! Per-dialect SQL statement table.
//!
//! Every statement the store executes is looked up here by (dialect, query), so
//! the same store logic runs against SQLite and MySQL. Both dialects use `?`
//! placeholders. Timestamps are bound and read back as `YYYY-MM-DD HH:MM:SS`
//! text; MySQL `DATETIME` columns are formatted on the way out.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{StoreError, StoreResult};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::MySql => "mysql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::MySql),
            other => Err(StoreError::Configuration(format!(
                "unknown database dialect '{other}'"
            ))),
        }
    }
}

/// Named statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    InsertRoute,
    InsertUser,
    GetUserByName,
    GetAllUsers,
    PromoteUserToAdmin,
    BootstrapAdmin,
    LockRoute,
    GetRouteByKey,
    GetUrlByKey,
    GetLockStatusByKey,
    UpdateRouteUrl,
    DeleteRouteByKey,
    Ping,
}

impl Query {
    pub const ALL: [Query; 13] = [
        Query::InsertRoute,
        Query::InsertUser,
        Query::GetUserByName,
        Query::GetAllUsers,
        Query::PromoteUserToAdmin,
        Query::BootstrapAdmin,
        Query::LockRoute,
        Query::GetRouteByKey,
        Query::GetUrlByKey,
        Query::GetLockStatusByKey,
        Query::UpdateRouteUrl,
        Query::DeleteRouteByKey,
        Query::Ping,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Query::InsertRoute => "insert-route",
            Query::InsertUser => "insert-user",
            Query::GetUserByName => "get-user-by-name",
            Query::GetAllUsers => "get-all-users",
            Query::PromoteUserToAdmin => "promote-user-to-admin",
            Query::BootstrapAdmin => "bootstrap-admin",
            Query::LockRoute => "lock-route",
            Query::GetRouteByKey => "get-route-by-key",
            Query::GetUrlByKey => "get-url-by-key",
            Query::GetLockStatusByKey => "get-lock-status-by-key",
            Query::UpdateRouteUrl => "update-route-url",
            Query::DeleteRouteByKey => "delete-route-by-key",
            Query::Ping => "ping",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.tag() == tag)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

const SQLITE: &[(Query, &str)] = &[
    (
        Query::InsertRoute,
        "INSERT INTO routes (short_key, url, creatorid, teamid, created_at, modified_at, last_modified_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    ),
    (
        Query::InsertUser,
        "INSERT INTO users (name, created_at, isadmin) VALUES (?, ?, ?)",
    ),
    (
        Query::GetUserByName,
        "SELECT id, name, isadmin FROM users WHERE name = ?",
    ),
    (
        Query::GetAllUsers,
        "SELECT id, name, isadmin FROM users ORDER BY id",
    ),
    (
        Query::PromoteUserToAdmin,
        "UPDATE users SET isadmin = 1, modified_at = ?, last_modified_by = ? WHERE id = ?",
    ),
    (
        Query::BootstrapAdmin,
        "UPDATE users SET isadmin = 1, modified_at = ? WHERE name = ?",
    ),
    (
        Query::LockRoute,
        "UPDATE routes SET locked = 1, last_modified_by = ?, modified_at = ? WHERE short_key = ?",
    ),
    (
        Query::GetRouteByKey,
        "SELECT r.short_key, r.url, c.name AS creator, COALESCE(t.name, c.name) AS team, \
         r.created_at, r.modified_at, COALESCE(m.name, c.name) AS last_modified_by, r.locked \
         FROM routes r \
         JOIN users c ON c.id = r.creatorid \
         LEFT JOIN users t ON t.id = r.teamid \
         LEFT JOIN users m ON m.id = r.last_modified_by \
         WHERE r.short_key = ?",
    ),
    (
        Query::GetUrlByKey,
        "SELECT url FROM routes WHERE short_key = ?",
    ),
    (
        Query::GetLockStatusByKey,
        "SELECT locked FROM routes WHERE short_key = ?",
    ),
    (
        Query::UpdateRouteUrl,
        "UPDATE routes SET url = ?, last_modified_by = ?, modified_at = ? WHERE short_key = ?",
    ),
    (
        Query::DeleteRouteByKey,
        "DELETE FROM routes WHERE short_key = ?",
    ),
    (Query::Ping, "SELECT 1"),
];

const MYSQL: &[(Query, &str)] = &[
    (
        Query::InsertRoute,
        "INSERT INTO routes (short_key, url, creatorid, teamid, created_at, modified_at, last_modified_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    ),
    (
        Query::InsertUser,
        "INSERT INTO users (name, created_at, isadmin) VALUES (?, ?, ?)",
    ),
    (
        Query::GetUserByName,
        "SELECT id, name, isadmin FROM users WHERE name = ?",
    ),
    (
        Query::GetAllUsers,
        "SELECT id, name, isadmin FROM users ORDER BY id",
    ),
    (
        Query::PromoteUserToAdmin,
        "UPDATE users SET isadmin = 1, modified_at = ?, last_modified_by = ? WHERE id = ?",
    ),
    (
        Query::BootstrapAdmin,
        "UPDATE users SET isadmin = 1, modified_at = ? WHERE name = ?",
    ),
    (
        Query::LockRoute,
        "UPDATE routes SET locked = 1, last_modified_by = ?, modified_at = ? WHERE short_key = ?",
    ),
    (
        Query::GetRouteByKey,
        "SELECT r.short_key, r.url, c.name AS creator, COALESCE(t.name, c.name) AS team, \
         DATE_FORMAT(r.created_at, '%Y-%m-%d %H:%i:%s') AS created_at, \
         DATE_FORMAT(r.modified_at, '%Y-%m-%d %H:%i:%s') AS modified_at, \
         COALESCE(m.name, c.name) AS last_modified_by, r.locked \
         FROM routes r \
         JOIN users c ON c.id = r.creatorid \
         LEFT JOIN users t ON t.id = r.teamid \
         LEFT JOIN users m ON m.id = r.last_modified_by \
         WHERE r.short_key = ?",
    ),
    (
        Query::GetUrlByKey,
        "SELECT url FROM routes WHERE short_key = ?",
    ),
    (
        Query::GetLockStatusByKey,
        "SELECT locked FROM routes WHERE short_key = ?",
    ),
    (
        Query::UpdateRouteUrl,
        "UPDATE routes SET url = ?, last_modified_by = ?, modified_at = ? WHERE short_key = ?",
    ),
    (
        Query::DeleteRouteByKey,
        "DELETE FROM routes WHERE short_key = ?",
    ),
    (Query::Ping, "SELECT 1"),
];

/// Built on first use, then shared for the life of the process.
static QUERY_TABLE: LazyLock<HashMap<(Dialect, Query), &'static str>> = LazyLock::new(|| {
    let sqlite = SQLITE.iter().map(|(q, sql)| ((Dialect::Sqlite, *q), *sql));
    let mysql = MYSQL.iter().map(|(q, sql)| ((Dialect::MySql, *q), *sql));
    sqlite.chain(mysql).collect()
});

/// Returns the statement text for `query` in `dialect`, if one is defined.
pub fn sql(dialect: Dialect, query: Query) -> Option<&'static str> {
    QUERY_TABLE.get(&(dialect, query)).copied()
}

/// Like [`sql`], keyed by the string tags used in configuration.
pub fn sql_for_tags(dialect: &str, query: &str) -> Option<&'static str> {
    let dialect = dialect.parse::<Dialect>().ok()?;
    let query = Query::from_tag(query)?;
    sql(dialect, query)
}

/// Looks up a statement, turning a missing entry into a configuration error.
pub fn require_sql(dialect: Dialect, query: Query) -> StoreResult<&'static str> {
    sql(dialect, query).ok_or_else(|| {
        StoreError::Configuration(format!("no '{query}' statement for dialect {dialect}"))
    })
}
