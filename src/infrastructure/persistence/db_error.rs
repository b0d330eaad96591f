//! Dialect-aware classification of driver errors.

use sqlx::mysql::MySqlDatabaseError;

use super::dialect::Dialect;

/// SQLite extended result codes for key collisions.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_ROWID: i32 = 2579;

/// MySQL `ER_DUP_ENTRY`: duplicate entry for a unique key.
const MYSQL_ER_DUP_ENTRY: u16 = 1062;

/// Returns true if `err` is a duplicate-key / unique-constraint violation
/// reported by the `dialect` driver.
///
/// Never panics; errors that are not database errors, or that come from a
/// different driver than `dialect`, classify as `false`.
pub fn is_duplicate_constraint(dialect: Dialect, err: &sqlx::Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    match dialect {
        Dialect::Sqlite => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(is_sqlite_duplicate_code),
        Dialect::MySql => db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .is_some_and(|e| is_mysql_duplicate_code(e.number())),
    }
}

pub fn is_sqlite_duplicate_code(extended_code: i32) -> bool {
    matches!(
        extended_code,
        SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_ROWID
    )
}

pub fn is_mysql_duplicate_code(number: u16) -> bool {
    number == MYSQL_ER_DUP_ENTRY
}
