//! Schema migrations, one set per dialect.

use sqlx::AnyPool;
use sqlx::migrate::{MigrateError, Migrator};

use super::dialect::Dialect;

static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");
static MYSQL_MIGRATOR: Migrator = sqlx::migrate!("./migrations/mysql");

pub fn migrator(dialect: Dialect) -> &'static Migrator {
    match dialect {
        Dialect::Sqlite => &SQLITE_MIGRATOR,
        Dialect::MySql => &MYSQL_MIGRATOR,
    }
}

/// Applies pending migrations for `dialect`.
pub async fn run_migrations(dialect: Dialect, pool: &AnyPool) -> Result<(), MigrateError> {
    migrator(dialect).run(pool).await?;
    tracing::info!("Applied {} migrations", dialect);
    Ok(())
}
