//! Database connection management

use std::{path::Path, sync::Arc};

use sqlx::{
    SqlitePool, query, query_scalar,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Highest schema version this build understands, kept in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const GET_USER_VERSION_SQL: &str = "PRAGMA user_version";

const SCHEMA_SQL: [&str; 3] = [
    include_str!("sql/create_orders_table.sql"),
    include_str!("sql/create_order_items_table.sql"),
    include_str!("sql/create_order_items_index.sql"),
];

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to open database")]
    Connect(#[source] sqlx::Error),

    #[error("failed to prepare database schema")]
    Schema(#[source] sqlx::Error),

    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i64, supported: i64 },
}

/// Lazily connected `SQLite` database.
///
/// Clones share one pool, capped at a single connection, which is created and migrated
/// on first use.
#[derive(Debug, Clone)]
pub struct Db {
    options: SqliteConnectOptions,
    pool: Arc<OnceCell<SqlitePool>>,
}

impl Db {
    #[must_use]
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self {
            options,
            pool: Arc::new(OnceCell::new()),
        }
    }

    /// Database stored in a file, created if missing.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
        )
    }

    /// Private in-memory database living as long as the pool's connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(SqliteConnectOptions::new())
    }

    /// Get the pool, connecting and preparing the schema on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or its schema cannot be prepared.
    pub async fn pool(&self) -> Result<&SqlitePool, DatabaseError> {
        self.pool.get_or_try_init(|| connect(&self.options)).await
    }
}

/// Connect to `SQLite` and bring the schema up to [`SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns an error if the connection cannot be established or the schema cannot be
/// prepared.
pub async fn connect(options: &SqliteConnectOptions) -> Result<SqlitePool, DatabaseError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options.clone())
        .await
        .map_err(DatabaseError::Connect)?;

    debug!(filename = %options.get_filename().display(), "connected to database");

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create the orders tables if absent and record the schema version.
///
/// # Errors
///
/// Returns an error if the stored version is newer than [`SCHEMA_VERSION`] or a schema
/// statement fails.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await.map_err(DatabaseError::Schema)?;

    let found: i64 = query_scalar(GET_USER_VERSION_SQL)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::Schema)?;

    if found > SCHEMA_VERSION {
        return Err(DatabaseError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for statement in SCHEMA_SQL {
        query(statement)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    if found < SCHEMA_VERSION {
        query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Schema)?;

        info!(from = found, to = SCHEMA_VERSION, "upgraded database schema");
    }

    tx.commit().await.map_err(DatabaseError::Schema)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn pool_creates_schema_and_records_version() -> TestResult {
        let db = Db::in_memory();
        let pool = db.pool().await?;

        let version: i64 = query_scalar(GET_USER_VERSION_SQL).fetch_one(pool).await?;

        let tables: Vec<String> = query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('orders', 'order_items') ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        assert_eq!(version, SCHEMA_VERSION);
        assert_eq!(tables, ["order_items", "orders"]);

        Ok(())
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() -> TestResult {
        let db = Db::in_memory();
        let pool = db.pool().await?;

        ensure_schema(pool).await?;
        ensure_schema(pool).await?;

        Ok(())
    }

    #[tokio::test]
    async fn clones_share_one_pool() -> TestResult {
        let db = Db::in_memory();
        let other = db.clone();

        query("INSERT INTO orders (total, created_at) VALUES (1, 'now')")
            .execute(db.pool().await?)
            .await?;

        let count: i64 = query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(other.pool().await?)
            .await?;

        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_connection() -> TestResult {
        let db = Db::in_memory();
        let other = db.clone();

        let (first, second) = tokio::join!(db.pool(), other.pool());
        let (first, second) = (first?, second?);

        assert!(std::ptr::eq(first, second));
        assert_eq!(first.size(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn newer_schema_version_is_rejected() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("future.sqlite3");

        {
            let pool = Db::from_path(&path).pool().await?.clone();

            query("PRAGMA user_version = 99").execute(&pool).await?;
            pool.close().await;
        }

        let db = Db::from_path(&path);
        let result = db.pool().await;

        assert!(matches!(
            result,
            Err(DatabaseError::SchemaTooNew {
                found: 99,
                supported: SCHEMA_VERSION
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn missing_directory_fails_to_connect() -> TestResult {
        let dir = TempDir::new()?;
        let db = Db::from_path(dir.path().join("missing").join("db.sqlite3"));

        let result = db.pool().await;

        assert!(matches!(result, Err(DatabaseError::Connect(_))));

        Ok(())
    }
}
