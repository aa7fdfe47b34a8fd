//! SQLite connection pool and embedded migrations.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

/// Errors raised while opening or migrating the database.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The database directory could not be created.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connect(#[from] sqlx::Error),
    /// An embedded migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Holds the connection pool every repository call runs against.
///
/// Constructed once at startup and handed to the routers; cloning shares the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database file at `path` and applies pending migrations.
    ///
    /// Foreign keys are enforced on every connection.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        tracing::info!(path = %path.display(), "database ready");
        Ok(db)
    }

    /// Creates a private in-memory database with migrations applied.
    ///
    /// The pool holds a single connection that never expires; closing it would discard the
    /// data.
    pub async fn new_in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Applies the migrations embedded from `migrations/`.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_tables() {
        let db = Database::new_in_memory().await.unwrap();
        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        for table in ["games", "player_stats", "players", "teams"] {
            assert!(names.contains(&table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::new_in_memory().await.unwrap();
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn open_file_based_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("gridiron.db");
        let db = Database::open(&db_path).await.unwrap();
        let (one,): (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(one, 1);
        db.pool().close().await;
        assert!(db_path.exists());

        let again = Database::open(&db_path).await.unwrap();
        again.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn open_path_with_url_characters() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("week#1?mode=ro.db");
        let db = Database::open(&db_path).await.unwrap();
        sqlx::query(
            "INSERT INTO teams (name, city, conference, division, created_at, updated_at) \
             VALUES ('Chiefs', 'Kansas City', 'AFC', 'West', ?1, ?1)",
        )
        .bind(chrono::Utc::now())
        .execute(db.pool())
        .await
        .unwrap();
        db.pool().close().await;
        assert!(db_path.exists());
        assert!(!dir.path().join("week").exists());
    }
}
