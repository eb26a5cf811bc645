use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

/// How long to wait for the first connection before giving up
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool settings, taken from the command line
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub dsn: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    pub max_idle_time: Duration,
}

/// DbConnection manages the SQLite pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open the pool described by `settings` and make sure the schema exists
    pub async fn new(settings: &PoolSettings) -> Result<Self> {
        let url = settings.dsn.as_str();

        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_open_conns)
            .min_connections(settings.max_idle_conns.min(settings.max_open_conns))
            .idle_timeout(settings.max_idle_time)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect(url)
            .await?;

        // Fail fast if the database is unreachable
        sqlx::query("SELECT 1").execute(&pool).await?;

        Self::setup_schema(&pool).await?;
        info!(dsn = %url, "database connection pool established");

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let settings = PoolSettings {
            dsn: format!("file:memdb_{}?mode=memory&cache=shared", test_id),
            max_open_conns: 1,
            max_idle_conns: 1,
            max_idle_time: Duration::from_secs(600),
        };

        Self::new(&settings).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                title TEXT NOT NULL,
                year INTEGER NOT NULL,
                runtime INTEGER NOT NULL,
                genres TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
