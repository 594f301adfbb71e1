//! SQLite-backed `StateStore`: a one-table key-value record.
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

use crate::ports::state::{StateError, StateStore};

impl From<sqlx::Error> for StateError {
    fn from(e: sqlx::Error) -> Self {
        StateError::Db(e.to_string())
    }
}

const LAST_POSTED_KEY: &str = "last_posted_id";

pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    /// Opens (creating if missing) the database and ensures the state table exists.
    pub async fn open(db_path: &Path) -> Result<Self, StateError> {
        let pool = create_pool(db_path).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StateError> {
        sqlx::query(
            r#"
      CREATE TABLE IF NOT EXISTS bot_state(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at_ms INTEGER NOT NULL
      )"#,
        )
        .execute(&self.pool)
        .await?;
        info!("State table ready");
        Ok(())
    }
}

async fn create_pool(db_path: &Path) -> Result<SqlitePool, StateError> {
    let full_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(db_path)
    };

    if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let opts = SqliteConnectOptions::new()
        .filename(&full_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[async_trait::async_trait]
impl StateStore for SqliteStateStore {
    async fn get_last_id(&self) -> Result<Option<String>, StateError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM bot_state WHERE key = ?1")
                .bind(LAST_POSTED_KEY)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn set_last_id(&self, id: &str) -> Result<(), StateError> {
        sqlx::query(
            r#"
      INSERT INTO bot_state(key, value, updated_at_ms) VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at_ms = excluded.updated_at_ms
      "#,
        )
        .bind(LAST_POSTED_KEY)
        .bind(id)
        .bind(now_epoch_ms())
        .execute(&self.pool)
        .await?;
        debug!(id, "Stored last-posted id");
        Ok(())
    }
}
