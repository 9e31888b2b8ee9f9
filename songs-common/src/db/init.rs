//! Store initialization
//!
//! Opens the SQLite file backing the song collection and creates the schema
//! on first run. Creation is idempotent; there is no migration machinery.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets list/search reads proceed while a rating append commits
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .with_regexp();

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory store with the schema in place
///
/// Limited to one connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.with_regexp();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Create the `songs` table and its indexes if they do not exist
pub async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            level INTEGER NOT NULL,
            difficulty REAL NOT NULL,
            released TEXT,
            rates TEXT NOT NULL DEFAULT '[]',
            CHECK (length(id) = 24),
            CHECK (json_valid(rates) AND json_type(rates) = 'array')
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_level ON songs(level)")
        .execute(pool)
        .await?;

    Ok(())
}
