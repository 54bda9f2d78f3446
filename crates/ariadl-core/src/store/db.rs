//! SQLite-backed key-value store.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

use super::KeyValueStore;
use crate::error;

const SELECT_VALUE: &str = "SELECT value FROM kv_values WHERE key = ?";

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the key-value database.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/ariadl/values.db` on Debian.
#[derive(Clone)]
pub struct ValueDb {
    pool: Pool<Sqlite>,
}

impl ValueDb {
    /// Open (or create) the default database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("ariadl")?;
        let state_dir = xdg_dirs.get_state_home().join("ariadl");
        Self::open_at(state_dir.join("values.db")).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let db = ValueDb { pool };
        db.migrate().await?;
        tracing::debug!("opened value store at {}", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = ValueDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // `value` is nullable on purpose: a null entry is a stale key that
        // settings cleanup removes.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_values (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl KeyValueStore for ValueDb {
    async fn list_keys(&self) -> error::Result<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_values ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    async fn get_value(&self, key: &str) -> error::Result<Option<String>> {
        let value = sqlx::query_scalar::<_, Option<String>>(SELECT_VALUE)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value.flatten())
    }

    async fn set_value(&self, key: &str, value: Option<&str>) -> error::Result<()> {
        sqlx::query(
            "INSERT INTO kv_values (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> error::Result<()> {
        sqlx::query("DELETE FROM kv_values WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
