use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Cache namespace keys, one per (record kind, purpose) pair. These double
/// as the storage schema and must stay stable across releases.
pub mod keys {
    pub const WEIGHT_HISTORY: &str = "history_beratBadan";
    pub const PRESSURE_HISTORY: &str = "history_tekananDarah";
    pub const PRAYER_HISTORY: &str = "history_sholat";
    pub const WEIGHT_BIODATA: &str = "biodata_beratBadan";
}

/// Durable key/value store holding one serialized blob per namespace key.
///
/// Writes replace the whole value under a key; there is no partial merge.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open cache store: {}", path.display()))?;
        let store = CacheStore { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = CacheStore { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );",
        )?;
        Ok(())
    }

    /// Serialize `value` and store it under `key`, replacing any previous blob.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let blob = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize cache entry '{key}'"))?;
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO cache (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, blob, now],
        )?;
        Ok(())
    }

    /// Read and deserialize the blob stored under `key`.
    ///
    /// A missing key is `Ok(None)`, never an error.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut stmt = self.conn.prepare("SELECT value FROM cache WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let blob: String = row.get(0)?;
            let value = serde_json::from_str(&blob)
                .with_context(|| format!("Corrupt cache entry '{key}'"))?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }
}
