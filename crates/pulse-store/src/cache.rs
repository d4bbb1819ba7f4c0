use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, warn};

use pulse_types::models::Record;

use crate::LocalCacheStore;

/// The single key the record list lives under.
pub const CACHE_KEY: &str = "community_bulletin_msgs";

/// Why the cached list could not be read. Only surfaced by `try_load`;
/// `load` treats every variant as an empty list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no cached records")]
    Missing,
    #[error("cached records are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("local storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("local cache lock poisoned")]
    Poisoned,
}

impl LocalCacheStore {
    /// The stored list, newest-inserted first. Never fails.
    pub fn load(&self) -> Vec<Record> {
        match self.try_load() {
            Ok(records) => records,
            Err(LoadError::Missing) => Vec::new(),
            Err(e) => {
                warn!("Local cache unreadable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<Record>, LoadError> {
        let conn = self.conn.lock().map_err(|_| LoadError::Poisoned)?;
        let raw = read_value(&conn, CACHE_KEY)?.ok_or(LoadError::Missing)?;
        if raw.trim().is_empty() {
            return Err(LoadError::Missing);
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Insert `record` at the front of the list and write the whole list back.
    /// A corrupt stored value is replaced rather than appended to.
    pub fn prepend(&self, record: &Record) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let mut records: Vec<Record> = match read_value(&tx, CACHE_KEY)? {
                Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                    .unwrap_or_else(|e| {
                        warn!("Overwriting corrupt local cache: {}", e);
                        Vec::new()
                    }),
                _ => Vec::new(),
            };
            records.insert(0, record.clone());

            write_value(&tx, CACHE_KEY, &serde_json::to_string(&records)?)?;
            tx.commit()?;

            debug!("Cached record {} ({} total)", record.id, records.len());
            Ok(())
        })
    }

    /// Overwrite the stored value with an arbitrary string.
    pub fn put_raw(&self, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            write_value(conn, CACHE_KEY, value)?;
            Ok(())
        })
    }
}

fn read_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()
}

fn write_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        (key, value),
    )?;
    Ok(())
}
