use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::watchlist::Watchlist;
use crate::errors::Result;

/// Key the watched list is stored under
pub const WATCHED_KEY: &str = "watched";

/// The WatchlistStore is a small durable key-value store backed by SQLite.
/// The watched list lives under a single key as a JSON document.
pub struct WatchlistStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl WatchlistStore {
    /// Open (or create) the store at `path`, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "watchlist database opened");

        let store = WatchlistStore {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// A store that lives only as long as the process
    pub fn in_memory() -> Result<Self> {
        let store = WatchlistStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Location on disk; `None` for an in-memory store
    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.db_path.is_some()
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Read the watched list. A missing or unreadable entry is an empty list.
    pub fn load_watched(&self) -> Watchlist {
        let stored = match self.get(WATCHED_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("no stored watch list, starting empty");
                return Watchlist::new();
            }
            Err(err) => {
                warn!(error = %err, "could not read stored watch list, starting empty");
                return Watchlist::new();
            }
        };

        match Watchlist::from_json(&stored) {
            Ok(list) => {
                info!(movies = list.len(), "watch list loaded");
                list
            }
            Err(err) => {
                warn!(error = %err, "stored watch list is malformed, starting empty");
                Watchlist::new()
            }
        }
    }

    /// Serialize the whole list and write it under [`WATCHED_KEY`]
    pub fn save_watched(&self, list: &Watchlist) -> Result<()> {
        let json = list.to_json()?;
        self.set(WATCHED_KEY, &json)?;
        debug!(movies = list.len(), "watch list saved");
        Ok(())
    }

    /// Remove the backing table so every later write fails
    #[cfg(test)]
    pub fn break_table(&self) {
        self.conn.execute("DROP TABLE kv", []).unwrap();
    }
}

impl std::fmt::Debug for WatchlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::watchlist::WatchedRecord;

    fn inception() -> WatchedRecord {
        WatchedRecord {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "N/A".to_string(),
            external_rating: 8.8,
            user_rating: 8,
            runtime_minutes: 148,
        }
    }

    #[test]
    fn test_get_missing_key() {
        let store = WatchlistStore::in_memory().unwrap();
        assert_eq!(store.get("watched").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = WatchlistStore::in_memory().unwrap();
        store.set("watched", "[]").unwrap();
        store.set("watched", "[1]").unwrap();

        assert_eq!(store.get("watched").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_absent_list_loads_empty() {
        let store = WatchlistStore::in_memory().unwrap();
        assert!(store.load_watched().is_empty());
    }

    #[test]
    fn test_malformed_list_loads_empty() {
        let store = WatchlistStore::in_memory().unwrap();

        for garbage in ["null", "{not json", "{\"id\": 1}", ""] {
            store.set(WATCHED_KEY, garbage).unwrap();
            assert!(store.load_watched().is_empty(), "input: {garbage:?}");
        }
    }

    #[test]
    fn test_saved_list_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("watchlist.db");

        let mut list = Watchlist::new();
        list.add(inception());

        {
            let store = WatchlistStore::open(&path).unwrap();
            assert!(store.is_persistent());
            store.save_watched(&list).unwrap();
        }

        let reopened = WatchlistStore::open(&path).unwrap();
        assert_eq!(reopened.load_watched(), list);
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_save_fails_without_table() {
        let store = WatchlistStore::in_memory().unwrap();
        store.break_table();

        let mut list = Watchlist::new();
        list.add(inception());
        assert!(store.save_watched(&list).is_err());
        assert!(store.load_watched().is_empty());
    }
}
