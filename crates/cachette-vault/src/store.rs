//! Storage backend abstraction and the two bundled implementations.
//!
//! The vault core persists everything through a deliberately narrow
//! string key-value contract: `get` / `set` / `remove` / `keys`. Keys
//! are namespaced by convention (see [`crate::keys`]); values are
//! base64 ciphertext, base64 binary material, or JSON metadata indexes.
//! The backend is trusted for durability and read-after-write
//! consistency within the process, nothing more.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use thiserror::Error;

/// Failure inside a storage backend.
#[derive(Debug, Error)]
#[error("storage backend error: {0}")]
pub struct StoreError(pub String);

/// The key-value contract the vault core requires from its environment.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend delete fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Enumerate every key currently present. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend enumeration fails.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Ephemeral in-process store. The default for tests and for callers
/// that manage durability themselves.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError("memory store mutex poisoned".into()))
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryStore(..)")
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// SQLite-backed store
// ---------------------------------------------------------------------------

/// Durable store backed by a single-table SQLite database.
///
/// The table holds only ciphertext and public metadata — encryption
/// happens above this layer, so the database itself is plain SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SqliteStore(..)")
    }
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(sql_err)?;
        Self::init(conn)
    }

    /// Open a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             CREATE TABLE IF NOT EXISTS kv (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )
        .map_err(sql_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError("sqlite store mutex poisoned".into()))
    }
}

fn sql_err(err: rusqlite::Error) -> StoreError {
    StoreError(err.to_string())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        match conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        }) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(sql_err(other)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(sql_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(sql_err)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv").map_err(sql_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(sql_err)?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(sql_err)?);
        }
        Ok(keys)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("a").expect("get"), None);
        store.set("a", "1").expect("set");
        store.set("b", "2").expect("set");
        assert_eq!(store.get("a").expect("get"), Some("1".to_string()));

        store.set("a", "3").expect("overwrite");
        assert_eq!(store.get("a").expect("get"), Some("3".to_string()));

        let mut keys = store.keys().expect("keys");
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        store.remove("a").expect("remove");
        assert_eq!(store.get("a").expect("get"), None);
        store.remove("a").expect("removing absent key is a no-op");
    }

    #[test]
    fn memory_store_contract() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sqlite_store_contract() {
        let store = SqliteStore::open_in_memory().expect("open");
        exercise(&store);
    }
}
