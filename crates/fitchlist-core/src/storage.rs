use crate::Result;
use fitchlist_types::PersistedViewState;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Key-value persistence for per-list view state.
///
/// Injected into the list controller so persistence is scoped per instance
/// and replaceable in tests.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, mainly for tests and one-shot commands
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// SQLite-backed store living in the data directory
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS view_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM view_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            r#"
            INSERT INTO view_state (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM view_state WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Read a persisted view state. Entries that no longer decode are
/// reported as absent so a stale shape never blocks a list from opening.
pub fn load_view_state(store: &dyn KeyValueStore, key: &str) -> Result<Option<PersistedViewState>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(state) => {
            tracing::debug!(key, "restored persisted view state");
            Ok(Some(state))
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring undecodable persisted view state");
            Ok(None)
        }
    }
}

pub fn save_view_state(
    store: &dyn KeyValueStore,
    key: &str,
    state: &PersistedViewState,
) -> Result<()> {
    let raw = serde_json::to_string(state)?;
    store.set(key, &raw)?;
    tracing::trace!(key, "persisted view state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitchlist_types::SortField;
    use tempfile::TempDir;

    fn sample_state() -> PersistedViewState {
        PersistedViewState {
            search_term: "practical".to_string(),
            sort: vec![SortField::descend("due_date")],
            filters: [("assignment_type".to_string(), vec!["practical".to_string()])]
                .into_iter()
                .collect(),
            page_size: Some(50),
        }
    }

    #[test]
    fn test_memory_store_round_trip() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("k")?, None);

        store.set("k", "v1")?;
        store.set("k", "v2")?;
        assert_eq!(store.get("k")?.as_deref(), Some("v2"));

        store.remove("k")?;
        assert_eq!(store.get("k")?, None);
        Ok(())
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("nested").join("state.db");

        {
            let store = SqliteStore::open(&db_path)?;
            save_view_state(&store, "assignments", &sample_state())?;
        }

        let store = SqliteStore::open(&db_path)?;
        let loaded = load_view_state(&store, "assignments")?;
        assert_eq!(loaded, Some(sample_state()));
        Ok(())
    }

    #[test]
    fn test_sqlite_store_upsert_and_remove() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        store.set("a", "1")?;
        store.set("a", "2")?;
        assert_eq!(store.get("a")?.as_deref(), Some("2"));
        store.remove("a")?;
        assert_eq!(store.get("a")?, None);
        Ok(())
    }

    #[test]
    fn test_undecodable_entry_is_ignored() -> Result<()> {
        let store = MemoryStore::new();
        store.set("broken", "{not json")?;
        assert_eq!(load_view_state(&store, "broken")?, None);
        Ok(())
    }
}
