//! Memory storage implementation using SQLite

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use crate::memory::{
    AddOutcome, GetOutcome, ListOutcome, Memory, MemoryEntry, SearchOutcome, UpdateOutcome,
};
use crate::{Error, Result};

const SELECT_COLUMNS: &str = "SELECT id, memory_type, key, content, created_at, updated_at FROM memories";

/// SQLite-backed key/value memory table.
///
/// The connection sits behind a mutex so one store can be shared by all
/// requests; each public method is a single atomic unit.
pub struct MemoryStore {
    conn: Mutex<Connection>,
}

impl MemoryStore {
    /// Open (or create) the database at `db_path`
    pub fn new(db_path: &str) -> Result<Self> {
        debug!("Opening memory database at: {}", db_path);

        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            conn: Mutex::new(Connection::open(db_path)?),
        };
        store.init_tables()?;
        info!("MemoryStore initialized at {}", db_path);
        Ok(store)
    }

    /// Create an in-memory MemoryStore (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.init_tables()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("memory store lock poisoned".to_string()))
    }

    fn init_tables(&self) -> Result<()> {
        self.conn()?.execute(
            "CREATE TABLE IF NOT EXISTS memories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                memory_type TEXT NOT NULL,
                key TEXT NOT NULL UNIQUE,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert a memory, or overwrite type and content when the key exists
    pub fn add(&self, memory_type: &str, key: &str, content: &str) -> Result<AddOutcome> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE memories SET memory_type = ?1, content = ?2, updated_at = ?3 WHERE key = ?4",
            params![memory_type, content, now, key],
        )?;

        if updated == 0 {
            tx.execute(
                "INSERT INTO memories (memory_type, key, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![memory_type, key, content, now],
            )?;
        }
        tx.commit()?;

        let (key, content) = (key.to_string(), content.to_string());
        if updated == 0 {
            debug!("Created memory: {}", key);
            Ok(AddOutcome::Created { key, content })
        } else {
            debug!("Overwrote memory: {}", key);
            Ok(AddOutcome::Updated { key, content })
        }
    }

    /// Look up a memory by key
    pub fn get(&self, key: &str) -> Result<GetOutcome> {
        Ok(match self.load(key)? {
            Some(memory) => GetOutcome::Found {
                memory_type: memory.memory_type,
                key: memory.key,
                content: memory.content,
            },
            None => GetOutcome::NotFound { key: key.to_string() },
        })
    }

    /// Full record for a key, including id and timestamps
    pub fn load(&self, key: &str) -> Result<Option<Memory>> {
        let conn = self.conn()?;
        let memory = conn
            .query_row(
                &format!("{} WHERE key = ?1", SELECT_COLUMNS),
                params![key],
                row_to_memory,
            )
            .optional()?;
        Ok(memory)
    }

    /// Every memory in insertion order
    pub fn list(&self) -> Result<ListOutcome> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let memories = stmt
            .query_map([], row_to_memory)?
            .map(|row| row.map(MemoryEntry::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} memories", memories.len());
        Ok(if memories.is_empty() {
            ListOutcome::Empty { memories }
        } else {
            ListOutcome::Success { memories }
        })
    }

    /// Substring search over both key and content.
    ///
    /// Plain SQLite `LIKE '%query%'`: ASCII letters match case-insensitively
    /// and `%` or `_` inside `query` act as wildcards.
    pub fn search(&self, query: &str) -> Result<SearchOutcome> {
        let pattern = format!("%{}%", query);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE content LIKE ?1 OR key LIKE ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let memories = stmt
            .query_map(params![pattern], row_to_memory)?
            .map(|row| row.map(MemoryEntry::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Found {} memories matching query: {}", memories.len(), query);
        let query = query.to_string();
        Ok(if memories.is_empty() {
            SearchOutcome::NotFound { query, memories }
        } else {
            SearchOutcome::Found { query, memories }
        })
    }

    /// Replace the content of an existing memory; never creates one
    pub fn update(&self, key: &str, new_content: &str) -> Result<UpdateOutcome> {
        let rows = self.conn()?.execute(
            "UPDATE memories SET content = ?1, updated_at = ?2 WHERE key = ?3",
            params![new_content, Utc::now().to_rfc3339(), key],
        )?;

        let key = key.to_string();
        Ok(if rows == 0 {
            UpdateOutcome::NotFound { key }
        } else {
            debug!("Updated memory content: {}", key);
            UpdateOutcome::Updated {
                key,
                content: new_content.to_string(),
            }
        })
    }

    /// Count total memories
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_memory(row: &Row<'_>) -> rusqlite::Result<Memory> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Memory {
        id: row.get(0)?,
        memory_type: row.get(1)?,
        key: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_get() -> Result<()> {
        let store = MemoryStore::in_memory()?;

        let outcome = store.add("personal_info", "name", "Ava")?;
        assert_eq!(
            outcome,
            AddOutcome::Created {
                key: "name".to_string(),
                content: "Ava".to_string()
            }
        );

        assert_eq!(
            store.get("name")?,
            GetOutcome::Found {
                memory_type: "personal_info".to_string(),
                key: "name".to_string(),
                content: "Ava".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_add_existing_key_overwrites() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        store.add("personal_info", "city", "Paris")?;
        let first_id = store.load("city")?.unwrap().id;

        let outcome = store.add("location", "city", "Lyon")?;
        assert!(matches!(outcome, AddOutcome::Updated { ref content, .. } if content == "Lyon"));

        let memory = store.load("city")?.unwrap();
        assert_eq!(memory.id, first_id);
        assert_eq!(memory.memory_type, "location");
        assert_eq!(memory.content, "Lyon");
        assert_eq!(store.count()?, 1);
        Ok(())
    }

    #[test]
    fn test_get_missing() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        assert_eq!(
            store.get("nope")?,
            GetOutcome::NotFound { key: "nope".to_string() }
        );
        Ok(())
    }

    #[test]
    fn test_update_missing_does_not_create() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        assert_eq!(
            store.update("ghost", "boo")?,
            UpdateOutcome::NotFound { key: "ghost".to_string() }
        );
        assert_eq!(store.count()?, 0);
        Ok(())
    }

    #[test]
    fn test_update_changes_only_content() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        store.add("preference", "favorite_color", "blue")?;

        let outcome = store.update("favorite_color", "green")?;
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                key: "favorite_color".to_string(),
                content: "green".to_string()
            }
        );

        let memory = store.load("favorite_color")?.unwrap();
        assert_eq!(memory.memory_type, "preference");
        assert_eq!(memory.content, "green");
        assert!(memory.updated_at >= memory.created_at);
        Ok(())
    }

    #[test]
    fn test_list_empty_then_populated() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        assert_eq!(store.list()?, ListOutcome::Empty { memories: vec![] });

        store.add("a", "k1", "one")?;
        store.add("a", "k2", "two")?;
        store.add("b", "k3", "three")?;

        let outcome = store.list()?;
        assert!(matches!(outcome, ListOutcome::Success { .. }));
        let keys: Vec<_> = outcome.memories().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        Ok(())
    }

    #[test]
    fn test_search_matches_key_and_content() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        store.add("personal_info", "name", "Ava")?;
        store.add("preference", "favorite_food", "sushi")?;
        store.add("preference", "drink", "green tea")?;

        let by_key = store.search("food")?;
        assert_eq!(by_key.memories().len(), 1);
        assert_eq!(by_key.memories()[0].key, "favorite_food");

        let by_content = store.search("tea")?;
        assert_eq!(by_content.memories().len(), 1);
        assert_eq!(by_content.memories()[0].key, "drink");

        // LIKE is ASCII case-insensitive
        let any_case = store.search("AVA")?;
        assert_eq!(any_case.memories().len(), 1);

        assert_eq!(
            store.search("pizza")?,
            SearchOutcome::NotFound {
                query: "pizza".to_string(),
                memories: vec![]
            }
        );
        Ok(())
    }

    #[test]
    fn test_search_wildcards_follow_like() -> Result<()> {
        let store = MemoryStore::in_memory()?;
        store.add("personal_info", "name", "Ava")?;
        store.add("location", "city", "Oslo")?;

        // `_` matches any single character
        assert_eq!(store.search("_")?.memories().len(), 2);
        assert_eq!(store.search("%")?.memories().len(), 2);

        let pattern = store.search("O_lo")?;
        assert_eq!(pattern.memories().len(), 1);
        assert_eq!(pattern.memories()[0].key, "city");

        assert!(matches!(store.search("A%z")?, SearchOutcome::NotFound { .. }));
        Ok(())
    }

    #[test]
    fn test_file_store_persists() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("memories.db");
        let path = path.to_str().unwrap();

        {
            let store = MemoryStore::new(path)?;
            store.add("personal_info", "name", "Ava")?;
        }

        let reopened = MemoryStore::new(path)?;
        assert!(matches!(reopened.get("name")?, GetOutcome::Found { .. }));
        Ok(())
    }
}
