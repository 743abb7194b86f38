//! Storage module - flat string key-value store
//!
//! Everything the tracker persists lives under a handful of string keys
//! holding JSON text. `SqliteStore` keeps them in a single SQLite table.

pub mod codec;
pub mod memory;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StorageError;

pub use memory::MemoryStore;

/// Key holding the consolidated week label -> entries mapping
pub const WEEKLY_LOG_KEY: &str = "weeklyMuscleGroups";
/// Key holding the muscle catalog
pub const CATALOG_KEY: &str = "muscleGroups";
/// Key holding the schema version of the two records above
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// Durable key-value storage with a single flat namespace
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key succeeds
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// All keys currently stored, in no particular order
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// SQLite-backed key-value store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
