/// Key-value blob storage.
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

/// Get/set of serialized blobs by key.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl BlobStore for Connection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            (key, value),
        )?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
