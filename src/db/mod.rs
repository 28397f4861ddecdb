/// Persistence: a SQLite-backed blob store holding the settings and records.
mod blobs;
mod kv;
mod migrations;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

pub use blobs::{RecordsHealth, load_records, load_settings, save_records, save_settings};
#[cfg(test)]
pub use kv::MemoryStore;
pub use kv::BlobStore;

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data directory {}", parent.display()))?;
        }
    }
    let conn = Connection::open(db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./studytick.db` when no data dir is found.
pub fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join("studytick").join("studytick.db"),
        None => PathBuf::from("studytick.db"),
    }
}
