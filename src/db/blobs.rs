/// Settings and records blobs on top of a [`BlobStore`].
use anyhow::{Context, Result, bail};
use chrono::Local;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use super::BlobStore;
use crate::types::{Records, Settings};

pub const SETTINGS_KEY: &str = "settings";
pub const RECORDS_KEY: &str = "records";
const RECORDS_BACKUP_PREFIX: &str = "records.backup.";

/// How much of the stored records blob survived loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordsHealth {
    Clean,
    /// Parts of the blob were dropped; `raw` is the blob as it was stored.
    Salvaged { raw: String, skipped: usize },
    /// The store could not be read, so nothing is known about what it holds.
    Unreadable,
}

/// Loads settings, falling back to the defaults when absent or unreadable.
pub fn load_settings(store: &dyn BlobStore) -> Settings {
    load_or_default::<Settings>(store, SETTINGS_KEY).normalized()
}

pub fn save_settings(store: &dyn BlobStore, settings: &Settings) -> Result<()> {
    save(store, SETTINGS_KEY, settings)
}

/// Loads records entry by entry. Entries that are not whole, non-negative
/// minute counts are skipped and reported through [`RecordsHealth`].
pub fn load_records(store: &dyn BlobStore) -> (Records, RecordsHealth) {
    let raw = match store.get(RECORDS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Records::new(), RecordsHealth::Clean),
        Err(err) => {
            warn!("failed to read {RECORDS_KEY} blob: {err:#}");
            return (Records::new(), RecordsHealth::Unreadable);
        }
    };

    let (records, skipped) = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(days)) => salvage_records(days),
        Ok(_) => {
            warn!("{RECORDS_KEY} blob is not an object");
            (Records::new(), 1)
        }
        Err(err) => {
            warn!("failed to parse {RECORDS_KEY} blob: {err}");
            (Records::new(), 1)
        }
    };

    if skipped == 0 {
        (records, RecordsHealth::Clean)
    } else {
        warn!(skipped, "dropped unreadable entries from {RECORDS_KEY} blob");
        (records, RecordsHealth::Salvaged { raw, skipped })
    }
}

fn salvage_records(days: serde_json::Map<String, Value>) -> (Records, usize) {
    let mut records = Records::new();
    let mut skipped = 0;
    for (date, subjects) in days {
        let Value::Object(subjects) = subjects else {
            skipped += 1;
            continue;
        };
        let day = records.entry(date).or_default();
        for (subject, minutes) in subjects {
            match minutes.as_u64().and_then(|m| u32::try_from(m).ok()) {
                Some(minutes) => {
                    day.insert(subject, minutes);
                }
                None => skipped += 1,
            }
        }
    }
    (records, skipped)
}

/// Writes the records blob.
///
/// Refuses while the stored blob could not be read. A salvaged blob is copied
/// to a backup key before it is first replaced.
pub fn save_records(
    store: &dyn BlobStore,
    records: &Records,
    health: &mut RecordsHealth,
) -> Result<()> {
    match &*health {
        RecordsHealth::Clean => {}
        RecordsHealth::Unreadable => {
            bail!("stored records could not be read; refusing to overwrite them")
        }
        RecordsHealth::Salvaged { raw, .. } => {
            let key = format!(
                "{RECORDS_BACKUP_PREFIX}{}",
                Local::now().format("%Y%m%dT%H%M%S")
            );
            store
                .set(&key, raw)
                .with_context(|| format!("write {key} blob"))?;
            warn!(key = %key, "backed up damaged records blob");
        }
    }
    *health = RecordsHealth::Clean;
    save(store, RECORDS_KEY, records)
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn BlobStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to parse {key} blob: {err}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(err) => {
            warn!("failed to read {key} blob: {err:#}");
            T::default()
        }
    }
}

fn save<T: Serialize>(store: &dyn BlobStore, key: &str, value: &T) -> Result<()> {
    let payload = serde_json::to_string(value).with_context(|| format!("serialize {key}"))?;
    store
        .set(key, &payload)
        .with_context(|| format!("write {key} blob"))
}
