// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Key-value persistence for the six record collections.
//!
//! Each collection lives under its own key as a JSON array, the same layout the
//! browser-storage version of the CRM used. Codecs never talk to a store; the
//! helpers here load and save typed collections and apply a decoded backup.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::logic::backup::{BackupDocument, decode_records};
use crate::models::records::{Collection, Record};

/// Minimal string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data directory {:?}", root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("Invalid storage key: {key:?}"));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!(key, "storage key not present");
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file {:?}", path))?;
        debug!(key, bytes = text.len(), "read storage key");
        Ok(Some(text))
    }

    /// Write through a temporary sibling and rename so readers never see a partial file.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .with_context(|| format!("Failed to write storage file {:?}", tmp))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace storage file {:?}", path))?;
        debug!(key, bytes = value.len(), "wrote storage key");
        Ok(())
    }
}

/// Load one typed collection; a missing key is an empty collection.
pub fn load_records<T: Record>(store: &dyn KeyValueStore) -> Result<Vec<T>> {
    let key = T::COLLECTION.key();
    let Some(text) = store.get(key)? else {
        return Ok(Vec::new());
    };
    let items: Vec<serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("Stored collection {key} is not a JSON array"))?;
    decode_records(items).with_context(|| format!("Stored collection {key} is corrupt"))
}

/// Replace one typed collection.
pub fn save_records<T: Record>(store: &dyn KeyValueStore, records: &[T]) -> Result<()> {
    let key = T::COLLECTION.key();
    let text = serde_json::to_string(records)
        .with_context(|| format!("Failed to encode collection {key}"))?;
    store.set(key, &text)
}

/// Snapshot every collection for a backup.
pub fn load_all(store: &dyn KeyValueStore) -> Result<BackupDocument> {
    Ok(BackupDocument {
        clients: load_records(store)?,
        dependents: load_records(store)?,
        suppliers: load_records(store)?,
        products: load_records(store)?,
        quotes: load_records(store)?,
        agenda: load_records(store)?,
    })
}

/// Replace every collection with the contents of a decoded backup.
pub fn restore_all(store: &dyn KeyValueStore, doc: &BackupDocument) -> Result<()> {
    save_records(store, &doc.clients)?;
    save_records(store, &doc.dependents)?;
    save_records(store, &doc.suppliers)?;
    save_records(store, &doc.products)?;
    save_records(store, &doc.quotes)?;
    save_records(store, &doc.agenda)?;
    for collection in Collection::ALL {
        info!(
            collection = collection.key(),
            records = doc.count(collection),
            "restored collection"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::backup;
    use crate::models::records::{AgendaItem, AgendaStatus, Client, fixtures};
    use tempfile::TempDir;

    #[test]
    fn missing_keys_load_as_empty_collections() {
        let store = MemoryStore::new();
        let doc = load_all(&store).unwrap();
        assert_eq!(doc, BackupDocument::default());
    }

    #[test]
    fn save_then_load_returns_same_records() {
        let store = MemoryStore::new();
        let clients = vec![fixtures::client("c1", "Ana")];
        save_records(&store, &clients).unwrap();
        assert_eq!(load_records::<Client>(&store).unwrap(), clients);
        assert!(store.get("clientes").unwrap().unwrap().starts_with('['));
    }

    #[test]
    fn corrupt_collection_is_reported_with_key() {
        let store = MemoryStore::new();
        store.set("agenda", "{\"not\": \"an array\"}").unwrap();
        let err = load_records::<AgendaItem>(&store).unwrap_err();
        assert!(format!("{err:#}").contains("agenda"), "{err:#}");
    }

    #[test]
    fn restore_replaces_existing_collections() {
        let store = MemoryStore::new();
        save_records(&store, &[fixtures::client("old", "Velho")]).unwrap();

        let doc = BackupDocument {
            clients: vec![fixtures::client("new", "Nova")],
            agenda: vec![fixtures::agenda("a1", "Viagem", "2025-05-01", AgendaStatus::Scheduled)],
            ..Default::default()
        };
        restore_all(&store, &doc).unwrap();
        assert_eq!(load_all(&store).unwrap(), doc);
    }

    #[test]
    fn file_store_round_trips_backup_through_disk() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path().join("data")).unwrap();
        let doc = BackupDocument {
            clients: vec![fixtures::client("c1", "Ana")],
            ..Default::default()
        };
        restore_all(&store, &doc).unwrap();
        assert!(store.root().join("clientes.json").exists());
        assert!(!store.root().join("clientes.json.tmp").exists());

        let reopened = FileStore::open(store.root()).unwrap();
        let text = backup::serialize(&load_all(&reopened).unwrap()).unwrap();
        assert_eq!(backup::deserialize(&text).unwrap(), doc);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }
}
