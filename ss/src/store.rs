//! Core Store implementation

use eyre::{Context, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::record::Record;

/// Counts for a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of non-empty collections
    pub collections: usize,
    /// Total records across all collections
    pub records: usize,
}

/// Keyed record store
///
/// Records are kept as JSON values per collection. When opened on a directory
/// every `put`/`delete` is mirrored to `{dir}/{collection}/{id}.json`.
#[derive(Debug, Default)]
pub struct Store {
    /// Directory backing the store (None = memory only)
    base_path: Option<PathBuf>,
    collections: HashMap<String, BTreeMap<String, Value>>,
}

impl Store {
    /// Create a store that lives only in memory
    pub fn in_memory() -> Self {
        debug!("Store::in_memory: called");
        Self::default()
    }

    /// Open or create a directory-backed store, loading any existing records
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        debug!(?base_path, "Store::open: called");
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let mut collections: HashMap<String, BTreeMap<String, Value>> = HashMap::new();
        for entry in fs::read_dir(&base_path)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(collection) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let records = load_collection(&entry.path())?;
            debug!(%collection, count = records.len(), "Store::open: loaded collection");
            collections.insert(collection, records);
        }

        let store = Self {
            base_path: Some(base_path),
            collections,
        };
        info!(records = store.stats().records, "Opened session store");
        Ok(store)
    }

    /// Directory backing this store, if any
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    /// Insert or replace a record
    pub fn put<T: Record>(&mut self, record: &T) -> Result<()> {
        let id = record.id().to_string();
        let collection = T::collection_name();
        debug!(%id, collection, "Store::put: called");

        let value = serde_json::to_value(record).context("Failed to serialize record")?;

        if let Some(base) = &self.base_path {
            let dir = base.join(collection);
            fs::create_dir_all(&dir)?;
            let path = dir.join(format!("{}.json", id));
            let tmp = dir.join(format!("{}.json.tmp", id));
            fs::write(&tmp, serde_json::to_string_pretty(&value)?)?;
            fs::rename(&tmp, &path).context(format!("Failed to write record: {}", path.display()))?;
        }

        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, value);
        Ok(())
    }

    /// Fetch a record by id
    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>> {
        debug!(%id, collection = T::collection_name(), "Store::get: called");
        match self.collections.get(T::collection_name()).and_then(|c| c.get(id)) {
            Some(value) => {
                let record = serde_json::from_value(value.clone())
                    .context(format!("Failed to deserialize record: {}", id))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Whether a record with this id exists
    pub fn contains<T: Record>(&self, id: &str) -> bool {
        self.collections
            .get(T::collection_name())
            .is_some_and(|c| c.contains_key(id))
    }

    /// Delete a record, returning whether it existed
    pub fn delete<T: Record>(&mut self, id: &str) -> Result<bool> {
        let collection = T::collection_name();
        debug!(%id, collection, "Store::delete: called");

        let existed = self
            .collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();

        if existed && let Some(base) = &self.base_path {
            let path = base.join(collection).join(format!("{}.json", id));
            if let Err(e) = fs::remove_file(&path) {
                warn!(error = %e, path = %path.display(), "Failed to remove record file");
            }
        }

        Ok(existed)
    }

    /// List all records of a type, ordered by id
    pub fn list<T: Record>(&self) -> Result<Vec<T>> {
        debug!(collection = T::collection_name(), "Store::list: called");
        let Some(collection) = self.collections.get(T::collection_name()) else {
            return Ok(Vec::new());
        };
        collection
            .iter()
            .map(|(id, value)| {
                serde_json::from_value(value.clone()).context(format!("Failed to deserialize record: {}", id))
            })
            .collect()
    }

    /// Counts across all collections
    pub fn stats(&self) -> StoreStats {
        let non_empty = self.collections.values().filter(|c| !c.is_empty());
        StoreStats {
            collections: non_empty.clone().count(),
            records: non_empty.map(|c| c.len()).sum(),
        }
    }
}

fn load_collection(dir: &Path) -> Result<BTreeMap<String, Value>> {
    let mut records = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
            let content = fs::read_to_string(&path).context(format!("Failed to read record: {}", path.display()))?;
            let value: Value =
                serde_json::from_str(&content).context(format!("Failed to parse record: {}", path.display()))?;
            records.insert(id, value);
        }
    }
    Ok(records)
}
