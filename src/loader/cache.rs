//! Process-wide memo of loaded datasets.
//!
//! Entries are keyed by canonical path and invalidated when the file's
//! modification time changes. The mutex is held across the load so two
//! callers racing on a cold entry cannot both read the file.

use super::load_shipments;
use crate::error::LoadError;
use crate::models::ShipmentRecord;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::debug;

static DATASET_CACHE: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Load `path` through the global cache.
pub fn load_cached(path: &Path) -> Result<Arc<[ShipmentRecord]>, LoadError> {
    DATASET_CACHE.get_or_load(path)
}

struct CacheEntry {
    modified: Option<SystemTime>,
    records: Arc<[ShipmentRecord]>,
}

/// Read-only cache of cleaned record sets.
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached records for `path`, loading them on a miss or
    /// when the file changed since the last load.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<[ShipmentRecord]>, LoadError> {
        let key = path.canonicalize().map_err(|e| io_error(path, e))?;
        let modified = fs::metadata(&key).and_then(|m| m.modified()).ok();

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get(&key) {
            if entry.modified == modified {
                debug!("Dataset cache hit: {}", key.display());
                return Ok(Arc::clone(&entry.records));
            }
            debug!("Dataset changed on disk, reloading: {}", key.display());
        } else {
            debug!("Dataset cache miss: {}", key.display());
        }

        let records: Arc<[ShipmentRecord]> = load_shipments(&key)?.into();
        entries.insert(
            key,
            CacheEntry {
                modified,
                records: Arc::clone(&records),
            },
        );

        Ok(records)
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    match source.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
