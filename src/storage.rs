use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::graph_cache::GraphCacheStorage;

/// In-process store. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GraphCacheStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Keys kept in one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| CacheError::Io {
                path: path.display().to_string(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|source| CacheError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Like [`JsonFileStorage::open`], but a broken file is logged and replaced
    /// on the next write.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            tracing::error!("Failed to load storage from {}: {}", path.display(), e);
            Self {
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.entries).map_err(CacheError::Serialize)?;
        fs::write(&self.path, content).map_err(io_err)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            tracing::error!("Failed to save storage: {}", e);
        }
    }
}

impl GraphCacheStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_basics() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v".to_string());
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k");
        storage.remove("k");
        assert!(storage.is_empty());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage.set("theme", "github-light".to_string());
        storage.set("other", "1".to_string());
        storage.remove("other");

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("github-light"));
        assert_eq!(reopened.get("other"), None);
    }

    #[test]
    fn corrupt_file_is_reported_or_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            JsonFileStorage::open(&path),
            Err(CacheError::Corrupt { .. })
        ));

        let mut storage = JsonFileStorage::open_or_empty(&path);
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v".to_string());
        assert_eq!(
            JsonFileStorage::open(&path).unwrap().get("k").as_deref(),
            Some("v")
        );
    }

    #[test]
    fn failed_write_keeps_the_value_in_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("storage.json");

        let mut storage = JsonFileStorage::open(&path).unwrap();
        storage.set("theme", "github-dark".to_string());
        assert_eq!(storage.get("theme").as_deref(), Some("github-dark"));
        assert!(matches!(storage.flush(), Err(CacheError::Io { .. })));
        assert!(!path.exists());

        storage.remove("theme");
        assert_eq!(storage.get("theme"), None);
    }
}
