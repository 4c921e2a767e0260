//! JSON-file storage backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::KeyValueStore;
use crate::error::PortalError;
use crate::Result;

/// Durable storage persisted as a single JSON object on disk.
///
/// Reads are served from memory. Every mutation rewrites the whole file
/// through a sibling temp file and a rename, so a crash mid-write leaves
/// the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A file that does not parse as
    /// a JSON object of strings is logged and ignored; it is overwritten on
    /// the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt storage file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PortalError::Io(e)),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file storage");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;

        if let Some(old) = entries.remove(key) {
            if let Err(e) = self.flush(&entries) {
                entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("portal.json")).unwrap();
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("pendingEnrollment", "plc-automation").unwrap();
        storage.set("token", "tok_1").unwrap();
        storage.remove("token").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get("pendingEnrollment").unwrap(),
            Some("plc-automation".to_string())
        );
        assert_eq!(reopened.get("token").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("user").unwrap(), None);

        storage.set("user", "{}").unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("user").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state").join("portal.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("token", "tok_1").unwrap();
        assert!(path.exists());
        assert_eq!(storage.path(), path.as_path());
    }

    #[test]
    fn test_open_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.json");
        std::fs::create_dir(&path).unwrap();

        // Reading a directory is an I/O error other than NotFound.
        assert!(matches!(FileStorage::open(&path), Err(PortalError::Io(_))));
    }
}
