//! In-process storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStore;
use crate::error::PortalError;
use crate::Result;

/// Map-backed storage that lives as long as the process.
///
/// Can be constructed disabled or with a byte quota to reproduce the two
/// ways browser-style storage fails.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    disabled: bool,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unrestricted store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store on which every operation fails.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Create a store limited to `quota` bytes of keys plus values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_enabled(&self) -> Result<()> {
        if self.disabled {
            return Err(PortalError::StorageUnavailable(
                "storage is disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_enabled()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_enabled()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
                + key.len()
                + value.len();
            if used > quota {
                return Err(PortalError::QuotaExceeded { used, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_enabled()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::StorageUnavailable("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));
        assert_eq!(storage.len(), 1);

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_remove_absent_key() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("missing").is_ok());
    }

    #[test]
    fn test_disabled_rejects_everything() {
        let storage = MemoryStorage::disabled();
        assert!(matches!(
            storage.get("user"),
            Err(PortalError::StorageUnavailable(_))
        ));
        assert!(storage.set("user", "{}").is_err());
        assert!(storage.remove("user").is_err());
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(10);
        storage.set("k", "12345").unwrap();

        let err = storage.set("other", "123456").unwrap_err();
        assert!(matches!(err, PortalError::QuotaExceeded { quota: 10, .. }));
        assert_eq!(storage.get("other").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("k", "1234567").unwrap();
        // Overwriting the same key does not double count the old value.
        storage.set("k", "7654321").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("7654321".to_string()));
    }
}
