//! File-backed key-value store.
//!
//! Each key is one JSON file (`<dir>/<key>.json`). The directory is created on
//! first write. Keys are restricted to ASCII letters, digits, `-` and `_` so a
//! key can never escape the directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use campus_eats_core::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisting each key as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. Nothing is touched until first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the snapshots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Snapshots are replaced atomically
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use campus_eats_core::storage::keys;

    use super::*;

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("campus-eats-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn test_missing_dir_reads_as_empty() {
        let mut store = temp_store();
        assert_eq!(store.get(keys::CART).unwrap(), None);
        store.remove(keys::CART).unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_set_get_remove() {
        let mut store = temp_store();
        store.set(keys::CART, "[]".to_string()).unwrap();
        assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("cart.json").exists());

        store.remove(keys::CART).unwrap();
        assert_eq!(store.get(keys::CART).unwrap(), None);
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_clear_removes_all_snapshots() {
        let mut store = temp_store();
        store.set(keys::TOKEN, "t".to_string()).unwrap();
        store.set(keys::USER, "{}".to_string()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        assert_eq!(store.get(keys::USER).unwrap(), None);
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let mut store = temp_store();
        assert!(matches!(
            store.set("../escape", String::new()),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }
}
