//! File-backed key-value store persisting layouts between sessions.

use std::{collections::HashMap, fs, path::PathBuf};

use bastion_persistence::{KeyValueStore, StoreError};

/// Key-value store that mirrors its entries into a JSON file on every write.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing entries when the file is
    /// already present.
    pub(crate) fn open(path: PathBuf) -> Result<Self, StoreError> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|error| StoreError::new(error.to_string()))?;
            serde_json::from_str(&contents).map_err(|error| StoreError::new(error.to_string()))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|error| StoreError::new(error.to_string()))?;
        fs::write(&self.path, contents).map_err(|error| StoreError::new(error.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()
    }
}
