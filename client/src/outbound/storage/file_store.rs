//! Directory-backed key-value store.
//!
//! Each key is one file inside a capability-scoped directory. Writes go to a
//! temporary sibling first and are renamed into place, so readers never see a
//! half-written value.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Key-value store persisting one file per key under a root directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open `root`, creating it when missing.
    pub fn open(root: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: root.to_owned(),
            dir,
        })
    }

    /// Directory holding the stored keys.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> Option<&str> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        valid.then_some(key)
    }
}

fn invalid_key(key: &str) -> String {
    format!("key {key:?} is not a valid file name")
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let name = Self::file_name(key).ok_or_else(|| KeyValueStoreError::read(key, invalid_key(key)))?;
        match self.dir.read_to_string(name) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(KeyValueStoreError::read(key, error.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let name =
            Self::file_name(key).ok_or_else(|| KeyValueStoreError::write(key, invalid_key(key)))?;
        let staged = format!(".{name}.{}.tmp", Uuid::new_v4().simple());
        let result = self
            .dir
            .write(&staged, value.as_bytes())
            .and_then(|()| self.dir.rename(&staged, &self.dir, name));
        if result.is_err() {
            let _cleanup_result = self.dir.remove_file(&staged);
        }
        result.map_err(|error| KeyValueStoreError::write(key, error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let name =
            Self::file_name(key).ok_or_else(|| KeyValueStoreError::write(key, invalid_key(key)))?;
        match self.dir.remove_file(name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(KeyValueStoreError::write(key, error.to_string())),
        }
    }
}
