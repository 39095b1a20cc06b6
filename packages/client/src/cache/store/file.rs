//! Directory-backed store that survives process restarts
//!
//! Layout:
//!
//! ```text
//! <root>/entries/<sha256 of key>.json
//! <root>/recent.json
//! ```
//!
//! Entry writes go to a temporary file first and are renamed into place, so
//! a crash mid-write leaves either the old entry or the new one.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use bytes::Bytes;

use super::{DocumentStore, push_recent};
use crate::{
    cache::cache_key::CacheKey,
    error::{self, Result},
};

const ENTRIES_DIR: &str = "entries";
const RECENT_FILE: &str = "recent.json";

/// Store keeping one JSON file per entry under a root directory
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Serializes read-modify-write of the recent index
    recent_lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns a store error if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(ENTRIES_DIR)).map_err(|e| store_error(&root, e))?;
        tracing::debug!(target: "mindstream::cache", root = %root.display(), "file store opened");
        Ok(Self {
            root,
            recent_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root
            .join(ENTRIES_DIR)
            .join(format!("{}.json", key.digest()))
    }

    fn recent_path(&self) -> PathBuf {
        self.root.join(RECENT_FILE)
    }

    fn read_recent(&self) -> Result<Vec<CacheKey>> {
        let path = self.recent_path();
        match fs::read(&path) {
            Ok(raw) => match serde_json::from_slice(&raw) {
                Ok(keys) => Ok(keys),
                Err(e) => {
                    tracing::warn!(
                        target: "mindstream::cache",
                        path = %path.display(),
                        error = %e,
                        "recent index unreadable, starting over"
                    );
                    Ok(Vec::new())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(store_error(&path, e)),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| store_error(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| store_error(path, e))
    }
}

impl DocumentStore for FileStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(raw) => Ok(Some(Bytes::from(raw))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(&path, e)),
        }
    }

    fn save(&self, key: &CacheKey, encoded: Bytes) -> Result<()> {
        self.write_atomic(&self.entry_path(key), &encoded)
    }

    fn evict(&self, key: &CacheKey) -> Result<bool> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(store_error(&path, e)),
        }
    }

    fn touch_recent(&self, key: &CacheKey, capacity: usize) -> Result<()> {
        let _guard = self
            .recent_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut recent = self.read_recent()?;
        push_recent(&mut recent, key, capacity);
        let encoded = serde_json::to_vec(&recent).map_err(error::store)?;
        self.write_atomic(&self.recent_path(), &encoded)
    }

    fn recent_keys(&self, limit: usize) -> Result<Vec<CacheKey>> {
        let _guard = self
            .recent_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut recent = self.read_recent()?;
        recent.truncate(limit);
        Ok(recent)
    }
}

fn store_error(path: &Path, source: io::Error) -> error::Error {
    error::store(io::Error::new(
        source.kind(),
        format!("{}: {source}", path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let key = CacheKey::from_normalized("deep work");
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.save(&key, Bytes::from_static(b"{\"a\":1}")).unwrap();
            store.touch_recent(&key, 10).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.load(&key).unwrap().unwrap(),
            Bytes::from_static(b"{\"a\":1}")
        );
        assert_eq!(store.recent_keys(5).unwrap(), vec![key]);
    }

    #[test]
    fn test_evict_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let key = CacheKey::from_normalized("nothing");
        assert!(store.load(&key).unwrap().is_none());
        assert!(!store.evict(&key).unwrap());
    }

    #[test]
    fn test_unreadable_recent_index_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join(RECENT_FILE), b"not json").unwrap();
        assert!(store.recent_keys(5).unwrap().is_empty());
        let key = CacheKey::from_normalized("x");
        store.touch_recent(&key, 5).unwrap();
        assert_eq!(store.recent_keys(5).unwrap(), vec![key]);
    }
}
