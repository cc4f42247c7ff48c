//! Key-value stores backing the build repository.
//!
//! A store only moves strings in and out; snapshot structure and versioning
//! are the repository's concern. The store does own the lock that
//! serialises read-modify-write cycles, so every repository opened on the
//! same storage shares it.

use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tempfile::NamedTempFile;

/// A persistent string key-value store.
pub trait Store: Send + Sync {
    /// Read the value under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    ///
    /// After an error the previous value must still be readable.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// The lock guarding read-modify-write cycles on this storage.
    ///
    /// Every handle onto the same underlying storage must return the same
    /// lock.
    fn write_lock(&self) -> Arc<Mutex<()>>;
}

/// In-memory store.
///
/// Can be switched offline to simulate an unavailable backend.
///
/// # Examples
///
/// ```rust
/// use gearforge::repository::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// store.write("k", "v").unwrap();
/// assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
///
/// store.set_available(false);
/// assert!(store.write("k", "w").is_err());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    available: AtomicBool,
    lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Toggle availability; while unavailable every operation fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn write_lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.lock)
    }
}

/// Locks of every directory a `FileStore` has been opened on, so separate
/// stores over one directory serialise against each other.
static DIR_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn dir_lock(dir: &Path) -> Arc<Mutex<()>> {
    let key = match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    };
    let registry = DIR_LOCKS.get_or_init(Default::default);
    // The map holds no invariant a panicking holder could break.
    let mut locks = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// File-backed store: one `<key>.json` file per key inside a directory.
///
/// Writes go to a uniquely named temporary file in the same directory that
/// is then renamed over the target, so a failed write never leaves a
/// half-written value behind. Stores opened on the same directory within a
/// process share one write lock; the directory is compared by its absolute
/// path as given, without resolving symlinks.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let lock = dir_lock(&dir);
        Self { dir, lock }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::Unavailable(format!("invalid store key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Dropping the temp file on any error path deletes it.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.lock)
    }
}
