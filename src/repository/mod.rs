//! Versioned build persistence.
//!
//! The repository keeps every saved build in one [`Snapshot`] stored as a
//! single JSON value under one key of a [`Store`]. Every operation loads the
//! snapshot, works on it, and (for writes) stores the whole snapshot back, so
//! the persisted state always has the snapshot shape.
//!
//! Writers and imports are serialised behind the store's write lock, which
//! every repository opened on the same storage shares; readers take the
//! same lock so they never observe half of a replace.

pub mod migrate;
mod snapshot;
mod store;

pub use snapshot::Snapshot;
pub use store::{FileStore, MemoryStore, Store};

use crate::build::Build;
use crate::category::Category;
use crate::derive::ValidatedBuild;
use crate::error::{RepositoryError, RepositoryResult};
use crate::ids::BuildId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Repository settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryConfig {
    /// Store key the snapshot lives under.
    pub store_key: String,
    /// Indent exported snapshots for humans.
    pub pretty_export: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            store_key: "gearforge.builds".to_string(),
            pretty_export: true,
        }
    }
}

/// What an import replaced the store with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Builds imported, per category.
    pub counts: BTreeMap<Category, usize>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }
}

/// CRUD and snapshot exchange over a [`Store`].
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::builtin;
/// use gearforge::repository::{BuildRepository, MemoryStore};
/// use gearforge::{Build, Category};
///
/// let repo = BuildRepository::new(MemoryStore::new());
/// let catalog = builtin::shields();
/// let build = Build::for_type(&catalog, "buckler", "Parry plate").unwrap();
///
/// let saved = repo.save(build).unwrap();
/// assert_eq!(repo.list(Category::Shield).unwrap().len(), 1);
///
/// assert!(repo.delete(Category::Shield, &saved.id).unwrap());
/// assert!(!repo.delete(Category::Shield, &saved.id).unwrap());
/// ```
#[derive(Debug)]
pub struct BuildRepository<S: Store> {
    store: S,
    config: RepositoryConfig,
}

impl<S: Store> BuildRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All saved builds of a category, in save order.
    pub fn list(&self, category: Category) -> RepositoryResult<Vec<Build>> {
        self.exclusive(|| Ok(self.load()?.collection(category).to_vec()))
    }

    pub fn get(&self, category: Category, id: &BuildId) -> RepositoryResult<Option<Build>> {
        self.exclusive(|| {
            Ok(self
                .load()?
                .collection(category)
                .iter()
                .find(|b| &b.id == id)
                .cloned())
        })
    }

    /// Insert or update a build, keyed by its id within its category.
    ///
    /// Inserting stamps both timestamps; updating keeps the stored
    /// `created_at` and refreshes `updated_at`. Returns the build as stored.
    /// On error nothing was persisted.
    pub fn save(&self, build: Build) -> RepositoryResult<Build> {
        self.exclusive(|| self.save_locked(build))
    }

    fn save_locked(&self, mut build: Build) -> RepositoryResult<Build> {
        let mut snapshot = self.load()?;
        let now = Utc::now();
        let collection = snapshot.collection_mut(build.category);

        match collection.iter_mut().find(|b| b.id == build.id) {
            Some(existing) => {
                build.created_at = existing.created_at;
                build.updated_at = now;
                *existing = build.clone();
                debug!(id = %build.id, category = %build.category, "updating build");
            }
            None => {
                build.created_at = now;
                build.updated_at = now;
                collection.push(build.clone());
                debug!(id = %build.id, category = %build.category, "inserting build");
            }
        }

        self.persist(&snapshot)?;
        info!(id = %build.id, name = %build.name, "saved build");
        Ok(build)
    }

    /// Save a build that passed validation, caching its point total.
    pub fn save_validated(&self, validated: &ValidatedBuild<'_>) -> RepositoryResult<Build> {
        let mut build = validated.build().clone();
        build.points_spent = validated.points_spent();
        self.save(build)
    }

    /// Remove a build. Returns `false` if there was nothing to remove.
    pub fn delete(&self, category: Category, id: &BuildId) -> RepositoryResult<bool> {
        self.exclusive(|| self.delete_locked(category, id))
    }

    fn delete_locked(&self, category: Category, id: &BuildId) -> RepositoryResult<bool> {
        let mut snapshot = self.load()?;
        let collection = snapshot.collection_mut(category);
        let before = collection.len();
        collection.retain(|b| &b.id != id);
        if collection.len() == before {
            debug!(id = %id, category = %category, "delete of absent build");
            return Ok(false);
        }
        self.persist(&snapshot)?;
        info!(id = %id, category = %category, "deleted build");
        Ok(true)
    }

    /// The current state of every category.
    pub fn snapshot(&self) -> RepositoryResult<Snapshot> {
        self.exclusive(|| self.load())
    }

    /// Remove every saved build, in all categories.
    pub fn clear(&self) -> RepositoryResult<()> {
        self.exclusive(|| {
            self.store.remove(&self.config.store_key)?;
            info!(key = %self.config.store_key, "cleared build store");
            Ok(())
        })
    }

    /// Serialise the whole store, at the current schema version.
    pub fn export_snapshot(&self) -> RepositoryResult<String> {
        let snapshot = self.snapshot()?;
        let text = if self.config.pretty_export {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        info!(builds = snapshot_size(&snapshot), "exported snapshot");
        Ok(text)
    }

    /// Replace the whole store with an exported snapshot.
    ///
    /// The payload is fully parsed and checked before anything is written;
    /// on any error the stored builds are unchanged.
    pub fn import_snapshot(&self, text: &str) -> RepositoryResult<ImportSummary> {
        let snapshot = match Snapshot::from_import(text) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "rejected snapshot import");
                return Err(e);
            }
        };

        self.exclusive(|| self.persist(&snapshot))?;
        let summary = ImportSummary {
            counts: snapshot.counts(),
        };
        info!(builds = summary.total(), "imported snapshot");
        Ok(summary)
    }

    /// Run `op` holding the store's write lock.
    fn exclusive<T>(&self, op: impl FnOnce() -> RepositoryResult<T>) -> RepositoryResult<T> {
        let lock = self.store.write_lock();
        let _guard = lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        op()
    }

    fn load(&self) -> RepositoryResult<Snapshot> {
        match self.store.read(&self.config.store_key)? {
            Some(text) => Snapshot::from_stored(&text),
            None => Ok(Snapshot::default()),
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let text = serde_json::to_string(snapshot)?;
        self.store.write(&self.config.store_key, &text)?;
        Ok(())
    }
}

fn snapshot_size(snapshot: &Snapshot) -> usize {
    snapshot.counts().values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn weapon(id: &str) -> Build {
        Build::new(Category::Weapon, id).with_id(id)
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let repo = BuildRepository::new(MemoryStore::new());
        for category in Category::ALL {
            assert!(repo.list(category).unwrap().is_empty());
        }
    }

    #[test]
    fn test_update_keeps_created_at() {
        let repo = BuildRepository::new(MemoryStore::new());
        let first = repo.save(weapon("w1")).unwrap();

        let mut changed = first.clone();
        changed.name = "renamed".into();
        let second = repo.save(changed).unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        let listed = repo.list(Category::Weapon).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "renamed");
    }

    #[test]
    fn test_failed_save_persists_nothing() {
        let repo = BuildRepository::new(MemoryStore::new());
        repo.save(weapon("w1")).unwrap();

        repo.store().set_available(false);
        let err = repo.save(weapon("w2")).unwrap_err();
        assert!(matches!(err, RepositoryError::Store(StoreError::Unavailable(_))));

        repo.store().set_available(true);
        let ids: Vec<_> = repo
            .list(Category::Weapon)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![BuildId::new("w1")]);
    }

    #[test]
    fn test_compact_export_config() {
        let config = RepositoryConfig {
            pretty_export: false,
            ..RepositoryConfig::default()
        };
        let repo = BuildRepository::with_config(MemoryStore::new(), config);
        let text = repo.export_snapshot().unwrap();
        assert!(!text.contains('\n'));
        assert!(text.contains("\"spellFocuses\":[]"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: RepositoryConfig = serde_json::from_str(r#"{"storeKey": "custom"}"#).unwrap();
        assert_eq!(config.store_key, "custom");
        assert!(config.pretty_export);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let store = MemoryStore::new();
        store.write("gearforge.builds", "[1, 2, 3]").unwrap();
        let repo = BuildRepository::new(store);
        assert!(matches!(
            repo.list(Category::Armor),
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_clear_empties_every_category() {
        let repo = BuildRepository::new(MemoryStore::new());
        repo.save(weapon("w1")).unwrap();
        repo.save(Build::new(Category::Armor, "a1")).unwrap();

        repo.clear().unwrap();
        assert_eq!(repo.store().read("gearforge.builds").unwrap(), None);
        for category in Category::ALL {
            assert!(repo.list(category).unwrap().is_empty());
        }
        repo.clear().unwrap();
    }
}
