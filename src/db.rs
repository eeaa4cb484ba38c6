//! Database handle
//!
//! Pairs a shared [`Store`] with its optional auto-save scheduler and owns
//! the teardown of both. The scheduler is created alongside the store and
//! stopped exactly once by [`Database::close`].

use crate::autosave::AutoSave;
use crate::snapshot::{self, SnapshotConfig};
use crate::store::Store;
use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::hash::Hash;
use std::sync::Arc;

/// Owning handle over a store and its auto-save task
pub struct Database<K, V> {
    store: Arc<Store<K, V>>,

    /// Present only when auto-save was enabled at open
    autosave: Option<AutoSave>,
}

impl<K, V> std::fmt::Debug for Database<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl<K, V> Database<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open an empty database
    ///
    /// When `config.enabled` is set this arms the auto-save scheduler and
    /// must therefore run inside a tokio runtime.
    pub fn open(config: SnapshotConfig) -> Self {
        let store = Arc::new(Store::new());
        let autosave = config
            .enabled
            .then(|| AutoSave::start(store.clone(), &config));

        Database { store, autosave }
    }

    /// Open a database restored from a snapshot file
    ///
    /// The snapshot carries the entries; the scheduling metadata (path and
    /// interval) travels in `config`, which also arms a fresh scheduler
    /// when enabled.
    pub fn import_file(config: SnapshotConfig) -> Result<Self, StoreError> {
        let store = Arc::new(Store::new());
        snapshot::load_into(&config.path, &store)?;

        let autosave = config
            .enabled
            .then(|| AutoSave::start(store.clone(), &config));

        Ok(Database { store, autosave })
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<Store<K, V>> {
        &self.store
    }

    /// Save a snapshot to the configured path on demand
    pub fn export_file(&self, config: &SnapshotConfig) -> Result<(), StoreError> {
        snapshot::save(&self.store, &config.path)
    }

    /// Stop the auto-save scheduler and release the handle
    ///
    /// Must be called before discarding a database opened with auto-save
    /// enabled; after it returns no further scheduled save begins.
    pub async fn close(self) {
        if let Some(autosave) = self.autosave {
            autosave.stop().await;
        }
    }
}
