//! Concurrent generic table
//!
//! The core storage engine: a sharded concurrent map for per-key operations,
//! plus a global reader/writer lock reserved for whole-store paths (scan,
//! export, import). Single-key operations never touch the global lock, so
//! they stay low-latency under contention at the cost of weaker snapshot
//! guarantees during scans.

use crate::error::StoreError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use siphasher::sip::SipHasher13;
use std::hash::{BuildHasherDefault, Hash};
use std::sync::RwLock;

/// Type alias for our concurrent map with SipHasher
type TableMap<K, V> = DashMap<K, V, BuildHasherDefault<SipHasher13>>;

/// Generic thread-safe key-value table
///
/// All per-key operations take `&self` and are linearizable per key through
/// the map's shard locks. Whole-store operations coordinate through `global`:
/// shared for scans and export, exclusive for import. Per-key mutations are
/// NOT excluded by the shared lock.
pub struct Store<K, V> {
    /// The main storage map
    map: TableMap<K, V>,

    /// Global lock for whole-store operations only
    global: RwLock<()>,
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash,
{
    /// Create a new empty store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Store {
            map: DashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
            global: RwLock::new(()),
        }
    }

    /// Insert a key-value pair, failing if the key is already present
    ///
    /// Atomic: a concurrent insert on the same key cannot interleave to
    /// produce a lost write. No mutation occurs on failure.
    pub fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
        match self.map.entry(key) {
            Entry::Occupied(_) => Err(StoreError::KeyExists),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Replace the value of an existing key
    ///
    /// Fails with `KeyNotFound` if the key is absent; no mutation occurs on
    /// failure. When the key is present the new value is always written.
    pub fn update(&self, key: &K, value: V) -> Result<(), StoreError> {
        match self.map.get_mut(key) {
            Some(mut slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::KeyNotFound),
        }
    }

    /// Get a copy of the value for a key
    ///
    /// The returned value is a snapshot at call time; there is no guarantee
    /// it is still current once this returns.
    pub fn get(&self, key: &K) -> Result<V, StoreError>
    where
        V: Clone,
    {
        match self.map.get(key) {
            Some(slot) => Ok(slot.value().clone()),
            None => Err(StoreError::KeyNotFound),
        }
    }

    /// Delete a key unconditionally
    ///
    /// No-op when the key is absent; never fails. Callers needing
    /// existence-then-delete atomicity should use [`Store::delete_if_present`]
    /// instead of a separate existence check followed by delete.
    pub fn delete(&self, key: &K) {
        self.map.remove(key);
    }

    /// Delete a key, reporting whether it was present
    ///
    /// Atomic check-then-delete primitive: returns true iff this call
    /// removed the entry.
    pub fn delete_if_present(&self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Collect the keys whose value satisfies a predicate
    ///
    /// Runs under the shared whole-store lock: no import can overlap, but
    /// per-key mutations may interleave with the scan, so returned keys are
    /// not guaranteed to still be present or matching when the caller acts
    /// on them. The predicate must be pure over the value.
    pub fn select_keys<F>(&self, predicate: F) -> Vec<K>
    where
        K: Clone,
        F: Fn(&V) -> bool,
    {
        let _guard = self.global.read().unwrap();
        self.map
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Get the values for a batch of keys
    ///
    /// Keys not found at scan time are silently omitted; unlike single
    /// `get`, the batch form reports no error for missing keys.
    pub fn get_many(&self, keys: &[K]) -> Vec<V>
    where
        V: Clone,
    {
        keys.iter()
            .filter_map(|key| self.map.get(key).map(|slot| slot.value().clone()))
            .collect()
    }

    /// Insert a key with a zero-valued placeholder
    ///
    /// Same contract as [`Store::insert`].
    pub fn create_index(&self, key: K) -> Result<(), StoreError>
    where
        V: Default,
    {
        self.insert(key, V::default())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Copy out all entries under the shared whole-store lock
    ///
    /// This is the export primitive the snapshot codec builds on. Blocks
    /// concurrent import but not per-key mutation.
    pub fn snapshot_entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let _guard = self.global.read().unwrap();
        self.map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Write a batch of entries under the exclusive whole-store lock
    ///
    /// Import primitive: existing keys are overwritten without requiring
    /// prior absence. Returns the number of entries written. While the
    /// exclusive lock is held no other whole-store operation can run.
    pub fn restore_entries(&self, entries: Vec<(K, V)>) -> usize {
        let _guard = self.global.write().unwrap();
        let count = entries.len();
        for (key, value) in entries {
            self.map.insert(key, value);
        }
        count
    }
}

impl<K, V> std::fmt::Debug for Store<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<K, V> Default for Store<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
