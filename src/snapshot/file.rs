//! Snapshot file I/O
//!
//! Owns the single write/read call against durable storage. Encoding and
//! decoding live in the codec; a failed write removes the target file
//! rather than leaving a corrupt partial snapshot behind.

use super::codec;
use crate::error::StoreError;
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::hash::Hash;
use std::path::Path;
use tracing::{error, info};

/// Encode the store and write the snapshot to a file
pub fn save<K, V, P>(store: &Store<K, V>, path: P) -> Result<(), StoreError>
where
    K: Eq + Hash + Clone + Serialize,
    V: Clone + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = codec::encode(store)?;

    if let Err(e) = fs::write(path, &bytes) {
        error!("Snapshot write to {} failed: {}", path.display(), e);
        // Remove the partial file instead of leaving it truncated
        let _ = fs::remove_file(path);
        return Err(StoreError::Persist(e.to_string()));
    }

    info!(
        "Snapshot saved to {} ({} entries, {} bytes)",
        path.display(),
        store.len(),
        bytes.len()
    );
    Ok(())
}

/// Read a snapshot file into a fresh store
///
/// The entire file is read into memory before decoding; an unreadable file
/// fails cleanly with `Persist`.
pub fn load<K, V, P>(path: P) -> Result<Store<K, V>, StoreError>
where
    K: Eq + Hash + DeserializeOwned,
    V: DeserializeOwned,
    P: AsRef<Path>,
{
    let store = Store::new();
    load_into(path, &store)?;
    Ok(store)
}

/// Read a snapshot file into an existing store
///
/// Returns the number of entries restored.
pub fn load_into<K, V, P>(path: P, store: &Store<K, V>) -> Result<usize, StoreError>
where
    K: Eq + Hash + DeserializeOwned,
    V: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        error!("Couldn't read snapshot file {}: {}", path.display(), e);
        StoreError::Persist(e.to_string())
    })?;

    let restored = codec::decode_into(&data, store)?;
    info!("Snapshot loaded from {} ({} entries)", path.display(), restored);
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let temp_file = "test_snapshot_save_load.snap";

        // Clean up if exists
        let _ = fs::remove_file(temp_file);

        let store: Store<String, u64> = Store::new();
        store.insert("key1".to_string(), 10).unwrap();
        store.insert("key2".to_string(), 20).unwrap();

        save(&store, temp_file).unwrap();

        let restored: Store<String, u64> = load(temp_file).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(&"key1".to_string()).unwrap(), 10);
        assert_eq!(restored.get(&"key2".to_string()).unwrap(), 20);

        // Clean up
        fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_load_missing_file_fails_with_persist() {
        let result: Result<Store<String, u64>, _> = load("no_such_snapshot.snap");
        assert!(matches!(result.unwrap_err(), StoreError::Persist(_)));
    }

    #[test]
    fn test_load_into_existing_store() {
        let temp_file = "test_snapshot_load_into.snap";
        let _ = fs::remove_file(temp_file);

        let store: Store<String, u64> = Store::new();
        store.insert("saved".to_string(), 1).unwrap();
        save(&store, temp_file).unwrap();

        let target: Store<String, u64> = Store::new();
        target.insert("preexisting".to_string(), 2).unwrap();

        let restored = load_into(temp_file, &target).unwrap();
        assert_eq!(restored, 1);
        assert_eq!(target.len(), 2);

        fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_load_corrupt_file_fails_with_decode() {
        let temp_file = "test_snapshot_corrupt.snap";
        fs::write(temp_file, b"not a snapshot at all").unwrap();

        let result: Result<Store<String, u64>, _> = load(temp_file);
        assert!(matches!(result.unwrap_err(), StoreError::Decode(_)));

        fs::remove_file(temp_file).unwrap();
    }
}
