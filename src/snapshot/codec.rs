//! Snapshot binary format
//!
//! Binary format: [magic(4)] [version(u8)] [bincode payload] [checksum(u64)]
//!
//! The payload is the full entry list serialized with bincode. The checksum
//! is xxhash64 over everything before it.

use crate::error::StoreError;
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::hash::Hash;

/// Magic bytes identifying a snapshot file
const MAGIC: [u8; 4] = *b"STSH";

/// Current snapshot format version
const FORMAT_VERSION: u8 = 1;

/// Header size: magic + version
const HEADER_LEN: usize = 5;

/// Trailing checksum size
const CHECKSUM_LEN: usize = 8;

/// Encode the full store contents to snapshot bytes
///
/// Takes the shared whole-store lock for the duration of the entry copy:
/// concurrent import is blocked, per-key mutation is not.
pub fn encode<K, V>(store: &Store<K, V>) -> Result<Vec<u8>, StoreError>
where
    K: Eq + Hash + Clone + Serialize,
    V: Clone + Serialize,
{
    let entries = store.snapshot_entries();

    let payload = bincode::serialize(&entries)
        .map_err(|e| StoreError::Encode(e.to_string()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    buf.extend_from_slice(&MAGIC);
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&payload);

    let checksum = xxhash_rust::xxh64::xxh64(&buf, 0);
    buf.extend_from_slice(&checksum.to_le_bytes());

    Ok(buf)
}

/// Decode snapshot bytes into a fresh store
pub fn decode<K, V>(data: &[u8]) -> Result<Store<K, V>, StoreError>
where
    K: Eq + Hash + DeserializeOwned,
    V: DeserializeOwned,
{
    let store = Store::new();
    decode_into(data, &store)?;
    Ok(store)
}

/// Decode snapshot bytes into an existing store
///
/// Entries are written under the exclusive whole-store lock; key collisions
/// are overwritten without requiring prior absence. The whole payload is
/// decoded before any entry is written, so a decode failure leaves the
/// target store untouched. Returns the number of entries restored.
pub fn decode_into<K, V>(data: &[u8], store: &Store<K, V>) -> Result<usize, StoreError>
where
    K: Eq + Hash + DeserializeOwned,
    V: DeserializeOwned,
{
    let entries = decode_entries(data)?;
    Ok(store.restore_entries(entries))
}

/// Validate framing and decode the entry list
fn decode_entries<K, V>(data: &[u8]) -> Result<Vec<(K, V)>, StoreError>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(StoreError::Decode("snapshot truncated".to_string()));
    }

    if data[..4] != MAGIC {
        return Err(StoreError::Decode("bad magic bytes".to_string()));
    }

    let version = data[4];
    if version != FORMAT_VERSION {
        return Err(StoreError::Decode(format!(
            "unsupported format version {}",
            version
        )));
    }

    let body_end = data.len() - CHECKSUM_LEN;
    let stored_checksum = u64::from_le_bytes(
        data[body_end..]
            .try_into()
            .map_err(|_| StoreError::Decode("invalid checksum".to_string()))?,
    );
    let calculated_checksum = xxhash_rust::xxh64::xxh64(&data[..body_end], 0);
    if stored_checksum != calculated_checksum {
        return Err(StoreError::Decode(format!(
            "checksum mismatch: expected {}, got {}",
            stored_checksum, calculated_checksum
        )));
    }

    bincode::deserialize(&data[HEADER_LEN..body_end])
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> Store<String, u64> {
        let store = Store::new();
        store.insert("a".to_string(), 1).unwrap();
        store.insert("b".to_string(), 2).unwrap();
        store.insert("c".to_string(), 3).unwrap();
        store
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let original = sample_store();
        let bytes = encode(&original).unwrap();

        let restored: Store<String, u64> = decode(&bytes).unwrap();
        assert_eq!(restored.len(), original.len());
        for key in ["a", "b", "c"] {
            assert_eq!(
                restored.get(&key.to_string()).unwrap(),
                original.get(&key.to_string()).unwrap()
            );
        }
    }

    #[test]
    fn test_round_trip_empty_store() {
        let original: Store<String, u64> = Store::new();
        let bytes = encode(&original).unwrap();

        let restored: Store<String, u64> = decode(&bytes).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_decode_into_overwrites_collisions() {
        let original = sample_store();
        let bytes = encode(&original).unwrap();

        let target: Store<String, u64> = Store::new();
        target.insert("a".to_string(), 99).unwrap();
        target.insert("z".to_string(), 26).unwrap();

        let restored = decode_into(&bytes, &target).unwrap();
        assert_eq!(restored, 3);
        assert_eq!(target.get(&"a".to_string()).unwrap(), 1);
        assert_eq!(target.get(&"z".to_string()).unwrap(), 26);
    }

    #[test]
    fn test_checksum_validation() {
        let bytes = {
            let mut bytes = encode(&sample_store()).unwrap();
            let len = bytes.len();
            bytes[len - 1] ^= 0xFF;
            bytes
        };

        let result: Result<Store<String, u64>, _> = decode(&bytes);
        match result.unwrap_err() {
            StoreError::Decode(msg) => assert!(msg.contains("checksum mismatch")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = encode(&sample_store()).unwrap();
        bytes[0] = b'X';

        let result: Result<Store<String, u64>, _> = decode(&bytes);
        assert!(matches!(result.unwrap_err(), StoreError::Decode(_)));
    }

    #[test]
    fn test_truncated_input_rejected() {
        let bytes = encode(&sample_store()).unwrap();

        let result: Result<Store<String, u64>, _> = decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result.unwrap_err(), StoreError::Decode(_)));
    }

    #[test]
    fn test_failed_decode_leaves_target_untouched() {
        let mut bytes = encode(&sample_store()).unwrap();
        let len = bytes.len();
        bytes[len - 1] ^= 0xFF;

        let target: Store<String, u64> = Store::new();
        target.insert("kept".to_string(), 42).unwrap();

        assert!(decode_into(&bytes, &target).is_err());
        assert_eq!(target.len(), 1);
        assert_eq!(target.get(&"kept".to_string()).unwrap(), 42);
    }
}
