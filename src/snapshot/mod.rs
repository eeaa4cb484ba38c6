//! Snapshot persistence module
//!
//! Serializes the full store contents to an opaque binary format and
//! restores it. Each snapshot carries a magic header, a format version and
//! a checksum so corrupt or truncated files are rejected at load time.

mod codec;
mod file;

pub use codec::{decode, decode_into, encode};
pub use file::{load, load_into, save};

use std::path::PathBuf;
use std::time::Duration;

/// Snapshot configuration
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Path to the snapshot file
    pub path: PathBuf,
    /// Interval between automatic saves
    pub interval: Duration,
    /// Whether to enable periodic auto-save
    pub enabled: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            path: PathBuf::from("stashdb.snap"),
            interval: Duration::from_secs(10 * 60),
            enabled: true,
        }
    }
}
