//! StashDB - a generic, concurrency-safe in-memory key-value table
//!
//! StashDB is designed with strong cohesion and loose coupling principles:
//! - Each module has a single, well-defined responsibility
//! - Modules communicate through clear, minimal interfaces
//! - No circular dependencies between modules
//!
//! Per-key operations go straight to the concurrent map and never take the
//! global lock; whole-store operations (scan, export, import) coordinate
//! through a reader/writer lock so a consistent view is cheap to obtain
//! without slowing the single-key path.

pub mod autosave;
pub mod db;
pub mod error;
pub mod snapshot;
pub mod store;

/// Re-export commonly used types
pub use autosave::AutoSave;
pub use db::Database;
pub use error::StoreError;
pub use snapshot::SnapshotConfig;
pub use store::Store;
