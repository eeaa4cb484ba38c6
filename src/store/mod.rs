//! Concurrent storage module
//!
//! Provides the core generic table for storing key-value pairs in memory.
//! This module is independent of snapshot and scheduling concerns (loose coupling).

mod table;

pub use table::Store;
