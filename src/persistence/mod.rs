//! Persistence layer for the bracket pool.
//!
//! The whole pool is stored as a single JSON snapshot. Commands that change
//! the pool load the snapshot, apply one effect batch and write the result
//! back atomically.
//!
//! # Crash Safety
//!
//! - Snapshots are written to a temp file, fsynced, then renamed over the old one
//! - The parent directory is fsynced after the rename

pub mod snapshot;

pub use snapshot::{
    PoolSnapshot, SCHEMA_VERSION, SnapshotError, load_snapshot, parse_snapshot,
    save_snapshot_atomic,
};
