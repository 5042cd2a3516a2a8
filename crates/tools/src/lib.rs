//! Developer tooling: read-only inspection of world snapshots.
//!
//! # Invariants
//! - Tools never mutate the snapshot they inspect.

mod inspector;

pub use inspector::{EntityInfo, SnapshotInspector, SnapshotSummary};
