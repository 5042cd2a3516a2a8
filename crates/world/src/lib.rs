//! World snapshot: the read-only view of tracked entities, loot and exits the
//! overlay consumes once per tick.
//!
//! # Invariants
//! - The overlay never mutates snapshot data.
//! - Unknown joints are represented by the zero vector and must be rejected
//!   before projection.

pub mod snapshot;

pub use snapshot::{
    Entity, EntityKind, ExitPoint, ExitStatus, Joint, JointMap, LootItem, Observer,
    SnapshotError, WorldSnapshot,
};
