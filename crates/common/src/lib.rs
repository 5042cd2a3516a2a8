//! Shared value types for the overlay crates: entity ids, colours, screen rectangles.

mod types;

pub use types::{Color, EntityId, Rect};
