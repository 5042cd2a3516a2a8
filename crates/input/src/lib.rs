//! Input: raw window events mapped to overlay commands.
//!
//! # Invariants
//! - The overlay consumes commands, never raw input events.
//! - Mapping depends only on the event and the current display mode.

pub mod command;

pub use command::{InputEvent, Key, OverlayCommand, map_input};
