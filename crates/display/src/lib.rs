//! Display mode: windowed or borderless fullscreen placement of the overlay window.
//!
//! # Invariants
//! - The controller never touches a window; it emits `WindowPlacement` values
//!   for the host to apply.
//! - A resolution override is only ever applied while fullscreen.

mod mode;

pub use mode::{DisplayController, DisplayMode, WINDOWED_SIZE, WindowPlacement};
