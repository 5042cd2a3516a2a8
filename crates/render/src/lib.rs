//! Frame compositor: turns a world snapshot into draw calls on a `Canvas`.
//!
//! # Invariants
//! - Rendering never mutates the snapshot or the configuration.
//! - Every tick clears the canvas first; a faulted frame leaves it cleared.
//! - A fault while drawing one entity, loot item or exit never aborts the frame.
//! - Hidden overrides every other state and draws only the placeholder.

mod canvas;
mod classify;
mod compositor;
mod labels;
mod overlay;
mod signal;
mod skeleton;
mod stats;

pub use canvas::{
    Canvas, CanvasError, DrawCommand, Paint, PaintStyle, RecordingCanvas, TextAlign, TextStyle,
};
pub use classify::{DisplayCategory, EntityStyle, ToggleGroup, categorize, classify};
pub use compositor::{
    BACKGROUND, Compositor, DrawError, EntityOutcome, FrameError, FrameMode, FrameReport,
    HIDDEN_PLACEHOLDER, LABEL_FONT_SIZE, SessionState, draw_entity,
};
pub use labels::{format_price, loot_label, name_label};
pub use overlay::{CommandOutcome, Overlay};
pub use signal::{FrameSignal, Subscription};
pub use skeleton::{ProjectedJoints, SKELETON_SEGMENTS, bounding_box, skeleton_segments};
pub use stats::{FrameCounter, FrameTimer};
