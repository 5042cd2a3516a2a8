//! Overlay configuration: the toggles and numeric options read every frame.
//!
//! # Invariants
//! - Configuration is a read-only snapshot from the renderer's point of view.
//! - A loaded document is always validated before use.

mod render_config;

pub use render_config::{CameraConfig, ConfigError, GroupToggles, OverlayToggles, RenderConfig};
