//! Projection: camera frame resolution, pinhole projection, visibility
//! filtering and the loot vision cone.
//!
//! # Invariants
//! - The camera basis is orthonormal and `up` is screen-up.
//! - Nothing non-finite leaves `Projector::project_checked`.
//! - Points at or behind the camera plane are never projected.

mod camera;
mod cone;
mod projector;

pub use camera::{CameraError, CameraFrame, eye_position};
pub use cone::{LootCone, angle_from_forward};
pub use projector::{
    DEPTH_EPSILON, FOV_MAX, FOV_MIN, Projector, Rejection, VISIBILITY_MARGIN, ViewportError,
    ViewportFrame, clamp_fov,
};
