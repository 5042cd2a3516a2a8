use glam::{Vec2, Vec3};

use crate::camera::CameraFrame;

/// Points at or closer than this along `forward` are behind the camera plane.
pub const DEPTH_EPSILON: f32 = 0.01;
/// Supported vertical field of view, degrees.
pub const FOV_MIN: f32 = 50.0;
pub const FOV_MAX: f32 = 75.0;
/// Projected points may land this far outside the viewport and still count as visible.
pub const VISIBILITY_MARGIN: f32 = 200.0;

/// Clamp a field of view into the supported range.
pub fn clamp_fov(fov: f32) -> f32 {
    fov.clamp(FOV_MIN, FOV_MAX)
}

/// Errors describing a viewport the projector cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("invalid viewport size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("invalid field of view {0}")]
    InvalidFov(f32),
}

/// Viewport size plus the clamped vertical field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFrame {
    pub width: f32,
    pub height: f32,
    /// Vertical FOV in degrees, already clamped.
    pub fov: f32,
}

impl ViewportFrame {
    pub fn new(width: f32, height: f32, fov: f32) -> Self {
        Self {
            width,
            height,
            fov: clamp_fov(fov),
        }
    }

    pub fn validate(&self) -> Result<(), ViewportError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ViewportError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.fov.is_finite() {
            return Err(ViewportError::InvalidFov(self.fov));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether `p` lies inside the viewport grown by `margin` on every side.
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin
            && p.x <= self.width + margin
            && p.y >= -margin
            && p.y <= self.height + margin
    }
}

/// Why a world point did not produce a usable screen point.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("point is the unknown-joint sentinel")]
    UnknownPoint,
    #[error("point has a non-finite coordinate")]
    NonFiniteInput,
    #[error("point is behind the camera (depth {depth})")]
    BehindCamera { depth: f32 },
    #[error("projection produced a non-finite coordinate")]
    NonFiniteResult,
    #[error("projection ({x}, {y}) is outside the visible margin")]
    OutsideMargin { x: f32, y: f32 },
}

/// Pinhole projector for one frame.
///
/// Axis conventions follow `CameraFrame`: `right` maps to +X, `up` to -Y
/// (screen origin top-left).
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    frame: CameraFrame,
    viewport: ViewportFrame,
    focal_length: f32,
}

impl Projector {
    pub fn new(frame: CameraFrame, viewport: ViewportFrame) -> Self {
        let fov = clamp_fov(viewport.fov);
        let focal_length = 1.0 / (fov * 0.5).to_radians().tan();
        Self {
            frame,
            viewport,
            focal_length,
        }
    }

    pub fn frame(&self) -> &CameraFrame {
        &self.frame
    }

    pub fn viewport(&self) -> &ViewportFrame {
        &self.viewport
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Distance of `world` along the camera's forward axis.
    pub fn depth(&self, world: Vec3) -> f32 {
        (world - self.frame.eye).dot(self.frame.forward)
    }

    /// Raw perspective projection. Only the depth check is applied; the
    /// result may be non-finite or far off screen.
    pub fn project(&self, world: Vec3) -> Result<Vec2, Rejection> {
        let dir = world - self.frame.eye;
        let depth = dir.dot(self.frame.forward);
        if depth.is_nan() || depth <= DEPTH_EPSILON {
            return Err(Rejection::BehindCamera { depth });
        }

        let dx = dir.dot(self.frame.right);
        let dy = dir.dot(self.frame.up);

        let nx = (dx / depth) * self.focal_length / self.viewport.aspect();
        let ny = (dy / depth) * self.focal_length;

        let half_w = self.viewport.width * 0.5;
        let half_h = self.viewport.height * 0.5;
        Ok(Vec2::new(half_w + nx * half_w, half_h - ny * half_h))
    }

    /// Projection wrapped in the visibility filter: sentinel and non-finite
    /// inputs, behind-camera points, non-finite results and points beyond
    /// the margin are all rejected.
    pub fn project_checked(&self, world: Vec3) -> Result<Vec2, Rejection> {
        if world == Vec3::ZERO {
            return Err(Rejection::UnknownPoint);
        }
        if !world.is_finite() {
            return Err(Rejection::NonFiniteInput);
        }
        let screen = self.project(world)?;
        if !screen.is_finite() {
            return Err(Rejection::NonFiniteResult);
        }
        if !self.viewport.contains_with_margin(screen, VISIBILITY_MARGIN) {
            return Err(Rejection::OutsideMargin {
                x: screen.x,
                y: screen.y,
            });
        }
        Ok(screen)
    }

    pub fn try_project(&self, world: Vec3) -> Option<Vec2> {
        match self.project_checked(world) {
            Ok(p) => Some(p),
            Err(reason) => {
                tracing::trace!(%reason, "point rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn axis_camera() -> CameraFrame {
        CameraFrame::from_basis(Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y)
    }

    #[test]
    fn on_axis_point_hits_center() {
        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 90.0));
        let s = p.project_checked(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert!((s.x - 50.0).abs() < EPS);
        assert!((s.y - 50.0).abs() < EPS);
    }

    #[test]
    fn fov_is_clamped() {
        assert_eq!(ViewportFrame::new(1.0, 1.0, 90.0).fov, FOV_MAX);
        assert_eq!(ViewportFrame::new(1.0, 1.0, 10.0).fov, FOV_MIN);
        assert_eq!(ViewportFrame::new(1.0, 1.0, 60.0).fov, 60.0);

        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 120.0));
        let expected = 1.0 / (FOV_MAX * 0.5).to_radians().tan();
        assert!((p.focal_length() - expected).abs() < 1e-6);
    }

    #[test]
    fn points_at_or_behind_plane_rejected() {
        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 60.0));
        for z in [DEPTH_EPSILON, 0.005, 0.0, -0.5, -100.0] {
            assert!(matches!(
                p.project(Vec3::new(1.0, 1.0, z)),
                Err(Rejection::BehindCamera { .. })
            ));
        }
        assert!(p.project(Vec3::new(0.0, 0.0, 0.02)).is_ok());
    }

    #[test]
    fn behind_camera_rejected_for_rotated_frames() {
        for yaw in [0.0_f32, 45.0, 170.0, -90.0] {
            let frame = CameraFrame::from_angles(yaw, 20.0, Vec3::new(3.0, 1.0, -2.0)).unwrap();
            let p = Projector::new(frame, ViewportFrame::new(1920.0, 1080.0, 60.0));
            let behind = frame.eye - frame.forward * 5.0 + frame.right * 0.3;
            assert!(p.project_checked(behind).is_err());
            let at_plane = frame.eye + frame.up * 2.0;
            assert!(p.project_checked(at_plane).is_err());
        }
    }

    #[test]
    fn up_and_right_map_to_screen_axes() {
        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 60.0));
        let above = p.project(Vec3::new(0.0, 1.0, 10.0)).unwrap();
        let right = p.project(Vec3::new(1.0, 0.0, 10.0)).unwrap();
        assert!(above.y < 50.0);
        assert!((above.x - 50.0).abs() < EPS);
        assert!(right.x > 50.0);
        assert!((right.y - 50.0).abs() < EPS);
    }

    #[test]
    fn widening_viewport_keeps_vertical_position() {
        let narrow = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 60.0));
        let wide = Projector::new(axis_camera(), ViewportFrame::new(200.0, 100.0, 60.0));

        let on_axis = Vec3::new(0.0, 0.0, 10.0);
        let a = narrow.project(on_axis).unwrap();
        let b = wide.project(on_axis).unwrap();
        assert!((a.y - b.y).abs() < EPS);
        assert!((b.x - 100.0).abs() < EPS);

        let off_axis = Vec3::new(1.0, 2.0, 10.0);
        let a = narrow.project(off_axis).unwrap();
        let b = wide.project(off_axis).unwrap();
        assert!((a.y - b.y).abs() < EPS);
        // Horizontal offset from centre is the same in pixels; aspect division
        // cancels the doubled half-width.
        assert!(((a.x - 50.0) - (b.x - 100.0)).abs() < EPS);
    }

    #[test]
    fn sentinel_rejected_before_projection() {
        let frame = CameraFrame::from_basis(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, Vec3::X, Vec3::Y);
        let p = Projector::new(frame, ViewportFrame::new(100.0, 100.0, 60.0));
        // The origin is squarely in front of this camera but still means "unknown".
        assert_eq!(p.project_checked(Vec3::ZERO), Err(Rejection::UnknownPoint));
    }

    #[test]
    fn non_finite_input_rejected() {
        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 60.0));
        assert_eq!(
            p.project_checked(Vec3::new(f32::NAN, 0.0, 5.0)),
            Err(Rejection::NonFiniteInput)
        );
        assert_eq!(
            p.project_checked(Vec3::new(0.0, f32::INFINITY, 5.0)),
            Err(Rejection::NonFiniteInput)
        );
    }

    #[test]
    fn far_off_screen_rejected_within_margin_accepted() {
        let p = Projector::new(axis_camera(), ViewportFrame::new(100.0, 100.0, 60.0));
        assert!(matches!(
            p.project_checked(Vec3::new(100.0, 0.0, 1.0)),
            Err(Rejection::OutsideMargin { .. })
        ));
        // Slightly past the right edge, still inside the 200 px margin.
        let s = p.project_checked(Vec3::new(0.7, 0.0, 1.0)).unwrap();
        assert!(s.x > 100.0 && s.x < 100.0 + VISIBILITY_MARGIN);
    }

    #[test]
    fn degenerate_viewport_fails_validation() {
        assert!(ViewportFrame::new(0.0, 100.0, 60.0).validate().is_err());
        assert!(ViewportFrame::new(100.0, f32::NAN, 60.0).validate().is_err());
        assert!(ViewportFrame::new(100.0, 100.0, f32::NAN).validate().is_err());
        assert!(ViewportFrame::new(100.0, 100.0, 60.0).validate().is_ok());
    }
}
