use glam::Vec3;
use overlay_config::CameraConfig;
use overlay_world::Observer;

/// Errors from building a camera frame.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("non-finite orientation: yaw={yaw}, pitch={pitch}")]
    NonFiniteOrientation { yaw: f32, pitch: f32 },
    #[error("non-finite eye position {0}")]
    NonFiniteEye(Vec3),
}

/// Observer basis for one frame: forward, right, screen-up and the eye.
///
/// `up` points toward the top of the screen. It is the negated
/// `cross(right, forward)`, which for a level camera is world +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub eye: Vec3,
}

impl CameraFrame {
    /// Use an already-built basis as is.
    pub fn from_basis(eye: Vec3, forward: Vec3, right: Vec3, up: Vec3) -> Self {
        Self {
            forward,
            right,
            up,
            eye,
        }
    }

    /// Build the basis from yaw/pitch in degrees. Positive pitch looks down.
    pub fn from_angles(yaw: f32, pitch: f32, eye: Vec3) -> Result<Self, CameraError> {
        if !yaw.is_finite() || !pitch.is_finite() {
            return Err(CameraError::NonFiniteOrientation { yaw, pitch });
        }
        if !eye.is_finite() {
            return Err(CameraError::NonFiniteEye(eye));
        }

        let (sy, cy) = yaw.to_radians().sin_cos();
        let (sp, cp) = pitch.to_radians().sin_cos();

        let forward = Vec3::new(sy * cp, -sp, cy * cp).normalize();
        let right = Vec3::new(cy, 0.0, -sy).normalize();
        let up = -right.cross(forward).normalize();

        Ok(Self {
            forward,
            right,
            up,
            eye,
        })
    }

    /// Resolve the frame for an observer, placing the eye per `camera`.
    pub fn resolve(observer: &Observer, camera: &CameraConfig) -> Result<Self, CameraError> {
        Self::from_angles(
            observer.yaw,
            observer.pitch,
            eye_position(observer, camera),
        )
    }
}

/// Eye position: the head joint plus a small offset when known, otherwise the
/// root raised by the standing eye height.
pub fn eye_position(observer: &Observer, camera: &CameraConfig) -> Vec3 {
    match observer.known_head() {
        Some(head) => head + camera.head_eye_offset,
        None => observer.position + Vec3::new(0.0, camera.standing_eye_height, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(f: &CameraFrame) {
        assert!((f.forward.length() - 1.0).abs() < EPS);
        assert!((f.right.length() - 1.0).abs() < EPS);
        assert!((f.up.length() - 1.0).abs() < EPS);
        assert!(f.forward.dot(f.right).abs() < EPS);
        assert!(f.forward.dot(f.up).abs() < EPS);
        assert!(f.right.dot(f.up).abs() < EPS);
    }

    #[test]
    fn level_camera_looks_down_z() {
        let f = CameraFrame::from_angles(0.0, 0.0, Vec3::ZERO).unwrap();
        assert!(f.forward.abs_diff_eq(Vec3::Z, EPS));
        assert!(f.right.abs_diff_eq(Vec3::X, EPS));
        assert!(f.up.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn yaw_ninety_looks_down_x() {
        let f = CameraFrame::from_angles(90.0, 0.0, Vec3::ZERO).unwrap();
        assert!(f.forward.abs_diff_eq(Vec3::X, EPS));
        assert!(f.right.abs_diff_eq(-Vec3::Z, EPS));
        assert!(f.up.abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let f = CameraFrame::from_angles(0.0, 30.0, Vec3::ZERO).unwrap();
        assert!(f.forward.y < 0.0);
        assert!(f.up.y > 0.0);
    }

    #[test]
    fn basis_is_orthonormal_for_many_poses() {
        for yaw in (-360..=360).step_by(37) {
            for pitch in (-85..=85).step_by(17) {
                let f = CameraFrame::from_angles(yaw as f32, pitch as f32, Vec3::ONE).unwrap();
                assert_orthonormal(&f);
            }
        }
    }

    #[test]
    fn non_finite_angles_rejected() {
        assert!(matches!(
            CameraFrame::from_angles(f32::NAN, 0.0, Vec3::ZERO),
            Err(CameraError::NonFiniteOrientation { .. })
        ));
        assert!(CameraFrame::from_angles(0.0, f32::INFINITY, Vec3::ZERO).is_err());
        assert!(matches!(
            CameraFrame::from_angles(0.0, 0.0, Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(CameraError::NonFiniteEye(_))
        ));
    }

    #[test]
    fn eye_uses_head_when_known() {
        let camera = CameraConfig::default();
        let observer = Observer::new(Vec3::new(5.0, 0.0, 5.0), 0.0, 0.0)
            .with_head(Vec3::new(5.0, 1.5, 5.0));
        let eye = eye_position(&observer, &camera);
        assert!(eye.abs_diff_eq(Vec3::new(5.0, 1.6, 5.0), EPS));
    }

    #[test]
    fn eye_falls_back_to_standing_height() {
        let camera = CameraConfig::default();
        let observer = Observer::new(Vec3::new(1.0, 2.0, 3.0), 0.0, 0.0).with_head(Vec3::ZERO);
        let eye = eye_position(&observer, &camera);
        assert!(eye.abs_diff_eq(Vec3::new(1.0, 3.65, 3.0), EPS));
    }

    #[test]
    fn resolve_places_eye() {
        let camera = CameraConfig {
            standing_eye_height: 1.0,
            ..CameraConfig::default()
        };
        let f = CameraFrame::resolve(&Observer::new(Vec3::ZERO, 0.0, 0.0), &camera).unwrap();
        assert_eq!(f.eye, Vec3::new(0.0, 1.0, 0.0));
    }
}
