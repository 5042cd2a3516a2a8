use glam::Vec3;

use crate::camera::CameraFrame;

/// Angle in degrees between the camera's forward axis and the direction to `point`.
///
/// `None` when the point sits on the eye (no direction) or the inputs are not finite.
pub fn angle_from_forward(frame: &CameraFrame, point: Vec3) -> Option<f32> {
    let dir = (point - frame.eye).try_normalize()?;
    let cos = frame.forward.dot(dir).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

/// Gate for loot labels: items outside the cone keep their marker but lose the label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootCone {
    threshold: Option<f32>,
}

impl LootCone {
    /// `threshold` is the cone half-angle in degrees; `None` or a non-positive
    /// value leaves every label enabled.
    pub fn new(threshold: Option<f32>) -> Self {
        Self {
            threshold: threshold.filter(|t| *t > 0.0),
        }
    }

    pub fn unrestricted() -> Self {
        Self { threshold: None }
    }

    pub fn is_restricting(&self) -> bool {
        self.threshold.is_some()
    }

    /// Whether the label for an item at `point` should be drawn.
    pub fn shows_label(&self, frame: &CameraFrame, point: Vec3, important: bool) -> bool {
        if important {
            return true;
        }
        match self.threshold {
            None => true,
            Some(threshold) => {
                angle_from_forward(frame, point).is_some_and(|angle| angle <= threshold)
            }
        }
    }
}
