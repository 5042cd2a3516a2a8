use glam::Vec2;
use overlay_common::Rect;
use overlay_projection::{Projector, ViewportFrame};
use overlay_world::{Entity, Joint};
use std::collections::BTreeMap;

/// Stick-figure connections, drawn in this order.
pub const SKELETON_SEGMENTS: [(Joint, Joint); 20] = [
    (Joint::Head, Joint::Neck),
    (Joint::Neck, Joint::UpperSpine),
    (Joint::UpperSpine, Joint::LowerSpine),
    (Joint::LowerSpine, Joint::Pelvis),
    // Left arm, shoulder approximated by the neck
    (Joint::Neck, Joint::LeftUpperArm),
    (Joint::LeftUpperArm, Joint::LeftForearm),
    (Joint::LeftForearm, Joint::LeftForearmTwist),
    (Joint::LeftForearmTwist, Joint::LeftHand),
    // Right arm
    (Joint::Neck, Joint::RightUpperArm),
    (Joint::RightUpperArm, Joint::RightForearm),
    (Joint::RightForearm, Joint::RightForearmTwist),
    (Joint::RightForearmTwist, Joint::RightHand),
    // Left leg
    (Joint::Pelvis, Joint::LeftUpperThigh),
    (Joint::LeftUpperThigh, Joint::LeftLowerThigh),
    (Joint::LeftLowerThigh, Joint::LeftCalf),
    (Joint::LeftCalf, Joint::LeftFoot),
    // Right leg
    (Joint::Pelvis, Joint::RightUpperThigh),
    (Joint::RightUpperThigh, Joint::RightLowerThigh),
    (Joint::RightLowerThigh, Joint::RightCalf),
    (Joint::RightCalf, Joint::RightFoot),
];

/// Boxes narrower or shorter than this are degenerate.
pub const BOX_MIN_SIZE: f32 = 1.0;
/// Box edges are clamped to the viewport grown by this margin.
pub const BOX_CLAMP_MARGIN: f32 = 50.0;
/// Outward padding applied after clamping.
pub const BOX_PADDING: f32 = 2.0;

/// Screen positions of every joint of one entity that passed the visibility filter.
///
/// Each joint is projected once per frame and shared by the skeleton, box and label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedJoints {
    points: BTreeMap<Joint, Vec2>,
}

impl ProjectedJoints {
    pub fn project(entity: &Entity, projector: &Projector) -> Self {
        let points = entity
            .joints
            .iter()
            .filter_map(|(joint, world)| projector.try_project(*world).map(|s| (*joint, s)))
            .collect();
        Self { points }
    }

    pub fn get(&self, joint: Joint) -> Option<Vec2> {
        self.points.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments whose two ends both projected. Missing ends drop only that segment.
    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        SKELETON_SEGMENTS
            .iter()
            .filter_map(|(a, b)| Some((self.get(*a)?, self.get(*b)?)))
            .collect()
    }

    /// Padded, clamped bounding rectangle of the projected joints.
    pub fn bounding_box(&self, viewport: &ViewportFrame) -> Option<Rect> {
        if self.points.len() < 2 {
            return None;
        }
        let points: Vec<Vec2> = self.points.values().copied().collect();
        let raw = Rect::bounding(&points)?;

        let (w, h) = (raw.width(), raw.height());
        if !raw.is_finite()
            || w < BOX_MIN_SIZE
            || h < BOX_MIN_SIZE
            || w > viewport.width * 2.0
            || h > viewport.height * 2.0
        {
            return None;
        }

        let clamp_x = |x: f32| x.clamp(-BOX_CLAMP_MARGIN, viewport.width + BOX_CLAMP_MARGIN);
        let clamp_y = |y: f32| y.clamp(-BOX_CLAMP_MARGIN, viewport.height + BOX_CLAMP_MARGIN);
        let clamped = Rect::new(
            clamp_x(raw.left),
            clamp_y(raw.top),
            clamp_x(raw.right),
            clamp_y(raw.bottom),
        );
        Some(clamped.padded(BOX_PADDING))
    }
}

/// Skeleton line segments for an entity.
pub fn skeleton_segments(entity: &Entity, projector: &Projector) -> Vec<(Vec2, Vec2)> {
    ProjectedJoints::project(entity, projector).segments()
}

/// Bounding box for an entity, or `None` when too few joints project or the
/// box is implausible.
pub fn bounding_box(entity: &Entity, projector: &Projector) -> Option<Rect> {
    ProjectedJoints::project(entity, projector).bounding_box(projector.viewport())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use glam::Vec3;
    use overlay_projection::CameraFrame;
    use overlay_world::{EntityKind, JointMap};

    /// A standing humanoid at `base` (feet), facing the camera.
    pub(crate) fn humanoid_joints(base: Vec3) -> JointMap {
        let offsets = [
            (Joint::Head, Vec3::new(0.0, 1.70, 0.0)),
            (Joint::Neck, Vec3::new(0.0, 1.55, 0.0)),
            (Joint::UpperSpine, Vec3::new(0.0, 1.35, 0.0)),
            (Joint::LowerSpine, Vec3::new(0.0, 1.10, 0.0)),
            (Joint::Pelvis, Vec3::new(0.0, 0.95, 0.0)),
            (Joint::LeftUpperArm, Vec3::new(-0.20, 1.45, 0.0)),
            (Joint::LeftForearm, Vec3::new(-0.25, 1.20, 0.0)),
            (Joint::LeftForearmTwist, Vec3::new(-0.27, 1.05, 0.0)),
            (Joint::LeftHand, Vec3::new(-0.28, 0.90, 0.0)),
            (Joint::RightUpperArm, Vec3::new(0.20, 1.45, 0.0)),
            (Joint::RightForearm, Vec3::new(0.25, 1.20, 0.0)),
            (Joint::RightForearmTwist, Vec3::new(0.27, 1.05, 0.0)),
            (Joint::RightHand, Vec3::new(0.28, 0.90, 0.0)),
            (Joint::LeftUpperThigh, Vec3::new(-0.10, 0.90, 0.0)),
            (Joint::LeftLowerThigh, Vec3::new(-0.11, 0.65, 0.0)),
            (Joint::LeftCalf, Vec3::new(-0.12, 0.45, 0.0)),
            (Joint::LeftFoot, Vec3::new(-0.12, 0.05, 0.0)),
            (Joint::RightUpperThigh, Vec3::new(0.10, 0.90, 0.0)),
            (Joint::RightLowerThigh, Vec3::new(0.11, 0.65, 0.0)),
            (Joint::RightCalf, Vec3::new(0.12, 0.45, 0.0)),
            (Joint::RightFoot, Vec3::new(0.12, 0.05, 0.0)),
        ];
        offsets.into_iter().map(|(j, o)| (j, base + o)).collect()
    }

    fn projector() -> Projector {
        let frame = CameraFrame::from_angles(0.0, 0.0, Vec3::new(0.0, 1.65, 0.0)).unwrap();
        Projector::new(frame, ViewportFrame::new(1920.0, 1080.0, 60.0))
    }

    fn figure_at(z: f32) -> Entity {
        let base = Vec3::new(0.5, 0.0, z);
        Entity::new(EntityKind::Pmc, base).with_joints(humanoid_joints(base))
    }

    #[test]
    fn full_skeleton_has_every_segment() {
        let segments = skeleton_segments(&figure_at(10.0), &projector());
        assert_eq!(segments.len(), SKELETON_SEGMENTS.len());
        assert!(segments.len() <= 20);
    }

    #[test]
    fn missing_joint_drops_only_its_segments() {
        let mut e = figure_at(10.0);
        e.joints.remove(&Joint::LeftHand);
        assert_eq!(skeleton_segments(&e, &projector()).len(), 19);

        // The neck feeds four segments.
        e.joints.insert(Joint::Neck, Vec3::ZERO);
        assert_eq!(skeleton_segments(&e, &projector()).len(), 15);
    }

    #[test]
    fn entity_behind_camera_has_no_skeleton_or_box() {
        let e = figure_at(-10.0);
        assert!(skeleton_segments(&e, &projector()).is_empty());
        assert!(bounding_box(&e, &projector()).is_none());
    }

    #[test]
    fn box_encloses_projected_joints_with_padding() {
        let e = figure_at(10.0);
        let p = projector();
        let joints = ProjectedJoints::project(&e, &p);
        let rect = joints.bounding_box(p.viewport()).unwrap();
        for joint in Joint::ALL {
            let s = joints.get(joint).unwrap();
            let inner = rect.padded(-BOX_PADDING);
            assert!(s.x >= inner.left - 1e-3 && s.x <= inner.right + 1e-3);
            assert!(s.y >= inner.top - 1e-3 && s.y <= inner.bottom + 1e-3);
        }
        // Head is at the top of the screen-space box.
        let head = joints.get(Joint::Head).unwrap();
        assert!((head.y - (rect.top + BOX_PADDING)).abs() < 1e-3);
    }

    #[test]
    fn box_is_idempotent() {
        let e = figure_at(12.0);
        let p = projector();
        assert_eq!(bounding_box(&e, &p), bounding_box(&e, &p));
    }

    #[test]
    fn fewer_than_two_joints_no_box() {
        let mut e = figure_at(10.0);
        e.joints.retain(|j, _| *j == Joint::Head);
        assert!(bounding_box(&e, &projector()).is_none());
        e.joints.clear();
        assert!(bounding_box(&e, &projector()).is_none());
    }

    #[test]
    fn degenerate_box_rejected() {
        let mut joints = JointMap::new();
        joints.insert(Joint::Head, Vec3::new(0.0, 1.0, 10.0));
        joints.insert(Joint::Neck, Vec3::new(0.0, 1.0, 10.0));
        let e = Entity::new(EntityKind::Pmc, Vec3::new(0.0, 0.0, 10.0)).with_joints(joints);
        assert!(bounding_box(&e, &projector()).is_none());
    }

    #[test]
    fn oversized_box_rejected() {
        // Close enough to fill far more than twice the viewport height but
        // with both ends still inside the visibility margin is impossible, so
        // build the projected set directly.
        let viewport = ViewportFrame::new(100.0, 100.0, 60.0);
        let mut joints = ProjectedJoints::default();
        joints.points.insert(Joint::Head, Vec2::new(10.0, -150.0));
        joints.points.insert(Joint::LeftFoot, Vec2::new(20.0, 290.0));
        assert!(joints.bounding_box(&viewport).is_none());
    }

    #[test]
    fn box_clamped_to_margin() {
        let viewport = ViewportFrame::new(100.0, 100.0, 60.0);
        let mut joints = ProjectedJoints::default();
        joints.points.insert(Joint::Head, Vec2::new(-120.0, 10.0));
        joints.points.insert(Joint::LeftFoot, Vec2::new(40.0, 60.0));
        let rect = joints.bounding_box(&viewport).unwrap();
        assert_eq!(rect.left, -BOX_CLAMP_MARGIN - BOX_PADDING);
        assert_eq!(rect.right, 40.0 + BOX_PADDING);
        assert_eq!(rect.top, 10.0 - BOX_PADDING);
        assert_eq!(rect.bottom, 60.0 + BOX_PADDING);
    }
}
