use glam::Vec3;
use overlay_common::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named skeletal joints the overlay knows how to draw.
///
/// Declaration order is the canonical order: `JointMap` iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Head,
    Neck,
    UpperSpine,
    LowerSpine,
    Pelvis,
    LeftUpperArm,
    LeftForearm,
    LeftForearmTwist,
    LeftHand,
    RightUpperArm,
    RightForearm,
    RightForearmTwist,
    RightHand,
    LeftUpperThigh,
    LeftLowerThigh,
    LeftCalf,
    LeftFoot,
    RightUpperThigh,
    RightLowerThigh,
    RightCalf,
    RightFoot,
}

impl Joint {
    pub const ALL: [Joint; 21] = [
        Joint::Head,
        Joint::Neck,
        Joint::UpperSpine,
        Joint::LowerSpine,
        Joint::Pelvis,
        Joint::LeftUpperArm,
        Joint::LeftForearm,
        Joint::LeftForearmTwist,
        Joint::LeftHand,
        Joint::RightUpperArm,
        Joint::RightForearm,
        Joint::RightForearmTwist,
        Joint::RightHand,
        Joint::LeftUpperThigh,
        Joint::LeftLowerThigh,
        Joint::LeftCalf,
        Joint::LeftFoot,
        Joint::RightUpperThigh,
        Joint::RightLowerThigh,
        Joint::RightCalf,
        Joint::RightFoot,
    ];
}

/// Per-joint world positions. Missing joints read as `Vec3::ZERO`.
pub type JointMap = BTreeMap<Joint, Vec3>;

/// What kind of actor an entity is, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Teammate,
    /// Hostile human player.
    Pmc,
    AiScav,
    AiRaider,
    AiBoss,
    /// Player-controlled scav. Grouped with AI for overlay toggles.
    PlayerScav,
    Watchlisted,
    Streamer,
    #[default]
    Default,
}

impl EntityKind {
    /// Whether the kind falls under the AI toggle group.
    pub fn is_ai(self) -> bool {
        matches!(
            self,
            Self::AiScav | Self::AiRaider | Self::AiBoss | Self::PlayerScav
        )
    }
}

/// The local viewpoint for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub position: Vec3,
    /// Horizontal angle in degrees.
    pub yaw: f32,
    /// Vertical angle in degrees, positive looks down.
    pub pitch: f32,
    #[serde(default)]
    pub head: Option<Vec3>,
}

impl Observer {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            head: None,
        }
    }

    pub fn with_head(mut self, head: Vec3) -> Self {
        self.head = Some(head);
        self
    }

    /// Head position when the provider resolved it to something other than the sentinel.
    pub fn known_head(&self) -> Option<Vec3> {
        self.head.filter(|h| *h != Vec3::ZERO)
    }
}

/// A tracked world actor. Read-only from the overlay's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    pub position: Vec3,
    #[serde(default)]
    pub joints: JointMap,
    #[serde(default = "default_true")]
    pub alive: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default)]
    pub focused: bool,
    /// Set on the entry that represents the observer itself.
    #[serde(default)]
    pub is_observer: bool,
}

fn default_true() -> bool {
    true
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec3) -> Self {
        Self {
            id: EntityId::new(),
            name: None,
            position,
            joints: JointMap::new(),
            alive: true,
            active: true,
            kind,
            focused: false,
            is_observer: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_joints(mut self, joints: JointMap) -> Self {
        self.joints = joints;
        self
    }

    /// World position of a joint, or the zero sentinel when unknown.
    pub fn joint(&self, joint: Joint) -> Vec3 {
        self.joints.get(&joint).copied().unwrap_or(Vec3::ZERO)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn is_drawable(&self) -> bool {
        self.alive && self.active && !self.is_observer
    }
}

/// A loot item on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub position: Vec3,
    pub short_name: String,
    #[serde(default)]
    pub price: i64,
    /// Bypasses the vision cone when deciding whether to label the item.
    #[serde(default)]
    pub important: bool,
}

impl LootItem {
    pub fn new(short_name: impl Into<String>, position: Vec3, price: i64) -> Self {
        Self {
            position,
            short_name: short_name.into(),
            price,
            important: false,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    Open,
    Pending,
    Closed,
}

/// A map location where a session can be concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPoint {
    pub position: Vec3,
    pub name: String,
    pub status: ExitStatus,
}

impl ExitPoint {
    pub fn new(name: impl Into<String>, position: Vec3, status: ExitStatus) -> Self {
        Self {
            position,
            name: name.into(),
            status,
        }
    }
}

/// Errors from decoding a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the overlay reads from the world-state provider for one tick.
///
/// The overlay takes this by reference at the start of a tick and never
/// re-reads the provider mid-frame. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub in_session: bool,
    #[serde(default)]
    pub observer: Option<Observer>,
    #[serde(default)]
    pub entities: Option<Vec<Entity>>,
    #[serde(default)]
    pub exits: Option<Vec<ExitPoint>>,
    #[serde(default)]
    pub loot: Option<Vec<LootItem>>,
}

impl WorldSnapshot {
    /// An empty snapshot: no session, nothing tracked.
    pub fn new() -> Self {
        Self::default()
    }

    /// An active session seen from `observer`, with no entities yet.
    pub fn active(observer: Observer) -> Self {
        Self {
            in_session: true,
            observer: Some(observer),
            entities: Some(Vec::new()),
            exits: None,
            loot: None,
        }
    }

    /// True when there is enough data to render: a session, an observer and an entity list.
    pub fn has_session(&self) -> bool {
        self.in_session && self.observer.is_some() && self.entities.is_some()
    }

    pub fn entities(&self) -> &[Entity] {
        self.entities.as_deref().unwrap_or_default()
    }

    pub fn exits(&self) -> &[ExitPoint] {
        self.exits.as_deref().unwrap_or_default()
    }

    pub fn loot(&self) -> &[LootItem] {
        self.loot.as_deref().unwrap_or_default()
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_session() {
        let s = WorldSnapshot::new();
        assert!(!s.has_session());
        assert!(s.entities().is_empty());
        assert!(s.loot().is_empty());
        assert!(s.exits().is_empty());
    }

    #[test]
    fn session_requires_observer_and_entities() {
        let mut s = WorldSnapshot::active(Observer::new(Vec3::ZERO, 0.0, 0.0));
        assert!(s.has_session());

        s.entities = None;
        assert!(!s.has_session());

        let mut s = WorldSnapshot::active(Observer::new(Vec3::ZERO, 0.0, 0.0));
        s.in_session = false;
        assert!(!s.has_session());
    }

    #[test]
    fn missing_joint_reads_as_sentinel() {
        let mut joints = JointMap::new();
        joints.insert(Joint::Head, Vec3::new(1.0, 2.0, 3.0));
        let e = Entity::new(EntityKind::Pmc, Vec3::ZERO).with_joints(joints);
        assert_eq!(e.joint(Joint::Head), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.joint(Joint::LeftFoot), Vec3::ZERO);
    }

    #[test]
    fn display_name_falls_back() {
        let e = Entity::new(EntityKind::AiScav, Vec3::ZERO);
        assert_eq!(e.display_name(), "Unknown");
        let e = e.named("Killa");
        assert_eq!(e.display_name(), "Killa");
    }

    #[test]
    fn ai_grouping() {
        assert!(EntityKind::AiScav.is_ai());
        assert!(EntityKind::AiRaider.is_ai());
        assert!(EntityKind::AiBoss.is_ai());
        assert!(EntityKind::PlayerScav.is_ai());
        assert!(!EntityKind::Pmc.is_ai());
        assert!(!EntityKind::Teammate.is_ai());
        assert!(!EntityKind::Default.is_ai());
    }

    #[test]
    fn observer_head_sentinel_is_unknown() {
        let o = Observer::new(Vec3::ONE, 0.0, 0.0).with_head(Vec3::ZERO);
        assert!(o.known_head().is_none());
        let o = o.with_head(Vec3::new(0.0, 1.7, 0.0));
        assert_eq!(o.known_head(), Some(Vec3::new(0.0, 1.7, 0.0)));
    }

    #[test]
    fn drawable_flags() {
        let mut e = Entity::new(EntityKind::Pmc, Vec3::ZERO);
        assert!(e.is_drawable());
        e.alive = false;
        assert!(!e.is_drawable());
        e.alive = true;
        e.is_observer = true;
        assert!(!e.is_drawable());
    }

    #[test]
    fn joint_map_iterates_in_declaration_order() {
        let mut joints = JointMap::new();
        for j in Joint::ALL.iter().rev() {
            joints.insert(*j, Vec3::ONE);
        }
        let keys: Vec<Joint> = joints.keys().copied().collect();
        assert_eq!(keys, Joint::ALL.to_vec());
    }

    #[test]
    fn snapshot_json_defaults() {
        let text = r#"{
            "in_session": true,
            "observer": { "position": [0.0, 0.0, 0.0], "yaw": 90.0, "pitch": 0.0 },
            "entities": [
                {
                    "name": "Reshala",
                    "position": [10.0, 0.0, 0.0],
                    "kind": "ai_boss",
                    "joints": { "head": [10.0, 1.7, 0.0] }
                }
            ],
            "exits": [ { "position": [1.0, 0.0, 1.0], "name": "Gate", "status": "pending" } ]
        }"#;
        let s = WorldSnapshot::from_json(text).unwrap();
        assert!(s.has_session());
        let e = &s.entities()[0];
        assert!(e.alive && e.active && !e.focused);
        assert_eq!(e.kind, EntityKind::AiBoss);
        assert_eq!(e.joint(Joint::Head), Vec3::new(10.0, 1.7, 0.0));
        assert_eq!(s.exits()[0].status, ExitStatus::Pending);
        assert!(s.loot.is_none());
    }

    #[test]
    fn snapshot_json_rejects_garbage() {
        assert!(WorldSnapshot::from_json("{ not json").is_err());
    }
}
