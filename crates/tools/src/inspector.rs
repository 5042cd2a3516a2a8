use glam::Vec3;
use overlay_common::EntityId;
use overlay_config::RenderConfig;
use overlay_render::{DisplayCategory, categorize};
use overlay_world::{EntityKind, ExitStatus, WorldSnapshot};
use std::collections::BTreeMap;

/// Snapshot inspector for developer tooling.
///
/// Answers "what would the overlay see" questions about a snapshot without
/// rendering it.
pub struct SnapshotInspector;

impl SnapshotInspector {
    pub fn summary(snapshot: &WorldSnapshot, config: &RenderConfig) -> SnapshotSummary {
        let origin = snapshot.observer.as_ref().map(|o| o.position);

        let mut entities_by_kind = BTreeMap::new();
        let mut drawable = 0;
        let mut within_range = 0;
        for entity in snapshot.entities() {
            *entities_by_kind.entry(entity.kind).or_insert(0) += 1;
            if !entity.is_drawable() {
                continue;
            }
            drawable += 1;
            if let Some(origin) = origin {
                if origin.distance(entity.position) <= config.max_distance {
                    within_range += 1;
                }
            }
        }

        let mut exits_by_status = BTreeMap::new();
        for exit in snapshot.exits() {
            *exits_by_status.entry(exit.status).or_insert(0) += 1;
        }

        SnapshotSummary {
            in_session: snapshot.has_session(),
            entity_count: snapshot.entities().len(),
            entities_by_kind,
            drawable,
            within_range,
            loot_count: snapshot.loot().len(),
            important_loot: snapshot.loot().iter().filter(|l| l.important).count(),
            exits_by_status,
        }
    }

    pub fn inspect_entity(snapshot: &WorldSnapshot, id: EntityId) -> Option<EntityInfo> {
        let entity = snapshot.entities().iter().find(|e| e.id == id)?;
        let distance = snapshot
            .observer
            .as_ref()
            .map(|o| o.position.distance(entity.position));
        Some(EntityInfo {
            id,
            name: entity.display_name().to_string(),
            kind: entity.kind,
            category: categorize(entity),
            position: entity.position,
            distance,
            joint_count: entity.joints.len(),
            drawable: entity.is_drawable(),
        })
    }

    pub fn list_entities(snapshot: &WorldSnapshot) -> Vec<EntityId> {
        snapshot.entities().iter().map(|e| e.id).collect()
    }
}

/// Counts over one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSummary {
    pub in_session: bool,
    pub entity_count: usize,
    pub entities_by_kind: BTreeMap<EntityKind, usize>,
    /// Alive, active and not the observer.
    pub drawable: usize,
    /// Drawable and no farther than `max_distance` from the observer.
    pub within_range: usize,
    pub loot_count: usize,
    pub important_loot: usize,
    pub exits_by_status: BTreeMap<ExitStatus, usize>,
}

impl std::fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Snapshot: session={} entities={} drawable={} in_range={} loot={} (important={})",
            self.in_session,
            self.entity_count,
            self.drawable,
            self.within_range,
            self.loot_count,
            self.important_loot
        )?;
        for (kind, count) in &self.entities_by_kind {
            writeln!(f, "  {kind:?}: {count}")?;
        }
        for (status, count) in &self.exits_by_status {
            writeln!(f, "  exits {status:?}: {count}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub category: DisplayCategory,
    pub position: Vec3,
    pub distance: Option<f32>,
    pub joint_count: usize,
    pub drawable: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity [{}] {} {:?}/{:?} pos=({:.2}, {:.2}, {:.2}) joints={}",
            self.id.short(),
            self.name,
            self.kind,
            self.category,
            self.position.x,
            self.position.y,
            self.position.z,
            self.joint_count,
        )?;
        if let Some(d) = self.distance {
            write!(f, " dist={d:.1}m")?;
        }
        if !self.drawable {
            write!(f, " (skipped)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_world::{Entity, ExitPoint, LootItem, Observer};

    fn snapshot() -> WorldSnapshot {
        let mut s = WorldSnapshot::active(Observer::new(Vec3::ZERO, 0.0, 0.0));
        let mut dead = Entity::new(EntityKind::AiScav, Vec3::new(0.0, 0.0, 5.0));
        dead.alive = false;
        s.entities = Some(vec![
            Entity::new(EntityKind::Pmc, Vec3::new(0.0, 0.0, 10.0)).named("Bear"),
            Entity::new(EntityKind::Pmc, Vec3::new(0.0, 0.0, 500.0)),
            Entity::new(EntityKind::AiScav, Vec3::new(3.0, 0.0, 4.0)),
            dead,
        ]);
        s.loot = Some(vec![
            LootItem::new("LEDX", Vec3::ONE, 1_000_000).important(),
            LootItem::new("Bolts", Vec3::ONE, 8_000),
        ]);
        s.exits = Some(vec![
            ExitPoint::new("A", Vec3::ZERO, ExitStatus::Open),
            ExitPoint::new("B", Vec3::ZERO, ExitStatus::Closed),
            ExitPoint::new("C", Vec3::ZERO, ExitStatus::Open),
        ]);
        s
    }

    #[test]
    fn summary_counts() {
        let summary = SnapshotInspector::summary(&snapshot(), &RenderConfig::default());
        assert!(summary.in_session);
        assert_eq!(summary.entity_count, 4);
        assert_eq!(summary.entities_by_kind[&EntityKind::Pmc], 2);
        assert_eq!(summary.entities_by_kind[&EntityKind::AiScav], 2);
        assert_eq!(summary.drawable, 3);
        assert_eq!(summary.within_range, 2);
        assert_eq!(summary.loot_count, 2);
        assert_eq!(summary.important_loot, 1);
        assert_eq!(summary.exits_by_status[&ExitStatus::Open], 2);
        assert_eq!(summary.exits_by_status[&ExitStatus::Closed], 1);
    }

    #[test]
    fn summary_empty_snapshot() {
        let summary = SnapshotInspector::summary(&WorldSnapshot::new(), &RenderConfig::default());
        assert!(!summary.in_session);
        assert_eq!(summary.entity_count, 0);
        assert_eq!(summary.within_range, 0);
        assert!(summary.exits_by_status.is_empty());
    }

    #[test]
    fn summary_display() {
        let s = SnapshotInspector::summary(&snapshot(), &RenderConfig::default()).to_string();
        assert!(s.contains("entities=4"));
        assert!(s.contains("Pmc: 2"));
        assert!(s.contains("exits Closed: 1"));
    }

    #[test]
    fn inspect_entity_found() {
        let snap = snapshot();
        let id = snap.entities()[2].id;
        let info = SnapshotInspector::inspect_entity(&snap, id).unwrap();
        assert_eq!(info.kind, EntityKind::AiScav);
        assert_eq!(info.category, DisplayCategory::AiScav);
        assert_eq!(info.distance, Some(5.0));
        assert_eq!(info.name, "Unknown");
        assert!(info.to_string().contains("dist=5.0m"));
    }

    #[test]
    fn inspect_entity_not_found() {
        assert!(SnapshotInspector::inspect_entity(&snapshot(), EntityId::new()).is_none());
    }

    #[test]
    fn list_entities_in_order() {
        let snap = snapshot();
        let ids = SnapshotInspector::list_entities(&snap);
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], snap.entities()[0].id);
    }
}
