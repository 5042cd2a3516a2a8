use overlay_common::Color;
use overlay_config::{GroupToggles, OverlayToggles};
use overlay_world::{Entity, EntityKind};

use crate::canvas::{Paint, TextStyle};

/// Display category for one entity in one frame. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayCategory {
    Focused,
    LocalObserver,
    Teammate,
    HostileHuman,
    AiScav,
    AiRaider,
    AiBoss,
    PlayerScav,
    Watchlisted,
    Streamer,
}

impl DisplayCategory {
    pub const ALL: [DisplayCategory; 10] = [
        Self::Focused,
        Self::LocalObserver,
        Self::Teammate,
        Self::HostileHuman,
        Self::AiScav,
        Self::AiRaider,
        Self::AiBoss,
        Self::PlayerScav,
        Self::Watchlisted,
        Self::Streamer,
    ];

    pub fn color(self) -> Color {
        match self {
            Self::Focused => Color::rgb(255, 127, 80),
            Self::LocalObserver => Color::rgb(0, 255, 0),
            Self::Teammate => Color::rgb(50, 205, 50),
            Self::HostileHuman => Color::rgb(255, 40, 40),
            Self::AiScav => Color::rgb(255, 255, 0),
            Self::AiRaider => Color::rgb(255, 140, 0),
            Self::AiBoss => Color::rgb(255, 0, 255),
            Self::PlayerScav => Color::rgb(245, 245, 245),
            Self::Watchlisted => Color::rgb(255, 20, 147),
            Self::Streamer => Color::rgb(138, 43, 226),
        }
    }
}

/// Which set of overlay toggles governs an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleGroup {
    Human,
    Ai,
}

impl ToggleGroup {
    pub fn of(kind: EntityKind) -> Self {
        if kind.is_ai() { Self::Ai } else { Self::Human }
    }

    pub fn toggles(self, groups: &GroupToggles) -> OverlayToggles {
        match self {
            Self::Human => groups.human,
            Self::Ai => groups.ai,
        }
    }
}

/// Everything needed to draw one entity, decided once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityStyle {
    pub category: DisplayCategory,
    pub group: ToggleGroup,
    pub color: Color,
    pub overlays: OverlayToggles,
}

impl EntityStyle {
    pub fn skeleton_paint(&self) -> Paint {
        Paint::stroke(self.color, 1.5)
    }

    pub fn box_paint(&self) -> Paint {
        Paint::stroke(self.color, 1.0).aliased()
    }

    pub fn label_style(&self) -> TextStyle {
        TextStyle::new(self.color, crate::compositor::LABEL_FONT_SIZE)
    }

    pub fn draws_anything(&self) -> bool {
        self.overlays.skeleton || self.overlays.boxes || self.overlays.names
    }
}

/// Pick the display category: focus first, then the observer, then kind.
pub fn categorize(entity: &Entity) -> DisplayCategory {
    if entity.focused {
        return DisplayCategory::Focused;
    }
    if entity.is_observer {
        return DisplayCategory::LocalObserver;
    }
    match entity.kind {
        EntityKind::Teammate => DisplayCategory::Teammate,
        EntityKind::Pmc | EntityKind::Default => DisplayCategory::HostileHuman,
        EntityKind::AiScav => DisplayCategory::AiScav,
        EntityKind::AiRaider => DisplayCategory::AiRaider,
        EntityKind::AiBoss => DisplayCategory::AiBoss,
        EntityKind::PlayerScav => DisplayCategory::PlayerScav,
        EntityKind::Watchlisted => DisplayCategory::Watchlisted,
        EntityKind::Streamer => DisplayCategory::Streamer,
    }
}

/// Classify an entity into an immutable style.
///
/// The toggle group follows the entity's kind even when the category is
/// overridden by focus.
pub fn classify(entity: &Entity, groups: &GroupToggles) -> EntityStyle {
    let category = categorize(entity);
    let group = ToggleGroup::of(entity.kind);
    EntityStyle {
        category,
        group,
        color: category.color(),
        overlays: group.toggles(groups),
    }
}
