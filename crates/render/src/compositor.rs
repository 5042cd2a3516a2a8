use glam::{Vec2, Vec3};
use overlay_common::{Color, Rect};
use overlay_config::{ConfigError, RenderConfig};
use overlay_projection::{
    CameraError, CameraFrame, LootCone, Projector, ViewportError, ViewportFrame,
};
use overlay_world::{Entity, ExitPoint, ExitStatus, Joint, LootItem, WorldSnapshot};
use std::time::Instant;

use crate::canvas::{Canvas, CanvasError, Paint, TextStyle};
use crate::classify::{EntityStyle, classify};
use crate::labels::{loot_label, name_label};
use crate::skeleton::ProjectedJoints;
use crate::stats::{FrameCounter, FrameTimer};

pub const BACKGROUND: Color = Color::BLACK;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const LOOT_FONT_SIZE: f32 = 10.0;
pub const PLACEHOLDER_FONT_SIZE: f32 = 24.0;
pub const HIDDEN_PLACEHOLDER: &str = "ESP Hidden";
/// Name labels sit this far above the projected head.
pub const NAME_LABEL_RISE: f32 = 20.0;
pub const LOOT_MARKER_RADIUS: f32 = 2.0;
pub const EXIT_MARKER_RADIUS: f32 = 4.0;

const LABEL_BACKGROUND: Color = Color::rgba(0, 0, 0, 128);
const EXIT_OPEN: Color = Color::rgb(50, 205, 50);
const EXIT_PENDING: Color = Color::rgb(255, 215, 0);
const EXIT_TEXT: Color = Color::rgb(224, 255, 224);

/// Whether there is a world to render. Tracked every tick, even while hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Active,
}

/// What a tick draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Overlay suppressed: only the placeholder message.
    Hidden,
    /// Nothing to render: background clear only.
    NoSession,
    Active,
}

/// Faults that abandon the rest of a frame. The canvas is left cleared.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid viewport: {0}")]
    Viewport(#[from] ViewportError),
    #[error("camera unavailable: {0}")]
    Camera(#[from] CameraError),
    #[error("canvas failure: {0}")]
    Canvas(#[from] CanvasError),
    #[error("active session without an observer")]
    MissingObserver,
}

/// A fault while drawing one entity, loot item or exit.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("canvas failure: {0}")]
    Canvas(#[from] CanvasError),
}

/// How one entity fared this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Observer itself, dead or inactive.
    Skipped,
    /// Farther than the configured maximum distance.
    OutOfRange,
    Drawn,
}

/// Summary of one tick, for logging and tests.
#[derive(Debug)]
pub struct FrameReport {
    pub mode: FrameMode,
    pub entities_drawn: usize,
    pub entities_skipped: usize,
    pub entities_out_of_range: usize,
    pub loot_markers: usize,
    pub loot_labels: usize,
    pub exits_drawn: usize,
    /// Entities, loot items or exits whose draw failed and was contained.
    pub item_faults: usize,
    pub fault: Option<FrameError>,
    /// Set by `Overlay` when the window needs a new placement.
    pub placement: Option<overlay_display::WindowPlacement>,
}

impl FrameReport {
    fn new(mode: FrameMode) -> Self {
        Self {
            mode,
            entities_drawn: 0,
            entities_skipped: 0,
            entities_out_of_range: 0,
            loot_markers: 0,
            loot_labels: 0,
            exits_drawn: 0,
            item_faults: 0,
            fault: None,
            placement: None,
        }
    }
}

/// Per-tick frame sequencing: clear, camera, loot, exits, entities, crosshair.
#[derive(Debug)]
pub struct Compositor {
    visible: bool,
    session: SessionState,
    counter: FrameCounter,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            visible: true,
            session: SessionState::NoSession,
            counter: FrameCounter::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip the runtime visibility toggle. Returns the new state.
    pub fn toggle_visibility(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            tracing::info!(visible, "overlay visibility changed");
        }
        self.visible = visible;
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn fps(&self) -> u32 {
        self.counter.fps()
    }

    /// Rolling history of intervals between rendered frames.
    pub fn frame_times(&self) -> &FrameTimer {
        self.counter.frame_times()
    }

    /// Mode the next frame would render in for `config`.
    pub fn mode(&self, config: &RenderConfig) -> FrameMode {
        if !self.visible || !config.esp_enabled {
            return FrameMode::Hidden;
        }
        match self.session {
            SessionState::NoSession => FrameMode::NoSession,
            SessionState::Active => FrameMode::Active,
        }
    }

    pub fn render_frame(
        &mut self,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
        snapshot: &WorldSnapshot,
        config: &RenderConfig,
    ) -> FrameReport {
        self.render_frame_at(canvas, width, height, snapshot, config, Instant::now())
    }

    /// Render one frame. Never fails: faults are logged and reported.
    pub fn render_frame_at(
        &mut self,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
        snapshot: &WorldSnapshot,
        config: &RenderConfig,
        now: Instant,
    ) -> FrameReport {
        let _span = tracing::debug_span!("frame", width, height).entered();
        self.counter.tick_at(now);
        self.track_session(snapshot);

        let mode = self.mode(config);
        let mut report = FrameReport::new(mode);

        if let Err(e) = canvas.clear(BACKGROUND) {
            tracing::error!(error = %e, "canvas clear failed");
            report.fault = Some(e.into());
            return report;
        }

        let result = match mode {
            FrameMode::Hidden => draw_hidden(canvas, width, height),
            FrameMode::NoSession => Ok(()),
            FrameMode::Active => {
                self.draw_active(canvas, width, height, snapshot, config, &mut report)
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "frame abandoned");
            if let Err(clear) = canvas.clear(BACKGROUND) {
                tracing::error!(error = %clear, "canvas clear after fault failed");
            }
            report.fault = Some(e);
        }

        tracing::trace!(
            mode = ?report.mode,
            entities = report.entities_drawn,
            loot = report.loot_markers,
            exits = report.exits_drawn,
            faults = report.item_faults,
            "frame complete"
        );
        report
    }

    fn track_session(&mut self, snapshot: &WorldSnapshot) {
        let next = if snapshot.has_session() {
            SessionState::Active
        } else {
            SessionState::NoSession
        };
        if next != self.session {
            tracing::info!(from = ?self.session, to = ?next, "session state changed");
            self.session = next;
        }
    }

    fn draw_active(
        &self,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
        snapshot: &WorldSnapshot,
        config: &RenderConfig,
        report: &mut FrameReport,
    ) -> Result<(), FrameError> {
        config.validate()?;
        let viewport = ViewportFrame::new(width, height, config.fov);
        viewport.validate()?;
        let observer = snapshot.observer.as_ref().ok_or(FrameError::MissingObserver)?;
        let frame = CameraFrame::resolve(observer, &config.camera)?;
        let projector = Projector::new(frame, viewport);

        if config.draws_loot() {
            let cone = LootCone::new(config.loot_cone());
            for item in snapshot.loot() {
                match draw_loot_item(canvas, &projector, &cone, item, config.esp_loot_price) {
                    Ok(Some(labelled)) => {
                        report.loot_markers += 1;
                        report.loot_labels += usize::from(labelled);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(item = %item.short_name, error = %e, "loot draw failed");
                        report.item_faults += 1;
                    }
                }
            }
        }

        if config.esp_exfils {
            for exit in snapshot.exits() {
                match draw_exit(canvas, &projector, exit) {
                    Ok(true) => report.exits_drawn += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(exit = %exit.name, error = %e, "exit draw failed");
                        report.item_faults += 1;
                    }
                }
            }
        }

        for entity in snapshot.entities() {
            match draw_entity(canvas, &projector, observer.position, entity, config) {
                Ok(EntityOutcome::Drawn) => report.entities_drawn += 1,
                Ok(EntityOutcome::Skipped) => report.entities_skipped += 1,
                Ok(EntityOutcome::OutOfRange) => report.entities_out_of_range += 1,
                Err(e) => {
                    tracing::warn!(entity = %entity.id, error = %e, "entity draw failed");
                    report.item_faults += 1;
                }
            }
        }

        if config.esp_crosshair {
            draw_crosshair(canvas, &viewport, config.crosshair_length())?;
        }

        if config.esp_show_fps {
            let style = TextStyle::new(Color::WHITE, LABEL_FONT_SIZE);
            canvas.draw_text(
                &format!("FPS: {}", self.counter.fps()),
                Vec2::new(8.0, 8.0 + LABEL_FONT_SIZE),
                &style,
            )?;
        }

        Ok(())
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_hidden(canvas: &mut dyn Canvas, width: f32, height: f32) -> Result<(), FrameError> {
    let style = TextStyle::new(Color::WHITE, PLACEHOLDER_FONT_SIZE).centered();
    canvas.draw_text(
        HIDDEN_PLACEHOLDER,
        Vec2::new(width * 0.5, height * 0.5),
        &style,
    )?;
    Ok(())
}

/// Draw one loot marker and, when the cone allows, its label.
/// `Ok(None)` when the item did not project; otherwise whether a label was drawn.
fn draw_loot_item(
    canvas: &mut dyn Canvas,
    projector: &Projector,
    cone: &LootCone,
    item: &LootItem,
    with_price: bool,
) -> Result<Option<bool>, DrawError> {
    let Some(screen) = projector.try_project(item.position) else {
        return Ok(None);
    };
    canvas.draw_circle(screen, LOOT_MARKER_RADIUS, &Paint::fill(Color::LIGHT_GRAY))?;

    if !cone.shows_label(projector.frame(), item.position, item.important) {
        return Ok(Some(false));
    }
    canvas.draw_text(
        &loot_label(item, with_price),
        screen + Vec2::new(4.0, 4.0),
        &TextStyle::new(Color::SILVER, LOOT_FONT_SIZE),
    )?;
    Ok(Some(true))
}

/// Draw an exit marker and name. Closed exits and exits that fail to project
/// draw nothing and return `Ok(false)`.
fn draw_exit(
    canvas: &mut dyn Canvas,
    projector: &Projector,
    exit: &ExitPoint,
) -> Result<bool, DrawError> {
    let color = match exit.status {
        ExitStatus::Open => EXIT_OPEN,
        ExitStatus::Pending => EXIT_PENDING,
        ExitStatus::Closed => return Ok(false),
    };
    let Some(screen) = projector.try_project(exit.position) else {
        return Ok(false);
    };
    canvas.draw_circle(screen, EXIT_MARKER_RADIUS, &Paint::fill(color))?;
    canvas.draw_text(
        &exit.name,
        screen + Vec2::new(6.0, 4.0),
        &TextStyle::new(EXIT_TEXT, LABEL_FONT_SIZE),
    )?;
    Ok(true)
}

/// Draw skeleton, box and name label for one entity per its style.
pub fn draw_entity(
    canvas: &mut dyn Canvas,
    projector: &Projector,
    observer_position: Vec3,
    entity: &Entity,
    config: &RenderConfig,
) -> Result<EntityOutcome, DrawError> {
    if !entity.is_drawable() {
        return Ok(EntityOutcome::Skipped);
    }

    // Range check before any projection work. NaN distances are out of range.
    let distance = observer_position.distance(entity.position);
    if distance.is_nan() || distance > config.max_distance {
        return Ok(EntityOutcome::OutOfRange);
    }

    let style = classify(entity, &config.overlays);
    if !style.draws_anything() {
        return Ok(EntityOutcome::Drawn);
    }
    let joints = ProjectedJoints::project(entity, projector);

    if style.overlays.skeleton {
        let paint = style.skeleton_paint();
        for (from, to) in joints.segments() {
            canvas.draw_line(from, to, &paint)?;
        }
    }

    if style.overlays.boxes {
        if let Some(rect) = joints.bounding_box(projector.viewport()) {
            canvas.draw_rect(rect, &style.box_paint())?;
        }
    }

    if style.overlays.names {
        if let Some(head) = joints.get(Joint::Head) {
            draw_name_label(canvas, head, &name_label(entity, distance), &style)?;
        }
    }

    Ok(EntityOutcome::Drawn)
}

fn draw_name_label(
    canvas: &mut dyn Canvas,
    head: Vec2,
    text: &str,
    style: &EntityStyle,
) -> Result<(), CanvasError> {
    let text_style = style.label_style();
    let text_width = canvas.measure_text(text, text_style.size);
    let top = head.y - NAME_LABEL_RISE;

    let background = Rect::new(
        head.x - text_width * 0.5 - 2.0,
        top,
        head.x + text_width * 0.5 + 2.0,
        top + text_style.size + 2.0,
    );
    canvas.draw_rect(background, &Paint::fill(LABEL_BACKGROUND))?;
    canvas.draw_text(
        text,
        Vec2::new(head.x - text_width * 0.5, top + text_style.size),
        &text_style,
    )
}

fn draw_crosshair(
    canvas: &mut dyn Canvas,
    viewport: &ViewportFrame,
    length: f32,
) -> Result<(), CanvasError> {
    let c = viewport.center();
    let paint = Paint::stroke(Color::WHITE, 1.5);
    canvas.draw_line(
        Vec2::new(c.x - length, c.y),
        Vec2::new(c.x + length, c.y),
        &paint,
    )?;
    canvas.draw_line(
        Vec2::new(c.x, c.y - length),
        Vec2::new(c.x, c.y + length),
        &paint,
    )
}
