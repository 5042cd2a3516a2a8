use glam::Vec2;
use overlay_common::{Color, Rect};

/// Whether a shape is outlined or filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    Stroke,
    Fill,
}

/// Immutable paint for shapes. Built per draw call, never shared mutably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
    pub stroke_width: f32,
    pub antialias: bool,
}

impl Paint {
    pub const fn stroke(color: Color, stroke_width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width,
            antialias: true,
        }
    }

    pub const fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            antialias: true,
        }
    }

    pub const fn aliased(self) -> Self {
        Self {
            antialias: false,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Immutable text style: colour, font size in pixels, alignment about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            align: TextAlign::Left,
        }
    }

    pub const fn centered(self) -> Self {
        Self {
            align: TextAlign::Center,
            ..self
        }
    }
}

/// Errors reported by a drawing surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    #[error("drawing surface lost")]
    SurfaceLost,
    #[error("draw call rejected: {0}")]
    Rejected(String),
}

/// Drawing surface the overlay composes onto.
///
/// Implementations wrap a concrete 2D API. The overlay passes only finite
/// coordinates. Any call may fail; the compositor contains the failure to
/// the entity or item being drawn.
///
/// Implementations must not panic. Report every failure through
/// `CanvasError`; a panic unwinds through the whole frame.
pub trait Canvas {
    fn clear(&mut self, color: Color) -> Result<(), CanvasError>;

    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) -> Result<(), CanvasError>;

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint)
    -> Result<(), CanvasError>;

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), CanvasError>;

    /// Draw `text` with its baseline at `origin`, aligned per `style.align`.
    fn draw_text(&mut self, text: &str, origin: Vec2, style: &TextStyle)
    -> Result<(), CanvasError>;

    /// Advance width of `text` at font size `size`.
    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line { from: Vec2, to: Vec2, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
    Rect { rect: Rect, paint: Paint },
    Text { text: String, origin: Vec2, style: TextStyle },
}

impl std::fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clear(c) => write!(f, "clear #{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            Self::Line { from, to, paint } => write!(
                f,
                "line ({:.1}, {:.1}) -> ({:.1}, {:.1}) #{:02x}{:02x}{:02x}",
                from.x, from.y, to.x, to.y, paint.color.r, paint.color.g, paint.color.b
            ),
            Self::Circle {
                center,
                radius,
                paint,
            } => write!(
                f,
                "circle ({:.1}, {:.1}) r={:.1} #{:02x}{:02x}{:02x}",
                center.x, center.y, radius, paint.color.r, paint.color.g, paint.color.b
            ),
            Self::Rect { rect, paint } => write!(
                f,
                "rect [{:.1}, {:.1}, {:.1}, {:.1}] {:?} #{:02x}{:02x}{:02x}",
                rect.left,
                rect.top,
                rect.right,
                rect.bottom,
                paint.style,
                paint.color.r,
                paint.color.g,
                paint.color.b
            ),
            Self::Text {
                text,
                origin,
                style,
            } => write!(
                f,
                "text {text:?} at ({:.1}, {:.1}) size={:.0}",
                origin.x, origin.y, style.size
            ),
        }
    }
}

/// Canvas that records draw calls instead of rasterising them.
///
/// `clear` discards earlier commands, so after a frame the recording holds
/// exactly what that frame put on screen. Used for tests and the CLI.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands after the leading clear.
    pub fn draws(&self) -> &[DrawCommand] {
        match self.commands.first() {
            Some(DrawCommand::Clear(_)) => &self.commands[1..],
            _ => &self.commands,
        }
    }

    pub fn lines(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// Outlined rectangles (boxes), excluding filled label backgrounds.
    pub fn stroked_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, paint } if paint.style == PaintStyle::Stroke => {
                    Some(*rect)
                }
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Human-readable dump, one command per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for c in &self.commands {
            out.push_str(&c.to_string());
            out.push('\n');
        }
        out
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) -> Result<(), CanvasError> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
        Ok(())
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) -> Result<(), CanvasError> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            paint: *paint,
        });
        Ok(())
    }

    fn draw_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        paint: &Paint,
    ) -> Result<(), CanvasError> {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: *paint,
        });
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) -> Result<(), CanvasError> {
        self.commands.push(DrawCommand::Rect {
            rect,
            paint: *paint,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Vec2,
        style: &TextStyle,
    ) -> Result<(), CanvasError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            style: *style,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        // Rough average glyph advance for a proportional sans font.
        text.chars().count() as f32 * size * 0.55
    }
}
