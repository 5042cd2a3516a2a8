use overlay_config::RenderConfig;
use overlay_display::{DisplayController, DisplayMode, WindowPlacement};
use overlay_input::{InputEvent, OverlayCommand, map_input};
use overlay_world::WorldSnapshot;

use crate::canvas::Canvas;
use crate::compositor::{Compositor, FrameMode, FrameReport};

/// What the host should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// New window placement to apply, if any.
    pub placement: Option<WindowPlacement>,
    /// Render a frame now rather than waiting for the next tick.
    pub redraw: bool,
}

/// Host-facing surface: frame compositor plus display-mode controller.
#[derive(Debug)]
pub struct Overlay {
    compositor: Compositor,
    display: DisplayController,
}

impl Overlay {
    pub fn new(display_default: (u32, u32)) -> Self {
        Self {
            compositor: Compositor::new(),
            display: DisplayController::new(display_default),
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn display(&self) -> &DisplayController {
        &self.display
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display.mode()
    }

    /// Render one tick. The frame size is taken as the window's live size.
    /// While a session is active the display controller gets to re-apply a
    /// drifted resolution override; the resulting placement is returned on
    /// the report.
    pub fn render_frame(
        &mut self,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
        snapshot: &WorldSnapshot,
        config: &RenderConfig,
    ) -> FrameReport {
        self.display.resized(f64::from(width), f64::from(height));
        let mut report = self.compositor.render_frame(canvas, width, height, snapshot, config);
        if report.mode == FrameMode::Active {
            report.placement = self.display.sync(config);
        }
        report
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.compositor.toggle_visibility()
    }

    pub fn toggle_fullscreen(&mut self, config: &RenderConfig) -> WindowPlacement {
        self.display.toggle_fullscreen(config)
    }

    pub fn apply_resolution_override(&mut self, config: &RenderConfig) -> Option<WindowPlacement> {
        self.display.apply_resolution_override(config)
    }

    /// Host reports the actual window size after applying a placement.
    pub fn resized(&mut self, width: f64, height: f64) {
        self.display.resized(width, height);
    }

    pub fn handle(&mut self, command: OverlayCommand, config: &RenderConfig) -> CommandOutcome {
        tracing::debug!(?command, "overlay command");
        match command {
            OverlayCommand::ToggleVisibility => {
                self.toggle_visibility();
                CommandOutcome {
                    placement: None,
                    redraw: true,
                }
            }
            OverlayCommand::ToggleFullscreen => CommandOutcome {
                placement: Some(self.toggle_fullscreen(config)),
                redraw: true,
            },
            OverlayCommand::ExitFullscreen => placed(self.display.exit_fullscreen()),
            OverlayCommand::ApplyResolutionOverride => {
                placed(self.apply_resolution_override(config))
            }
            OverlayCommand::Redraw => CommandOutcome {
                placement: None,
                redraw: true,
            },
        }
    }

    /// Map a raw window event and handle the resulting command, if any.
    pub fn handle_input(&mut self, event: &InputEvent, config: &RenderConfig) -> CommandOutcome {
        match map_input(event, self.display.mode()) {
            Some(command) => self.handle(command, config),
            None => CommandOutcome::default(),
        }
    }
}

fn placed(placement: Option<WindowPlacement>) -> CommandOutcome {
    CommandOutcome {
        redraw: placement.is_some(),
        placement,
    }
}
