use overlay_config::RenderConfig;

/// Size of the overlay window when not fullscreen.
pub const WINDOWED_SIZE: (u32, u32) = (400, 300);

/// Size differences at or below this are treated as already applied.
const RESIZE_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Windowed,
    Fullscreen,
}

/// Where and how the host should place the overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub borderless: bool,
    pub topmost: bool,
    pub resizable: bool,
}

impl WindowPlacement {
    /// Decorated, resizable window of `WINDOWED_SIZE` centred on the display.
    pub fn windowed(display: (u32, u32)) -> Self {
        let (width, height) = WINDOWED_SIZE;
        Self {
            x: centre_offset(display.0, width),
            y: centre_offset(display.1, height),
            width,
            height,
            borderless: false,
            topmost: false,
            resizable: true,
        }
    }

    /// Borderless, topmost, fixed-size window at the display origin.
    pub fn fullscreen(size: (u32, u32)) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.0,
            height: size.1,
            borderless: true,
            topmost: true,
            resizable: false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn centre_offset(display: u32, window: u32) -> i32 {
    ((i64::from(display) - i64::from(window)) / 2) as i32
}

/// Tracks the overlay window's display mode and decides placements.
#[derive(Debug)]
pub struct DisplayController {
    mode: DisplayMode,
    display_default: (u32, u32),
    placement: WindowPlacement,
    /// Size last reported by the host, which may lag the placement.
    current_size: (f64, f64),
}

impl DisplayController {
    pub fn new(display_default: (u32, u32)) -> Self {
        let placement = WindowPlacement::windowed(display_default);
        Self {
            mode: DisplayMode::Windowed,
            display_default,
            placement,
            current_size: (f64::from(placement.width), f64::from(placement.height)),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_fullscreen(&self) -> bool {
        self.mode == DisplayMode::Fullscreen
    }

    pub fn placement(&self) -> WindowPlacement {
        self.placement
    }

    pub fn display_default(&self) -> (u32, u32) {
        self.display_default
    }

    /// Primary display size changed (monitor switch, DPI change).
    pub fn set_display_default(&mut self, size: (u32, u32)) {
        self.display_default = size;
    }

    /// Host reports the window's actual size.
    pub fn resized(&mut self, width: f64, height: f64) {
        self.current_size = (width, height);
    }

    pub fn toggle_fullscreen(&mut self, config: &RenderConfig) -> WindowPlacement {
        match self.mode {
            DisplayMode::Windowed => self.enter_fullscreen(config),
            DisplayMode::Fullscreen => self.leave_fullscreen(),
        }
    }

    /// Leave fullscreen. `None` when already windowed.
    pub fn exit_fullscreen(&mut self) -> Option<WindowPlacement> {
        self.is_fullscreen().then(|| self.leave_fullscreen())
    }

    /// Re-place the fullscreen window at the configured resolution.
    /// Ignored while windowed.
    pub fn apply_resolution_override(&mut self, config: &RenderConfig) -> Option<WindowPlacement> {
        if !self.is_fullscreen() {
            return None;
        }
        let size = config.fullscreen_resolution(self.display_default);
        let placement = WindowPlacement::fullscreen(size);
        tracing::info!(
            width = placement.width,
            height = placement.height,
            "resolution override applied"
        );
        Some(self.place(placement))
    }

    /// Per-tick check: a new placement only when fullscreen, an override is
    /// configured, and the window size has drifted from it.
    pub fn sync(&mut self, config: &RenderConfig) -> Option<WindowPlacement> {
        if !self.is_fullscreen() || !config.has_resolution_override() {
            return None;
        }
        let (tw, th) = config.fullscreen_resolution(self.display_default);
        let (cw, ch) = self.current_size;
        let drifted = (cw - f64::from(tw)).abs() > RESIZE_TOLERANCE
            || (ch - f64::from(th)).abs() > RESIZE_TOLERANCE;
        if !drifted {
            return None;
        }
        tracing::debug!(from_w = cw, from_h = ch, to_w = tw, to_h = th, "window size drifted");
        Some(self.place(WindowPlacement::fullscreen((tw, th))))
    }

    fn enter_fullscreen(&mut self, config: &RenderConfig) -> WindowPlacement {
        self.mode = DisplayMode::Fullscreen;
        let size = config.fullscreen_resolution(self.display_default);
        let placement = WindowPlacement::fullscreen(size);
        tracing::info!(
            width = placement.width,
            height = placement.height,
            "entered fullscreen"
        );
        self.place(placement)
    }

    fn leave_fullscreen(&mut self) -> WindowPlacement {
        self.mode = DisplayMode::Windowed;
        tracing::info!("left fullscreen");
        self.place(WindowPlacement::windowed(self.display_default))
    }

    fn place(&mut self, placement: WindowPlacement) -> WindowPlacement {
        self.placement = placement;
        self.current_size = (f64::from(placement.width), f64::from(placement.height));
        placement
    }
}
