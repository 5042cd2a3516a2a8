use overlay_display::DisplayMode;

/// A high-level request the overlay acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    /// Flip the runtime visibility toggle.
    ToggleVisibility,
    ToggleFullscreen,
    ExitFullscreen,
    /// Re-apply the configured fullscreen resolution.
    ApplyResolutionOverride,
    /// Render a frame outside the regular tick.
    Redraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Other(u32),
}

/// Raw event from the overlay window or the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    DoubleClick,
    KeyPressed(Key),
    /// Host-level hotkey bound to overlay visibility.
    VisibilityHotkey,
    /// Resolution fields in the settings were edited.
    ResolutionSettingsChanged,
    /// Window was exposed or resized by the system.
    Exposed,
}

/// Map a raw event to a command. Unbound events map to `None`.
pub fn map_input(event: &InputEvent, mode: DisplayMode) -> Option<OverlayCommand> {
    let command = match (event, mode) {
        (InputEvent::DoubleClick, _) => Some(OverlayCommand::ToggleFullscreen),
        (InputEvent::KeyPressed(Key::Escape), DisplayMode::Fullscreen) => {
            Some(OverlayCommand::ExitFullscreen)
        }
        (InputEvent::KeyPressed(_), _) => None,
        (InputEvent::VisibilityHotkey, _) => Some(OverlayCommand::ToggleVisibility),
        (InputEvent::ResolutionSettingsChanged, _) => Some(OverlayCommand::ApplyResolutionOverride),
        (InputEvent::Exposed, _) => Some(OverlayCommand::Redraw),
    };
    tracing::trace!(?event, ?mode, ?command, "input mapped");
    command
}
