use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which overlays are drawn for one toggle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayToggles {
    pub skeleton: bool,
    pub boxes: bool,
    pub names: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self {
            skeleton: true,
            boxes: false,
            names: true,
        }
    }
}

impl OverlayToggles {
    pub const ALL: Self = Self {
        skeleton: true,
        boxes: true,
        names: true,
    };

    pub const NONE: Self = Self {
        skeleton: false,
        boxes: false,
        names: false,
    };
}

/// Per-group overlay toggles. Human covers players, AI covers every AI kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupToggles {
    pub human: OverlayToggles,
    pub ai: OverlayToggles,
}

/// Eye placement constants.
///
/// These approximate a standing pose. Crouched or prone observers will see
/// a vertical offset in projected geometry; the provider does not expose
/// posture reliably enough to correct for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye height above the observer root when the head joint is unknown.
    pub standing_eye_height: f32,
    /// Offset from the head joint to the eye.
    pub head_eye_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            standing_eye_height: 1.65,
            head_eye_offset: Vec3::new(0.0, 0.10, 0.0),
        }
    }
}

/// Options consulted once per frame. The overlay never mutates this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Overlay visible; when false only the "hidden" placeholder is drawn.
    pub esp_enabled: bool,
    pub overlays: GroupToggles,
    /// Entities farther than this from the observer (world units) are skipped.
    pub max_distance: f32,
    /// Vertical field of view in degrees. Clamped to 50..=75 at projection time.
    pub fov: f32,
    pub esp_crosshair: bool,
    /// Crosshair arm length in pixels, at least 2.
    pub esp_crosshair_length: f32,
    /// Global loot tracking switch.
    pub loot_enabled: bool,
    pub esp_loot: bool,
    pub esp_loot_price: bool,
    pub esp_loot_cone_enabled: bool,
    /// Half-angle of the loot label cone in degrees.
    pub esp_loot_cone_angle: f32,
    pub esp_exfils: bool,
    /// Fullscreen width override, 0 for the display default.
    pub esp_screen_width: u32,
    /// Fullscreen height override, 0 for the display default.
    pub esp_screen_height: u32,
    pub esp_show_fps: bool,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            esp_enabled: true,
            overlays: GroupToggles::default(),
            max_distance: 300.0,
            fov: 55.0,
            esp_crosshair: false,
            esp_crosshair_length: 10.0,
            loot_enabled: true,
            esp_loot: false,
            esp_loot_price: false,
            esp_loot_cone_enabled: false,
            esp_loot_cone_angle: 15.0,
            esp_exfils: true,
            esp_screen_width: 0,
            esp_screen_height: 0,
            esp_show_fps: false,
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file, then validate.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the overlay cannot render with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("max_distance", self.max_distance)?;
        finite("fov", self.fov)?;
        finite("esp_crosshair_length", self.esp_crosshair_length)?;
        non_negative("esp_loot_cone_angle", self.esp_loot_cone_angle)?;
        non_negative("camera.standing_eye_height", self.camera.standing_eye_height)?;
        if !self.camera.head_eye_offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera.head_eye_offset",
                reason: "must be finite".into(),
            });
        }
        Ok(())
    }

    /// Fullscreen resolution override, falling back per axis to `display_default`.
    pub fn fullscreen_resolution(&self, display_default: (u32, u32)) -> (u32, u32) {
        let width = if self.esp_screen_width > 0 {
            self.esp_screen_width
        } else {
            display_default.0
        };
        let height = if self.esp_screen_height > 0 {
            self.esp_screen_height
        } else {
            display_default.1
        };
        (width, height)
    }

    pub fn has_resolution_override(&self) -> bool {
        self.esp_screen_width > 0 || self.esp_screen_height > 0
    }

    /// Crosshair arm length with the 2 px floor applied.
    pub fn crosshair_length(&self) -> f32 {
        self.esp_crosshair_length.max(2.0)
    }

    /// Cone threshold in degrees, or `None` when the cone does not restrict labels.
    pub fn loot_cone(&self) -> Option<f32> {
        (self.esp_loot_cone_enabled && self.esp_loot_cone_angle > 0.0)
            .then_some(self.esp_loot_cone_angle)
    }

    pub fn draws_loot(&self) -> bool {
        self.loot_enabled && self.esp_loot
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not finite"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}
