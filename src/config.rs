use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::brush::{Brush, BrushType};
use crate::color::parse_hex_color;
use crate::error::ConfigError;
use crate::settings::{CanvasSettings, RadiusLimits, RotationDirection};

/// Application configuration, read from JSON. Every field has a default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub brush: BrushConfig,
    pub canvas: CanvasConfig,
    pub export: ExportConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    #[serde(rename = "type")]
    pub brush_type: BrushType,
    pub color: String,
    pub size: f32,
    pub opacity: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            brush_type: BrushType::Pen,
            color: "#000000".to_owned(),
            size: 5.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub background_color: String,
    pub rotation_speed: f32,
    pub rotation_direction: RotationDirection,
    /// Whether the canvas spins on startup
    pub rotating: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_owned(),
            rotation_speed: 5.0,
            rotation_direction: RotationDirection::Clockwise,
            rotating: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub frame_delay_ms: u32,
    pub duration_ms: u32,
    pub frame_rate: u32,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 100,
            duration_ms: 2000,
            frame_rate: 30,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub min_radius: f32,
    pub margin: f32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = RadiusLimits::default();
        Self {
            min_radius: limits.min_radius,
            margin: limits.margin,
        }
    }
}

impl Config {
    /// Environment variable naming the config file
    pub const ENV_VAR: &'static str = "SPIN_CANVAS_CONFIG";

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.brush()?;
        config.canvas_settings()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by [`Config::ENV_VAR`], or defaults when it is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(Self::ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Initial brush
    pub fn brush(&self) -> Result<Brush, ConfigError> {
        Ok(Brush {
            brush_type: self.brush.brush_type,
            color: parse_hex_color(&self.brush.color)?,
            size: self.brush.size.max(Brush::MIN_SIZE),
            opacity: self.brush.opacity.clamp(0.0, 1.0),
        })
    }

    /// Initial canvas settings; the radius is fitted to the viewport later
    pub fn canvas_settings(&self) -> Result<CanvasSettings, ConfigError> {
        Ok(CanvasSettings {
            background_color: parse_hex_color(&self.canvas.background_color)?,
            rotation_speed: self.canvas.rotation_speed.max(0.0),
            rotation_direction: self.canvas.rotation_direction,
            ..CanvasSettings::default()
        })
    }

    pub fn radius_limits(&self) -> RadiusLimits {
        RadiusLimits {
            min_radius: self.limits.min_radius,
            margin: self.limits.margin,
        }
    }
}
