use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::grid::GridStyle;

/// Environment variable naming a JSON file whose fields override the stored config.
pub const CONFIG_ENV_VAR: &str = "SKETCHPAD_CONFIG";

/// Tunables of the sketchpad, persisted through eframe storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PadConfig {
    /// Distance between grid lines in logical units
    pub grid_pitch: f32,
    pub grid_color: Color32,
    /// Edge length of the square the eraser clears per move event
    pub eraser_size: f32,
    pub default_stroke_color: Color32,
    pub default_line_width: f32,
    /// JPEG quality in 1..=100
    pub jpeg_quality: u8,
    /// Where native builds write exports; `None` means the working directory
    pub export_dir: Option<PathBuf>,
}

impl Default for PadConfig {
    fn default() -> Self {
        let grid = GridStyle::default();
        Self {
            grid_pitch: grid.pitch,
            grid_color: grid.color,
            eraser_size: 8.0,
            default_stroke_color: Color32::BLACK,
            default_line_width: 2.0,
            jpeg_quality: 90,
            export_dir: None,
        }
    }
}

impl PadConfig {
    /// Reads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config.validated())
    }

    /// Loads the override file named by `SKETCHPAD_CONFIG`, if any.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Option<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)?;
        let path = PathBuf::from(path);
        match Self::from_json_file(&path) {
            Ok(config) => {
                log::info!("Loaded config override from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring config override {}: {}", path.display(), err);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Option<Self> {
        None
    }

    /// Replaces out-of-range values with their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.grid_pitch.is_finite() && self.grid_pitch >= 1.0) {
            log::warn!("Invalid grid pitch {}, using {}", self.grid_pitch, defaults.grid_pitch);
            self.grid_pitch = defaults.grid_pitch;
        }
        if !(self.eraser_size.is_finite() && self.eraser_size > 0.0) {
            log::warn!("Invalid eraser size {}, using {}", self.eraser_size, defaults.eraser_size);
            self.eraser_size = defaults.eraser_size;
        }
        if !(self.default_line_width.is_finite() && self.default_line_width > 0.0) {
            self.default_line_width = defaults.default_line_width;
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            self.jpeg_quality = defaults.jpeg_quality;
        }
        self
    }

    pub fn grid_style(&self) -> GridStyle {
        GridStyle {
            pitch: self.grid_pitch,
            color: self.grid_color,
        }
    }
}
