//! Flick configuration file handling
//!
//! `flick.toml` has three tables:
//! - `[surface]` - size and context type of the drawing surface
//! - `[animation]` - controller options, camelCase as accepted by `config()`
//! - `[run]` - which demo to draw and how to pace the frame loop

use anyhow::{Context, Result};
use flick_animation::AnimationOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "flick.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlickConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub animation: AnimationOptions,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// "2d", "webgl" or "3d"
    #[serde(default = "default_context_type")]
    pub context_type: String,
}

// Host canvas default size
fn default_width() -> f32 {
    300.0
}

fn default_height() -> f32 {
    150.0
}

fn default_context_type() -> String {
    "2d".to_string()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            context_type: default_context_type(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default = "default_demo")]
    pub demo: String,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Hard cap on how long the frame loop runs
    #[serde(default)]
    pub max_seconds: Option<f64>,
}

fn default_demo() -> String {
    "spinning-hand".to_string()
}

fn default_fps() -> u32 {
    60
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            demo: default_demo(),
            fps: default_fps(),
            max_seconds: None,
        }
    }
}

impl FlickConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FlickConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if given, else `flick.toml` if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Path::new(CONFIG_FILE);
        if default_path.exists() {
            tracing::debug!("Using {}", CONFIG_FILE);
            return Self::load(default_path);
        }

        Ok(Self::default())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
