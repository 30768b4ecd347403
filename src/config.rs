//! Demo configuration.
//!
//! Read from a JSON file; every field is optional and falls back to the
//! values in [`DemoConfig::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// How the triangles reach the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One uniform update and draw call per triangle.
    PerDraw,
    /// All triangles streamed into one buffer and drawn with a single call.
    Batched,
}

/// Inclusive integer ranges the random shapes are drawn from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub position: [i32; 2],
    pub velocity: [i32; 2],
    pub size: [i32; 2],
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            position: [0, 800],
            velocity: [-50, 50],
            size: [5, 50],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub mode: RenderMode,
    pub triangles: usize,
    /// Log the frame rate every frame.
    pub log_frames: bool,
    pub log_level: String,
    pub clear_color: [f32; 4],
    pub spawn: SpawnConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "trigl".to_string(),
            width: 800,
            height: 800,
            fullscreen: false,
            mode: RenderMode::Batched,
            triangles: 10_000,
            log_frames: false,
            log_level: "info".to_string(),
            clear_color: [0.08, 0.08, 0.08, 1.0],
            spawn: SpawnConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Loads the configuration from `path`, or from the default location if
    /// `path` is `None`. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        Self::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// `<config dir>/trigl/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trigl").join("config.json"))
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// The configured log level, falling back to `info` for unknown names.
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("window size {}x{} is empty", self.width, self.height));
        }
        for (name, [min, max]) in [
            ("position", self.spawn.position),
            ("velocity", self.spawn.velocity),
            ("size", self.spawn.size),
        ] {
            if min > max {
                return Err(format!("spawn.{name} range {min}..={max} is empty"));
            }
        }
        Ok(())
    }
}
