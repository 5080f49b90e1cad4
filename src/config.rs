use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::surface::Viewport;
use crate::types::{Point, TerminalContract};

/// Canvas geometry and pacing shared by the engine and the CLI.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Canvas size in terminal cells.
    pub width: u16,
    pub height: u16,
    pub origin: Point,
    pub units_per_column: f64,
    pub units_per_row: f64,
    /// Where the turtle starts unless the program says otherwise.
    pub start: Point,
    pub pen_color: String,
    pub animation_speed_ms: u64,
    pub frame_interval_ms: u64,
    /// Upper bound on recorded frames for a single run.
    pub max_frames: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        TurtleConfig {
            width: 80,
            height: 40,
            origin: Point::new(0.0, 0.0),
            units_per_column: 10.0,
            units_per_row: 20.0,
            start: Point::new(400.0, 400.0),
            pen_color: "white".into(),
            animation_speed_ms: 100,
            frame_interval_ms: 16,
            max_frames: 20_000,
        }
    }
}

impl TurtleConfig {
    /// Load from `$ASCII_TURTLE_CONFIG` or `~/.config/ascii-turtle/config.json`.
    /// A missing file gives the defaults; a broken one is reported and ignored.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!(
                    "invalid config {} ({e}), using defaults",
                    config_path.display()
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("ASCII_TURTLE_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("ascii-turtle");
        path.push("config.json");
        path
    }

    pub fn contract(&self) -> TerminalContract {
        TerminalContract {
            width: self.width,
            height: self.height,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            origin: self.origin,
            units_per_column: self.units_per_column,
            units_per_row: self.units_per_row,
        }
    }

    pub fn animation_speed(&self) -> Duration {
        Duration::from_millis(self.animation_speed_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = TurtleConfig::from_json(r#"{ "width": 120, "pen_color": "green" }"#).unwrap();
        assert_eq!(config.width, 120);
        assert_eq!(config.pen_color, "green");
        assert_eq!(config.height, 40);
        assert_eq!(config.start, Point::new(400.0, 400.0));
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(TurtleConfig::from_json("{}").unwrap(), TurtleConfig::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(TurtleConfig::from_json(r#"{ "width": "wide" }"#).is_err());
    }
}
