//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/edgevol/config.json`.
//! Every section and every field is optional; a minimal `{}` file is valid
//! and all values fall back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "slider": { "sensitivity": 120.0, "anchor_policy": "fixed" },
//!   "overlay": { "active_edges": ["left", "right"], "height_fraction": 0.5 },
//!   "output": { "max_level": 20, "haptic_ms": 0 }
//! }
//! ```

use crate::command::{validate_sensitivity, ConfigUpdate, EdgeSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Per-strip gesture settings.
    #[serde(default)]
    pub slider: SliderConfig,

    /// Which strips are shown and how large they are.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Where value changes go.
    #[serde(default)]
    pub output: OutputConfig,
}

/// How a drag keeps track of its reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPolicy {
    /// Re-anchor on every move sample.  A sensitivity change mid-drag only
    /// affects the distance travelled after the change.
    #[default]
    Continuous,
    /// Keep the anchor recorded when the finger went down.
    Fixed,
}

/// Gesture settings applied to every strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Value a strip starts at, in `[0, 100]`.  Default: `50`.
    pub initial_value: f64,
    /// Percent of full range per full strip height dragged.  Default: `100`.
    pub sensitivity: f64,
    /// Anchoring policy for drags.  Default: continuous.
    pub anchor_policy: AnchorPolicy,
    /// Width of the grab area, centered in the strip (px).  Default: `36`.
    pub touch_width: f64,
    /// Width of the drawn track (px).  Default: `6`.
    pub track_width: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            initial_value: 50.0,
            sensitivity: 100.0,
            anchor_policy: AnchorPolicy::Continuous,
            touch_width: 36.0,
            track_width: 6.0,
        }
    }
}

/// Strip attachment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Edges that carry a strip.  Default: right only.
    pub active_edges: EdgeSet,
    /// Master switch.  Default: `true`.
    pub enabled: bool,
    /// Strip height as a fraction of the screen height.  Default: `0.6`.
    pub height_fraction: f64,
    /// Strip surface width (px).  Default: `36`.
    pub width: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            active_edges: EdgeSet::single(crate::command::Edge::Right),
            enabled: true,
            height_fraction: 0.6,
            width: 36,
        }
    }
}

/// Which output stream a strip controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Playback (the default sink).
    #[default]
    Media,
    /// Recording (the default source).
    Capture,
}

/// Output and feedback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Stream to adjust.  Default: media.
    pub channel: Channel,
    /// Number of discrete level steps exposed by the output backend.
    /// Default: `15`.
    pub max_level: u32,
    /// Ask the output backend to show its own level indicator.
    /// Default: `true`.
    pub show_ui: bool,
    /// Haptic pulse length per value change (ms).  `0` disables it.
    /// Default: `10`.
    pub haptic_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Media,
            max_level: 15,
            show_ui: true,
            haptic_ms: 10,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path` and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value that the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sensitivity(self.slider.sensitivity)?;
        let fraction = self.overlay.height_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::InvalidHeightFraction(fraction));
        }
        if self.overlay.width == 0 {
            return Err(ConfigError::InvalidWidth);
        }
        Ok(())
    }

    /// The initial coordinator configuration described by this file.
    pub fn initial_update(&self) -> ConfigUpdate {
        ConfigUpdate::new()
            .with_sensitivity(self.slider.sensitivity)
            .with_edges(self.overlay.active_edges.clone())
            .with_enabled(self.overlay.enabled)
    }
}

/// Error from loading or validating configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(String),
    #[error("sensitivity must be a positive number, got {0}")]
    InvalidSensitivity(f64),
    #[error("unknown edge {0:?} (expected \"left\" or \"right\")")]
    UnknownEdge(String),
    #[error("height_fraction must be in (0, 1], got {0}")]
    InvalidHeightFraction(f64),
    #[error("overlay width must be at least 1px")]
    InvalidWidth,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Edge;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "slider": {
                "initial_value": 30,
                "sensitivity": 150.0,
                "anchor_policy": "fixed",
                "touch_width": 48,
                "track_width": 8
            },
            "overlay": {
                "active_edges": ["left", "right"],
                "enabled": false,
                "height_fraction": 0.5,
                "width": 48
            },
            "output": {
                "channel": "capture",
                "max_level": 20,
                "show_ui": false,
                "haptic_ms": 0
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.slider.initial_value, 30.0);
        assert_eq!(cfg.slider.sensitivity, 150.0);
        assert_eq!(cfg.slider.anchor_policy, AnchorPolicy::Fixed);
        assert_eq!(cfg.slider.touch_width, 48.0);
        assert_eq!(cfg.overlay.active_edges, EdgeSet::both());
        assert!(!cfg.overlay.enabled);
        assert_eq!(cfg.overlay.height_fraction, 0.5);
        assert_eq!(cfg.overlay.width, 48);
        assert_eq!(cfg.output.channel, Channel::Capture);
        assert_eq!(cfg.output.max_level, 20);
        assert!(!cfg.output.show_ui);
        assert_eq!(cfg.output.haptic_ms, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        let sd = SliderConfig::default();
        assert_eq!(cfg.slider.initial_value, sd.initial_value);
        assert_eq!(cfg.slider.sensitivity, sd.sensitivity);
        assert_eq!(cfg.slider.anchor_policy, AnchorPolicy::Continuous);
        assert_eq!(cfg.overlay.active_edges, EdgeSet::single(Edge::Right));
        assert!(cfg.overlay.enabled);
        assert_eq!(cfg.overlay.height_fraction, 0.6);
        assert_eq!(cfg.output.max_level, 15);
        assert_eq!(cfg.output.haptic_ms, 10);
    }

    #[test]
    fn deserialize_partial_sections() {
        let json = r#"{ "overlay": { "active_edges": "left" } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.overlay.active_edges, EdgeSet::single(Edge::Left));
        assert_eq!(cfg.overlay.width, OverlayConfig::default().width);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "slider": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn unknown_edge_fails_to_parse() {
        let json = r#"{ "overlay": { "active_edges": ["top"] } }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.slider.sensitivity = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSensitivity(0.0)));

        let mut cfg = Config::default();
        cfg.overlay.height_fraction = 1.5;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidHeightFraction(1.5)));

        let mut cfg = Config::default();
        cfg.overlay.width = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidWidth));
    }

    #[test]
    fn initial_update_mirrors_file() {
        let cfg = Config::default();
        let u = cfg.initial_update();
        assert_eq!(u.sensitivity, Some(100.0));
        assert_eq!(u.active_edges, Some(EdgeSet::single(Edge::Right)));
        assert_eq!(u.enabled, Some(true));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("edgevol-test-no-such-config.json");
        assert!(matches!(Config::load(&path), Err(ConfigError::Load(_))));
    }
}
