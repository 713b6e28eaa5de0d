use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::feature::{LabelPos, LabelStyle, PosPolicy};

/// Engine-level defaults and tuning knobs. Per-feature `LabelOptions`
/// are seeded from these and may override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pixel spacing between the marker footprint and the label box.
    pub label_gap: f32,
    pub label_pos: PosPolicy,
    /// Slots tried, in order, when `label_pos` is `auto`.
    pub auto_pos_order: Vec<LabelPos>,
    pub label_priority: f64,
    pub marker_with_label_only: bool,
    pub repeat_along_lines: bool,
    /// Target pixel spacing between repeated line label instances.
    pub repeat_distance: f32,
    /// When set, a marker footprint that collides with already-placed
    /// boxes suppresses the whole candidate instead of only being noted.
    pub enforce_icon_clearance: bool,
    pub default_style: LabelStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            label_gap: 2.0,
            label_pos: PosPolicy::Auto,
            auto_pos_order: vec![LabelPos::Right, LabelPos::Left],
            label_priority: 0.0,
            marker_with_label_only: false,
            repeat_along_lines: false,
            repeat_distance: 100.0,
            enforce_icon_clearance: false,
            default_style: LabelStyle::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk representation: every field optional so partial files merge
/// over the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    label_gap: Option<f32>,
    label_pos: Option<PosPolicy>,
    auto_pos_order: Option<Vec<LabelPos>>,
    label_priority: Option<f64>,
    marker_with_label_only: Option<bool>,
    label_repeat_along_lines: Option<bool>,
    label_repeat_distance: Option<f32>,
    enforce_icon_clearance: Option<bool>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn apply_config_file(parsed: ConfigFile, config: &mut EngineConfig) {
    if let Some(v) = parsed.label_gap {
        config.label_gap = v;
    }
    if let Some(v) = parsed.label_pos {
        config.label_pos = v;
    }
    if let Some(v) = parsed.auto_pos_order {
        config.auto_pos_order = v;
    }
    if let Some(v) = parsed.label_priority {
        config.label_priority = v;
    }
    if let Some(v) = parsed.marker_with_label_only {
        config.marker_with_label_only = v;
    }
    if let Some(v) = parsed.label_repeat_along_lines {
        config.repeat_along_lines = v;
    }
    if let Some(v) = parsed.label_repeat_distance {
        config.repeat_distance = v;
    }
    if let Some(v) = parsed.enforce_icon_clearance {
        config.enforce_icon_clearance = v;
    }
    if let Some(v) = parsed.font_family {
        config.default_style.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.default_style.font_size = v;
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let mut config = EngineConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };
    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(parsed, &mut config);
    Ok(config)
}
