//! HUD configuration.
//!
//! Everything has a default matching the reference 1024x768 layout, so a
//! config file only needs the fields it wants to change.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::signal_aspect::DisplayMode;

/// Widest graph that fits a 1024 pixel display after both margins.
pub const DEFAULT_GRAPH_CAPACITY: usize = 1024 - 10 - 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Samples (and pixels) across each graph.
    pub graph_capacity: usize,
    /// Right and bottom margin of the graph stack.
    pub graph_margin: Vec2,
    /// Vertical gap between stacked graphs; also the label line height.
    pub label_spacing: f32,
    pub monitor: MonitorConfig,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            graph_capacity: DEFAULT_GRAPH_CAPACITY,
            graph_margin: Vec2::new(40.0, 10.0),
            label_spacing: 18.0,
            monitor: MonitorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Monitor width in pixels. Element offsets are scaled from a 150 wide design.
    pub width: i32,
    pub height: i32,
    /// Distance represented by the full band, in metres.
    pub max_distance_m: f32,
    pub metric: bool,
    pub display_mode: DisplayMode,
    /// Suppresses switch and reversal distance labels.
    pub timetable_mode: bool,
    /// Replaces "no limit" speed posts (above 998 m/s) when set.
    pub route_speed_limit_mps: Option<f32>,
    pub marker_count_auto: u32,
    pub marker_count_manual: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 256,
            max_distance_m: 5000.0,
            metric: true,
            display_mode: DisplayMode::All,
            timetable_mode: false,
            route_speed_limit_mps: None,
            marker_count_auto: 4,
            marker_count_manual: 3,
        }
    }
}

impl HudConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded HUD config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
