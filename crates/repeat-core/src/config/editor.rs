//! Editor tuning knobs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::keybindings::EditorKeybindings;
use crate::markers::DEFAULT_MARKER_LIMIT;
use crate::peaks::DEFAULT_MAX_LEVELS;
use crate::playhead::{DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
use crate::renamer::DEFAULT_NAME_MAX_LEN;
use crate::ruler::DEFAULT_MIN_TICK_SPACING_PX;
use crate::viewport::{DEFAULT_PAN_RATE, DEFAULT_ZOOM_RATE};

/// Editor configuration
///
/// Every field has a default, so a partial YAML file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Peak cache halvings below the full-track zoom
    pub max_levels: u32,
    /// Zoom speed per unit of vertical scroll
    pub zoom_rate: f32,
    /// Pan speed per unit of horizontal scroll
    pub pan_rate: f32,
    /// Maximum number of markers
    pub marker_limit: usize,
    /// Maximum marker name length (chars)
    pub marker_name_max_len: usize,
    /// Arrow-key nudge, in multiples of one pixel's samples
    pub nudge_multiplier: i64,
    /// Playhead redraw interval at full zoom-out (ms)
    pub playhead_refresh_ms: u64,
    /// Playhead redraw interval floor (ms)
    pub playhead_min_refresh_ms: u64,
    /// Playback volume, 0.0 to 1.0
    pub volume: f32,
    /// Minimum distance between ruler labels (px)
    pub min_tick_spacing_px: f32,
    /// How long to wait for the output to start after play (ms)
    pub ready_timeout_ms: u64,
    pub keybindings: EditorKeybindings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_levels: DEFAULT_MAX_LEVELS,
            zoom_rate: DEFAULT_ZOOM_RATE,
            pan_rate: DEFAULT_PAN_RATE,
            marker_limit: DEFAULT_MARKER_LIMIT,
            marker_name_max_len: DEFAULT_NAME_MAX_LEN,
            nudge_multiplier: 4,
            playhead_refresh_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
            playhead_min_refresh_ms: MIN_REFRESH_INTERVAL.as_millis() as u64,
            volume: 1.0,
            min_tick_spacing_px: DEFAULT_MIN_TICK_SPACING_PX,
            ready_timeout_ms: 2000,
            keybindings: EditorKeybindings::default(),
        }
    }
}

impl EditorConfig {
    pub fn playhead_refresh(&self) -> Duration {
        Duration::from_millis(self.playhead_refresh_ms)
    }

    pub fn playhead_min_refresh(&self) -> Duration {
        Duration::from_millis(self.playhead_min_refresh_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_levels, 5);
        assert_eq!(config.marker_limit, 100);
        assert_eq!(config.marker_name_max_len, 30);
        assert_eq!(config.playhead_refresh(), Duration::from_millis(50));
        assert_eq!(config.playhead_min_refresh(), Duration::from_millis(20));
    }
}
