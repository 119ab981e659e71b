//! Game settings and preferences
//!
//! Persisted as JSON in the same key-value store as the best score.

use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::persistence::KeyValueStore;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Arc steps per rounded corner
    pub fn corner_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 4,
            QualityPreset::High => 8,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Road ===
    /// Number of lanes (clamped to 2..=5 when a run starts)
    pub lane_count: u32,

    // === Canvas ===
    /// Upper bound on device pixel ratio
    pub max_pixel_ratio: f32,
    /// Largest logical canvas size
    pub max_canvas_width: f32,
    pub max_canvas_height: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Draw the car without lean
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            lane_count: LANE_COUNT,

            max_pixel_ratio: 2.0,
            max_canvas_width: 900.0,
            max_canvas_height: 700.0,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "arcade_driving_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Lane count actually used for a run
    pub fn effective_lane_count(&self) -> u32 {
        self.lane_count.clamp(2, 5)
    }

    /// Lean applied when drawing the car (respects reduced_motion)
    pub fn lean_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings; falls back to defaults on any problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Settings unreadable ({}), using defaults", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert!(QualityPreset::High.corner_segments() > QualityPreset::Low.corner_segments());
    }

    #[test]
    fn test_lane_count_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_lane_count(), 3);
        settings.lane_count = 0;
        assert_eq!(settings.effective_lane_count(), 2);
        settings.lane_count = 12;
        assert_eq!(settings.effective_lane_count(), 5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"quality":"High","show_fps":true}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.show_fps);
        assert_eq!(settings.lane_count, LANE_COUNT);
        assert_eq!(settings.max_canvas_width, 900.0);
    }

    #[test]
    fn test_corrupt_json_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.reduced_motion = true;
        settings.save(&mut store);
        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert!(!loaded.lean_enabled());
    }
}
