//! Game settings and preferences
//!
//! Persisted in LocalStorage. Missing fields fall back to defaults so old
//! saves keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Occupancy;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Round length in whole seconds
    pub round_duration_secs: u32,
    /// How the hoop tracks balls passing through at the same time
    pub occupancy: Occupancy,

    // === Launch ===
    /// Initial ball speed (m/s)
    pub launch_speed: f32,
    /// Random per-axis aim jitter (0 = perfect aim)
    pub launch_spread: f32,
    /// Minimum time between shots
    pub launch_cooldown_secs: f32,
    /// Balls kept in the world before the oldest is removed
    pub max_balls: usize,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Start in idle/demo mode
    pub idle_on_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_duration_secs: ROUND_DURATION_SECS,
            occupancy: Occupancy::Single,

            launch_speed: LAUNCH_SPEED,
            launch_spread: LAUNCH_SPREAD,
            launch_cooldown_secs: LAUNCH_COOLDOWN_SECS,
            max_balls: MAX_BALLS,

            show_fps: false,
            idle_on_start: false,
        }
    }
}

impl Settings {
    /// Clamp values into playable ranges
    pub fn sanitized(mut self) -> Self {
        let before = self.clone();

        self.round_duration_secs = self.round_duration_secs.clamp(5, 600);
        self.launch_speed = finite_or(self.launch_speed, LAUNCH_SPEED).clamp(1.0, 30.0);
        self.launch_spread = finite_or(self.launch_spread, LAUNCH_SPREAD).clamp(0.0, 0.5);
        self.launch_cooldown_secs =
            finite_or(self.launch_cooldown_secs, LAUNCH_COOLDOWN_SECS).clamp(0.0, 5.0);
        self.max_balls = self.max_balls.clamp(1, 64);

        if self != before {
            log::warn!("Settings out of range, clamped: {:?}", self);
        }
        self
    }

    /// Parse settings JSON, `None` if it is not valid
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hoop_shot_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
