//! Gameplay tuning and debug switches
//!
//! Loaded from an optional JSON file; any missing field takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::collision::StepSpacing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Logical scene width; height follows the surface aspect ratio
    pub scene_width: f32,
    /// Logical units per sprite pixel
    pub pix_scale: f32,

    // === Bird ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity applied on flap
    pub flap_velocity: f32,

    // === Scrolling ===
    pub pipe_speed: f32,
    pub bg_speed: f32,
    /// Exponential decay rate of both speeds after game over
    pub decay_rate: f32,

    // === Pipes ===
    /// Horizontal distance between pipe pairs
    pub pipe_h_distance: f32,
    /// Vertical gap inside a pair
    pub pipe_v_distance: f32,
    /// Range of the random vertical gap offset
    pub pipe_rand_y_range: f32,
    pub ground_height: f32,

    // === Loops ===
    pub sweep_hz: f64,
    /// Delay before resuming after the host becomes visible again
    pub resume_settle_secs: f64,
    pub ray_spacing: StepSpacing,

    // === Debug ===
    pub debug_overlay: bool,
    pub debug_actors: bool,

    /// Seed for pipe placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            pix_scale: PIX_SCALE,

            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,

            pipe_speed: 1.0,
            bg_speed: 0.5,
            decay_rate: GAME_OVER_DECAY,

            pipe_h_distance: 1.5,
            pipe_v_distance: 1.5,
            pipe_rand_y_range: 1.5,
            ground_height: 1.0,

            sweep_hz: SWEEP_HZ,
            resume_settle_secs: RESUME_SETTLE_SECS,
            ray_spacing: StepSpacing::Linear,

            debug_overlay: false,
            debug_actors: false,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Read settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Ground line in logical coordinates for a scene of `height`
    pub fn ground_y(&self, height: f32) -> f32 {
        height * -0.5 + self.ground_height
    }
}
