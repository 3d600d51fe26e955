//! Skyflap - a side-scrolling flap-through-the-pipes game on a small actor/scene core
//!
//! Core modules:
//! - `scene`: Actors, the scene that owns them, coordinate mapping, presentation sink
//! - `sim`: Collision queries, the dual-loop scheduler and the game rules
//! - `resources`: Image metadata catalog and sound voice pools
//! - `settings`: Data-driven tuning loaded from JSON
//! - `vecops`: Fixed-size vector helpers

pub mod error;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod vecops;

pub use error::{ConfigError, ResourceError, SceneError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical units per sprite pixel
    pub const PIX_SCALE: f32 = 0.01;
    /// Logical scene width (288 px background at `PIX_SCALE`)
    pub const SCENE_WIDTH: f32 = 2.88;

    /// Bird physics
    pub const GRAVITY: f32 = 9.8;
    pub const FLAP_VELOCITY: f32 = 4.0;
    /// Nose tilt limit in degrees
    pub const BIRD_MAX_TILT: f32 = 40.0;
    /// Seconds per flap animation frame
    pub const BIRD_ANIM_FRAME_SECS: f32 = 0.1;

    /// Exponential slowdown of scrolling once the run is over
    pub const GAME_OVER_DECAY: f32 = 0.8;

    /// Pipes spawn at and despawn past this fraction of the width from centre
    pub const PIPE_SPAWN_X_FACTOR: f32 = 0.6;
    pub const PIPE_DESPAWN_X_FACTOR: f32 = 0.6;

    /// Bird box is shrunk before testing against pipes
    pub const COLLISION_BOX_SCALE: f32 = 0.8;
    /// Downward score ray
    pub const SCORE_RAY_STEP: f32 = 0.5;
    pub const SCORE_RAY_STEPS: u32 = 3;

    /// Fixed-interval gameplay sweep (10 Hz)
    pub const SWEEP_HZ: f64 = 10.0;
    /// Maximum overdue sweeps run in one pump
    pub const MAX_SWEEP_CATCHUP: u32 = 4;
    /// Delay before resuming once the host is visible again
    pub const RESUME_SETTLE_SECS: f64 = 0.5;

    /// Simulated display refresh for the headless runner
    pub const FRAME_DT: f64 = 1.0 / 60.0;
}
