//! Hoop Shot - A browser arcade basketball shootout
//!
//! Core modules:
//! - `sim`: Deterministic round logic (clock, score, scoring trigger, tick)
//! - `scene`: Declarative court geometry handed to the host renderer/physics
//! - `settings`: Player preferences persisted in LocalStorage

pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::Scene;
pub use settings::Settings;
pub use sim::Occupancy;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default round length in whole seconds
    pub const ROUND_DURATION_SECS: u32 = 30;
    /// Extra time after the countdown hits zero before the round is over,
    /// so balls already in the air can still drop
    pub const GAME_OVER_GRACE_SECS: f64 = 1.0;

    /// Entering the trigger arms it only while falling (vy < this)
    pub const ARM_VELOCITY_MAX: f32 = 0.0;
    /// Leaving an armed trigger scores unless rebounding (vy < this)
    pub const SCORE_EXIT_VELOCITY_MAX: f32 = 1.0;

    /// World gravity (m/s², applied along -Y)
    pub const GRAVITY: f32 = 9.81;

    /// Ball defaults (regulation-ish size 7)
    pub const BALL_RADIUS: f32 = 0.12;
    pub const BALL_MASS: f32 = 0.6;
    pub const BALL_RESTITUTION: f32 = 0.7;

    /// Launch defaults
    pub const LAUNCH_SPEED: f32 = 10.0;
    /// Max per-axis jitter added to the unit aim direction
    pub const LAUNCH_SPREAD: f32 = 0.03;
    pub const LAUNCH_COOLDOWN_SECS: f32 = 0.3;
    /// Oldest balls are removed past this count
    pub const MAX_BALLS: usize = 12;
}
