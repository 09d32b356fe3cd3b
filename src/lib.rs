//! Tank Battle - a top-down arena combat simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (movement, AI, waves, collisions, combat)
//! - `highscores`: Best score / best wave persistence
//! - `settings`: Player preferences
//! - `audio`: Sound cue table for the audio collaborator

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{FileStore, MemoryStore, ScoreStore};
pub use settings::{QualityPreset, Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Largest elapsed time a single step may integrate (seconds).
    /// Larger steps let fast bullets tunnel through walls and tanks.
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Border wall inset and thickness
    pub const WALL_MARGIN: f32 = 24.0;
    pub const WALL_THICKNESS: f32 = 12.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_SPEED: f32 = 220.0;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.25;
    pub const PLAYER_BULLET_SPEED: f32 = 520.0;
    /// Bullet spawn distance beyond the player's hull
    pub const PLAYER_MUZZLE_OFFSET: f32 = 8.0;
    pub const MAX_LIVES: u8 = 3;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 16.0;
    pub const ENEMY_MUZZLE_OFFSET: f32 = 6.0;
    pub const ENEMY_FIRE_COOLDOWN: f32 = 1.2;
    pub const ENEMY_BULLET_SPEED: f32 = 440.0;
    /// Lower bound of a freshly spawned enemy's fire cooldown
    pub const ENEMY_MIN_INITIAL_COOLDOWN: f32 = 0.2;

    /// Wave timing (seconds)
    pub const SPAWN_INTERVAL_BASE: f64 = 6.0;
    pub const SPAWN_INTERVAL_MIN: f64 = 2.0;
    pub const SPAWN_INTERVAL_DECAY: f64 = 0.35;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const BULLET_LIFETIME: f64 = 2.2;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const POWERUP_LIFETIME: f64 = 12.0;
    pub const POWERUP_PULSE_RATE: f32 = 6.0;
    pub const RAPID_DURATION: f64 = 6.0;
    /// Fire cooldown multiplier while the rapid buff is active
    pub const RAPID_COOLDOWN_FACTOR: f32 = 0.4;

    /// Line-of-sight sampling interval (arena units)
    pub const LOS_SAMPLE_STEP: f32 = 8.0;

    /// Particles per explosion burst
    pub const EXPLOSION_PARTICLES: usize = 18;
}

/// Clamp a raw frame delta to the range a single step may integrate
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, consts::MAX_FRAME_DT)
}
