//! Asteroids simulation core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (bodies, lineage, spawning, collisions, scoring)
//! - `settings`: Data-driven game balance, loadable from JSON
//! - `highscores`: Persisted name → best score leaderboard
//!
//! Rendering and input are external collaborators: they read `GameState`
//! and feed `TickInput` once per frame.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, LeaderboardError};
pub use settings::{PlayField, Settings, SettingsError};
pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants (defaults for `Settings`)
pub mod consts {
    /// Play-field dimensions in pixels
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Upper bound on a single frame's delta time (no catch-up after stalls)
    pub const MAX_DT: f32 = 0.05;

    /// Asteroid size unit. Small = 1u, Medium = 2u, Large = 3u
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_KINDS: u32 = 3;

    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Degrees per second
    pub const PLAYER_TURN_SPEED: f32 = 300.0;
    /// Thrust acceleration and control-boost cruise speed (px/s)
    pub const PLAYER_SPEED: f32 = 200.0;

    pub const SHOT_RADIUS: f32 = 5.0;
    pub const PLAYER_SHOOT_SPEED: f32 = 500.0;
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;
    pub const SHOT_LIFETIME: f32 = 2.0;
    /// Shots are culled this far beyond the screen edge
    pub const DESPAWN_MARGIN: f32 = 50.0;

    /// Off-screen asteroid spawning
    pub const ASTEROID_SPAWN_MARGIN: f32 = 40.0;
    pub const ASTEROID_SPAWN_RATE: f32 = 1.5;
    pub const ASTEROID_SPAWN_SPEED_MIN: f32 = 40.0;
    pub const ASTEROID_SPAWN_SPEED_MAX: f32 = 120.0;
    pub const ASTEROID_SPAWN_ANGLE_JITTER: f32 = 30.0;

    /// Fragment divergence (degrees) and speed multiplier on split
    pub const ASTEROID_SPLIT_ANGLE_MIN: f32 = 20.0;
    pub const ASTEROID_SPLIT_ANGLE_MAX: f32 = 50.0;
    pub const ASTEROID_SPLIT_SPEED_MULT: f32 = 1.2;
    /// Nudge speed for fragments of an almost stationary asteroid
    pub const ASTEROID_SPLIT_FALLBACK_SPEED: f32 = 5.0;
    /// Cosmetic spin range (degrees per second)
    pub const ASTEROID_MAX_SPIN: f32 = 25.0;

    /// Scoring
    pub const POINTS_LARGE: u64 = 15;
    pub const POINTS_MEDIUM: u64 = 25;
    pub const POINTS_SMALL: u64 = 35;
    pub const CHAIN_BONUS: u64 = 50;
    /// Seconds from a family's first kill to its last for the chain bonus
    pub const CHAIN_TIME_LIMIT: f32 = 10.0;

    /// Shields
    pub const SHIELD_RADIUS_OFFSET: f32 = 12.0;
    pub const MAX_SHIELD_CHARGES: u8 = 3;
    /// Invulnerability window after a shield absorbs a hit (~15 frames at 60 Hz)
    pub const SHIELD_IFRAMES: f32 = 0.25;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 14.0;
    pub const POWERUP_DESPAWN_TIME: f32 = 5.0;
    pub const POWERUP_SPAWN_INTERVAL_MIN: f32 = 20.0;
    pub const POWERUP_SPAWN_INTERVAL_MAX: f32 = 40.0;
    /// Power-ups spawn within this many power-up radii of the player
    pub const POWERUP_SPAWN_JITTER_RADII: f32 = 12.0;
    pub const POWERUP_BOMB_RADIUS: f32 = 350.0;
    pub const POWERUP_BOMB_FUSE: f32 = 0.5;
    pub const POWERUP_WEAPON_DURATION: f32 = 5.0;
    pub const POWERUP_WEAPON_COOLDOWN: f32 = 0.12;
    pub const POWERUP_SPREAD_ANGLE: f32 = 14.0;
    pub const POWERUP_CONTROL_DURATION: f32 = 15.0;
    pub const POWERUP_OVERCHARGE_DURATION: f32 = 10.0;
    /// Velocity multiplier applied per asteroid smashed while overcharged
    pub const POWERUP_OVERCHARGE_SLOW: f32 = 0.66;
    pub const POWERUP_OVERCHARGE_RADIUS_MULT: f32 = 2.0;

    /// Leaderboard
    pub const HIGHSCORES_PATH: &str = "highscores.json";
    pub const MAX_NAME_LEN: usize = 12;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit forward vector for a heading in degrees (0° points along +Y)
#[inline]
pub fn forward(rotation_deg: f32) -> Vec2 {
    rotate_deg(Vec2::Y, rotation_deg)
}

/// Normalize a heading to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}
