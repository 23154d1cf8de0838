//! Game balance settings
//!
//! Every tunable the simulation reads lives here. Defaults come from
//! `crate::consts`; a JSON file may override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside the range the simulation can work with
    #[error("invalid setting `{name}` = {value}: {reason}")]
    Invalid {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Play-field extents, copied out of `Settings` for the hot path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center point of the field
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play-field ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Delta-time clamp per tick (seconds)
    pub max_dt: f32,

    // === Asteroids ===
    /// Size unit: Small = 1u, Medium = 2u, Large = 3u
    pub asteroid_min_radius: f32,
    pub spawn_margin: f32,
    /// Seconds between off-screen spawns
    pub spawn_rate: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,
    /// Degrees of random deviation from the inward direction
    pub spawn_angle_jitter: f32,
    pub split_angle_min: f32,
    pub split_angle_max: f32,
    pub split_speed_mult: f32,
    pub split_fallback_speed: f32,
    pub max_spin: f32,

    // === Scoring ===
    pub points_large: u64,
    pub points_medium: u64,
    pub points_small: u64,
    pub chain_bonus: u64,
    /// Seconds allowed between a family's first and last kill
    pub chain_time_limit: f32,

    // === Player ===
    pub player_radius: f32,
    pub turn_speed: f32,
    pub player_speed: f32,
    pub shoot_speed: f32,
    pub shoot_cooldown: f32,
    pub shot_radius: f32,
    pub shot_lifetime: f32,
    pub despawn_margin: f32,

    // === Shields ===
    pub shield_radius_offset: f32,
    pub max_shield_charges: u8,
    pub shield_iframes: f32,

    // === Power-ups ===
    pub powerup_radius: f32,
    pub powerup_ttl: f32,
    pub powerup_spawn_interval_min: f32,
    pub powerup_spawn_interval_max: f32,
    pub powerup_spawn_jitter_radii: f32,
    pub bomb_radius: f32,
    pub bomb_fuse: f32,
    pub weapon_duration: f32,
    pub weapon_cooldown: f32,
    pub spread_angle: f32,
    pub control_duration: f32,
    pub overcharge_duration: f32,
    pub overcharge_slow: f32,
    pub overcharge_radius_mult: f32,

    // === Leaderboard ===
    pub max_name_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            max_dt: MAX_DT,

            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            spawn_margin: ASTEROID_SPAWN_MARGIN,
            spawn_rate: ASTEROID_SPAWN_RATE,
            spawn_speed_min: ASTEROID_SPAWN_SPEED_MIN,
            spawn_speed_max: ASTEROID_SPAWN_SPEED_MAX,
            spawn_angle_jitter: ASTEROID_SPAWN_ANGLE_JITTER,
            split_angle_min: ASTEROID_SPLIT_ANGLE_MIN,
            split_angle_max: ASTEROID_SPLIT_ANGLE_MAX,
            split_speed_mult: ASTEROID_SPLIT_SPEED_MULT,
            split_fallback_speed: ASTEROID_SPLIT_FALLBACK_SPEED,
            max_spin: ASTEROID_MAX_SPIN,

            points_large: POINTS_LARGE,
            points_medium: POINTS_MEDIUM,
            points_small: POINTS_SMALL,
            chain_bonus: CHAIN_BONUS,
            chain_time_limit: CHAIN_TIME_LIMIT,

            player_radius: PLAYER_RADIUS,
            turn_speed: PLAYER_TURN_SPEED,
            player_speed: PLAYER_SPEED,
            shoot_speed: PLAYER_SHOOT_SPEED,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            shot_radius: SHOT_RADIUS,
            shot_lifetime: SHOT_LIFETIME,
            despawn_margin: DESPAWN_MARGIN,

            shield_radius_offset: SHIELD_RADIUS_OFFSET,
            max_shield_charges: MAX_SHIELD_CHARGES,
            shield_iframes: SHIELD_IFRAMES,

            powerup_radius: POWERUP_RADIUS,
            powerup_ttl: POWERUP_DESPAWN_TIME,
            powerup_spawn_interval_min: POWERUP_SPAWN_INTERVAL_MIN,
            powerup_spawn_interval_max: POWERUP_SPAWN_INTERVAL_MAX,
            powerup_spawn_jitter_radii: POWERUP_SPAWN_JITTER_RADII,
            bomb_radius: POWERUP_BOMB_RADIUS,
            bomb_fuse: POWERUP_BOMB_FUSE,
            weapon_duration: POWERUP_WEAPON_DURATION,
            weapon_cooldown: POWERUP_WEAPON_COOLDOWN,
            spread_angle: POWERUP_SPREAD_ANGLE,
            control_duration: POWERUP_CONTROL_DURATION,
            overcharge_duration: POWERUP_OVERCHARGE_DURATION,
            overcharge_slow: POWERUP_OVERCHARGE_SLOW,
            overcharge_radius_mult: POWERUP_OVERCHARGE_RADIUS_MULT,

            max_name_len: MAX_NAME_LEN,
        }
    }
}

impl Settings {
    pub fn field(&self) -> PlayField {
        PlayField::new(self.screen_width, self.screen_height)
    }

    #[inline]
    pub fn large_radius(&self) -> f32 {
        self.asteroid_min_radius * 3.0
    }

    #[inline]
    pub fn medium_radius(&self) -> f32 {
        self.asteroid_min_radius * 2.0
    }

    #[inline]
    pub fn small_radius(&self) -> f32 {
        self.asteroid_min_radius
    }

    /// Radii used by the off-screen spawner, largest first
    pub fn spawn_radii(&self) -> [f32; ASTEROID_KINDS as usize] {
        [self.large_radius(), self.medium_radius(), self.small_radius()]
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("max_dt", self.max_dt),
            ("asteroid_min_radius", self.asteroid_min_radius),
            ("spawn_rate", self.spawn_rate),
            ("player_radius", self.player_radius),
            ("shot_radius", self.shot_radius),
            ("powerup_radius", self.powerup_radius),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SettingsError::Invalid {
                    name,
                    value,
                    reason: "must be positive",
                });
            }
        }

        let ranges = [
            ("spawn_speed_max", self.spawn_speed_min, self.spawn_speed_max),
            ("split_angle_max", self.split_angle_min, self.split_angle_max),
            (
                "powerup_spawn_interval_max",
                self.powerup_spawn_interval_min,
                self.powerup_spawn_interval_max,
            ),
        ];
        for (name, min, max) in ranges {
            if max < min {
                return Err(SettingsError::Invalid {
                    name,
                    value: max,
                    reason: "range maximum is below its minimum",
                });
            }
        }

        if self.chain_time_limit < 0.0 {
            return Err(SettingsError::Invalid {
                name: "chain_time_limit",
                value: self.chain_time_limit,
                reason: "must not be negative",
            });
        }

        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`, propagating every failure
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_radii() {
        let settings = Settings::default();
        assert_eq!(settings.large_radius(), 60.0);
        assert_eq!(settings.medium_radius(), 40.0);
        assert_eq!(settings.small_radius(), 20.0);
        assert_eq!(settings.spawn_radii(), [60.0, 40.0, 20.0]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "chain_time_limit": 4.5 }"#).unwrap();
        assert_eq!(settings.chain_time_limit, 4.5);
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let err = Settings::from_json(r#"{ "split_angle_min": 60.0, "split_angle_max": 10.0 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                name: "split_angle_max",
                ..
            }
        ));
    }

    #[test]
    fn test_load_missing_and_malformed_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(Settings::load(&bad), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            chain_bonus: 80,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).chain_bonus, 80);
    }
}
