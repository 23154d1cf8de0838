//! The player's ship: steering, shooting, shields and power-up timers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::Shot;
use super::tick::TickInput;
use crate::settings::Settings;
use crate::{forward, normalize_degrees};

/// A bomb picked up and waiting for its fuse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingBomb {
    /// Seconds until detonation
    pub timer: f32,
    /// Blast center (where the bomb was picked up)
    pub pos: Vec2,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Heading in degrees, 0° = +Y
    pub rotation: f32,
    pub shoot_timer: f32,
    pub shield_charges: u8,
    /// Invulnerability left after a shield absorbed a hit
    pub shield_iframes: f32,
    pub weapon_boost: f32,
    pub control_boost: f32,
    pub overcharge: f32,
    pub pending_bombs: Vec<PendingBomb>,
}

impl Player {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        Self {
            body: Body::on_screen(pos, Vec2::ZERO, settings.player_radius),
            rotation: 0.0,
            shoot_timer: 0.0,
            shield_charges: 0,
            shield_iframes: 0.0,
            weapon_boost: 0.0,
            control_boost: 0.0,
            overcharge: 0.0,
            pending_bombs: Vec::new(),
        }
    }

    // === Shields ===

    pub fn has_shield(&self) -> bool {
        self.shield_charges > 0
    }

    /// Add charges, capped at the configured maximum
    pub fn add_shield(&mut self, n: u8, settings: &Settings) {
        self.shield_charges = self
            .shield_charges
            .saturating_add(n)
            .min(settings.max_shield_charges);
    }

    pub fn consume_shield(&mut self) -> bool {
        if self.shield_charges > 0 {
            self.shield_charges -= 1;
            true
        } else {
            false
        }
    }

    /// Shield ready to absorb a hit (charged and out of cooldown)
    pub fn shield_ready(&self) -> bool {
        self.has_shield() && self.shield_iframes <= 0.0
    }

    pub fn shield_radius(&self, settings: &Settings) -> f32 {
        self.body.radius() + settings.shield_radius_offset
    }

    pub fn overcharge_radius(&self, settings: &Settings) -> f32 {
        self.shield_radius(settings) * settings.overcharge_radius_mult
    }

    // === Power-ups ===

    pub fn is_weapon_boosted(&self) -> bool {
        self.weapon_boost > 0.0
    }

    pub fn activate_weapon_boost(&mut self, settings: &Settings) {
        self.weapon_boost = settings.weapon_duration;
    }

    pub fn is_control_boosted(&self) -> bool {
        self.control_boost > 0.0
    }

    pub fn activate_control_boost(&mut self, settings: &Settings) {
        self.control_boost = settings.control_duration;
    }

    pub fn is_overcharged(&self) -> bool {
        self.overcharge > 0.0
    }

    pub fn activate_overcharge(&mut self, settings: &Settings) {
        self.overcharge = settings.overcharge_duration;
    }

    /// Slow down after smashing an asteroid while overcharged
    pub fn overcharge_hit_slow(&mut self, settings: &Settings) {
        self.body.vel *= settings.overcharge_slow;
    }

    /// Arm a bomb at the current position
    pub fn arm_bomb(&mut self, settings: &Settings) {
        self.pending_bombs.push(PendingBomb {
            timer: settings.bomb_fuse,
            pos: self.body.pos,
        });
    }

    // === Movement ===

    /// Ship nose, where shots leave from
    pub fn nose(&self) -> Vec2 {
        self.body.pos + forward(self.rotation) * self.body.radius()
    }

    fn tick_timers(&mut self, dt: f32) {
        for timer in [
            &mut self.shoot_timer,
            &mut self.shield_iframes,
            &mut self.weapon_boost,
            &mut self.control_boost,
            &mut self.overcharge,
        ] {
            if *timer > 0.0 {
                *timer -= dt;
            }
        }
    }

    /// Advance one tick from the sampled input; returns any shots fired
    pub fn update(&mut self, dt: f32, input: &TickInput, settings: &Settings) -> Vec<Shot> {
        self.tick_timers(dt);

        if input.rotate_left {
            self.rotation -= settings.turn_speed * dt;
        }
        if input.rotate_right {
            self.rotation += settings.turn_speed * dt;
        }
        self.rotation = normalize_degrees(self.rotation);

        let heading = forward(self.rotation);
        let mut thrust = Vec2::ZERO;
        if input.thrust {
            thrust += heading * settings.player_speed;
        }
        if input.reverse {
            // Lighter reverse
            thrust -= heading * (0.5 * settings.player_speed);
        }

        if self.is_control_boosted() {
            // Driftless: velocity snaps to input
            self.body.vel = thrust.normalize_or_zero() * settings.player_speed;
        } else {
            self.body.vel += thrust * dt;
        }

        self.body.integrate(dt);
        self.body.wrap_position(settings.field());

        if input.fire {
            self.shoot(settings)
        } else {
            Vec::new()
        }
    }

    /// Fire if off cooldown. Weapon boost fires a three-way spread faster.
    pub fn shoot(&mut self, settings: &Settings) -> Vec<Shot> {
        if self.shoot_timer > 0.0 {
            return Vec::new();
        }

        let spread = [0.0, -settings.spread_angle, settings.spread_angle];
        let (cooldown, angles) = if self.is_weapon_boosted() {
            (settings.weapon_cooldown, &spread[..])
        } else {
            (settings.shoot_cooldown, &spread[..1])
        };

        let nose = self.nose();
        let shots = angles
            .iter()
            .map(|angle| {
                Shot::new(
                    nose,
                    forward(self.rotation + angle) * settings.shoot_speed,
                    settings,
                )
            })
            .collect();

        self.shoot_timer = cooldown;
        shots
    }
}
