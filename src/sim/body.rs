//! Kinematic circle body shared by every moving entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::PlayField;

/// Position, velocity and collision radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    /// Set once the body has been inside the play-field; wrapping starts then
    pub entered_screen: bool,
}

impl Body {
    /// A body that has not yet entered the play-field (off-screen spawns)
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius: radius.max(0.0),
            entered_screen: false,
        }
    }

    /// A body created on-screen that wraps from its first tick
    pub fn on_screen(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            entered_screen: true,
            ..Self::new(pos, vel, radius)
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Explicit Euler step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Whether the center lies within the play-field
    #[inline]
    pub fn is_inside(&self, field: PlayField) -> bool {
        (0.0..=field.width).contains(&self.pos.x) && (0.0..=field.height).contains(&self.pos.y)
    }

    /// Teleport to the opposite edge once fully outside on an axis
    pub fn wrap_position(&mut self, field: PlayField) {
        let r = self.radius;

        if self.pos.x < -r {
            self.pos.x = field.width + r;
        } else if self.pos.x > field.width + r {
            self.pos.x = -r;
        }

        if self.pos.y < -r {
            self.pos.y = field.height + r;
        } else if self.pos.y > field.height + r {
            self.pos.y = -r;
        }
    }

    /// Integrate, note first entry into the field, then wrap if entered
    pub fn advance(&mut self, dt: f32, field: PlayField) {
        self.integrate(dt);
        if !self.entered_screen && self.is_inside(field) {
            self.entered_screen = true;
        }
        if self.entered_screen {
            self.wrap_position(field);
        }
    }

    /// Circle overlap, squared distances only
    #[inline]
    pub fn collides_with(&self, other: &Body) -> bool {
        circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }
}

/// `|a - b|² ≤ (ra + rb)²`
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: PlayField = PlayField {
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn test_negative_radius_clamped() {
        let body = Body::new(Vec2::ZERO, Vec2::ZERO, -3.0);
        assert_eq!(body.radius(), 0.0);
    }

    #[test]
    fn test_integrate() {
        let mut body = Body::new(Vec2::new(1.0, 2.0), Vec2::new(10.0, -4.0), 1.0);
        body.integrate(0.5);
        assert_eq!(body.pos, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_wrap_only_when_fully_outside() {
        let mut body = Body::on_screen(Vec2::new(-4.0, 25.0), Vec2::ZERO, 5.0);
        body.wrap_position(FIELD);
        assert_eq!(body.pos.x, -4.0);

        body.pos.x = -6.0;
        body.wrap_position(FIELD);
        assert_eq!(body.pos.x, 105.0);

        body.pos.y = 56.0;
        body.wrap_position(FIELD);
        assert_eq!(body.pos.y, -5.0);
    }

    #[test]
    fn test_off_screen_spawn_does_not_wrap_before_entry() {
        // Starts beyond the left edge, moving right
        let mut body = Body::new(Vec2::new(-30.0, 25.0), Vec2::new(10.0, 0.0), 5.0);
        body.advance(0.1, FIELD);
        assert!(!body.entered_screen);
        assert!((body.pos.x - -29.0).abs() < 1e-5);

        body.pos.x = -1.0;
        body.advance(0.2, FIELD);
        assert!(body.entered_screen);
        assert!((body.pos.x - 1.0).abs() < 1e-5);

        // Once entered it wraps like everything else
        body.pos.x = 104.0;
        body.advance(0.2, FIELD);
        assert_eq!(body.pos.x, -5.0);
    }

    #[test]
    fn test_collides_with_touching() {
        let a = Body::new(Vec2::ZERO, Vec2::ZERO, 3.0);
        let b = Body::new(Vec2::new(5.0, 0.0), Vec2::ZERO, 2.0);
        let c = Body::new(Vec2::new(5.1, 0.0), Vec2::ZERO, 2.0);
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&c));
    }
}
