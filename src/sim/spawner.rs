//! Off-screen asteroid waves and timed power-up drops

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::asteroid::Asteroid;
use super::state::{IdAllocator, PowerUp, PowerUpKind};
use crate::rotate_deg;
use crate::settings::{PlayField, Settings};

/// Screen edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Unit normal pointing into the play-field (+Y is down)
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Point at fraction `t` along this edge, `offset` beyond it
    pub fn spawn_point(self, t: f32, offset: f32, field: PlayField) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(-offset, t * field.height),
            Edge::Right => Vec2::new(field.width + offset, t * field.height),
            Edge::Top => Vec2::new(t * field.width, -offset),
            Edge::Bottom => Vec2::new(t * field.width, field.height + offset),
        }
    }

    /// Push the coordinate across this edge back out to `offset`
    fn snap(self, pos: &mut Vec2, offset: f32, field: PlayField) {
        match self {
            Edge::Left => pos.x = -offset,
            Edge::Right => pos.x = field.width + offset,
            Edge::Top => pos.y = -offset,
            Edge::Bottom => pos.y = field.height + offset,
        }
    }
}

/// Strictly outside the play-field by more than `radius` on some axis
pub fn is_offscreen(pos: Vec2, radius: f32, field: PlayField) -> bool {
    pos.x < -radius || pos.x > field.width + radius || pos.y < -radius || pos.y > field.height + radius
}

/// Emits root asteroids from beyond the screen edges at a fixed rate
#[derive(Debug, Clone, Default)]
pub struct AsteroidSpawner {
    timer: f32,
}

impl AsteroidSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Accumulate `dt` and spawn one asteroid per elapsed interval
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        ids: &mut IdAllocator,
        rng: &mut R,
        settings: &Settings,
    ) -> Vec<Asteroid> {
        let mut spawned = Vec::new();
        if settings.spawn_rate <= 0.0 {
            return spawned;
        }

        self.timer += dt;
        while self.timer > settings.spawn_rate {
            self.timer -= settings.spawn_rate;
            spawned.push(Self::spawn_one(ids, rng, settings));
        }
        spawned
    }

    /// A single root asteroid heading roughly inward from a random edge
    pub fn spawn_one<R: Rng>(ids: &mut IdAllocator, rng: &mut R, settings: &Settings) -> Asteroid {
        let field = settings.field();
        let radii = settings.spawn_radii();
        let radius = radii[rng.random_range(0..radii.len())];
        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];

        let speed = rng.random_range(settings.spawn_speed_min..=settings.spawn_speed_max);
        let jitter = settings.spawn_angle_jitter.abs();
        let direction = rotate_deg(edge.inward(), rng.random_range(-jitter..=jitter));

        let offset = radius + settings.spawn_margin.max(1.0);
        let t = rng.random_range(0.0..=1.0);
        let mut pos = edge.spawn_point(t, offset, field);
        if !is_offscreen(pos, radius, field) {
            edge.snap(&mut pos, offset, field);
        }

        Asteroid::spawn_root(ids, rng, settings, pos, direction * speed, radius)
    }
}

/// Drops one power-up near the player when none is live
#[derive(Debug, Clone)]
pub struct PowerUpSpawner {
    timer: f32,
}

impl PowerUpSpawner {
    pub fn new<R: Rng>(rng: &mut R, settings: &Settings) -> Self {
        Self {
            timer: next_interval(rng, settings),
        }
    }

    /// Seconds until the next drop (only counts down while the field is clear)
    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        live_powerups: usize,
        player_pos: Vec2,
        ids: &mut IdAllocator,
        rng: &mut R,
        settings: &Settings,
    ) -> Option<PowerUp> {
        if live_powerups > 0 {
            return None;
        }

        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }

        let kind = *PowerUpKind::ALL.choose(rng)?;
        let pos = position_near(player_pos, rng, settings);
        self.timer = next_interval(rng, settings);

        log::debug!("power-up {kind:?} dropped at ({:.0}, {:.0})", pos.x, pos.y);
        Some(PowerUp::new(ids.next_id(), pos, kind, settings))
    }
}

fn next_interval<R: Rng>(rng: &mut R, settings: &Settings) -> f32 {
    let (lo, hi) = (
        settings.powerup_spawn_interval_min,
        settings.powerup_spawn_interval_max,
    );
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

/// Uniform around `center` within the jitter box, kept fully on-screen
fn position_near<R: Rng>(center: Vec2, rng: &mut R, settings: &Settings) -> Vec2 {
    let field = settings.field();
    let r = settings.powerup_radius;
    let jitter = settings.powerup_radius * settings.powerup_spawn_jitter_radii;

    let mut axis = |c: f32, extent: f32| {
        let (lo, hi) = ((c - jitter).max(r), (c + jitter).min(extent - r));
        if lo < hi {
            rng.random_range(lo..=hi)
        } else {
            // Player wrapped out of range, or the field is tiny
            c.clamp(r.min(extent - r), r.max(extent - r))
        }
    };

    let x = axis(center.x, field.width);
    let y = axis(center.y, field.height);
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_interval_accumulates() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = AsteroidSpawner::new();

        assert!(spawner.update(1.0, &mut ids, &mut rng, &settings).is_empty());
        assert_eq!(spawner.update(1.0, &mut ids, &mut rng, &settings).len(), 1);
        assert!((spawner.timer() - 0.5).abs() < 1e-5);

        // A long stall spawns several at once
        assert_eq!(spawner.update(3.1, &mut ids, &mut rng, &settings).len(), 2);
    }

    #[test]
    fn test_spawned_asteroids_start_offscreen_moving_inward() {
        let settings = Settings::default();
        let field = settings.field();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(99);

        for _ in 0..200 {
            let rock = AsteroidSpawner::spawn_one(&mut ids, &mut rng, &settings);
            assert!(is_offscreen(rock.body.pos, rock.radius(), field));
            assert!(!rock.body.entered_screen);
            assert!(rock.is_root());
            assert!(settings.spawn_radii().contains(&rock.radius()));

            let speed = rock.body.vel.length();
            assert!(speed >= settings.spawn_speed_min - 1e-3);
            assert!(speed <= settings.spawn_speed_max + 1e-3);

            // Heading toward the field center half-plane
            let to_center = field.center() - rock.body.pos;
            assert!(rock.body.vel.dot(to_center) > 0.0);
        }
    }

    #[test]
    fn test_zero_margin_still_spawns_offscreen() {
        let mut settings = Settings::default();
        settings.spawn_margin = 0.0;
        let field = settings.field();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(4);

        for _ in 0..100 {
            let rock = AsteroidSpawner::spawn_one(&mut ids, &mut rng, &settings);
            assert!(is_offscreen(rock.body.pos, rock.radius(), field));
        }
    }

    #[test]
    fn test_edge_snap() {
        let field = PlayField::new(100.0, 50.0);
        let mut pos = Vec2::new(10.0, 10.0);
        Edge::Bottom.snap(&mut pos, 7.0, field);
        assert_eq!(pos, Vec2::new(10.0, 57.0));
        Edge::Left.snap(&mut pos, 7.0, field);
        assert_eq!(pos, Vec2::new(-7.0, 57.0));
    }

    #[test]
    fn test_powerup_waits_for_clear_field() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut spawner = PowerUpSpawner::new(&mut rng, &settings);
        let start = spawner.timer();
        assert!(start >= settings.powerup_spawn_interval_min);
        assert!(start <= settings.powerup_spawn_interval_max);

        let center = settings.field().center();
        let dropped = spawner.update(100.0, 1, center, &mut ids, &mut rng, &settings);
        assert!(dropped.is_none());
        assert_eq!(spawner.timer(), start);

        let dropped = spawner.update(start, 0, center, &mut ids, &mut rng, &settings);
        let powerup = dropped.expect("timer elapsed with a clear field");
        assert!(powerup.body.entered_screen);
        assert_eq!(powerup.ttl, settings.powerup_ttl);
        assert!(spawner.timer() >= settings.powerup_spawn_interval_min);
    }

    #[test]
    fn test_powerup_position_near_player_and_on_screen() {
        let settings = Settings::default();
        let field = settings.field();
        let r = settings.powerup_radius;
        let jitter = r * settings.powerup_spawn_jitter_radii;
        let mut rng = Pcg32::seed_from_u64(8);

        let player = Vec2::new(5.0, field.height - 2.0);
        for _ in 0..100 {
            let pos = position_near(player, &mut rng, &settings);
            assert!(pos.x >= r && pos.x <= field.width - r);
            assert!(pos.y >= r && pos.y <= field.height - r);
            assert!((pos - player).abs().max_element() <= jitter + r);
        }

        // Player far off-screen during a wrap: still lands on-screen
        let pos = position_near(Vec2::new(-500.0, 360.0), &mut rng, &settings);
        assert_eq!(pos.x, r);
    }
}
