//! Asteroids and their fragmentation lineage
//!
//! Every asteroid knows the root of its family (`root_id`, `root_radius`),
//! its direct parent and, below the first split of a Large rock, the branch
//! it belongs to. These are plain ids: lookups of destroyed asteroids simply
//! find nothing.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::IdAllocator;
use crate::rotate_deg;
use crate::settings::Settings;

/// Fragments below this squared speed get a random nudge instead
const STATIONARY_SPEED_SQ: f32 = 1e-6;

/// Quantized asteroid size (Large = 3u, Medium = 2u, Small = 1u)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Nearest multiple of `unit`; three or more steps count as Large
    pub fn from_radius(radius: f32, unit: f32) -> Self {
        let steps = (radius / unit).round();
        if steps >= 3.0 {
            AsteroidSize::Large
        } else if steps >= 2.0 {
            AsteroidSize::Medium
        } else {
            AsteroidSize::Small
        }
    }
}

/// An asteroid entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: Body,
    /// Cosmetic heading and spin (degrees, degrees/s)
    pub rotation: f32,
    pub spin: f32,
    id: u32,
    parent_id: Option<u32>,
    root_id: u32,
    root_radius: f32,
    branch_id: Option<u32>,
}

impl Asteroid {
    /// Create the root of a new family
    pub fn spawn_root<R: Rng>(
        ids: &mut IdAllocator,
        rng: &mut R,
        settings: &Settings,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
    ) -> Self {
        let id = ids.next_id();
        let body = Body::new(pos, vel, radius);
        Self {
            rotation: rng.random_range(0.0..360.0),
            spin: random_spin(rng, settings),
            id,
            parent_id: None,
            root_id: id,
            root_radius: body.radius(),
            branch_id: None,
            body,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn parent_id(&self) -> Option<u32> {
        self.parent_id
    }

    #[inline]
    pub fn root_id(&self) -> u32 {
        self.root_id
    }

    #[inline]
    pub fn root_radius(&self) -> f32 {
        self.root_radius
    }

    #[inline]
    pub fn branch_id(&self) -> Option<u32> {
        self.branch_id
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn size(&self, settings: &Settings) -> AsteroidSize {
        AsteroidSize::from_radius(self.radius(), settings.asteroid_min_radius)
    }

    /// Move, start wrapping once on-screen, spin
    pub fn update(&mut self, dt: f32, settings: &Settings) {
        self.body.advance(dt, settings.field());
        self.rotation = crate::normalize_degrees(self.rotation + self.spin * dt);
    }

    /// Fragments produced by destroying this asteroid.
    ///
    /// The caller removes `self` from the world. Returns no fragments at the
    /// minimum radius, otherwise two diverging fragments one unit smaller.
    pub fn split<R: Rng>(
        &self,
        ids: &mut IdAllocator,
        rng: &mut R,
        settings: &Settings,
    ) -> Vec<Asteroid> {
        let unit = settings.asteroid_min_radius;
        if self.radius() <= unit {
            return Vec::new();
        }

        let mut base_vel = self.body.vel;
        if base_vel.length_squared() < STATIONARY_SPEED_SQ {
            let angle = rng.random_range(0.0..360.0);
            base_vel = rotate_deg(Vec2::X, angle) * settings.split_fallback_speed;
        }

        let angle = rng.random_range(settings.split_angle_min..=settings.split_angle_max);
        let velocities = [
            rotate_deg(base_vel, angle) * settings.split_speed_mult,
            rotate_deg(base_vel, -angle) * settings.split_speed_mult,
        ];

        let new_radius = self.radius() - unit;
        let heads_branches = self.size(settings) == AsteroidSize::Large
            && AsteroidSize::from_radius(new_radius, unit) == AsteroidSize::Medium;

        velocities
            .into_iter()
            .map(|vel| {
                let id = ids.next_id();
                Asteroid {
                    body: Body::new(self.body.pos, vel, new_radius),
                    rotation: rng.random_range(0.0..360.0),
                    spin: random_spin(rng, settings),
                    id,
                    parent_id: Some(self.id),
                    root_id: self.root_id,
                    root_radius: self.root_radius,
                    branch_id: if heads_branches {
                        Some(id)
                    } else {
                        self.branch_id
                    },
                }
            })
            .collect()
    }
}

fn random_spin<R: Rng>(rng: &mut R, settings: &Settings) -> f32 {
    let max = settings.max_spin.abs();
    rng.random_range(-max..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn root(ids: &mut IdAllocator, rng: &mut Pcg32, settings: &Settings, radius: f32) -> Asteroid {
        Asteroid::spawn_root(
            ids,
            rng,
            settings,
            Vec2::new(300.0, 200.0),
            Vec2::new(50.0, 0.0),
            radius,
        )
    }

    #[test]
    fn test_root_lineage() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let rock = root(&mut ids, &mut rng, &settings, settings.large_radius());

        assert!(rock.is_root());
        assert_eq!(rock.root_id(), rock.id());
        assert_eq!(rock.root_radius(), 60.0);
        assert_eq!(rock.branch_id(), None);
        assert!(!rock.body.entered_screen);
    }

    #[test]
    fn test_large_split_heads_two_branches() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let large = root(&mut ids, &mut rng, &settings, settings.large_radius());

        let mediums = large.split(&mut ids, &mut rng, &settings);
        assert_eq!(mediums.len(), 2);
        for medium in &mediums {
            assert_eq!(medium.radius(), 40.0);
            assert_eq!(medium.branch_id(), Some(medium.id()));
            assert_eq!(medium.parent_id(), Some(large.id()));
            assert_eq!(medium.root_id(), large.id());
            assert_eq!(medium.root_radius(), 60.0);
            assert_eq!(medium.body.pos, large.body.pos);
        }
        assert_ne!(mediums[0].branch_id(), mediums[1].branch_id());

        let smalls = mediums[0].split(&mut ids, &mut rng, &settings);
        assert_eq!(smalls.len(), 2);
        for small in &smalls {
            assert_eq!(small.radius(), 20.0);
            assert_eq!(small.branch_id(), mediums[0].branch_id());
            assert_eq!(small.parent_id(), Some(mediums[0].id()));
            assert_eq!(small.root_id(), large.id());
        }

        assert!(smalls[0].split(&mut ids, &mut rng, &settings).is_empty());
    }

    #[test]
    fn test_medium_root_fragments_keep_no_branch() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let medium = root(&mut ids, &mut rng, &settings, settings.medium_radius());

        let smalls = medium.split(&mut ids, &mut rng, &settings);
        assert_eq!(smalls.len(), 2);
        assert!(smalls.iter().all(|s| s.branch_id().is_none()));
        assert!(smalls.iter().all(|s| s.root_radius() == 40.0));
    }

    #[test]
    fn test_fragments_diverge_and_speed_up() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let large = root(&mut ids, &mut rng, &settings, settings.large_radius());
        let parent_speed = large.body.vel.length();

        let frags = large.split(&mut ids, &mut rng, &settings);
        let angle = frags[0].body.vel.angle_to(frags[1].body.vel).abs().to_degrees();
        assert!(angle >= 2.0 * settings.split_angle_min - 0.01);
        assert!(angle <= 2.0 * settings.split_angle_max + 0.01);
        for frag in &frags {
            let expected = parent_speed * settings.split_speed_mult;
            assert!((frag.body.vel.length() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_stationary_split_gets_nudged() {
        let settings = Settings::default();
        let mut ids = IdAllocator::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut large = root(&mut ids, &mut rng, &settings, settings.large_radius());
        large.body.vel = Vec2::ZERO;

        let frags = large.split(&mut ids, &mut rng, &settings);
        let expected = settings.split_fallback_speed * settings.split_speed_mult;
        for frag in &frags {
            assert!((frag.body.vel.length() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_size_quantization() {
        assert_eq!(AsteroidSize::from_radius(60.0, 20.0), AsteroidSize::Large);
        assert_eq!(AsteroidSize::from_radius(80.0, 20.0), AsteroidSize::Large);
        assert_eq!(AsteroidSize::from_radius(41.0, 20.0), AsteroidSize::Medium);
        assert_eq!(AsteroidSize::from_radius(20.0, 20.0), AsteroidSize::Small);
        assert_eq!(AsteroidSize::from_radius(5.0, 20.0), AsteroidSize::Small);
    }

    proptest! {
        #[test]
        fn prop_lineage_invariant_across_generations(seed in any::<u64>(), picks in proptest::collection::vec(0usize..2, 0..4)) {
            let settings = Settings::default();
            let mut ids = IdAllocator::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let large = root(&mut ids, &mut rng, &settings, settings.large_radius());

            let mut current = large.clone();
            let mut generation = 0u32;
            for pick in picks {
                let frags = current.split(&mut ids, &mut rng, &settings);
                if current.radius() <= settings.asteroid_min_radius {
                    prop_assert!(frags.is_empty());
                    break;
                }
                prop_assert_eq!(frags.len(), 2);
                generation += 1;
                for frag in &frags {
                    let expected = settings.large_radius() - generation as f32 * settings.asteroid_min_radius;
                    prop_assert_eq!(frag.radius(), expected);
                    prop_assert_eq!(frag.root_id(), large.id());
                    prop_assert_eq!(frag.root_radius(), large.root_radius());
                    prop_assert_eq!(frag.parent_id(), Some(current.id()));
                }
                current = frags[pick].clone();
            }
        }
    }
}
