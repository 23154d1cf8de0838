//! Point accrual and family chain bonuses
//!
//! A family is every asteroid sharing a `root_id`. The chain clock for a
//! family starts at its first kill; clearing the whole family within
//! `chain_time_limit` of that awards the chain bonus.

use std::collections::HashMap;

use super::asteroid::{Asteroid, AsteroidSize};
use crate::settings::Settings;

/// What a single destruction meant for scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyOutcome {
    /// Base points awarded for the asteroid itself
    pub points: u64,
    /// No live asteroid shares the destroyed one's root anymore
    pub family_cleared: bool,
    /// The family root was Large (eligible for a shield charge)
    pub from_big: bool,
    pub got_chain_bonus: bool,
}

impl DestroyOutcome {
    /// Family-clear of a Large-origin family grants a shield charge
    pub fn grants_shield(&self) -> bool {
        self.family_cleared && self.from_big
    }
}

/// Round score and open chain timers
#[derive(Debug, Clone, Default)]
pub struct ScoreManager {
    score: u64,
    chain_started_at: HashMap<u32, f32>,
}

impl ScoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Families with a running chain clock
    pub fn open_chains(&self) -> usize {
        self.chain_started_at.len()
    }

    /// Simulation time the family's first kill happened, if its chain is open
    pub fn chain_started_at(&self, root_id: u32) -> Option<f32> {
        self.chain_started_at.get(&root_id).copied()
    }

    pub fn points_for_radius(&self, radius: f32, settings: &Settings) -> u64 {
        match AsteroidSize::from_radius(radius, settings.asteroid_min_radius) {
            AsteroidSize::Large => settings.points_large,
            AsteroidSize::Medium => settings.points_medium,
            AsteroidSize::Small => settings.points_small,
        }
    }

    /// Account for a destroyed asteroid.
    ///
    /// `live` must already exclude `asteroid` and include any fragments it
    /// produced.
    pub fn asteroid_destroyed(
        &mut self,
        asteroid: &Asteroid,
        live: &[Asteroid],
        now: f32,
        settings: &Settings,
    ) -> DestroyOutcome {
        let root = asteroid.root_id();
        let started = *self.chain_started_at.entry(root).or_insert(now);

        let points = self.points_for_radius(asteroid.radius(), settings);
        self.score += points;

        let family_cleared = !live.iter().any(|a| a.root_id() == root);

        let mut got_chain_bonus = false;
        if family_cleared {
            if now - started <= settings.chain_time_limit {
                self.score += settings.chain_bonus;
                got_chain_bonus = true;
            }
            self.chain_started_at.remove(&root);
        }

        DestroyOutcome {
            points,
            family_cleared,
            from_big: asteroid.root_radius() >= settings.large_radius(),
            got_chain_bonus,
        }
    }
}
