//! Game state and core simulation types
//!
//! `GameState` owns every entity registry. Subsystems borrow what they need
//! for one step and hand new entities back to be inserted here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::body::Body;
use super::player::Player;
use super::score::ScoreManager;
use super::spawner::{AsteroidSpawner, PowerUpSpawner};
use crate::settings::{PlayField, Settings, SettingsError};

/// Monotonic entity ids, one allocator per simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Hull hit; the state is frozen until `reset`
    RoundOver,
}

/// A player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub body: Body,
    pub age: f32,
    /// Position before the last step; start of the swept collision segment
    pub prev_pos: Vec2,
}

impl Shot {
    pub fn new(pos: Vec2, vel: Vec2, settings: &Settings) -> Self {
        Self {
            body: Body::on_screen(pos, vel, settings.shot_radius),
            age: 0.0,
            prev_pos: pos,
        }
    }

    /// Step forward; returns false once the shot should be culled
    pub fn update(&mut self, dt: f32, settings: &Settings) -> bool {
        self.age += dt;
        self.prev_pos = self.body.pos;
        self.body.integrate(dt);

        !self.out_of_bounds(settings.field(), settings.despawn_margin)
            && self.age < settings.shot_lifetime
    }

    fn out_of_bounds(&self, field: PlayField, margin: f32) -> bool {
        let p = self.body.pos;
        p.x < -margin || p.x > field.width + margin || p.y < -margin || p.y > field.height + margin
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Delayed blast that clears nearby asteroids without fragments
    Bomb,
    /// Three-way spread with a faster cooldown
    Weapon,
    /// Driftless steering
    Control,
    /// Enlarged shield that smashes asteroids on contact
    Overcharge,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Bomb,
        PowerUpKind::Weapon,
        PowerUpKind::Control,
        PowerUpKind::Overcharge,
    ];
}

/// A power-up waiting to be picked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub body: Body,
    /// Seconds until it despawns
    pub ttl: f32,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2, kind: PowerUpKind, settings: &Settings) -> Self {
        Self {
            id,
            kind,
            body: Body::on_screen(pos, Vec2::ZERO, settings.powerup_radius),
            ttl: settings.powerup_ttl,
        }
    }

    /// Count down and wrap; returns false once expired
    pub fn update(&mut self, dt: f32, field: PlayField) -> bool {
        self.ttl -= dt;
        self.body.integrate(dt);
        self.body.wrap_position(field);
        self.ttl > 0.0
    }
}

/// Something that happened during a tick, for audio, effects and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidDestroyed { id: u32, root_id: u32, points: u64 },
    FamilyCleared { root_id: u32, from_big: bool },
    ChainBonus { root_id: u32, bonus: u64 },
    ShieldGained { charges: u8 },
    ShieldAbsorbed { charges: u8 },
    PowerUpCollected { kind: PowerUpKind },
    BombDetonated { pos: Vec2, destroyed: usize },
    RoundOver { score: u64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub settings: Settings,
    /// Rounds started this session, 1-based
    pub round: u32,
    pub phase: GamePhase,
    /// Simulation clock (seconds since round start)
    pub time: f32,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub shots: Vec<Shot>,
    pub powerups: Vec<PowerUp>,
    pub score: ScoreManager,
    pub asteroid_spawner: AsteroidSpawner,
    pub powerup_spawner: PowerUpSpawner,
    pub(super) ids: IdAllocator,
    pub(super) rng: Pcg32,
}

impl GameState {
    /// Create a new session with the given seed and settings.
    ///
    /// Settings are validated first; ranges the RNG samples from must not be
    /// inverted.
    pub fn new(seed: u64, settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let powerup_spawner = PowerUpSpawner::new(&mut rng, &settings);
        let player = Player::new(settings.field().center(), &settings);

        log::info!("round 1 started (seed {seed})");
        Ok(Self {
            seed,
            round: 1,
            phase: GamePhase::Playing,
            time: 0.0,
            player,
            asteroids: Vec::new(),
            shots: Vec::new(),
            powerups: Vec::new(),
            score: ScoreManager::new(),
            asteroid_spawner: AsteroidSpawner::new(),
            powerup_spawner,
            ids: IdAllocator::default(),
            rng,
            settings,
        })
    }

    /// Restart in-process: fresh registries and score, same RNG stream
    pub fn reset(&mut self) {
        self.round += 1;
        self.phase = GamePhase::Playing;
        self.time = 0.0;
        self.player = Player::new(self.settings.field().center(), &self.settings);
        self.asteroids.clear();
        self.shots.clear();
        self.powerups.clear();
        self.score = ScoreManager::new();
        self.asteroid_spawner = AsteroidSpawner::new();
        self.powerup_spawner = PowerUpSpawner::new(&mut self.rng, &self.settings);
        self.ids = IdAllocator::default();

        log::info!("round {} started", self.round);
    }

    #[inline]
    pub fn is_round_over(&self) -> bool {
        self.phase == GamePhase::RoundOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Insert a new root asteroid; returns its id
    pub fn spawn_asteroid(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> u32 {
        let asteroid =
            Asteroid::spawn_root(&mut self.ids, &mut self.rng, &self.settings, pos, vel, radius);
        let id = asteroid.id();
        self.asteroids.push(asteroid);
        id
    }

    /// Insert a power-up of `kind` at `pos`; returns its id
    pub fn spawn_powerup(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let id = self.ids.next_id();
        self.powerups.push(PowerUp::new(id, pos, kind, &self.settings));
        id
    }

    /// Live asteroid by id. Destroyed ids resolve to `None`.
    pub fn asteroid(&self, id: u32) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id() == id)
    }

    /// Live members of the family rooted at `root_id`
    pub fn family(&self, root_id: u32) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.iter().filter(move |a| a.root_id() == root_id)
    }

    /// Live members of one branch of a split Large asteroid
    pub fn branch(&self, branch_id: u32) -> impl Iterator<Item = &Asteroid> {
        self.asteroids
            .iter()
            .filter(move |a| a.branch_id() == Some(branch_id))
    }

    pub fn asteroid_ids(&self) -> Vec<u32> {
        self.asteroids.iter().map(|a| a.id()).collect()
    }
}
