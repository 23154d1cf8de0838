//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only, owned by `GameState`
//! - Entity ids from a per-state allocator
//! - Collision phases iterate id snapshots in insertion order
//! - No rendering or platform dependencies

pub mod asteroid;
pub mod body;
pub mod collision;
pub mod player;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidSize};
pub use body::Body;
pub use collision::{circles_overlap, segment_hits_circle};
pub use player::{PendingBomb, Player};
pub use score::{DestroyOutcome, ScoreManager};
pub use spawner::{AsteroidSpawner, Edge, PowerUpSpawner};
pub use state::{GameEvent, GamePhase, GameState, IdAllocator, PowerUp, PowerUpKind, Shot};
pub use tick::{TickInput, tick};
