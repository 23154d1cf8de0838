//! Per-frame simulation step
//!
//! Movement first, then collisions in a fixed order: power-up pickup, bomb
//! fuses, player against asteroids, shots against asteroids. The contact
//! phases walk one snapshot of asteroid ids taken after movement, so
//! fragments created during the tick wait for the next one.

use super::collision::{circles_overlap, segment_hits_circle};
use super::spawner::is_offscreen;
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind};

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub reverse: bool,
    pub fire: bool,
}

/// How an asteroid leaves the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    /// Shot, shield or overcharge: breaks into fragments
    Split,
    /// Bomb blast: gone without fragments
    Vaporize,
}

/// Advance the game by `dt` seconds (clamped to `max_dt`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::RoundOver {
        return events;
    }

    let dt = if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, state.settings.max_dt)
    };
    state.time += dt;

    // === Movement and spawning ===
    let shots = state.player.update(dt, input, &state.settings);
    state.shots.extend(shots);

    let spawned = state
        .asteroid_spawner
        .update(dt, &mut state.ids, &mut state.rng, &state.settings);
    state.asteroids.extend(spawned);

    for asteroid in &mut state.asteroids {
        asteroid.update(dt, &state.settings);
    }
    cull_strays(state);

    let settings = &state.settings;
    state.shots.retain_mut(|shot| shot.update(dt, settings));
    let field = settings.field();
    state.powerups.retain_mut(|p| p.update(dt, field));

    if let Some(powerup) = state.powerup_spawner.update(
        dt,
        state.powerups.len(),
        state.player.body.pos,
        &mut state.ids,
        &mut state.rng,
        &state.settings,
    ) {
        state.powerups.push(powerup);
    }

    // === Collisions ===
    let snapshot = state.asteroid_ids();
    collect_powerups(state, &mut events);
    resolve_bombs(state, dt, &mut events);
    if player_vs_asteroids(state, &snapshot, &mut events) {
        return events;
    }
    shots_vs_asteroids(state, &snapshot, &mut events);

    events
}

/// Drop spawns that drifted away without ever entering the field.
///
/// Families with an open chain are kept so their chain clock can still close.
fn cull_strays(state: &mut GameState) {
    let settings = &state.settings;
    let field = settings.field();
    let margin = settings.spawn_margin + settings.despawn_margin;
    let score = &state.score;

    state.asteroids.retain(|a| {
        a.body.entered_screen
            || score.chain_started_at(a.root_id()).is_some()
            || !is_offscreen(a.body.pos, a.radius() + margin, field)
    });
}

fn collect_powerups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.body;
    let mut collected = Vec::new();
    state.powerups.retain(|p| {
        let hit = p.body.collides_with(&player);
        if hit {
            collected.push(p.kind);
        }
        !hit
    });

    for kind in collected {
        let settings = &state.settings;
        match kind {
            PowerUpKind::Bomb => state.player.arm_bomb(settings),
            PowerUpKind::Weapon => state.player.activate_weapon_boost(settings),
            PowerUpKind::Control => state.player.activate_control_boost(settings),
            PowerUpKind::Overcharge => state.player.activate_overcharge(settings),
        }
        log::debug!("collected {kind:?}");
        events.push(GameEvent::PowerUpCollected { kind });
    }
}

fn resolve_bombs(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let mut detonated = Vec::new();
    state.player.pending_bombs.retain_mut(|bomb| {
        bomb.timer -= dt;
        if bomb.timer <= 0.0 {
            detonated.push(bomb.pos);
            false
        } else {
            true
        }
    });

    let blast_sq = state.settings.bomb_radius * state.settings.bomb_radius;
    for pos in detonated {
        let caught: Vec<u32> = state
            .asteroids
            .iter()
            .filter(|a| a.body.pos.distance_squared(pos) <= blast_sq)
            .map(|a| a.id())
            .collect();

        let mut destroyed = 0;
        for id in caught {
            if destroy_asteroid(state, id, Removal::Vaporize, events) {
                destroyed += 1;
            }
        }

        log::debug!(
            "bomb at ({:.0}, {:.0}) destroyed {destroyed} asteroids",
            pos.x,
            pos.y
        );
        events.push(GameEvent::BombDetonated { pos, destroyed });
    }
}

/// Returns true when the hull was hit and the round ended
fn player_vs_asteroids(
    state: &mut GameState,
    snapshot: &[u32],
    events: &mut Vec<GameEvent>,
) -> bool {
    for &id in snapshot {
        let Some(asteroid) = state.asteroid(id) else {
            continue;
        };
        let (center, radius) = (asteroid.body.pos, asteroid.radius());
        let player = &state.player;
        let settings = &state.settings;
        let ship = player.body.pos;

        if player.is_overcharged()
            && circles_overlap(ship, player.overcharge_radius(settings), center, radius)
        {
            destroy_asteroid(state, id, Removal::Split, events);
            state.player.overcharge_hit_slow(&state.settings);
            continue;
        }

        if player.shield_ready()
            && circles_overlap(ship, player.shield_radius(settings), center, radius)
        {
            state.player.consume_shield();
            state.player.shield_iframes = state.settings.shield_iframes;
            events.push(GameEvent::ShieldAbsorbed {
                charges: state.player.shield_charges,
            });
            destroy_asteroid(state, id, Removal::Split, events);
            continue;
        }

        if circles_overlap(ship, player.body.radius(), center, radius) {
            let score = state.score.score();
            state.phase = GamePhase::RoundOver;
            log::info!(
                "round {} over at {:.1}s, score {score}",
                state.round,
                state.time
            );
            events.push(GameEvent::RoundOver { score });
            return true;
        }
    }
    false
}

fn shots_vs_asteroids(state: &mut GameState, snapshot: &[u32], events: &mut Vec<GameEvent>) {
    for &id in snapshot {
        let Some(asteroid) = state.asteroid(id) else {
            continue;
        };
        let (center, radius) = (asteroid.body.pos, asteroid.radius());

        let hit = state.shots.iter().position(|shot| {
            segment_hits_circle(shot.prev_pos, shot.body.pos, center, radius + shot.body.radius())
        });
        if let Some(index) = hit {
            state.shots.remove(index);
            destroy_asteroid(state, id, Removal::Split, events);
        }
    }
}

/// Remove an asteroid, insert its fragments and settle the score.
///
/// Returns false if `id` is no longer live.
fn destroy_asteroid(
    state: &mut GameState,
    id: u32,
    removal: Removal,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(index) = state.asteroids.iter().position(|a| a.id() == id) else {
        return false;
    };
    let asteroid = state.asteroids.remove(index);

    if removal == Removal::Split {
        let fragments = asteroid.split(&mut state.ids, &mut state.rng, &state.settings);
        state.asteroids.extend(fragments);
    }

    let outcome =
        state
            .score
            .asteroid_destroyed(&asteroid, &state.asteroids, state.time, &state.settings);
    let root_id = asteroid.root_id();
    events.push(GameEvent::AsteroidDestroyed {
        id,
        root_id,
        points: outcome.points,
    });

    if outcome.family_cleared {
        log::debug!("family {root_id} cleared (from big: {})", outcome.from_big);
        events.push(GameEvent::FamilyCleared {
            root_id,
            from_big: outcome.from_big,
        });
    }
    if outcome.got_chain_bonus {
        log::debug!("chain bonus for family {root_id}");
        events.push(GameEvent::ChainBonus {
            root_id,
            bonus: state.settings.chain_bonus,
        });
    }
    if outcome.grants_shield() {
        let before = state.player.shield_charges;
        state.player.add_shield(1, &state.settings);
        if state.player.shield_charges > before {
            events.push(GameEvent::ShieldGained {
                charges: state.player.shield_charges,
            });
        }
    }
    true
}
