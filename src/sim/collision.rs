//! Collision detection and response
//!
//! Two geometric tests (circle-circle, box-box) plus the directional
//! "is-on-top" refinement used for landing. Resolution only marks entities
//! dead; the store is swept after the pass.

use glam::Vec2;
use rand::Rng;

use super::entity::{Aabb, Entity, EntityData, Shape, Visual};
use super::spawn::{spawn_explosion, spawn_particle_burst};
use super::state::GameState;
use super::store::EntityStore;
use crate::consts::*;

/// Circle overlap with slack: `distance - (ra + rb) <= epsilon`
#[inline]
pub fn circles_collide(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32, epsilon: f32) -> bool {
    a_pos.distance(b_pos) - (a_radius + b_radius) <= epsilon
}

/// Inclusive overlap on both axes (touching edges count)
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.max.x >= b.min.x && a.min.x <= b.max.x && a.max.y >= b.min.y && a.min.y <= b.max.y
}

/// Downward landing test
///
/// True when the mover's bottom edge was at or above the surface top before
/// the step, is at or below it after the step, and the two overlap
/// horizontally. Side and ceiling contacts never count.
#[inline]
pub fn is_on_top(before: &Aabb, after: &Aabb, surface: &Aabb) -> bool {
    before.bottom() <= surface.top()
        && after.bottom() >= surface.top()
        && after.max.x >= surface.min.x
        && after.min.x <= surface.max.x
}

/// Shape-aware test: circles use the distance test, anything else its box
pub fn entities_collide(a: &Entity, b: &Entity) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circles_collide(a.pos, ra, b.pos, rb, COLLISION_EPSILON)
        }
        _ => aabb_overlap(&a.aabb(), &b.aabb()),
    }
}

/// What a projectile did to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Enemy survives with a smaller radius
    Shrunk,
    /// Enemy removed
    Destroyed,
}

/// Apply one projectile hit to an enemy and return the outcome and score
pub fn apply_projectile_hit(enemy: &mut Entity) -> (HitOutcome, u64) {
    let shrunk = enemy.radius() - ENEMY_SHRINK;
    if shrunk > ENEMY_SURVIVE_RADIUS {
        enemy.shape = Shape::circle(shrunk);
        (HitOutcome::Shrunk, SCORE_SHRINK)
    } else {
        enemy.kill();
        (HitOutcome::Destroyed, SCORE_DESTROY)
    }
}

/// Resolve every projectile-enemy pair
///
/// Enemies are the outer loop, projectiles the inner; each overlapping pair
/// is resolved once, so an enemy struck by two projectiles in the same frame
/// takes both hits. A removed enemy stops taking hits. Returns the number of
/// hits resolved.
pub fn resolve_projectile_hits(
    store: &mut EntityStore,
    state: &mut GameState,
    rng: &mut impl Rng,
    max_particles: usize,
) -> usize {
    // Bursts are deferred so the store isn't borrowed during the scan
    let mut bursts: Vec<(Vec2, u32, usize)> = Vec::new();
    let mut hits = 0;

    for enemy in store.enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        for projectile in store.projectiles.iter_mut() {
            if !projectile.alive {
                continue;
            }
            if !entities_collide(projectile, enemy) {
                continue;
            }

            let color = match enemy.visual() {
                Visual::Color(c) => c,
                Visual::Sprite(_) => 0xFFFFFF,
            };
            let count = (enemy.radius() * 2.0) as usize;
            bursts.push((projectile.pos, color, count));

            let (outcome, points) = apply_projectile_hit(enemy);
            projectile.kill();
            state.add_score(points);
            hits += 1;
            log::debug!("enemy {} {:?} (+{})", enemy.id, outcome, points);

            if !enemy.alive {
                break;
            }
        }
    }

    for (at, color, count) in bursts {
        spawn_particle_burst(store, rng, at, color, count, max_particles);
    }
    hits
}

/// Top-down fatal contact: any live enemy touching the player
pub fn player_hit_by_enemy(store: &EntityStore) -> bool {
    store
        .enemies
        .iter()
        .filter(|e| e.alive)
        .any(|e| entities_collide(&store.player, e))
}

/// Land `mover` on the first platform it dropped onto this step
///
/// Zeroes vertical velocity and snaps the mover's bottom to the platform
/// top. Returns true if it landed.
pub fn land_on_platforms(mover: &mut Entity, platforms: &[Entity]) -> bool {
    let before = mover.prev_aabb();
    let after = mover.aabb();
    for platform in platforms.iter().filter(|p| p.alive) {
        let surface = platform.aabb();
        if is_on_top(&before, &after, &surface) {
            mover.vel.y = 0.0;
            mover.pos.y -= after.bottom() - surface.top();
            return true;
        }
    }
    false
}

/// Result of the platformer player-enemy pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerContact {
    None,
    /// Player landed on this many enemies
    Stomped(usize),
    /// Side or underside contact; the level resets
    Fatal,
}

/// Platformer player-enemy pass: stomps remove enemies and bounce the
/// player, any other contact is fatal
pub fn resolve_player_enemies(store: &mut EntityStore, stomp_bounce: f32) -> PlayerContact {
    let before = store.player.prev_aabb();
    let after = store.player.aabb();
    let mut explosions: Vec<(Vec2, f32)> = Vec::new();
    let mut stomped = 0;

    for enemy in store.enemies.iter_mut().filter(|e| e.alive) {
        let body = enemy.aabb();
        if is_on_top(&before, &after, &body) {
            enemy.kill();
            explosions.push((enemy.center(), enemy.radius() * 2.0));
            stomped += 1;
            log::debug!("stomped enemy {}", enemy.id);
        } else if aabb_overlap(&after, &body) {
            return PlayerContact::Fatal;
        }
    }

    if stomped == 0 {
        return PlayerContact::None;
    }
    store.player.vel.y = -stomp_bounce;
    for (center, size) in explosions {
        spawn_explosion(store, center, size);
    }
    PlayerContact::Stomped(stomped)
}

/// Collect every pickup the player overlaps; returns points gained
pub fn collect_pickups(store: &mut EntityStore, state: &mut GameState) -> u64 {
    let player = store.player.aabb();
    let mut gained = 0u64;
    for item in store.collectibles.iter_mut().filter(|c| c.alive) {
        if let EntityData::Collectible { value, kind } = item.data {
            if aabb_overlap(&player, &item.aabb()) {
                item.kill();
                gained += u64::from(value);
                log::debug!("collected {:?} worth {}", kind, value);
            }
        }
    }
    state.add_score(gained);
    gained
}
