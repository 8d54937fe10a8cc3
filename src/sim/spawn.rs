//! Entity spawning: timed enemies, particle bursts, explosions

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityData, Shape, Visual};
use super::store::EntityStore;
use crate::consts::*;
use crate::{hue_to_rgb, unit_toward};

/// Projectile fill color
pub const PROJECTILE_COLOR: u32 = 0xFFFFFF;

/// Parameters of a spawned edge enemy, before it enters the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
}

/// Draw an enemy just outside a random viewport edge, aimed at `target`
///
/// The radius comes from `[ENEMY_MIN_RADIUS, ENEMY_MAX_RADIUS)` so no spawn
/// can be degenerate or take unbounded hits to resolve.
pub fn roll_edge_enemy(
    rng: &mut impl Rng,
    width: f32,
    height: f32,
    target: Vec2,
    speed: f32,
) -> EnemySpawn {
    let radius = rng
        .random_range(ENEMY_MIN_RADIUS..ENEMY_MAX_RADIUS)
        .max(ENEMY_MIN_RADIUS);

    let pos = if rng.random_bool(0.5) {
        // Left or right edge
        let x = if rng.random_bool(0.5) { -radius } else { width + radius };
        Vec2::new(x, rng.random_range(0.0..height))
    } else {
        // Top or bottom edge
        let y = if rng.random_bool(0.5) { -radius } else { height + radius };
        Vec2::new(rng.random_range(0.0..width), y)
    };

    EnemySpawn {
        pos,
        vel: unit_toward(pos, target) * speed,
        radius,
        color: hue_to_rgb(rng.random_range(0.0..360.0)),
    }
}

/// Append one edge enemy heading for `target`
pub fn spawn_edge_enemy(
    store: &mut EntityStore,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
    target: Vec2,
    speed: f32,
) -> u32 {
    let spawn = roll_edge_enemy(rng, width, height, target, speed);
    let id = store.spawn(
        spawn.pos,
        spawn.vel,
        Shape::circle(spawn.radius),
        EntityData::Enemy {
            visual: Visual::Color(spawn.color),
            patrol: None,
        },
    );
    log::debug!(
        "spawned enemy {} r={:.1} at ({:.0}, {:.0})",
        id,
        spawn.radius,
        spawn.pos.x,
        spawn.pos.y
    );
    id
}

/// Append a projectile leaving `origin` with velocity `vel`
pub fn spawn_projectile(store: &mut EntityStore, origin: Vec2, vel: Vec2) -> u32 {
    store.spawn(
        origin,
        vel,
        Shape::circle(PROJECTILE_RADIUS),
        EntityData::Projectile {
            color: PROJECTILE_COLOR,
        },
    )
}

/// Scatter `count` fading particles from `at`, respecting the live cap
///
/// Returns how many were actually spawned.
pub fn spawn_particle_burst(
    store: &mut EntityStore,
    rng: &mut impl Rng,
    at: Vec2,
    color: u32,
    count: usize,
    max_particles: usize,
) -> usize {
    let room = max_particles.saturating_sub(store.particles.len());
    let count = count.min(room);
    for _ in 0..count {
        let radius = rng.random_range(MIN_SHAPE_SIZE..PARTICLE_MAX_RADIUS);
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * rng.random_range(0.0..PARTICLE_MAX_SPEED),
            (rng.random::<f32>() - 0.5) * rng.random_range(0.0..PARTICLE_MAX_SPEED),
        );
        store.spawn(
            at,
            vel,
            Shape::circle(radius),
            EntityData::Particle { color, alpha: 1.0 },
        );
    }
    count
}

/// Append a one-shot explosion animation centered on `center`
pub fn spawn_explosion(store: &mut EntityStore, center: Vec2, size: f32) -> u32 {
    let size = size.max(MIN_SHAPE_SIZE);
    store.spawn(
        center - Vec2::splat(size / 2.0),
        Vec2::ZERO,
        Shape::rect(size, size),
        EntityData::Explosion {
            frame: 0,
            frames: EXPLOSION_FRAMES,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn empty_store() -> EntityStore {
        EntityStore::new(Vec2::new(512.0, 288.0), Shape::circle(PLAYER_RADIUS))
    }

    #[test]
    fn test_thousand_spawns_stay_in_radius_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let s = roll_edge_enemy(&mut rng, 1024.0, 576.0, Vec2::new(512.0, 288.0), 1.0);
            assert!(s.radius >= ENEMY_MIN_RADIUS && s.radius < ENEMY_MAX_RADIUS);
        }
    }

    #[test]
    fn test_spawn_is_outside_viewport_and_aimed_at_target() {
        let mut rng = Pcg32::seed_from_u64(11);
        let target = Vec2::new(512.0, 288.0);
        for _ in 0..200 {
            let s = roll_edge_enemy(&mut rng, 1024.0, 576.0, target, 2.0);
            let outside = s.pos.x <= -s.radius + 1e-3
                || s.pos.x >= 1024.0 + s.radius - 1e-3
                || s.pos.y <= -s.radius + 1e-3
                || s.pos.y >= 576.0 + s.radius - 1e-3;
            assert!(outside, "spawned inside viewport at {:?}", s.pos);
            assert!((s.vel.length() - 2.0).abs() < 1e-4);
            assert!(s.vel.dot(target - s.pos) > 0.0);
        }
    }

    #[test]
    fn test_particle_burst_respects_cap() {
        let mut store = empty_store();
        let mut rng = Pcg32::seed_from_u64(3);
        let made = spawn_particle_burst(&mut store, &mut rng, Vec2::ZERO, 0xFF0000, 50, 30);
        assert_eq!(made, 30);
        let made = spawn_particle_burst(&mut store, &mut rng, Vec2::ZERO, 0xFF0000, 10, 30);
        assert_eq!(made, 0);
        assert_eq!(store.particles.len(), 30);
        assert!(store.particles.iter().all(|p| p.radius() > 0.0));
    }

    #[test]
    fn test_explosion_is_centered() {
        let mut store = empty_store();
        spawn_explosion(&mut store, Vec2::new(100.0, 100.0), 40.0);
        assert_eq!(store.explosions[0].center(), Vec2::new(100.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_spawn_radius_bounded(seed in any::<u64>(), w in 10.0f32..4000.0, h in 10.0f32..4000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let s = roll_edge_enemy(&mut rng, w, h, Vec2::new(w / 2.0, h / 2.0), 1.0);
            prop_assert!(s.radius >= ENEMY_MIN_RADIUS);
            prop_assert!(s.radius < ENEMY_MAX_RADIUS);
        }
    }
}
