//! Per-frame simulation pass
//!
//! Integrate first, then collide, then check aggregate state, then sweep
//! dead entities. Each variant runs its own pass over the shared store.

use rand::Rng;

use super::collision::{
    PlayerContact, collect_pickups, land_on_platforms, player_hit_by_enemy,
    resolve_player_enemies, resolve_projectile_hits,
};
use super::integrate::{Physics, apply_platformer_input, integrate_all, reset_jumps};
use super::state::{GameState, InputState};
use super::store::EntityStore;
use crate::settings::SimConfig;

/// How a frame pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Fatal enemy contact
    PlayerHit,
    /// Player dropped below the viewport
    PlayerFell,
}

/// One frame of the top-down shooter
pub fn top_down_frame(
    store: &mut EntityStore,
    state: &mut GameState,
    rng: &mut impl Rng,
    config: &SimConfig,
    physics: &Physics,
) -> FrameOutcome {
    integrate_all(store, physics);

    if player_hit_by_enemy(store) {
        store.compact();
        return FrameOutcome::PlayerHit;
    }

    resolve_projectile_hits(store, state, rng, config.max_particles);
    store.compact();
    FrameOutcome::Continue
}

/// One frame of the side-scrolling platformer
pub fn platformer_frame(
    store: &mut EntityStore,
    state: &mut GameState,
    input: &mut InputState,
    config: &SimConfig,
    physics: &Physics,
    win_scroll: f32,
) -> FrameOutcome {
    apply_platformer_input(store, state, input, config);

    let rested_on_floor = integrate_all(store, physics);
    let landed = land_on_platforms(&mut store.player, &store.platforms);
    if rested_on_floor || landed {
        reset_jumps(&mut store.player);
    }

    for enemy in store.enemies.iter_mut().filter(|e| e.alive) {
        land_on_platforms(enemy, &store.platforms);
        if enemy.pos.y > physics.viewport_height {
            enemy.kill();
        }
    }

    if resolve_player_enemies(store, config.stomp_bounce) == PlayerContact::Fatal {
        store.compact();
        return FrameOutcome::PlayerHit;
    }

    collect_pickups(store, state);

    if !state.win_detected && state.scroll_offset > win_scroll {
        state.win_detected = true;
        log::info!("You win (scroll offset {:.0})", state.scroll_offset);
    }

    store.compact();

    if store.player.pos.y > physics.viewport_height {
        return FrameOutcome::PlayerFell;
    }
    FrameOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{EntityData, Shape, SpriteKey};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn platformer_setup() -> (EntityStore, GameState, InputState, SimConfig, Physics) {
        let config = SimConfig::platformer();
        let physics = Physics::from_config(&config);
        let mut store = EntityStore::new(
            Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            Shape::rect(PLAYER_WIDTH, PLAYER_HEIGHT),
        );
        store.spawn(
            Vec2::new(0.0, 470.0),
            Vec2::ZERO,
            Shape::rect(580.0, 125.0),
            EntityData::Platform {
                sprite: SpriteKey::Platform,
            },
        );
        (store, GameState::default(), InputState::default(), config, physics)
    }

    #[test]
    fn test_player_falls_then_lands() {
        let (mut store, mut state, mut input, config, physics) = platformer_setup();
        let mut landed_at = None;
        for frame in 0..200 {
            let outcome =
                platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
            assert_eq!(outcome, FrameOutcome::Continue);
            if store.player.vel.y == 0.0 && store.player.aabb().bottom() == 470.0 {
                landed_at = Some(frame);
                break;
            }
        }
        assert!(landed_at.is_some(), "player never landed");

        // Stays put on later frames
        for _ in 0..10 {
            platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
        }
        assert_eq!(store.player.aabb().bottom(), 470.0);
    }

    #[test]
    fn test_fast_fall_lands_with_zero_velocity() {
        let (mut store, mut state, mut input, config, physics) = platformer_setup();
        // Bottom at 460, moving 37 px down: crosses the 470 top in one frame
        store.player.pos.y = 430.0;
        store.player.vel.y = 37.0;
        platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
        assert_eq!(store.player.vel.y, 0.0);
        assert_eq!(store.player.aabb().bottom(), 470.0);
    }

    #[test]
    fn test_pit_reports_fall() {
        let (mut store, mut state, mut input, config, physics) = platformer_setup();
        store.platforms.clear();
        let mut outcome = FrameOutcome::Continue;
        for _ in 0..200 {
            outcome =
                platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
            if outcome != FrameOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, FrameOutcome::PlayerFell);
    }

    #[test]
    fn test_win_latches_once() {
        let (mut store, mut state, mut input, config, physics) = platformer_setup();
        state.scroll_offset = 1001.0;
        platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
        assert!(state.win_detected);
        platformer_frame(&mut store, &mut state, &mut input, &config, &physics, 1000.0);
        assert!(state.win_detected);
    }

    #[test]
    fn test_top_down_projectile_kills_before_sweep() {
        let config = SimConfig::top_down();
        let physics = Physics::from_config(&config);
        let mut store = EntityStore::new(Vec2::new(512.0, 288.0), Shape::circle(PLAYER_RADIUS));
        let mut state = GameState::default();
        let mut rng = Pcg32::seed_from_u64(5);
        store.spawn(
            Vec2::new(200.0, 100.0),
            Vec2::ZERO,
            Shape::circle(12.0),
            EntityData::Enemy {
                visual: crate::sim::entity::Visual::Color(0x00FF00),
                patrol: None,
            },
        );
        store.spawn(
            Vec2::new(195.0, 100.0),
            Vec2::ZERO,
            Shape::circle(PROJECTILE_RADIUS),
            EntityData::Projectile { color: 0xFFFFFF },
        );

        let outcome = top_down_frame(&mut store, &mut state, &mut rng, &config, &physics);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert!(store.enemies.is_empty());
        assert!(store.projectiles.is_empty());
        assert_eq!(state.score, SCORE_DESTROY);
        assert_eq!(store.particles.len(), 24);
    }
}
