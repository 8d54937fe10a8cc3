//! Simulation context and game-state controller
//!
//! `World` owns everything a frame touches: config, entity store, game
//! state, input state, RNG and the two host callback slots. Hosts talk to
//! the core only through its methods.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::Shape;
use super::integrate::Physics;
use super::level::LevelScript;
use super::schedule::{SpawnClock, TimerHandle, TimerSlot};
use super::spawn::{spawn_edge_enemy, spawn_projectile};
use super::state::{GamePhase, GameState, InputEvent, InputState};
use super::store::EntityStore;
use super::tick::{FrameOutcome, platformer_frame, top_down_frame};
use crate::consts::*;
use crate::render::RenderFrame;
use crate::settings::{SimConfig, Variant};
use crate::velocity_from_angle;

pub struct World {
    config: SimConfig,
    physics: Physics,
    /// Layout restored on every (re)initialisation (platformer)
    level: LevelScript,
    state: GameState,
    input: InputState,
    store: EntityStore,
    rng: Pcg32,
    frame_slot: TimerSlot,
    spawn_slot: TimerSlot,
    spawn_clock: SpawnClock,
}

impl World {
    /// Create and start a run using the built-in level
    pub fn new(config: SimConfig) -> Self {
        Self::with_level(config, LevelScript::first_level())
    }

    /// Create and start a run with a custom platformer level
    pub fn with_level(config: SimConfig, level: LevelScript) -> Self {
        let config = config.sanitized();
        let mut world = Self {
            physics: Physics::from_config(&config),
            level,
            state: GameState::default(),
            input: InputState::default(),
            store: Self::fresh_store(&config),
            rng: Pcg32::seed_from_u64(config.seed),
            frame_slot: TimerSlot::default(),
            spawn_slot: TimerSlot::default(),
            spawn_clock: SpawnClock::new(config.spawn_period_ms),
            config,
        };
        world.initialize();
        world
    }

    /// Store containing only the variant's player
    fn fresh_store(config: &SimConfig) -> EntityStore {
        match config.variant {
            Variant::TopDown => {
                EntityStore::new(config.viewport_center(), Shape::circle(PLAYER_RADIUS))
            }
            Variant::Platformer => EntityStore::new(
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                Shape::rect(PLAYER_WIDTH, PLAYER_HEIGHT),
            ),
        }
    }

    /// Initializing -> Running: repopulate, zero the score, arm callbacks
    fn initialize(&mut self) {
        self.state = GameState::default();
        self.store = Self::fresh_store(&self.config);
        if self.config.variant == Variant::Platformer {
            self.level.populate(&mut self.store);
        }
        self.spawn_clock.reset();

        self.frame_slot.arm();
        if self.config.variant == Variant::TopDown {
            self.spawn_slot.arm();
        }
        self.state.phase = GamePhase::Running;
        log::info!("{} run started", self.config.variant.as_str());
    }

    /// Reset game state and entity store to the initial configuration
    ///
    /// Both callback slots are torn down before anything is rebuilt, so a
    /// tick scheduled by the previous run can't land in the new one.
    pub fn restart(&mut self) {
        self.frame_slot.cancel();
        self.spawn_slot.cancel();
        self.state.phase = GamePhase::Initializing;
        log::info!("Restarting (score was {})", self.state.score);
        self.initialize();
    }

    fn game_over(&mut self, outcome: FrameOutcome) {
        self.frame_slot.cancel();
        self.spawn_slot.cancel();
        self.state.phase = GamePhase::GameOver;
        log::info!("Game over ({:?}), score {}", outcome, self.state.score);
        if self.config.auto_restart {
            self.restart();
        }
    }

    /// Frame callback: one full integrate + collide pass
    pub fn frame_tick(&mut self) {
        if let Some(handle) = self.frame_slot.handle() {
            self.frame_tick_with(handle);
        }
    }

    /// Frame callback delivered through a specific arming
    ///
    /// Returns `None` if the handle is stale (cancelled or from an earlier
    /// run). Any outcome other than `Continue` ends the run and invalidates
    /// `handle`; with `auto_restart` the slot is already re-armed, so the
    /// host picks up the new arming from `frame_handle()`.
    pub fn frame_tick_with(&mut self, handle: TimerHandle) -> Option<FrameOutcome> {
        if !self.frame_slot.accepts(handle) || !self.state.is_running() {
            return None;
        }
        self.state.frame += 1;

        let outcome = match self.config.variant {
            Variant::TopDown => top_down_frame(
                &mut self.store,
                &mut self.state,
                &mut self.rng,
                &self.config,
                &self.physics,
            ),
            Variant::Platformer => platformer_frame(
                &mut self.store,
                &mut self.state,
                &mut self.input,
                &self.config,
                &self.physics,
                self.level.win_scroll,
            ),
        };

        if outcome != FrameOutcome::Continue {
            self.game_over(outcome);
        }
        Some(outcome)
    }

    /// Spawn timer callback: append one enemy aimed at the player
    pub fn spawn_tick(&mut self) {
        if let Some(handle) = self.spawn_slot.handle() {
            self.spawn_tick_with(handle);
        }
    }

    /// Spawn timer callback delivered through a specific arming. Returns
    /// false if the handle is stale.
    pub fn spawn_tick_with(&mut self, handle: TimerHandle) -> bool {
        if !self.spawn_slot.accepts(handle) || !self.state.is_running() {
            return false;
        }
        let target = self.store.player.center();
        spawn_edge_enemy(
            &mut self.store,
            &mut self.rng,
            self.config.viewport_width,
            self.config.viewport_height,
            target,
            self.config.enemy_speed,
        );
        true
    }

    /// Feed elapsed wall-clock time to the built-in spawn clock and run
    /// every spawn tick that came due. Returns the number run.
    pub fn advance_spawn_clock(&mut self, elapsed_ms: f64) -> u32 {
        let Some(handle) = self.spawn_slot.handle() else {
            return 0;
        };
        let due = self.spawn_clock.advance(elapsed_ms);
        (0..due).filter(|_| self.spawn_tick_with(handle)).count() as u32
    }

    /// Current frame-callback arming, if the frame loop should keep running
    pub fn frame_handle(&self) -> Option<TimerHandle> {
        self.frame_slot.handle()
    }

    /// Current spawn-timer arming, if spawning is active
    pub fn spawn_handle(&self) -> Option<TimerHandle> {
        self.spawn_slot.handle()
    }

    /// Apply a host input event
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Fire { angle } => {
                if self.config.variant == Variant::TopDown && self.state.is_running() {
                    let origin = self.store.player.center();
                    let vel = velocity_from_angle(angle, self.config.projectile_speed);
                    spawn_projectile(&mut self.store, origin, vel);
                }
            }
            _ => self.input.apply(event),
        }
    }

    /// Snapshot of everything the drawing layer needs
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::capture(self)
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Direct store access for hosts that script extra entities
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityData, EntityKind, Visual};

    fn enemy_at(world: &mut World, pos: Vec2, radius: f32, vel: Vec2) {
        world.store_mut().spawn(
            pos,
            vel,
            Shape::circle(radius),
            EntityData::Enemy {
                visual: Visual::Color(0x00FF00),
                patrol: None,
            },
        );
    }

    fn top_down_at_500() -> World {
        let mut config = SimConfig::top_down();
        config.viewport_width = 1000.0;
        config.viewport_height = 1000.0;
        World::new(config)
    }

    #[test]
    fn test_new_world_is_running() {
        let world = World::new(SimConfig::top_down());
        assert_eq!(world.phase(), GamePhase::Running);
        assert!(world.frame_handle().is_some());
        assert!(world.spawn_handle().is_some());
        assert_eq!(world.score(), 0);

        let plat = World::new(SimConfig::platformer());
        assert!(plat.spawn_handle().is_none());
        assert!(plat.store().count(EntityKind::Platform) > 0);
    }

    #[test]
    fn test_spawn_tick_appends_enemy() {
        let mut world = World::new(SimConfig::top_down());
        world.spawn_tick();
        world.spawn_tick();
        assert_eq!(world.store().count(EntityKind::Enemy), 2);
        let r = world.store().enemies[0].radius();
        assert!((ENEMY_MIN_RADIUS..ENEMY_MAX_RADIUS).contains(&r));
    }

    #[test]
    fn test_advance_spawn_clock() {
        let mut world = World::new(SimConfig::top_down());
        assert_eq!(world.advance_spawn_clock(2500.0), 2);
        assert_eq!(world.advance_spawn_clock(600.0), 1);
        assert_eq!(world.store().count(EntityKind::Enemy), 3);
    }

    #[test]
    fn test_long_stall_spawns_bounded_burst() {
        let mut world = World::new(SimConfig::top_down());
        assert_eq!(world.advance_spawn_clock(3_600_000.0), MAX_CATCHUP_SPAWNS);
        assert_eq!(
            world.store().count(EntityKind::Enemy),
            MAX_CATCHUP_SPAWNS as usize
        );
    }

    #[test]
    fn test_frame_handle_rearmed_after_auto_restart() {
        let mut world = World::with_level(SimConfig::platformer(), LevelScript::empty());
        let first = world.frame_handle().unwrap();

        let mut outcome = Some(FrameOutcome::Continue);
        for _ in 0..200 {
            outcome = world.frame_tick_with(first);
            if outcome != Some(FrameOutcome::Continue) {
                break;
            }
        }
        assert_eq!(outcome, Some(FrameOutcome::PlayerFell));

        // The old arming is dead; the restarted run has a new one
        assert_eq!(world.frame_tick_with(first), None);
        let second = world.frame_handle().unwrap();
        assert_ne!(first, second);
        assert_eq!(world.frame_tick_with(second), Some(FrameOutcome::Continue));
        assert_eq!(world.state().frame, 1);
    }

    #[test]
    fn test_fire_appends_projectile() {
        let mut world = World::new(SimConfig::top_down());
        world.handle_input(InputEvent::Fire { angle: 0.0 });
        let shot = &world.store().projectiles[0];
        assert_eq!(shot.pos, world.store().player.center());
        assert!((shot.vel - Vec2::new(PROJECTILE_SPEED, 0.0)).length() < 1e-5);

        // Platformer ignores fire
        let mut plat = World::new(SimConfig::platformer());
        plat.handle_input(InputEvent::Fire { angle: 0.0 });
        assert!(plat.store().projectiles.is_empty());
    }

    #[test]
    fn test_shrink_then_destroy_through_frames() {
        let mut world = World::new(SimConfig::top_down());
        enemy_at(&mut world, Vec2::new(100.0, 100.0), 25.0, Vec2::ZERO);

        // Projectile starts one step short of the enemy center
        world.store_mut().spawn(
            Vec2::new(95.0, 100.0),
            Vec2::new(PROJECTILE_SPEED, 0.0),
            Shape::circle(PROJECTILE_RADIUS),
            EntityData::Projectile { color: 0xFFFFFF },
        );
        world.frame_tick();
        assert_eq!(world.store().enemies[0].radius(), 15.0);
        assert_eq!(world.score(), SCORE_SHRINK);

        world.store_mut().spawn(
            Vec2::new(95.0, 100.0),
            Vec2::new(PROJECTILE_SPEED, 0.0),
            Shape::circle(PROJECTILE_RADIUS),
            EntityData::Projectile { color: 0xFFFFFF },
        );
        world.frame_tick();
        assert!(world.store().enemies.is_empty());
        assert_eq!(world.score(), SCORE_SHRINK + SCORE_DESTROY);
    }

    #[test]
    fn test_enemy_contact_is_game_over() {
        let mut world = top_down_at_500();
        assert_eq!(world.store().player.pos, Vec2::new(500.0, 500.0));
        world.store_mut().player.shape = Shape::circle(2.5);
        enemy_at(&mut world, Vec2::new(505.0, 500.0), 2.0, Vec2::ZERO);

        world.frame_tick();
        assert_eq!(world.phase(), GamePhase::GameOver);
        assert!(world.frame_handle().is_none());
        assert!(world.spawn_handle().is_none());

        // Frozen until restart
        let frame = world.state().frame;
        world.frame_tick();
        world.spawn_tick();
        assert_eq!(world.state().frame, frame);
        assert_eq!(world.store().count(EntityKind::Enemy), 1);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut world = World::new(SimConfig::platformer());
        world.handle_input(InputEvent::MoveRightStart);
        for _ in 0..120 {
            world.frame_tick();
        }

        world.restart();
        let once_store = world.store().clone();
        let once_state = world.state().clone();
        assert_eq!(once_state.score, 0);
        assert_eq!(once_state.scroll_offset, 0.0);

        world.restart();
        assert_eq!(world.store(), &once_store);
        assert_eq!(world.state(), &once_state);
        assert_eq!(world.phase(), GamePhase::Running);
    }

    #[test]
    fn test_restart_drops_stale_spawn_ticks() {
        let mut world = top_down_at_500();
        let stale = world.spawn_handle().unwrap();
        assert!(world.spawn_tick_with(stale));

        // Force contact, then restart
        enemy_at(&mut world, Vec2::new(500.0, 500.0), 10.0, Vec2::ZERO);
        world.frame_tick();
        assert_eq!(world.phase(), GamePhase::GameOver);
        assert!(!world.spawn_tick_with(stale));

        world.restart();
        assert!(!world.spawn_tick_with(stale));
        assert!(world.store().enemies.is_empty());

        // The new arming spawns normally
        let fresh = world.spawn_handle().unwrap();
        assert_ne!(fresh, stale);
        assert!(world.spawn_tick_with(fresh));
        assert_eq!(world.store().count(EntityKind::Enemy), 1);
    }

    #[test]
    fn test_stale_frame_handle_after_restart() {
        let mut world = World::new(SimConfig::top_down());
        let old = world.frame_handle().unwrap();
        world.restart();
        assert_eq!(world.frame_tick_with(old), None);
        assert_eq!(world.state().frame, 0);
    }

    #[test]
    fn test_platformer_pit_auto_restarts() {
        let mut level = LevelScript::empty();
        level.win_scroll = 10_000.0;
        let mut world = World::with_level(SimConfig::platformer(), level);
        world.state.score = 40;

        let mut restarted = false;
        for _ in 0..200 {
            world.frame_tick();
            if world.state().frame == 0 {
                restarted = true;
                break;
            }
        }
        assert!(restarted);
        assert_eq!(world.phase(), GamePhase::Running);
        assert_eq!(world.score(), 0);
        assert_eq!(world.store().player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
    }

    #[test]
    fn test_platformer_scroll_shifts_world() {
        let mut level = LevelScript::first_level();
        level.enemies.clear();
        let mut world = World::with_level(SimConfig::platformer(), level);
        let first_platform_x = world.store().platforms[0].pos.x;

        world.handle_input(InputEvent::MoveRightStart);
        for _ in 0..100 {
            world.frame_tick();
        }
        let offset = world.state().scroll_offset;
        assert!(offset > 0.0);
        assert!(world.store().player.pos.x <= SCROLL_RIGHT_BOUND + PLAYER_SPEED);
        assert!((world.store().platforms[0].pos.x - (first_platform_x - offset)).abs() < 1e-3);
    }
}
