//! Arcade Sim - entity update, collision and spawn core for small 2D arcade games
//!
//! Core modules:
//! - `sim`: Simulation (entities, integration, collisions, spawning, game state)
//! - `settings`: Variant selection and tunable simulation config
//! - `render`: Render query snapshots handed to a drawing host
//! - `web`: wasm-bindgen host bindings (wasm32 only)

pub mod render;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use render::{RenderFrame, RenderItem};
pub use settings::{ConfigError, FloorPolicy, SimConfig, Variant};
pub use sim::World;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default viewport (canvas) dimensions
    pub const VIEWPORT_WIDTH: f32 = 1024.0;
    pub const VIEWPORT_HEIGHT: f32 = 576.0;

    /// Slack added to the circular collision test so discrete stepping
    /// doesn't skip a touching pair
    pub const COLLISION_EPSILON: f32 = 1.0;

    /// Smallest radius/side any shape may have after clamping
    pub const MIN_SHAPE_SIZE: f32 = 0.5;

    // --- Top-down shooter ---

    /// Player circle radius
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Projectile circle radius
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    /// Projectile speed (pixels per frame)
    pub const PROJECTILE_SPEED: f32 = 5.0;
    /// Enemy speed toward the player (pixels per frame)
    pub const ENEMY_SPEED: f32 = 1.0;
    /// Spawned enemy radius range [min, max)
    pub const ENEMY_MIN_RADIUS: f32 = 10.0;
    pub const ENEMY_MAX_RADIUS: f32 = 30.0;
    /// Spawn period of the enemy timer
    pub const SPAWN_PERIOD_MS: u32 = 1000;
    /// Most spawn periods one clock advance may catch up on; older
    /// backlog (a suspended tab, a debugger pause) is dropped
    pub const MAX_CATCHUP_SPAWNS: u32 = 3;
    /// Radius removed from an enemy per projectile hit
    pub const ENEMY_SHRINK: f32 = 10.0;
    /// An enemy must stay strictly above this radius to survive a hit
    pub const ENEMY_SURVIVE_RADIUS: f32 = 5.0;
    /// Score for a hit that only shrinks the enemy
    pub const SCORE_SHRINK: u64 = 100;
    /// Score for a hit that removes the enemy
    pub const SCORE_DESTROY: u64 = 250;

    /// Particle velocity decay per frame
    pub const PARTICLE_FRICTION: f32 = 0.99;
    /// Particle alpha lost per frame
    pub const PARTICLE_FADE: f32 = 0.01;
    /// Maximum particle spread speed
    pub const PARTICLE_MAX_SPEED: f32 = 6.0;
    /// Maximum particle radius
    pub const PARTICLE_MAX_RADIUS: f32 = 2.0;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;

    // --- Side-scrolling platformer ---

    /// Downward acceleration (pixels per frame squared)
    pub const GRAVITY: f32 = 0.5;
    /// Player box
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    /// Player spawn point
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 100.0;
    /// Horizontal walk speed, also the scroll step
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Vertical speed applied by a jump
    pub const JUMP_SPEED: f32 = 20.0;
    /// Upward speed applied after stomping an enemy
    pub const STOMP_BOUNCE: f32 = 15.0;
    /// Jumps allowed between landings
    pub const MAX_JUMPS: u8 = 1;
    /// On-screen band the player walks in before the world scrolls
    pub const SCROLL_LEFT_BOUND: f32 = 100.0;
    pub const SCROLL_RIGHT_BOUND: f32 = 400.0;
    /// Scroll offset past which the level counts as won
    pub const WIN_SCROLL_OFFSET: f32 = 1000.0;
    /// Explosion animation length in frames
    pub const EXPLOSION_FRAMES: u32 = 24;
}

/// Unit vector pointing from `from` toward `to` (zero if they coincide)
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Velocity of magnitude `speed` along `angle` (radians, screen space)
#[inline]
pub fn velocity_from_angle(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Angle (radians) of the ray from `from` toward `to`
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Pack an HSL(hue, 50%, 50%) color into 0xRRGGBB
pub fn hue_to_rgb(hue_deg: f32) -> u32 {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    // s = l = 0.5 -> chroma 0.5, lightness offset 0.25
    let c = 0.5;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = 0.25;
    let to_byte = |v: f32| (((v + m) * 255.0).round() as u32).min(255);
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}
