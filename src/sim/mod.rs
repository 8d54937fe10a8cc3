//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order per collection)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod integrate;
pub mod level;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;
pub mod world;

pub use collision::{HitOutcome, PlayerContact, aabb_overlap, circles_collide, is_on_top};
pub use entity::{
    Aabb, CollectibleKind, Entity, EntityData, EntityKind, Patrol, Shape, SpriteKey, Visual,
};
pub use integrate::Physics;
pub use level::LevelScript;
pub use schedule::{SpawnClock, TimerHandle, TimerSlot};
pub use state::{Direction, GamePhase, GameState, InputEvent, InputState};
pub use store::EntityStore;
pub use tick::FrameOutcome;
pub use world::World;
