//! Per-frame integration
//!
//! Explicit Euler at a fixed nominal step: one call per rendered frame, no
//! delta-time scaling. A host running at 120 Hz simulates twice as fast as
//! one at 60 Hz, same as a plain `requestAnimationFrame` loop.

use super::entity::{Entity, EntityData};
use super::state::{GameState, InputState};
use super::store::EntityStore;
use crate::consts::*;
use crate::settings::{FloorPolicy, SimConfig, Variant};

/// Environment the integrator reads each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    /// Downward acceleration; zero disables gravity entirely
    pub gravity: f32,
    pub floor: FloorPolicy,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Physics {
    pub fn from_config(config: &SimConfig) -> Self {
        let gravity = match config.variant {
            Variant::TopDown => 0.0,
            Variant::Platformer => config.gravity,
        };
        Self {
            gravity,
            floor: config.floor,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
        }
    }
}

impl Entity {
    /// Advance one frame. Returns true if the entity came to rest on a
    /// solid viewport floor.
    pub fn integrate(&mut self, physics: &Physics) -> bool {
        if !self.alive {
            return false;
        }
        self.prev_pos = self.pos;

        match self.data {
            EntityData::Player { .. } => {
                self.pos += self.vel;
                self.apply_gravity(physics)
            }
            EntityData::Enemy { patrol, visual } => {
                self.pos += self.vel;
                if let Some(mut patrol) = patrol {
                    patrol.traveled += self.vel.x.abs();
                    if patrol.traveled > patrol.distance {
                        patrol.traveled = 0.0;
                        self.vel.x = -self.vel.x;
                    }
                    self.data = EntityData::Enemy {
                        visual,
                        patrol: Some(patrol),
                    };
                }
                self.apply_gravity(physics)
            }
            EntityData::Projectile { .. } => {
                self.pos += self.vel;
                if self.is_off_screen(physics.viewport_width, physics.viewport_height) {
                    self.kill();
                }
                false
            }
            EntityData::Particle { color, alpha } => {
                self.vel *= PARTICLE_FRICTION;
                self.pos += self.vel;
                let alpha = alpha - PARTICLE_FADE;
                self.data = EntityData::Particle { color, alpha };
                if alpha <= 0.0 {
                    self.kill();
                }
                false
            }
            EntityData::Explosion { frame, frames } => {
                let frame = frame + 1;
                self.data = EntityData::Explosion { frame, frames };
                if frame >= frames {
                    self.kill();
                }
                false
            }
            EntityData::Platform { .. } | EntityData::Collectible { .. } => false,
        }
    }

    /// Accelerate downward unless the next step would cross the viewport
    /// bottom; a solid floor then clamps vertical velocity to zero
    fn apply_gravity(&mut self, physics: &Physics) -> bool {
        if physics.gravity <= 0.0 {
            return false;
        }
        if self.aabb().bottom() + self.vel.y <= physics.viewport_height {
            self.vel.y += physics.gravity;
            false
        } else if physics.floor == FloorPolicy::Solid {
            self.vel.y = 0.0;
            true
        } else {
            false
        }
    }
}

/// Turn held keys into player velocity, scrolling the world when the
/// player pushes against the walk band. Returns the scroll applied.
pub fn apply_platformer_input(
    store: &mut EntityStore,
    state: &mut GameState,
    input: &mut InputState,
    config: &SimConfig,
) -> f32 {
    let speed = config.player_speed;
    let x = store.player.pos.x;
    let mut scroll = 0.0;

    if input.right && x < SCROLL_RIGHT_BOUND {
        store.player.vel.x = speed;
    } else if input.left
        && (x > SCROLL_LEFT_BOUND || (state.scroll_offset <= 0.0 && x > 0.0))
    {
        // At the level start the screen edge is a wall
        store.player.vel.x = if state.scroll_offset <= 0.0 {
            -speed.min(x)
        } else {
            -speed
        };
    } else {
        store.player.vel.x = 0.0;
        if input.right {
            scroll = speed;
        } else if input.left && state.scroll_offset > 0.0 {
            scroll = -speed.min(state.scroll_offset);
        }
        if scroll != 0.0 {
            state.scroll_offset += scroll;
            store.shift_world(-scroll);
        }
    }

    if input.take_jump() {
        if let EntityData::Player { jumps_used } = store.player.data {
            if jumps_used < config.max_jumps {
                store.player.vel.y = -config.jump_speed;
                store.player.data = EntityData::Player {
                    jumps_used: jumps_used + 1,
                };
            }
        }
    }
    scroll
}

/// Integrate every live entity once. Returns true if the player rested on
/// a solid floor this frame.
pub fn integrate_all(store: &mut EntityStore, physics: &Physics) -> bool {
    let player_rested = store.player.integrate(physics);
    for entity in store
        .projectiles
        .iter_mut()
        .chain(store.enemies.iter_mut())
        .chain(store.particles.iter_mut())
        .chain(store.platforms.iter_mut())
        .chain(store.collectibles.iter_mut())
        .chain(store.explosions.iter_mut())
    {
        entity.integrate(physics);
    }
    player_rested
}

/// Clear the player's jump counter after a landing
pub fn reset_jumps(player: &mut Entity) {
    if let EntityData::Player { .. } = player.data {
        player.data = EntityData::Player { jumps_used: 0 };
    }
}
