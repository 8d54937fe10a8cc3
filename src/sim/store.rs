//! Entity store: one ordered collection per entity kind
//!
//! Entities are never removed mid-pass. Resolution marks them dead and
//! `compact` sweeps every collection once the pass is over, so iteration
//! indices stay valid for the whole frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityData, EntityKind, Shape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Entity,
    pub projectiles: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub particles: Vec<Entity>,
    pub platforms: Vec<Entity>,
    pub collectibles: Vec<Entity>,
    pub explosions: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
}

impl EntityStore {
    /// Empty store holding only the player
    pub fn new(player_pos: Vec2, player_shape: Shape) -> Self {
        let player = Entity::new(
            0,
            player_pos,
            Vec2::ZERO,
            player_shape,
            EntityData::Player { jumps_used: 0 },
        );
        Self {
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a new entity to the collection for its kind, returning its ID
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, shape: Shape, data: EntityData) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::new(id, pos, vel, shape, data);
        match entity.kind() {
            EntityKind::Player => {
                log::warn!("ignoring spawn of a second player");
                return self.player.id;
            }
            EntityKind::Projectile => self.projectiles.push(entity),
            EntityKind::Enemy => self.enemies.push(entity),
            EntityKind::Particle => self.particles.push(entity),
            EntityKind::Platform => self.platforms.push(entity),
            EntityKind::Collectible => self.collectibles.push(entity),
            EntityKind::Explosion => self.explosions.push(entity),
        }
        id
    }

    pub fn collection(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Player => std::slice::from_ref(&self.player),
            EntityKind::Projectile => &self.projectiles,
            EntityKind::Enemy => &self.enemies,
            EntityKind::Particle => &self.particles,
            EntityKind::Platform => &self.platforms,
            EntityKind::Collectible => &self.collectibles,
            EntityKind::Explosion => &self.explosions,
        }
    }

    /// Live entities of one kind
    pub fn live(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.collection(kind).iter().filter(|e| e.alive)
    }

    /// Every live entity in draw order (world first, effects last)
    pub fn iter_live(&self) -> impl Iterator<Item = &Entity> {
        self.platforms
            .iter()
            .chain(self.collectibles.iter())
            .chain(self.enemies.iter())
            .chain(std::iter::once(&self.player))
            .chain(self.projectiles.iter())
            .chain(self.particles.iter())
            .chain(self.explosions.iter())
            .filter(|e| e.alive)
    }

    /// Number of entities of a kind (including any not yet swept)
    pub fn count(&self, kind: EntityKind) -> usize {
        self.collection(kind).len()
    }

    /// Shift every world-anchored entity horizontally (camera scroll)
    pub fn shift_world(&mut self, dx: f32) {
        for entity in self
            .platforms
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .chain(self.collectibles.iter_mut())
            .chain(self.explosions.iter_mut())
        {
            entity.pos.x += dx;
            entity.prev_pos.x += dx;
        }
    }

    /// Drop every entity marked dead during the pass
    pub fn compact(&mut self) {
        self.projectiles.retain(|e| e.alive);
        self.enemies.retain(|e| e.alive);
        self.particles.retain(|e| e.alive);
        self.platforms.retain(|e| e.alive);
        self.collectibles.retain(|e| e.alive);
        self.explosions.retain(|e| e.alive);
    }
}
