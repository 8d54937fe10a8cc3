//! Entity types shared by every game variant
//!
//! One `Entity` struct carries the kinematic state; kind-specific attributes
//! live in the `EntityData` tagged union.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_SHAPE_SIZE;

/// Entity class tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
    Enemy,
    Particle,
    Platform,
    Collectible,
    Explosion,
}

/// Collision/draw geometry
///
/// Circles are positioned by their center, rectangles by their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }.sanitized()
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect { width, height }.sanitized()
    }

    /// Clamp degenerate (zero, negative, NaN) dimensions up to the minimum size
    pub fn sanitized(self) -> Self {
        fn fix(v: f32) -> f32 {
            if v.is_finite() && v >= MIN_SHAPE_SIZE {
                v
            } else {
                log::warn!("degenerate shape size {} clamped to {}", v, MIN_SHAPE_SIZE);
                MIN_SHAPE_SIZE
            }
        }
        match self {
            Shape::Circle { radius } => Shape::Circle { radius: fix(radius) },
            Shape::Rect { width, height } => Shape::Rect {
                width: fix(width),
                height: fix(height),
            },
        }
    }

    /// Radius for circles, half the larger side for rectangles
    pub fn size(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Rect { width, height } => width.max(height) / 2.0,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_rect(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: pos,
            max: pos + Vec2::new(width, height),
        }
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }
}

/// Sprite references a drawing host resolves to images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKey {
    Platform,
    PlatformSmallTall,
    PlayerStandLeft,
    PlayerStandRight,
    PlayerRunLeft,
    PlayerRunRight,
    Goomba,
    Coin,
    Gem,
    Explosion,
}

/// How the drawing layer should paint an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// Flat 0xRRGGBB fill
    Color(u32),
    Sprite(SpriteKey),
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Gem,
}

impl CollectibleKind {
    pub fn sprite(self) -> SpriteKey {
        match self {
            CollectibleKind::Coin => SpriteKey::Coin,
            CollectibleKind::Gem => SpriteKey::Gem,
        }
    }
}

/// Scripted back-and-forth walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    /// Horizontal distance walked before turning around
    pub distance: f32,
    /// Distance walked since the last turn
    pub traveled: f32,
}

impl Patrol {
    pub fn new(distance: f32) -> Self {
        Self {
            distance: distance.max(0.0),
            traveled: 0.0,
        }
    }
}

/// Kind-specific attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityData {
    Player {
        /// Jumps used since the last landing
        jumps_used: u8,
    },
    Projectile {
        color: u32,
    },
    Enemy {
        visual: Visual,
        patrol: Option<Patrol>,
    },
    Particle {
        color: u32,
        /// Opacity in [0, 1]; removed once it reaches zero
        alpha: f32,
    },
    Platform {
        sprite: SpriteKey,
    },
    Collectible {
        kind: CollectibleKind,
        value: u32,
    },
    Explosion {
        frame: u32,
        frames: u32,
    },
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Position before the latest integration step
    pub prev_pos: Vec2,
    /// Per-frame displacement
    pub vel: Vec2,
    pub shape: Shape,
    pub data: EntityData,
    /// Cleared when the entity is resolved; swept at the end of the pass
    pub alive: bool,
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, shape: Shape, data: EntityData) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            vel,
            shape: shape.sanitized(),
            data,
            alive: true,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.data {
            EntityData::Player { .. } => EntityKind::Player,
            EntityData::Projectile { .. } => EntityKind::Projectile,
            EntityData::Enemy { .. } => EntityKind::Enemy,
            EntityData::Particle { .. } => EntityKind::Particle,
            EntityData::Platform { .. } => EntityKind::Platform,
            EntityData::Collectible { .. } => EntityKind::Collectible,
            EntityData::Explosion { .. } => EntityKind::Explosion,
        }
    }

    /// Mark for removal at the end of the current pass
    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn radius(&self) -> f32 {
        self.shape.size()
    }

    /// Center point regardless of shape anchoring
    pub fn center(&self) -> Vec2 {
        match self.shape {
            Shape::Circle { .. } => self.pos,
            Shape::Rect { width, height } => self.pos + Vec2::new(width, height) / 2.0,
        }
    }

    /// Bounding box at a given anchor position
    pub fn aabb_at(&self, pos: Vec2) -> Aabb {
        match self.shape {
            Shape::Circle { radius } => Aabb::new(pos - Vec2::splat(radius), pos + Vec2::splat(radius)),
            Shape::Rect { width, height } => Aabb::from_rect(pos, width, height),
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.pos)
    }

    /// Bounding box before the latest integration step
    pub fn prev_aabb(&self) -> Aabb {
        self.aabb_at(self.prev_pos)
    }

    /// Visual identifier for the render query
    pub fn visual(&self) -> Visual {
        match self.data {
            EntityData::Player { .. } => Visual::Color(0x0000FF),
            EntityData::Projectile { color } => Visual::Color(color),
            EntityData::Enemy { visual, .. } => visual,
            EntityData::Particle { color, .. } => Visual::Color(color),
            EntityData::Platform { sprite } => Visual::Sprite(sprite),
            EntityData::Collectible { kind, .. } => Visual::Sprite(kind.sprite()),
            EntityData::Explosion { .. } => Visual::Sprite(SpriteKey::Explosion),
        }
    }

    /// Opacity for the render query
    pub fn alpha(&self) -> f32 {
        match self.data {
            EntityData::Particle { alpha, .. } => alpha.clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// True once the entity's box lies entirely outside the viewport
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        let b = self.aabb();
        b.max.x < 0.0 || b.min.x > width || b.max.y < 0.0 || b.min.y > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_clamps_degenerate_sizes() {
        assert_eq!(Shape::circle(0.0), Shape::Circle { radius: MIN_SHAPE_SIZE });
        assert_eq!(Shape::circle(-3.0), Shape::Circle { radius: MIN_SHAPE_SIZE });
        assert_eq!(
            Shape::rect(f32::NAN, 12.0),
            Shape::Rect {
                width: MIN_SHAPE_SIZE,
                height: 12.0
            }
        );
        assert_eq!(Shape::circle(7.0), Shape::Circle { radius: 7.0 });
    }

    #[test]
    fn test_aabb_anchoring() {
        let circle = Entity::new(
            1,
            Vec2::new(50.0, 50.0),
            Vec2::ZERO,
            Shape::circle(10.0),
            EntityData::Projectile { color: 0xFF0000 },
        );
        assert_eq!(circle.aabb(), Aabb::new(Vec2::new(40.0, 40.0), Vec2::new(60.0, 60.0)));
        assert_eq!(circle.center(), Vec2::new(50.0, 50.0));

        let rect = Entity::new(
            2,
            Vec2::new(10.0, 20.0),
            Vec2::ZERO,
            Shape::rect(30.0, 40.0),
            EntityData::Platform {
                sprite: SpriteKey::Platform,
            },
        );
        assert_eq!(rect.aabb().bottom(), 60.0);
        assert_eq!(rect.center(), Vec2::new(25.0, 40.0));
        assert_eq!(rect.kind(), EntityKind::Platform);
    }

    #[test]
    fn test_off_screen() {
        let mut e = Entity::new(
            1,
            Vec2::new(-4.0, 100.0),
            Vec2::ZERO,
            Shape::circle(5.0),
            EntityData::Projectile { color: 0 },
        );
        assert!(!e.is_off_screen(800.0, 600.0));
        e.pos.x = -6.0;
        assert!(e.is_off_screen(800.0, 600.0));
    }
}
