//! Scripted platformer levels
//!
//! Geometry is plain data so collision never waits on sprite loading.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{CollectibleKind, EntityData, Patrol, Shape, SpriteKey, Visual};
use super::store::EntityStore;
use crate::consts::WIN_SCROLL_OFFSET;
use crate::settings::ConfigError;

/// Ground platform tile size
pub const PLATFORM_WIDTH: f32 = 580.0;
pub const PLATFORM_HEIGHT: f32 = 125.0;
/// Narrow raised platform size
pub const SMALL_TALL_WIDTH: f32 = 291.0;
pub const SMALL_TALL_HEIGHT: f32 = 227.0;
/// Walking enemy size
pub const GOOMBA_WIDTH: f32 = 43.0;
pub const GOOMBA_HEIGHT: f32 = 50.0;
/// Collectible size
pub const COLLECTIBLE_SIZE: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_platform_sprite")]
    pub sprite: SpriteKey,
}

fn default_platform_sprite() -> SpriteKey {
    SpriteKey::Platform
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    /// Horizontal walk speed (negative walks left first)
    pub vx: f32,
    /// Walk distance before turning; absent means walk forever
    #[serde(default)]
    pub patrol_distance: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpec {
    pub x: f32,
    pub y: f32,
    pub kind: CollectibleKind,
    pub value: u32,
}

/// Initial layout of a platformer level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelScript {
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpec>,
    /// Scroll offset past which the level counts as won
    #[serde(default = "default_win_scroll")]
    pub win_scroll: f32,
}

fn default_win_scroll() -> f32 {
    WIN_SCROLL_OFFSET
}

impl Default for LevelScript {
    fn default() -> Self {
        Self::first_level()
    }
}

impl LevelScript {
    /// Empty level with no geometry
    pub fn empty() -> Self {
        Self {
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            win_scroll: WIN_SCROLL_OFFSET,
        }
    }

    /// Built-in level: ground tiles with two pits, a raised ledge,
    /// patrolling enemies and a few pickups
    pub fn first_level() -> Self {
        let ground_y = 470.0;
        let tile = PLATFORM_WIDTH - 1.0;
        let ground = |x: f32| PlatformSpec {
            x,
            y: ground_y,
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            sprite: SpriteKey::Platform,
        };
        let coin = |x: f32, y: f32| CollectibleSpec {
            x,
            y,
            kind: CollectibleKind::Coin,
            value: 10,
        };

        Self {
            platforms: vec![
                ground(-1.0),
                ground(tile),
                ground(tile * 2.0 + 100.0),
                PlatformSpec {
                    x: tile * 3.0 + 150.0,
                    y: ground_y - SMALL_TALL_HEIGHT + PLATFORM_HEIGHT - 100.0,
                    width: SMALL_TALL_WIDTH,
                    height: SMALL_TALL_HEIGHT,
                    sprite: SpriteKey::PlatformSmallTall,
                },
                ground(tile * 3.0 + 300.0),
                ground(tile * 4.0 + 300.0),
            ],
            enemies: vec![
                EnemySpec {
                    x: 800.0,
                    y: 100.0,
                    vx: -0.3,
                    patrol_distance: Some(200.0),
                },
                EnemySpec {
                    x: tile * 2.0 + 400.0,
                    y: 100.0,
                    vx: -0.5,
                    patrol_distance: Some(300.0),
                },
            ],
            collectibles: vec![
                coin(400.0, 400.0),
                coin(460.0, 400.0),
                coin(tile * 2.0 + 250.0, 380.0),
                CollectibleSpec {
                    x: tile * 3.0 + 280.0,
                    y: 150.0,
                    kind: CollectibleKind::Gem,
                    value: 50,
                },
            ],
            win_scroll: WIN_SCROLL_OFFSET,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a level from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Append the level's entities to `store`
    pub fn populate(&self, store: &mut EntityStore) {
        for p in &self.platforms {
            store.spawn(
                Vec2::new(p.x, p.y),
                Vec2::ZERO,
                Shape::rect(p.width, p.height),
                EntityData::Platform { sprite: p.sprite },
            );
        }
        for e in &self.enemies {
            store.spawn(
                Vec2::new(e.x, e.y),
                Vec2::new(e.vx, 0.0),
                Shape::rect(GOOMBA_WIDTH, GOOMBA_HEIGHT),
                EntityData::Enemy {
                    visual: Visual::Sprite(SpriteKey::Goomba),
                    patrol: e.patrol_distance.map(Patrol::new),
                },
            );
        }
        for c in &self.collectibles {
            store.spawn(
                Vec2::new(c.x, c.y),
                Vec2::ZERO,
                Shape::rect(COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
                EntityData::Collectible {
                    kind: c.kind,
                    value: c.value,
                },
            );
        }
        log::info!(
            "Level populated: {} platforms, {} enemies, {} collectibles",
            self.platforms.len(),
            self.enemies.len(),
            self.collectibles.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    #[test]
    fn test_first_level_populates_store() {
        let level = LevelScript::first_level();
        let mut store = EntityStore::new(Vec2::new(100.0, 100.0), Shape::rect(30.0, 30.0));
        level.populate(&mut store);
        assert_eq!(store.count(EntityKind::Platform), level.platforms.len());
        assert_eq!(store.count(EntityKind::Enemy), level.enemies.len());
        assert_eq!(store.count(EntityKind::Collectible), level.collectibles.len());
        assert!(store
            .enemies
            .iter()
            .all(|e| matches!(e.data, EntityData::Enemy { patrol: Some(_), .. })));
    }

    #[test]
    fn test_level_from_json_defaults() {
        let level = LevelScript::from_json_str(
            r#"{ "platforms": [ { "x": 0, "y": 400, "width": 200, "height": 50 } ] }"#,
        )
        .unwrap();
        assert_eq!(level.platforms.len(), 1);
        assert_eq!(level.platforms[0].sprite, SpriteKey::Platform);
        assert!(level.enemies.is_empty());
        assert_eq!(level.win_scroll, WIN_SCROLL_OFFSET);
    }

    #[test]
    fn test_level_json_rejects_garbage() {
        assert!(LevelScript::from_json_str("[]").is_err());
    }
}
