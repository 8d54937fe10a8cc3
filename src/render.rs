//! Render query
//!
//! The core never draws. Each frame a host asks for a `RenderFrame`, a flat
//! list of live entities in paint order plus the HUD values, and paints it
//! however it likes (canvas, terminal, test assertions).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Variant;
use crate::sim::entity::{Entity, EntityData, EntityKind, Shape, SpriteKey, Visual};
use crate::sim::state::{Direction, GamePhase, InputState};
use crate::sim::world::World;

/// One paintable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: u32,
    pub kind: EntityKind,
    /// Circle center or rectangle top-left
    pub pos: Vec2,
    pub shape: Shape,
    pub visual: Visual,
    pub alpha: f32,
    /// Animation frame for explosions
    pub frame: Option<u32>,
}

impl RenderItem {
    fn from_entity(entity: &Entity) -> Self {
        let frame = match entity.data {
            EntityData::Explosion { frame, .. } => Some(frame),
            _ => None,
        };
        Self {
            id: entity.id,
            kind: entity.kind(),
            pos: entity.pos,
            shape: entity.shape,
            visual: entity.visual(),
            alpha: entity.alpha(),
            frame,
        }
    }
}

/// Snapshot of everything a drawing host needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub items: Vec<RenderItem>,
    pub score: u64,
    pub phase: GamePhase,
    pub scroll_offset: f32,
    pub win_detected: bool,
}

impl RenderFrame {
    pub fn capture(world: &World) -> Self {
        let platformer = world.config().variant == Variant::Platformer;
        let items = world
            .store()
            .iter_live()
            .map(|entity| {
                let mut item = RenderItem::from_entity(entity);
                if platformer && item.kind == EntityKind::Player {
                    item.visual = Visual::Sprite(player_pose(world.input()));
                }
                item
            })
            .collect();

        let state = world.state();
        Self {
            items,
            score: state.score,
            phase: state.phase,
            scroll_offset: state.scroll_offset,
            win_detected: state.win_detected,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Items of one kind, in paint order
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &RenderItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }
}

/// Platformer player sprite from facing and held movement keys
pub fn player_pose(input: &InputState) -> SpriteKey {
    let running = input.left || input.right;
    match (input.last_direction, running) {
        (Direction::Left, false) => SpriteKey::PlayerStandLeft,
        (Direction::Right, false) => SpriteKey::PlayerStandRight,
        (Direction::Left, true) => SpriteKey::PlayerRunLeft,
        (Direction::Right, true) => SpriteKey::PlayerRunRight,
    }
}
