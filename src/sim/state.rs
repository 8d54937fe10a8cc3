//! Game state, input state and input events

use serde::{Deserialize, Serialize};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entity store being (re)populated
    Initializing,
    /// Frame ticks advance the simulation
    Running,
    /// Run ended; waits for a restart
    GameOver,
}

/// Score and progress, reset on restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub phase: GamePhase,
    /// Cumulative horizontal camera displacement (platformer only)
    pub scroll_offset: f32,
    /// Latched once the scroll offset passes the level's win threshold
    pub win_detected: bool,
    /// Frames simulated since the last restart
    pub frame: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            phase: GamePhase::Initializing,
            scroll_offset: 0.0,
            win_detected: false,
            frame: 0,
        }
    }
}

impl GameState {
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

/// Discrete input signals from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MoveLeftStart,
    MoveLeftEnd,
    MoveRightStart,
    MoveRightEnd,
    Jump,
    /// Fire a projectile along `angle` (radians, screen space)
    Fire { angle: f32 },
}

/// Held keys and pending one-shot actions, read every frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub last_direction: Direction,
    /// Jump pressed since the last frame tick
    pub jump_requested: bool,
}

impl InputState {
    /// Apply a key-style event. `Fire` carries no held state and is ignored here.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeftStart => {
                self.left = true;
                self.last_direction = Direction::Left;
            }
            InputEvent::MoveLeftEnd => self.left = false,
            InputEvent::MoveRightStart => {
                self.right = true;
                self.last_direction = Direction::Right;
            }
            InputEvent::MoveRightEnd => self.right = false,
            InputEvent::Jump => self.jump_requested = true,
            InputEvent::Fire { .. } => {}
        }
    }

    /// Consume the pending jump request
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }
}
