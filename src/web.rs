//! Browser host bindings
//!
//! A JavaScript page owns the canvas, the `requestAnimationFrame` loop and
//! the interval timer; it calls into `WebGame` for every boundary event and
//! paints the JSON render frame it gets back.

use wasm_bindgen::prelude::*;

use crate::settings::{SimConfig, Variant};
use crate::sim::level::LevelScript;
use crate::sim::state::InputEvent;
use crate::sim::world::World;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Arcade sim loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    world: World,
    last_spawn_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run of the named variant ("top-down" or "platformer")
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> WebGame {
        let variant = Variant::from_str(variant).unwrap_or_else(|| {
            log::warn!("Unknown variant {:?}, using top-down", variant);
            Variant::TopDown
        });
        let mut config = SimConfig::for_variant(variant);
        config.seed = js_sys::Date::now() as u64;
        Self::from_config(config)
    }

    /// Start a run from a JSON `SimConfig`
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<WebGame, JsValue> {
        let config = SimConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_config(config))
    }

    /// Replace the platformer level with a JSON `LevelScript` and restart
    #[wasm_bindgen(js_name = loadLevelJson)]
    pub fn load_level_json(&mut self, json: &str) -> Result<(), JsValue> {
        let level = LevelScript::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.world = World::with_level(self.world.config().clone(), level);
        self.last_spawn_time = None;
        Ok(())
    }

    /// Per-refresh callback. Also drives the spawn clock from `now_ms`
    /// (a `performance.now()` reading) so a page needs only one loop.
    #[wasm_bindgen(js_name = frameTick)]
    pub fn frame_tick(&mut self, now_ms: f64) {
        if let Some(last) = self.last_spawn_time {
            self.world.advance_spawn_clock(now_ms - last);
        }
        self.last_spawn_time = Some(now_ms);
        self.world.frame_tick();
    }

    /// Interval-timer callback for pages that run their own spawn timer
    #[wasm_bindgen(js_name = spawnTick)]
    pub fn spawn_tick(&mut self) {
        self.world.spawn_tick();
    }

    /// Key event: `code` is a `KeyboardEvent.code`, `pressed` is keydown
    #[wasm_bindgen(js_name = keyEvent)]
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        let event = match (code, pressed) {
            ("ArrowLeft" | "KeyA", true) => InputEvent::MoveLeftStart,
            ("ArrowLeft" | "KeyA", false) => InputEvent::MoveLeftEnd,
            ("ArrowRight" | "KeyD", true) => InputEvent::MoveRightStart,
            ("ArrowRight" | "KeyD", false) => InputEvent::MoveRightEnd,
            ("ArrowUp" | "KeyW" | "Space", true) => InputEvent::Jump,
            _ => return,
        };
        self.world.handle_input(event);
    }

    /// Fire toward a canvas point (top-down)
    pub fn fire(&mut self, x: f32, y: f32) {
        let from = self.world.store().player.center();
        let angle = crate::aim_angle(from, glam::Vec2::new(x, y));
        self.world.handle_input(InputEvent::Fire { angle });
    }

    pub fn restart(&mut self) {
        self.world.restart();
        self.last_spawn_time = None;
    }

    /// Render frame as JSON
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&self) -> Result<String, JsValue> {
        self.world
            .render_frame()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn score(&self) -> f64 {
        self.world.score() as f64
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.world.is_running()
    }
}

impl WebGame {
    fn from_config(config: SimConfig) -> Self {
        Self {
            world: World::new(config),
            last_spawn_time: None,
        }
    }
}
