//! Simulation configuration
//!
//! Picks the game variant and holds every tunable the core reads each frame.
//! Loadable from JSON; out-of-range values are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading configuration or level data
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which game the core simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Fixed player in the middle, enemies converge from the edges
    #[default]
    TopDown,
    /// Side-scrolling platformer with gravity and scripted levels
    Platformer,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::TopDown => "top-down",
            Variant::Platformer => "platformer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top-down" | "topdown" | "shooter" => Some(Variant::TopDown),
            "platformer" | "side-scroller" | "scroller" => Some(Variant::Platformer),
            _ => None,
        }
    }
}

/// What the viewport bottom does to falling entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FloorPolicy {
    /// Vertical velocity is clamped to zero at the viewport bottom
    Solid,
    /// Entities fall through the bottom (death pit)
    #[default]
    Pit,
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub variant: Variant,
    /// RNG seed for spawns and particles
    pub seed: u64,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Top-down ===
    /// Enemy spawn timer period
    pub spawn_period_ms: u32,
    pub enemy_speed: f32,
    pub projectile_speed: f32,
    /// Live particle cap (0 disables bursts)
    pub max_particles: usize,

    // === Platformer ===
    pub gravity: f32,
    pub player_speed: f32,
    pub jump_speed: f32,
    pub stomp_bounce: f32,
    pub max_jumps: u8,
    pub floor: FloorPolicy,

    /// Return to Initializing immediately after GameOver
    pub auto_restart: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::top_down()
    }
}

impl SimConfig {
    /// Top-down shooter preset (restart is left to the host)
    pub fn top_down() -> Self {
        Self {
            variant: Variant::TopDown,
            seed: 0x5EED,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            spawn_period_ms: SPAWN_PERIOD_MS,
            enemy_speed: ENEMY_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            max_particles: MAX_PARTICLES,
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            jump_speed: JUMP_SPEED,
            stomp_bounce: STOMP_BOUNCE,
            max_jumps: MAX_JUMPS,
            floor: FloorPolicy::Pit,
            auto_restart: false,
        }
    }

    /// Platformer preset (falling into a pit restarts the level)
    pub fn platformer() -> Self {
        Self {
            variant: Variant::Platformer,
            auto_restart: true,
            ..Self::top_down()
        }
    }

    /// Preset for a variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::TopDown => Self::top_down(),
            Variant::Platformer => Self::platformer(),
        }
    }

    /// Parse config from a JSON object
    ///
    /// Missing fields come from the preset of the named variant (top-down
    /// when `variant` is absent), so a partial platformer config still
    /// auto-restarts.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let Some(fields) = overrides.as_object() else {
            return Err(ConfigError::Parse(serde::de::Error::custom(
                "config must be a JSON object",
            )));
        };
        let variant: Variant = match fields.get("variant") {
            Some(v) => serde_json::from_value(v.clone())?,
            None => Variant::default(),
        };

        let mut merged = serde_json::to_value(Self::for_variant(variant))?;
        if let Some(base) = merged.as_object_mut() {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }
        let config: SimConfig = serde_json::from_value(merged)?;
        Ok(config.sanitized())
    }

    /// Load config from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded {} config from {}", config.variant.as_str(), path);
        Ok(config)
    }

    /// Clamp values that would make the simulation degenerate
    pub fn sanitized(mut self) -> Self {
        fn clamp_min(name: &str, value: &mut f32, min: f32) {
            if !value.is_finite() || *value < min {
                log::warn!("config {} = {} clamped to {}", name, value, min);
                *value = min;
            }
        }

        clamp_min("viewport_width", &mut self.viewport_width, 1.0);
        clamp_min("viewport_height", &mut self.viewport_height, 1.0);
        clamp_min("enemy_speed", &mut self.enemy_speed, 0.0);
        clamp_min("projectile_speed", &mut self.projectile_speed, 0.0);
        clamp_min("gravity", &mut self.gravity, 0.0);
        clamp_min("player_speed", &mut self.player_speed, 0.0);
        clamp_min("jump_speed", &mut self.jump_speed, 0.0);
        clamp_min("stomp_bounce", &mut self.stomp_bounce, 0.0);

        if self.spawn_period_ms == 0 {
            log::warn!("config spawn_period_ms = 0 clamped to 1");
            self.spawn_period_ms = 1;
        }
        self
    }

    /// Center of the viewport
    pub fn viewport_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_round_trip_names() {
        for variant in [Variant::TopDown, Variant::Platformer] {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_str("Shooter"), Some(Variant::TopDown));
        assert_eq!(Variant::from_str("racing"), None);
    }

    #[test]
    fn test_presets() {
        let top = SimConfig::top_down();
        assert_eq!(top.variant, Variant::TopDown);
        assert!(!top.auto_restart);

        let plat = SimConfig::platformer();
        assert_eq!(plat.variant, Variant::Platformer);
        assert!(plat.auto_restart);
        assert_eq!(plat.floor, FloorPolicy::Pit);
        assert_eq!(SimConfig::default(), top);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimConfig::from_json_str(r#"{ "variant": "Platformer", "gravity": 1.5 }"#).unwrap();
        assert_eq!(config.variant, Variant::Platformer);
        assert_eq!(config.gravity, 1.5);
        assert_eq!(config.viewport_width, VIEWPORT_WIDTH);
    }

    #[test]
    fn test_partial_platformer_json_keeps_platformer_preset() {
        let config = SimConfig::from_json_str(r#"{ "variant": "Platformer" }"#).unwrap();
        assert_eq!(config, SimConfig::platformer());
        assert!(config.auto_restart);

        let explicit =
            SimConfig::from_json_str(r#"{ "variant": "Platformer", "auto_restart": false }"#)
                .unwrap();
        assert!(!explicit.auto_restart);

        let no_variant = SimConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(no_variant.variant, Variant::TopDown);
        assert!(!no_variant.auto_restart);
    }

    #[test]
    fn test_non_object_json_is_parse_error() {
        let err = SimConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_are_clamped() {
        let config = SimConfig::from_json_str(
            r#"{ "viewport_width": -10.0, "gravity": -1.0, "spawn_period_ms": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.viewport_width, 1.0);
        assert_eq!(config.gravity, 0.0);
        assert_eq!(config.spawn_period_ms, 1);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
