//! Game configuration

use engine2d::prelude::*;
use serde::{Deserialize, Serialize};

/// Court and gameplay settings
///
/// ```toml
/// court_width = 800.0
/// court_height = 600.0
/// ball_speed = 300.0
/// paddle_speed = 240.0
/// particles = 256
///
/// [engine]
/// max_frames = 3600
///
/// [engine.world]
/// headless = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Court width in pixels
    pub court_width: f32,
    /// Court height in pixels
    pub court_height: f32,
    /// Serve speed of the ball
    pub ball_speed: f32,
    /// Maximum paddle speed
    pub paddle_speed: f32,
    /// Decorative particles drifting across the court
    pub particles: usize,
    /// Engine settings
    pub engine: EngineConfig,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            court_width: 800.0,
            court_height: 600.0,
            ball_speed: 300.0,
            paddle_speed: 240.0,
            particles: 256,
            engine: EngineConfig::new()
                .with_max_frames(3600)
                .with_world(WorldConfig::headless()),
        }
    }
}

impl PongConfig {
    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.court_width <= 0.0 || self.court_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "court_width/court_height",
                reason: "the court needs a positive size".to_string(),
            });
        }
        if self.ball_speed <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "ball_speed",
                reason: format!("{} is not a usable serve speed", self.ball_speed),
            });
        }
        self.engine.validate()
    }
}

impl Config for PongConfig {}
