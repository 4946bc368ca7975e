//! # Engine Configuration
//!
//! Settings consumed before the frame loop starts. Invalid values are
//! rejected with [`ConfigError::InvalidValue`], never silently clamped.
//!
//! ```toml
//! log_level = "info"
//! fps_limit = 120
//!
//! [world]
//! headless = true
//! worker_threads = 4
//! serial_threshold_factor = 2
//! ```

use serde::{Serialize, Deserialize};
use std::num::NonZeroUsize;

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// Default multiplier applied to the worker count to get the serial threshold
pub const DEFAULT_SERIAL_THRESHOLD_FACTOR: usize = 2;

/// # World Configuration
///
/// Controls how the scheduler dispatches per-entity updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Run without graphics output; headless-skippable systems never run
    pub headless: bool,
    /// Size of the worker pool (`None` = available parallelism)
    pub worker_threads: Option<usize>,
    /// A system whose entity count is below `factor * workers` runs serially
    pub serial_threshold_factor: usize,
}

impl WorldConfig {
    /// Create a configuration for a windowed world
    pub fn new() -> Self {
        Self {
            headless: false,
            worker_threads: None,
            serial_threshold_factor: DEFAULT_SERIAL_THRESHOLD_FACTOR,
        }
    }

    /// Create a configuration for a headless world
    pub fn headless() -> Self {
        Self::new().with_headless(true)
    }

    /// Enable or disable headless mode
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Request an explicit worker count
    #[must_use]
    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = Some(workers);
        self
    }

    /// Set the serial threshold multiplier
    #[must_use]
    pub fn with_serial_threshold_factor(mut self, factor: usize) -> Self {
        self.serial_threshold_factor = factor;
        self
    }

    /// Worker count after resolving `None` against the host
    pub fn resolved_workers(&self) -> Result<usize, ConfigError> {
        match self.worker_threads {
            Some(0) => Err(ConfigError::InvalidValue {
                field: "worker_threads",
                reason: "the worker pool needs at least one thread".to_string(),
            }),
            Some(workers) => Ok(workers),
            None => Ok(std::thread::available_parallelism().map_or(1, NonZeroUsize::get)),
        }
    }

    /// Entity count at and above which a system fans out to the pool
    pub fn serial_threshold(&self) -> Result<usize, ConfigError> {
        let workers = self.resolved_workers()?;
        workers
            .checked_mul(self.serial_threshold_factor)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "serial_threshold_factor",
                reason: format!(
                    "{} workers x {} overflows",
                    workers, self.serial_threshold_factor
                ),
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.serial_threshold().map(|_| ())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Core engine behavior: logging, frame pacing and the world settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Frame rate cap for windowed runs (0 = unlimited)
    pub fps_limit: u32,
    /// Stop after this many frames (mostly for headless runs)
    pub max_frames: Option<u64>,
    /// Scheduler settings
    pub world: WorldConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fps_limit: 120,
            max_frames: None,
            world: WorldConfig::default(),
        }
    }
    
    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
    
    /// Set the frame rate cap (0 = unlimited)
    #[must_use]
    pub fn with_fps_limit(mut self, fps: u32) -> Self {
        self.fps_limit = fps;
        self
    }

    /// Stop the loop after `frames` frames
    #[must_use]
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }
    
    /// Replace the world settings
    #[must_use]
    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "log_level",
                reason: format!("unknown level `{}`", self.log_level),
            });
        }
        self.world.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_workers_rejected() {
        let config = WorldConfig::headless().with_worker_threads(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "worker_threads", .. })
        ));
    }

    #[test]
    fn test_serial_threshold_is_factor_times_workers() {
        let config = WorldConfig::headless().with_worker_threads(4);
        assert_eq!(config.serial_threshold().unwrap(), 8);

        let config = config.with_serial_threshold_factor(0);
        assert_eq!(config.serial_threshold().unwrap(), 0);
    }

    #[test]
    fn test_threshold_overflow_rejected() {
        let config = WorldConfig::headless()
            .with_worker_threads(2)
            .with_serial_threshold_factor(usize::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_workers_resolve_to_host() {
        let workers = WorldConfig::default().resolved_workers().unwrap();
        assert!(workers >= 1);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let config = EngineConfig::new().with_log_level("loud");
        assert!(config.validate().is_err());
        assert!(EngineConfig::new().with_log_level("debug").validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_keeps_world_section() {
        let config = EngineConfig::new()
            .with_max_frames(300)
            .with_world(WorldConfig::headless().with_worker_threads(3));
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let parsed: EngineConfig = toml::from_str("fps_limit = 30\n[world]\nheadless = true\n").unwrap();
        assert_eq!(parsed.fps_limit, 30);
        assert!(parsed.world.headless);
        assert_eq!(parsed.world.serial_threshold_factor, DEFAULT_SERIAL_THRESHOLD_FACTOR);
        assert_eq!(parsed.log_level, "info");
    }
}
