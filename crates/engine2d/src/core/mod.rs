//! # Core Engine Module
//!
//! Shared configuration used before the frame loop starts.

pub mod config;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    ConfigFormat,
    EngineConfig,
    WorldConfig,
};
