//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types for the 2D simulation plane
//! - Frame timing (the clock capability)
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
