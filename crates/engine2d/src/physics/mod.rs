//! Physics module for collision detection and response
//!
//! Only axis-aligned overlap correction is provided: an overlap test and
//! the minimum translation that separates two boxes.

pub mod aabb;

pub use aabb::{Aabb, is_intersecting, minimum_translation};
