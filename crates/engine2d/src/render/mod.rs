//! # Rendering Seam
//!
//! The engine does not own a graphics backend. Applications hand the world
//! a pair of [`Batch`] implementations (one for world-space drawing, one
//! for the HUD) and attach a [`Drawable`] to each visible entity. The render
//! aggregator system walks entities tier by tier and forwards them to the
//! right batch.
//!
//! ## Priority tiers
//!
//! | Level          | Value | Batch |
//! |----------------|-------|-------|
//! | `HIDDEN`       | -1    | never drawn |
//! | `BACKGROUND`   | 0     | world |
//! | `SCENIC`       | 10    | world |
//! | `MIDDLE`       | 20    | world |
//! | `FOREGROUND`   | 30    | world |
//! | `HUD`          | 40    | HUD   |
//! | `HIGHEST`      | 50    | HUD   |
//!
//! Any value in between is a valid tier of its own.

pub mod batch;

pub use batch::{Batch, BatchKind, BatchStats, Batches, DrawCommand, Drawable, RecordingBatch};

use serde::{Deserialize, Serialize};

/// Draw order bucket; lower levels are drawn first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriorityLevel(pub i32);

impl PriorityLevel {
    /// Never drawn
    pub const HIDDEN: Self = Self(-1);
    /// Lowest drawn tier
    pub const BACKGROUND: Self = Self(0);
    /// Scenery
    pub const SCENIC: Self = Self(10);
    /// Default tier for game objects
    pub const MIDDLE: Self = Self(20);
    /// Drawn over game objects
    pub const FOREGROUND: Self = Self(30);
    /// First tier drawn with the HUD batch
    pub const HUD: Self = Self(40);
    /// Highest drawn tier
    pub const HIGHEST: Self = Self(50);

    /// Whether entities at this level are drawn at all
    pub fn is_visible(self) -> bool {
        self >= Self::BACKGROUND && self <= Self::HIGHEST
    }

    /// Batch that draws this level
    pub fn batch_kind(self) -> BatchKind {
        if self >= Self::HUD {
            BatchKind::Hud
        } else {
            BatchKind::World
        }
    }
}

impl Default for PriorityLevel {
    fn default() -> Self {
        Self::MIDDLE
    }
}

impl From<i32> for PriorityLevel {
    fn from(level: i32) -> Self {
        Self(level)
    }
}
