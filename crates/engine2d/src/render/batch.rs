//! # Draw Batches
//!
//! [`Batch`] is the backend interface the render aggregator talks to.
//! [`RecordingBatch`] is an in-memory implementation that stores draw
//! commands instead of submitting them, useful for headless tools and
//! tests.

use parking_lot::Mutex;
use std::sync::Arc;

use super::PriorityLevel;
use crate::foundation::math::{Color, Vec2};

/// Something a batch knows how to draw
pub trait Drawable: Send + Sync {
    /// Width in pixels
    fn width(&self) -> f32;
    /// Height in pixels
    fn height(&self) -> f32;
    /// Name used in logs and recorded commands
    fn name(&self) -> &str {
        "drawable"
    }
}

/// A backend draw batch
///
/// Every `draw` happens between one `begin` and the matching `end`.
pub trait Batch: Send {
    /// Start a run of draws
    fn begin(&mut self);

    /// Queue one drawable
    fn draw(
        &mut self,
        drawable: &dyn Drawable,
        position: Vec2,
        scale: Vec2,
        rotation: f32,
        tint: Color,
        alpha: f32,
    );

    /// Finish the current run
    fn end(&mut self);
}

/// Which of the two batches a tier is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// World-space batch
    World,
    /// Screen-space batch
    Hud,
}

/// The world and HUD batches owned by a world
pub struct Batches {
    world: Box<dyn Batch>,
    hud: Box<dyn Batch>,
}

impl Batches {
    /// Pair a world batch with a HUD batch
    pub fn new(world: Box<dyn Batch>, hud: Box<dyn Batch>) -> Self {
        Self { world, hud }
    }

    /// Which batch draws `level`
    pub fn kind_for(level: PriorityLevel) -> BatchKind {
        level.batch_kind()
    }

    /// Batch of the given kind
    pub fn get_mut(&mut self, kind: BatchKind) -> &mut dyn Batch {
        match kind {
            BatchKind::World => self.world.as_mut(),
            BatchKind::Hud => self.hud.as_mut(),
        }
    }
}

/// One recorded call on a [`RecordingBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `begin` was called
    Begin,
    /// `draw` was called
    Draw {
        /// [`Drawable::name`] of the drawn item
        name: String,
        /// Top-left position
        position: Vec2,
        /// Scale factor
        scale: Vec2,
        /// Rotation in degrees
        rotation: f32,
        /// Tint color
        tint: Color,
        /// Opacity
        alpha: f32,
    },
    /// `end` was called
    End,
}

/// Counters kept by a [`RecordingBatch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Completed begin/end runs
    pub runs: usize,
    /// Total draws
    pub draws: usize,
}

/// Batch that records commands into a shared buffer
///
/// Clones share the buffer, so keep one clone to inspect what the world drew.
#[derive(Debug, Clone, Default)]
pub struct RecordingBatch {
    commands: Arc<Mutex<Vec<DrawCommand>>>,
    in_run: bool,
}

impl RecordingBatch {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.lock().clone()
    }

    /// Names of drawn items, in draw order
    pub fn drawn_names(&self) -> Vec<String> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Draw { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Run and draw counters
    pub fn stats(&self) -> BatchStats {
        let commands = self.commands.lock();
        BatchStats {
            runs: commands.iter().filter(|command| **command == DrawCommand::End).count(),
            draws: commands.iter().filter(|command| matches!(command, DrawCommand::Draw { .. })).count(),
        }
    }

    /// Forget everything recorded
    pub fn clear(&self) {
        self.commands.lock().clear();
    }
}

impl Batch for RecordingBatch {
    fn begin(&mut self) {
        if self.in_run {
            log::warn!("RecordingBatch::begin called twice without end");
        }
        self.in_run = true;
        self.commands.lock().push(DrawCommand::Begin);
    }

    fn draw(
        &mut self,
        drawable: &dyn Drawable,
        position: Vec2,
        scale: Vec2,
        rotation: f32,
        tint: Color,
        alpha: f32,
    ) {
        if !self.in_run {
            log::warn!("RecordingBatch::draw called outside begin/end");
        }
        self.commands.lock().push(DrawCommand::Draw {
            name: drawable.name().to_string(),
            position,
            scale,
            rotation,
            tint,
            alpha,
        });
    }

    fn end(&mut self) {
        self.in_run = false;
        self.commands.lock().push(DrawCommand::End);
    }
}
