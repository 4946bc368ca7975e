//! Game-specific components

use engine2d::prelude::*;

/// Linear velocity in units per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedComponent {
    /// Current velocity
    pub velocity: Vec2,
}

impl SpeedComponent {
    /// Create a speed component
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

impl Component for SpeedComponent {}

/// Which goal a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left edge of the court
    Left,
    /// Right edge of the court
    Right,
}

/// Marks a paddle and its tracking speed
#[derive(Debug, Clone, Copy)]
pub struct PaddleComponent {
    /// Defended side
    pub side: Side,
    /// Maximum vertical speed
    pub speed: f32,
}

impl Component for PaddleComponent {}

/// Marks the ball
#[derive(Debug, Clone, Copy, Default)]
pub struct BallComponent {
    /// Speed the ball is served with
    pub serve_speed: f32,
}

impl Component for BallComponent {}

/// Plain colored rectangle, the only drawable this game uses
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Drawable for Rect {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn name(&self) -> &str {
        "rect"
    }
}

/// Published when the ball leaves the court
#[derive(Debug, Clone, Copy)]
pub struct ScoreMessage {
    /// Side that scored
    pub scorer: Side,
}

impl ScoreMessage {
    /// Topic name
    pub const TOPIC: &'static str = "ScoreMessage";
}

impl Message for ScoreMessage {
    fn topic(&self) -> &str {
        Self::TOPIC
    }
}
