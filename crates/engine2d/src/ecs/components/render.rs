//! Drawing parameters

use std::fmt;
use std::sync::Arc;

use crate::ecs::component::{Component, ComponentKind};
use crate::foundation::math::{Color, Vec2};
use crate::render::{Drawable, PriorityLevel};

/// What to draw for an entity and how
///
/// Changing `priority` or `drawable` on a live entity only takes effect
/// after a [`crate::events::RenderChanged`] message.
#[derive(Clone)]
pub struct RenderComponent {
    /// The thing to draw
    pub drawable: Arc<dyn Drawable>,
    /// Scale factor
    pub scale: Vec2,
    /// Tint color
    pub color: Color,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Draw tier
    pub priority: PriorityLevel,
    /// Free-form label
    pub label: String,
}

impl RenderComponent {
    /// Draw `drawable` untinted at unit scale in the middle tier
    pub fn new(drawable: Arc<dyn Drawable>) -> Self {
        Self {
            drawable,
            scale: Vec2::new(1.0, 1.0),
            color: Color::WHITE,
            alpha: 1.0,
            rotation: 0.0,
            priority: PriorityLevel::default(),
            label: String::new(),
        }
    }

    /// Set the draw tier
    #[must_use]
    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Set the tint
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Move to another tier; publish [`crate::events::RenderChanged`] afterwards
    pub fn set_priority(&mut self, priority: PriorityLevel) {
        self.priority = priority;
    }

    /// Swap the drawable; publish [`crate::events::RenderChanged`] afterwards
    pub fn set_drawable(&mut self, drawable: Arc<dyn Drawable>) {
        self.drawable = drawable;
    }

    /// Set the label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl fmt::Debug for RenderComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderComponent")
            .field("drawable", &self.drawable.name())
            .field("priority", &self.priority)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Component for RenderComponent {
    fn kind() -> ComponentKind {
        ComponentKind::Render
    }
}
