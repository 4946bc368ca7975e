//! Position and size

use serde::{Deserialize, Serialize};

use crate::ecs::component::{Component, ComponentKind};
use crate::foundation::math::Vec2;
use crate::physics::Aabb;

/// Where an entity is and how big it is
///
/// `position` is the top-left corner; the box extends `width` to the right
/// and `height` down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceComponent {
    /// Top-left corner
    pub position: Vec2,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl SpaceComponent {
    /// Create a space component
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self { position, width, height }
    }

    /// Bounding box covering the component
    pub fn aabb(&self) -> Aabb {
        Aabb::from_position_size(self.position, Vec2::new(self.width, self.height))
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) / 2.0
    }
}

impl Component for SpaceComponent {
    fn kind() -> ComponentKind {
        ComponentKind::Space
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;

    #[test]
    fn test_aabb_spans_size() {
        let space = SpaceComponent::new(vec2(2.0, 3.0), 4.0, 5.0);
        let aabb = space.aabb();
        assert_eq!(aabb.min, vec2(2.0, 3.0));
        assert_eq!(aabb.max, vec2(6.0, 8.0));
        assert_eq!(space.center(), vec2(4.0, 5.5));
    }
}
