//! Collision participation

use bitflags::bitflags;

use crate::ecs::component::{Component, ComponentKind};
use crate::foundation::math::Vec2;
use crate::physics::Aabb;

bitflags! {
    /// How an entity takes part in collision checks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionFlags: u8 {
        /// Actively tests itself against every other collision member
        const PROBE = 1 << 0;
        /// Physically separated from other solid entities on overlap
        const SOLID = 1 << 1;
    }
}

/// Collision settings for one entity
///
/// Only probes look for overlaps; a non-probe is found only when a probe
/// tests against it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionComponent {
    /// Participation flags
    pub flags: CollisionFlags,
    /// Margin added to the box before testing, half on each side
    pub extra: Vec2,
}

impl CollisionComponent {
    /// Create a component with the given flags and no margin
    pub fn new(flags: CollisionFlags) -> Self {
        Self { flags, extra: Vec2::zeros() }
    }

    /// Probe that is also pushed out of solid entities
    pub fn solid_probe() -> Self {
        Self::new(CollisionFlags::PROBE | CollisionFlags::SOLID)
    }

    /// Solid obstacle that never probes
    pub fn solid() -> Self {
        Self::new(CollisionFlags::SOLID)
    }

    /// Set the inflation margin
    #[must_use]
    pub fn with_extra(mut self, extra: Vec2) -> Self {
        self.extra = extra;
        self
    }

    /// Whether this entity searches for overlaps
    pub fn is_probe(&self) -> bool {
        self.flags.contains(CollisionFlags::PROBE)
    }

    /// Whether this entity takes part in separation
    pub fn is_solid(&self) -> bool {
        self.flags.contains(CollisionFlags::SOLID)
    }

    /// `aabb` grown by this component's margin
    pub fn inflate(&self, aabb: &Aabb) -> Aabb {
        aabb.inflated(self.extra)
    }
}

impl Component for CollisionComponent {
    fn kind() -> ComponentKind {
        ComponentKind::Collision
    }
}
