//! Pause exemption

use crate::ecs::component::{Component, ComponentKind};

/// Marks an entity that keeps updating while the world is paused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpauseComponent;

impl Component for UnpauseComponent {
    fn kind() -> ComponentKind {
        ComponentKind::Unpause
    }
}
