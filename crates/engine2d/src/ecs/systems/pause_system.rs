//! Pause gate
//!
//! Listens for [`PauseMessage`] and flips the world's pause flag. While the
//! world is paused, systems that respect the pause skip every member that
//! lacks an [`UnpauseComponent`](crate::ecs::components::UnpauseComponent).

use crate::ecs::context::Context;
use crate::ecs::entity::Entity;
use crate::ecs::system::{EntitySet, System};
use crate::events::PauseMessage;

/// Toggles the world pause flag in response to [`PauseMessage`]
#[derive(Default)]
pub struct PauseSystem {
    members: EntitySet,
}

impl PauseSystem {
    /// Kind name entities list to join this system
    pub const KIND: &'static str = "PauseSystem";

    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for PauseSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn initialize(&mut self, context: &Context) {
        let flags = context.flags();
        context.bus().subscribe_to::<PauseMessage, _>(PauseMessage::TOPIC, move |message| {
            if flags.is_paused() != message.pause {
                log::info!("{}", if message.pause { "Paused" } else { "Resumed" });
            }
            flags.set_paused(message.pause);
        });
    }

    fn update(&self, _entity: &Entity, _dt: f32) {}
}
