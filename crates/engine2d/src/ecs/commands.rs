//! Deferred world mutations
//!
//! Systems run with shared access to the world, so structural changes they
//! request are queued here and applied at the start of the next frame.

use super::entity::{Entity, EntityId};

/// A structural change queued through [`super::Context`]
pub(crate) enum WorldCommand {
    Spawn(Entity),
    Despawn(EntityId),
}

impl std::fmt::Debug for WorldCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(entity) => write!(f, "Spawn({})", entity.id()),
            Self::Despawn(id) => write!(f, "Despawn({id})"),
        }
    }
}
