//! Shared runtime state handed to systems
//!
//! A [`Context`] is given to every system when it is registered. It is how
//! systems reach the message bus, the pause/exit flags and the deferred
//! spawn queue without holding a reference to the world.

use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::commands::WorldCommand;
use super::entity::Entity;
use crate::events::MessageBus;

/// Flags read by the scheduler every frame
#[derive(Debug, Default)]
pub struct WorldFlags {
    paused: AtomicBool,
    exit: AtomicBool,
}

impl WorldFlags {
    /// Whether the world is paused
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause or resume the world
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Ask the engine to stop after the current frame
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
    }

    fn take_exit(&self) -> bool {
        self.exit.swap(false, Ordering::AcqRel)
    }
}

/// Handle to the world's shared services
///
/// Event handlers should capture [`Context::flags`] or [`Context::bus_handle`]
/// rather than a whole `Context`, which keeps the bus from owning itself.
#[derive(Clone)]
pub struct Context {
    bus: Arc<MessageBus>,
    flags: Arc<WorldFlags>,
    headless: bool,
    commands: Sender<WorldCommand>,
}

impl Context {
    pub(crate) fn new(headless: bool) -> (Self, Receiver<WorldCommand>) {
        let (commands, receiver) = unbounded();
        let context = Self {
            bus: Arc::new(MessageBus::new()),
            flags: Arc::new(WorldFlags::default()),
            headless,
            commands,
        };
        (context, receiver)
    }

    /// The world's message bus
    #[inline]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Owned handle to the message bus, for capturing in closures
    pub fn bus_handle(&self) -> Arc<MessageBus> {
        Arc::clone(&self.bus)
    }

    /// Owned handle to the pause and exit flags
    pub fn flags(&self) -> Arc<WorldFlags> {
        Arc::clone(&self.flags)
    }

    /// Whether the world is paused
    pub fn is_paused(&self) -> bool {
        self.flags.is_paused()
    }

    /// Pause or resume the world
    pub fn set_paused(&self, paused: bool) {
        self.flags.set_paused(paused);
    }

    /// Whether the world runs without a renderer
    pub const fn is_headless(&self) -> bool {
        self.headless
    }

    /// Ask the engine to stop after the current frame
    pub fn request_exit(&self) {
        self.flags.request_exit();
    }

    pub(crate) fn take_exit_request(&self) -> bool {
        self.flags.take_exit()
    }

    /// Queue `entity` to be added at the start of the next frame
    pub fn spawn(&self, entity: Entity) {
        if self.commands.send(WorldCommand::Spawn(entity)).is_err() {
            log::warn!("Spawn requested after the world was dropped");
        }
    }

    /// Queue `entity` for removal at the start of the next frame
    ///
    /// The entity is marked dead immediately, so systems skip it for the
    /// rest of the current frame.
    pub fn despawn(&self, entity: &Entity) {
        entity.mark_dead();
        if self.commands.send(WorldCommand::Despawn(entity.id())).is_err() {
            log::warn!("Despawn of {} requested after the world was dropped", entity.id());
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("flags", &self.flags)
            .field("headless", &self.headless)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_request_is_consumed() {
        let (context, _commands) = Context::new(true);
        assert!(!context.take_exit_request());
        context.request_exit();
        assert!(context.take_exit_request());
        assert!(!context.take_exit_request());
    }

    #[test]
    fn test_pause_flag_shared_between_clones() {
        let (context, _commands) = Context::new(false);
        let flags = context.flags();
        context.clone().set_paused(true);
        assert!(flags.is_paused());
        flags.set_paused(false);
        assert!(!context.is_paused());
    }

    #[test]
    fn test_despawn_marks_dead_and_queues() {
        let (context, commands) = Context::new(true);
        let entity = Entity::new(["A"]);
        context.despawn(&entity);
        assert!(!entity.is_alive());
        assert!(matches!(commands.try_recv(), Ok(WorldCommand::Despawn(id)) if id == entity.id()));
    }
}
