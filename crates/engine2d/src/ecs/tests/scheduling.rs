//! Scheduler behavior: matching, pause gating, dispatch modes, deferred commands

use super::{parallel_world, serial_world, ticked, ticks, TickSystem, Ticks};
use crate::ecs::components::UnpauseComponent;
use crate::ecs::{Context, Entity, EntitySet, FrameStatus, System, World};
use crate::events::{MessageBus, PauseMessage, RenderChanged};
use crate::ecs::systems::PauseSystem;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_entity_only_joins_required_kinds() {
        let mut world = serial_world();
        let a = world.register_system(TickSystem::new("A"));
        let b = world.register_system(TickSystem::new("B"));

        world.add_entity(Entity::new(["A", "B"]));
        world.add_entity(Entity::new(["A"]));
        world.add_entity(Entity::new(["C"]));

        assert_eq!(a.read().members().len(), 2);
        assert_eq!(b.read().members().len(), 1);

        world.update(0.016);
        assert_eq!(a.read().calls(), 2);
        assert_eq!(b.read().calls(), 1);
    }

    #[test]
    fn test_late_registration_is_not_retroactive() {
        let mut world = serial_world();
        world.add_entity(ticked("Late"));
        let late = world.register_system(TickSystem::new("Late"));

        world.update(0.016);
        assert_eq!(late.read().calls(), 0);

        world.add_entity(ticked("Late"));
        world.update(0.016);
        assert_eq!(late.read().calls(), 1);
    }

    #[test]
    fn test_add_then_remove_never_updates() {
        let mut world = serial_world();
        let system = world.register_system(TickSystem::new("A"));
        let entity = ticked("A");

        world.add_entity(entity.clone());
        assert!(world.remove_entity(&entity));
        assert!(!entity.is_alive());

        for _ in 0..3 {
            world.update(0.016);
        }
        assert_eq!(system.read().calls(), 0);
        assert_eq!(ticks(&entity), 0);
        assert!(system.read().members().is_empty());
    }

    #[test]
    fn test_pause_gates_all_but_unpause_members() {
        let mut world = serial_world();
        let system = world.register_system(TickSystem::new("A"));
        let frozen = ticked("A");
        let exempt = ticked("A").with(UnpauseComponent);
        world.add_entities([frozen.clone(), exempt.clone()]);

        world.set_paused(true);
        for _ in 0..5 {
            world.update(0.016);
        }
        assert_eq!(ticks(&frozen), 0);
        assert_eq!(ticks(&exempt), 5);

        world.set_paused(false);
        world.update(0.016);
        assert_eq!(ticks(&frozen), 1);
        assert_eq!(ticks(&exempt), 6);
        assert_eq!(system.read().calls(), 7);
    }

    #[test]
    fn test_pause_gates_parallel_dispatch_too() {
        let mut world = parallel_world(3);
        world.register_system(TickSystem::new("A"));
        let frozen: Vec<_> = (0..10).map(|_| ticked("A")).collect();
        let exempt: Vec<_> = (0..10).map(|_| ticked("A").with(UnpauseComponent)).collect();
        world.add_entities(frozen.iter().cloned());
        world.add_entities(exempt.iter().cloned());

        world.set_paused(true);
        for _ in 0..4 {
            world.update(0.016);
        }

        assert!(frozen.iter().all(|entity| ticks(entity) == 0));
        assert!(exempt.iter().all(|entity| ticks(entity) == 4));
    }

    #[test]
    fn test_pause_system_reacts_to_message() {
        let mut world = serial_world();
        world.register_system(PauseSystem::new());
        let system = world.register_system(TickSystem::new("A"));
        let entity = ticked("A");
        world.add_entity(entity.clone());

        world.context().bus().dispatch(&PauseMessage { pause: true });
        world.update(0.016);
        assert!(world.is_paused());
        assert_eq!(ticks(&entity), 0);

        world.context().bus().dispatch(&PauseMessage { pause: false });
        world.update(0.016);
        assert_eq!(ticks(&entity), 1);
        assert_eq!(system.read().calls(), 1);
    }

    #[test]
    fn test_serial_and_parallel_dispatch_agree() {
        fn run(mut world: World) -> (usize, Vec<u32>) {
            let system = world.register_system(TickSystem::new("A"));
            let entities: Vec<_> = (0..64).map(|_| ticked("A")).collect();
            world.add_entities(entities.iter().cloned());
            for _ in 0..5 {
                world.update(0.016);
            }
            let calls = system.read().calls();
            (calls, entities.iter().map(ticks).collect())
        }

        let serial = run(serial_world());
        let parallel = run(parallel_world(4));
        assert_eq!(serial, parallel);
        assert_eq!(serial.0, 64 * 5);
        assert!(serial.1.iter().all(|&count| count == 5));
    }

    /// Fails on one marked entity, counts the rest
    struct Faulty {
        members: EntitySet,
        poisoned: crate::ecs::EntityId,
        calls: AtomicUsize,
    }

    impl System for Faulty {
        fn kind(&self) -> &'static str {
            "Faulty"
        }
        fn members(&self) -> &EntitySet {
            &self.members
        }
        fn members_mut(&mut self) -> &mut EntitySet {
            &mut self.members
        }
        fn update(&self, entity: &Entity, _dt: f32) {
            assert_ne!(entity.id(), self.poisoned, "poisoned entity");
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_worker_panic_does_not_hang_frame() {
        let mut world = parallel_world(2);
        let entities: Vec<_> = (0..8).map(|_| Entity::new(["Faulty"])).collect();
        let system = world.register_system(Faulty {
            members: EntitySet::new(),
            poisoned: entities[0].id(),
            calls: AtomicUsize::new(0),
        });
        world.add_entities(entities);

        // Returns despite the panic; the poisoned chunk is lost
        assert_eq!(world.update(0.016), FrameStatus::Continue);
        assert_eq!(system.read().calls.load(Ordering::SeqCst), 4);

        world.update(0.016);
        assert_eq!(system.read().calls.load(Ordering::SeqCst), 8);
    }

    /// Despawns members after their second update and spawns a replacement
    struct Reaper {
        members: EntitySet,
        context: Option<Context>,
    }

    impl System for Reaper {
        fn kind(&self) -> &'static str {
            "Reaper"
        }
        fn members(&self) -> &EntitySet {
            &self.members
        }
        fn members_mut(&mut self) -> &mut EntitySet {
            &mut self.members
        }
        fn initialize(&mut self, context: &Context) {
            self.context = Some(context.clone());
        }
        fn update(&self, entity: &Entity, _dt: f32) {
            let count = {
                let Some(mut ticks) = entity.get_mut::<Ticks>() else { return };
                ticks.0 += 1;
                ticks.0
            };
            if count == 2 {
                if let Some(context) = &self.context {
                    context.despawn(entity);
                    context.spawn(Entity::named("replacement", ["Reaper"]).with(Ticks::default()));
                }
            }
        }
    }

    #[test]
    fn test_deferred_despawn_and_spawn() {
        let mut world = serial_world();
        let reaper = world.register_system(Reaper { members: EntitySet::new(), context: None });
        let original = ticked("Reaper");
        world.add_entity(original.clone());

        world.update(0.016);
        world.update(0.016);
        // Despawned during frame 2, marked dead immediately
        assert!(!original.is_alive());
        assert_eq!(world.entity_count(), 1);

        world.update(0.016);
        assert_eq!(ticks(&original), 2);
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.entities_named("replacement").len(), 1);
        assert_eq!(reaper.read().members().len(), 1);
    }

    #[test]
    fn test_exit_request_from_system() {
        struct Quitter {
            members: EntitySet,
            context: Option<Context>,
        }

        impl System for Quitter {
            fn kind(&self) -> &'static str {
                "Quitter"
            }
            fn members(&self) -> &EntitySet {
                &self.members
            }
            fn members_mut(&mut self) -> &mut EntitySet {
                &mut self.members
            }
            fn initialize(&mut self, context: &Context) {
                self.context = Some(context.clone());
            }
            fn update(&self, _entity: &Entity, _dt: f32) {
                if let Some(context) = &self.context {
                    context.request_exit();
                }
            }
        }

        let mut world = parallel_world(2);
        world.register_system(Quitter { members: EntitySet::new(), context: None });
        world.add_entities((0..4).map(|_| Entity::new(["Quitter"])));

        // Consumed by each frame's check, raised again by the next frame
        assert_eq!(world.update(0.016), FrameStatus::Exit);
        assert_eq!(world.update(0.016), FrameStatus::Exit);
    }

    /// Publishes `RenderChanged` for every member it updates
    struct Announcer {
        members: EntitySet,
        bus: Option<Arc<MessageBus>>,
    }

    impl System for Announcer {
        fn kind(&self) -> &'static str {
            "Announcer"
        }
        fn members(&self) -> &EntitySet {
            &self.members
        }
        fn members_mut(&mut self) -> &mut EntitySet {
            &mut self.members
        }
        fn initialize(&mut self, context: &Context) {
            self.bus = Some(context.bus_handle());
        }
        fn update(&self, _entity: &Entity, _dt: f32) {
            if let Some(bus) = &self.bus {
                bus.dispatch(&RenderChanged);
            }
        }
    }

    /// Run one frame where each handler reads the announcing system back
    fn handler_reads_own_system(mut world: World) -> usize {
        let announcer = world.register_system(Announcer { members: EntitySet::new(), bus: None });
        let seen = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&announcer);
        let sink = Arc::clone(&seen);
        world.context().bus().subscribe(RenderChanged::TOPIC, move |_| {
            sink.fetch_add(handle.read().members().len(), Ordering::SeqCst);
        });
        world.add_entities((0..3).map(|_| Entity::new(["Announcer"])));

        world.update(0.016);
        seen.load(Ordering::SeqCst)
    }

    #[test]
    fn test_handlers_can_read_dispatching_system() {
        // Three updates, each handler sees three members
        assert_eq!(handler_reads_own_system(serial_world()), 9);
        assert_eq!(handler_reads_own_system(parallel_world(2)), 9);
    }

    #[test]
    fn test_removed_entity_cannot_be_added_again() {
        let mut world = serial_world();
        let system = world.register_system(TickSystem::new("A"));
        let entity = ticked("A");

        world.add_entity(entity.clone());
        assert!(world.remove_entity(&entity));
        world.add_entity(entity.clone());

        assert_eq!(world.entity_count(), 0);
        assert!(world.entity(entity.id()).is_none());
        assert!(system.read().members().is_empty());

        world.update(0.016);
        assert_eq!(ticks(&entity), 0);
        assert_eq!(world.entity_count(), 0);
    }
}
