//! Whole-world tests exercising the scheduler together with the built-in systems

mod scheduling;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::config::WorldConfig;
use crate::ecs::{Component, Entity, EntitySet, System, World};

/// Per-entity update counter
#[derive(Debug, Default)]
pub(super) struct Ticks(pub u32);

impl Component for Ticks {}

/// Counts updates globally and on each member's [`Ticks`]
pub(super) struct TickSystem {
    kind: &'static str,
    members: EntitySet,
    pub calls: AtomicUsize,
}

impl TickSystem {
    pub fn new(kind: &'static str) -> Self {
        Self { kind, members: EntitySet::new(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl System for TickSystem {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn update(&self, entity: &Entity, _dt: f32) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(mut ticks) = entity.get_mut::<Ticks>() {
            ticks.0 += 1;
        }
    }
}

pub(super) fn ticked(kind: &'static str) -> Entity {
    Entity::new([kind]).with(Ticks::default())
}

pub(super) fn ticks(entity: &Entity) -> u32 {
    entity.get::<Ticks>().map_or(0, |ticks| ticks.0)
}

/// Headless world that always updates serially
pub(super) fn serial_world() -> World {
    let config = WorldConfig::headless()
        .with_worker_threads(2)
        .with_serial_threshold_factor(usize::MAX / 4);
    World::new(&config, None).expect("serial world")
}

/// Headless world that always fans out to the pool
pub(super) fn parallel_world(workers: usize) -> World {
    let config = WorldConfig::headless()
        .with_worker_threads(workers)
        .with_serial_threshold_factor(0);
    World::new(&config, None).expect("parallel world")
}
