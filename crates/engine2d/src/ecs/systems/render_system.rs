//! # Render Aggregator
//!
//! Groups members into priority tiers and forwards them to the world or
//! HUD batch once per frame. Tiers are rebuilt lazily: only after a member
//! joins or leaves, or after a [`RenderChanged`] message. Between rebuilds
//! `update` does nothing and `post` replays the cached tiers.
//!
//! Tiers are drawn from `BACKGROUND` to `HIGHEST`; `HIDDEN` and any level
//! outside that range are never drawn. Consecutive tiers sharing a batch
//! are drawn within a single `begin`/`end` pair.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ecs::components::{RenderComponent, SpaceComponent};
use crate::ecs::context::Context;
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::system::{EntitySet, Frame, System};
use crate::events::RenderChanged;
use crate::render::{BatchKind, Batches, PriorityLevel};

/// Draws members through the world's batches, ordered by priority tier
pub struct RenderSystem {
    members: EntitySet,
    tiers: Mutex<BTreeMap<PriorityLevel, Vec<Entity>>>,
    changed: Arc<AtomicBool>,
    rebuilding: bool,
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self {
            members: EntitySet::new(),
            tiers: Mutex::new(BTreeMap::new()),
            changed: Arc::new(AtomicBool::new(true)),
            rebuilding: false,
        }
    }
}

impl RenderSystem {
    /// Kind name entities list to join this system
    pub const KIND: &'static str = "RenderSystem";

    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids cached in `level`, in draw order
    pub fn tier(&self, level: PriorityLevel) -> Vec<EntityId> {
        self.tiers
            .lock()
            .get(&level)
            .map(|entities| entities.iter().map(Entity::id).collect())
            .unwrap_or_default()
    }

    /// Force a rebuild on the next frame
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }

    /// Restore member order inside each tier after a parallel rebuild
    fn sort_tiers(&self) {
        let order: HashMap<EntityId, usize> = self
            .members
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.id(), index))
            .collect();

        for entities in self.tiers.lock().values_mut() {
            entities.sort_by_key(|entity| order.get(&entity.id()).copied().unwrap_or(usize::MAX));
        }
    }

    fn draw(&self, batches: &mut Batches) {
        let tiers = self.tiers.lock();
        let mut current: Option<BatchKind> = None;

        for (level, entities) in tiers.range(PriorityLevel::BACKGROUND..=PriorityLevel::HIGHEST) {
            if entities.is_empty() {
                continue;
            }

            let kind = Batches::kind_for(*level);
            if current != Some(kind) {
                if let Some(previous) = current {
                    batches.get_mut(previous).end();
                }
                batches.get_mut(kind).begin();
                current = Some(kind);
            }

            let batch = batches.get_mut(kind);
            for entity in entities {
                if !entity.is_alive() {
                    continue;
                }
                let components = entity.components();
                let (Some(render), Some(space)) =
                    (components.get::<RenderComponent>(), components.get::<SpaceComponent>())
                else {
                    log::trace!("Entity {} has nothing to draw", entity.id());
                    continue;
                };
                batch.draw(
                    render.drawable.as_ref(),
                    space.position,
                    render.scale,
                    render.rotation,
                    render.color,
                    render.alpha,
                );
            }
        }

        if let Some(kind) = current {
            batches.get_mut(kind).end();
        }
    }
}

impl System for RenderSystem {
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
        let changed = Arc::clone(&self.changed);
        context.bus().subscribe(RenderChanged::TOPIC, move |_| {
            changed.store(true, Ordering::Release);
        });
    }

    fn pre(&mut self) {
        self.rebuilding = self.changed.swap(false, Ordering::AcqRel);
        if self.rebuilding {
            self.tiers.get_mut().clear();
        }
    }

    fn update(&self, entity: &Entity, _dt: f32) {
        if !self.rebuilding {
            return;
        }
        let Some(priority) = entity.get::<RenderComponent>().map(|render| render.priority) else {
            return;
        };
        self.tiers.lock().entry(priority).or_default().push(entity.clone());
    }

    fn post(&mut self, frame: &mut Frame<'_>) {
        if self.rebuilding {
            self.sort_tiers();
            log::debug!("Rebuilt render tiers for {} members", self.members.len());
        }
        if let Some(batches) = frame.batches() {
            self.draw(batches);
        }
    }

    fn priority(&self) -> i32 {
        1
    }

    fn skip_on_headless(&self) -> bool {
        true
    }

    fn respects_pause(&self) -> bool {
        false
    }

    fn add_entity(&mut self, entity: Entity) {
        self.mark_changed();
        self.members.insert(entity);
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        let removed = self.members.remove(id);
        if removed {
            self.mark_changed();
        }
        removed
    }
}
