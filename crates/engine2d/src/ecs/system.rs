//! System trait and membership bookkeeping
//!
//! A system owns the subset of world entities whose requirement set names
//! its kind. Each frame the scheduler calls [`System::pre`], then
//! [`System::update`] once per member (possibly from several worker
//! threads at once), then [`System::post`].

use std::collections::HashSet;

use super::context::Context;
use super::entity::{Entity, EntityId};
use crate::render::Batches;

/// Insertion-ordered set of entities matched to one system
#[derive(Debug, Default, Clone)]
pub struct EntitySet {
    entities: Vec<Entity>,
    index: HashSet<EntityId>,
}

impl EntitySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entity`; duplicates are ignored
    pub fn insert(&mut self, entity: Entity) -> bool {
        if !self.index.insert(entity.id()) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Remove the entity with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.index.remove(&id) {
            return false;
        }
        match self.entities.iter().position(|entity| entity.id() == id) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop members that were despawned since the last frame
    pub fn prune_dead(&mut self) -> usize {
        let before = self.entities.len();
        let index = &mut self.index;
        self.entities.retain(|entity| {
            let alive = entity.is_alive();
            if !alive {
                index.remove(&entity.id());
            }
            alive
        });
        before - self.entities.len()
    }

    /// Whether an entity with `id` is a member
    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains(&id)
    }

    /// Members in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Owned copy of the member list
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-frame data handed to [`System::post`]
pub struct Frame<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    batches: Option<&'a mut Batches>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(dt: f32, batches: Option<&'a mut Batches>) -> Self {
        Self { dt, batches }
    }

    /// Draw batches, absent when running headless
    pub fn batches(&mut self) -> Option<&mut Batches> {
        self.batches.as_deref_mut()
    }
}

/// A unit of per-entity behavior
///
/// `update` takes `&self` because it may run on several workers at once;
/// state it mutates must use interior mutability. `pre` and `post` run on
/// the frame thread with exclusive access.
pub trait System: Send + Sync {
    /// Kind name that entities list in their requirement set
    fn kind(&self) -> &'static str;

    /// Entities currently matched to this system
    fn members(&self) -> &EntitySet;

    /// Mutable access to the member set
    fn members_mut(&mut self) -> &mut EntitySet;

    /// Called once when the system is registered with a world
    fn initialize(&mut self, _context: &Context) {}

    /// Called once per frame before any `update`
    fn pre(&mut self) {}

    /// Called once per member per frame, unless the member is gated by pause
    fn update(&self, entity: &Entity, dt: f32);

    /// Called once per frame after every `update` has returned
    fn post(&mut self, _frame: &mut Frame<'_>) {}

    /// Informational ordering hint; systems run in registration order
    fn priority(&self) -> i32 {
        0
    }

    /// Whether the system is skipped entirely in headless mode
    fn skip_on_headless(&self) -> bool {
        false
    }

    /// Whether paused frames skip members lacking an unpause component
    ///
    /// Defaults to `true`. [`RenderSystem`](crate::ecs::systems::RenderSystem)
    /// returns `false`: a paused world keeps drawing every member.
    fn respects_pause(&self) -> bool {
        true
    }

    /// Add a member; called by the world for matching entities
    fn add_entity(&mut self, entity: Entity) {
        self.members_mut().insert(entity);
    }

    /// Remove a member by id
    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.members_mut().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_set_keeps_insertion_order() {
        let mut set = EntitySet::new();
        let entities: Vec<_> = (0..4).map(|_| Entity::new(["A"])).collect();
        for entity in &entities {
            assert!(set.insert(entity.clone()));
        }
        assert!(!set.insert(entities[0].clone()));

        assert!(set.remove(entities[1].id()));
        assert!(!set.remove(entities[1].id()));

        let ids: Vec<_> = set.iter().map(Entity::id).collect();
        assert_eq!(ids, vec![entities[0].id(), entities[2].id(), entities[3].id()]);
    }

    #[test]
    fn test_prune_dead() {
        let mut set = EntitySet::new();
        let alive = Entity::new(["A"]);
        let dead = Entity::new(["A"]);
        set.insert(alive.clone());
        set.insert(dead.clone());
        dead.mark_dead();

        assert_eq!(set.prune_dead(), 1);
        assert!(set.contains(alive.id()));
        assert!(!set.contains(dead.id()));

        // Pruning clears the id index as well
        assert_eq!(set.len(), 1);
        assert!(!set.remove(dead.id()));
    }

    #[test]
    fn test_large_set_membership() {
        let mut set = EntitySet::new();
        let entities: Vec<_> = (0..2_000).map(|_| Entity::new(["A"])).collect();
        for entity in &entities {
            assert!(set.insert(entity.clone()));
        }
        for entity in &entities {
            assert!(!set.insert(entity.clone()));
            assert!(set.contains(entity.id()));
        }
        assert_eq!(set.len(), 2_000);

        assert!(set.remove(entities[10].id()));
        assert!(!set.contains(entities[10].id()));
        assert!(set.insert(entities[10].clone()));
        assert_eq!(set.iter().last().map(Entity::id), Some(entities[10].id()));
    }

    #[test]
    fn test_headless_frame_has_no_batches() {
        let mut frame = Frame::new(0.5, None);
        assert!(frame.batches().is_none());
        assert!((frame.dt - 0.5).abs() < f32::EPSILON);
    }
}
