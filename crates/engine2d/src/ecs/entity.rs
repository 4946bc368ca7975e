//! Entity handles
//!
//! An [`Entity`] is a cheap, clonable handle to shared entity state: a
//! unique id, the fixed set of system kinds it requires, and its component
//! set behind a lock. The world and every matching system hold clones of
//! the same handle, so component changes are visible everywhere.

use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::component::{Component, ComponentKind, ComponentSet};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique entity identifier, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct EntityInner {
    id: EntityId,
    requires: HashSet<String>,
    pattern: Option<String>,
    components: RwLock<ComponentSet>,
    alive: AtomicBool,
}

/// Shared handle to one entity
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInner>,
}

impl Entity {
    /// Create an entity that will be processed by the listed system kinds
    ///
    /// ```
    /// use engine2d::ecs::Entity;
    ///
    /// let ball = Entity::new(["RenderSystem", "CollisionSystem"]);
    /// assert!(ball.requires("CollisionSystem"));
    /// assert!(!ball.requires("PauseSystem"));
    /// ```
    pub fn new<I, S>(requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(None, requires)
    }

    /// Like [`Entity::new`], with a free-form label for debugging and lookup
    pub fn named<I, S>(pattern: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(Some(pattern.into()), requires)
    }

    fn build<I, S>(pattern: Option<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(EntityInner {
                id: EntityId::next(),
                requires: requires.into_iter().map(Into::into).collect(),
                pattern,
                components: RwLock::new(ComponentSet::new()),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Unique id of this entity
    #[inline]
    pub fn id(&self) -> EntityId {
        self.inner.id
    }

    /// Optional label given at creation
    pub fn pattern(&self) -> Option<&str> {
        self.inner.pattern.as_deref()
    }

    /// Whether systems of `kind` should process this entity
    #[inline]
    pub fn requires(&self, kind: &str) -> bool {
        self.inner.requires.contains(kind)
    }

    /// System kinds this entity requires
    pub fn required_kinds(&self) -> impl Iterator<Item = &str> {
        self.inner.requires.iter().map(String::as_str)
    }

    /// Attach a component, replacing any previous one of the same kind
    pub fn add_component<T: Component>(&self, component: T) {
        self.inner.components.write().insert(component);
    }

    /// Builder-style [`Entity::add_component`]
    #[must_use]
    pub fn with<T: Component>(self, component: T) -> Self {
        self.add_component(component);
        self
    }

    /// Detach the component of `kind`; absent kinds are a no-op
    pub fn remove_component(&self, kind: ComponentKind) -> bool {
        self.inner.components.write().remove_kind(kind)
    }

    /// Detach and return the component of type `T`
    pub fn remove<T: Component>(&self) -> Option<T> {
        self.inner.components.write().remove::<T>()
    }

    /// Read the component of type `T`
    ///
    /// The entity's components stay read-locked while the guard lives.
    /// Drop it before locking another entity.
    #[inline]
    pub fn get<T: Component>(&self) -> Option<MappedRwLockReadGuard<'_, T>> {
        RwLockReadGuard::try_map(self.inner.components.read(), ComponentSet::get::<T>).ok()
    }

    /// Write the component of type `T`
    ///
    /// Same locking rules as [`Entity::get`].
    #[inline]
    pub fn get_mut<T: Component>(&self) -> Option<MappedRwLockWriteGuard<'_, T>> {
        RwLockWriteGuard::try_map(self.inner.components.write(), ComponentSet::get_mut::<T>).ok()
    }

    /// Whether a component of type `T` is attached
    pub fn has<T: Component>(&self) -> bool {
        self.inner.components.read().contains(T::kind())
    }

    /// Whether a component of `kind` is attached
    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.inner.components.read().contains(kind)
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.inner.components.read().len()
    }

    /// Read-lock the whole component set, for reading several components at once
    pub fn components(&self) -> RwLockReadGuard<'_, ComponentSet> {
        self.inner.components.read()
    }

    /// Write-lock the whole component set
    pub fn components_mut(&self) -> RwLockWriteGuard<'_, ComponentSet> {
        self.inner.components.write()
    }

    /// `false` once the entity has been removed from its world
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    pub(crate) fn mark_dead(&self) {
        self.inner.alive.store(false, Ordering::Release);
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.inner.id)
            .field("pattern", &self.inner.pattern)
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}
