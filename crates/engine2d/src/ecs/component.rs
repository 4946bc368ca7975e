//! Component trait and per-entity component storage
//!
//! Core component kinds live in fixed slots indexed by [`ComponentKind`]
//! (the fast path every system uses). Application-defined components are
//! kept in a map keyed by their [`TypeId`] (the generic path). Neither path
//! compares type names at runtime.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Data attached to an entity
///
/// Application components only need an empty impl; the default
/// [`Component::kind`] places them on the generic path.
///
/// ```
/// use engine2d::ecs::Component;
///
/// struct Speed(f32, f32);
/// impl Component for Speed {}
/// ```
pub trait Component: Any + Send + Sync {
    /// Storage kind of this component type
    fn kind() -> ComponentKind
    where
        Self: Sized,
    {
        ComponentKind::Custom(TypeId::of::<Self>())
    }
}

/// Closed set of component kinds known to the runtime, plus an escape hatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Position and size
    Space,
    /// Collision participation flags and margin
    Collision,
    /// Drawable, tint and priority tier
    Render,
    /// Exempts the entity from world pauses
    Unpause,
    /// Application-defined component
    Custom(TypeId),
}

impl ComponentKind {
    const CORE_SLOTS: usize = 4;

    /// Fixed slot index of a core kind
    const fn slot(self) -> Option<usize> {
        match self {
            Self::Space => Some(0),
            Self::Collision => Some(1),
            Self::Render => Some(2),
            Self::Unpause => Some(3),
            Self::Custom(_) => None,
        }
    }

    /// Kind of the component type `T`
    pub fn of<T: Component>() -> Self {
        T::kind()
    }
}

type Boxed = Box<dyn Any + Send + Sync>;

/// The components attached to one entity, at most one per kind
#[derive(Default)]
pub struct ComponentSet {
    core: [Option<Boxed>; ComponentKind::CORE_SLOTS],
    custom: HashMap<TypeId, Boxed>,
}

impl ComponentSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `component`, replacing any existing component of the same kind
    ///
    /// Returns `true` when an older component was replaced.
    pub fn insert<T: Component>(&mut self, component: T) -> bool {
        let boxed: Boxed = Box::new(component);
        match T::kind().slot() {
            Some(slot) => self.core[slot].replace(boxed).is_some(),
            None => self.custom.insert(TypeId::of::<T>(), boxed).is_some(),
        }
    }

    /// Borrow the component of type `T`
    #[inline]
    pub fn get<T: Component>(&self) -> Option<&T> {
        let boxed = match T::kind().slot() {
            Some(slot) => self.core[slot].as_ref(),
            None => self.custom.get(&TypeId::of::<T>()),
        };
        boxed.and_then(|component| component.downcast_ref::<T>())
    }

    /// Mutably borrow the component of type `T`
    #[inline]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let boxed = match T::kind().slot() {
            Some(slot) => self.core[slot].as_mut(),
            None => self.custom.get_mut(&TypeId::of::<T>()),
        };
        boxed.and_then(|component| component.downcast_mut::<T>())
    }

    /// Whether a component of `kind` is attached
    pub fn contains(&self, kind: ComponentKind) -> bool {
        match (kind.slot(), kind) {
            (Some(slot), _) => self.core[slot].is_some(),
            (None, ComponentKind::Custom(type_id)) => self.custom.contains_key(&type_id),
            (None, _) => false,
        }
    }

    /// Detach the component of `kind`; no-op when absent
    ///
    /// Returns `true` when something was removed.
    pub fn remove_kind(&mut self, kind: ComponentKind) -> bool {
        match (kind.slot(), kind) {
            (Some(slot), _) => self.core[slot].take().is_some(),
            (None, ComponentKind::Custom(type_id)) => self.custom.remove(&type_id).is_some(),
            (None, _) => false,
        }
    }

    /// Detach and return the component of type `T`
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let boxed = match T::kind().slot() {
            Some(slot) => self.core[slot].take()?,
            None => self.custom.remove(&TypeId::of::<T>())?,
        };
        boxed.downcast::<T>().ok().map(|component| *component)
    }

    /// Number of attached components
    pub fn len(&self) -> usize {
        self.core.iter().filter(|slot| slot.is_some()).count() + self.custom.len()
    }

    /// Whether no component is attached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
