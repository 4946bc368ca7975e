//! Entity-Component-System runtime
//!
//! Entities are shared handles carrying components. Systems declare a kind
//! name, and each entity joins the systems whose kinds it requires. The
//! [`World`] drives systems frame by frame, fanning large systems out to a
//! worker pool.

mod commands;
pub mod component;
pub mod components;
pub mod context;
pub mod entity;
pub mod scheduler;
pub mod system;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentKind, ComponentSet};
pub use context::{Context, WorldFlags};
pub use entity::{Entity, EntityId};
pub use scheduler::WorkerPool;
pub use system::{EntitySet, Frame, System};
pub use world::{FrameStatus, SystemHandle, World, WorldError};
