//! Built-in components
//!
//! These four kinds are stored in fixed slots on every entity.

pub mod collision;
pub mod pause;
pub mod render;
pub mod space;

pub use collision::{CollisionComponent, CollisionFlags};
pub use pause::UnpauseComponent;
pub use render::RenderComponent;
pub use space::SpaceComponent;
