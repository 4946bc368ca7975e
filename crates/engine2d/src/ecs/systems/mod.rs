//! Built-in systems

pub mod collision_system;
pub mod pause_system;
pub mod render_system;

pub use collision_system::CollisionSystem;
pub use pause_system::PauseSystem;
pub use render_system::RenderSystem;
