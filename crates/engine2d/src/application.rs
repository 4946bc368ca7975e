//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::ecs::World;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game with [`crate::Engine::run`].
pub trait Game {
    /// Set up the initial game state
    ///
    /// Called once after the world is built. Register systems and add the
    /// starting entities here.
    fn setup(&mut self, world: &mut World) -> Result<(), AppError>;

    /// Per-frame hook
    ///
    /// Called every frame before the world updates. Most game logic belongs
    /// in systems; use this for things that need `&mut World`.
    ///
    /// # Arguments
    /// * `world` - The ECS world
    /// * `dt` - Time since last frame in seconds
    fn frame(&mut self, _world: &mut World, _dt: f32) -> Result<(), AppError> {
        Ok(())
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Setup failed
    #[error("Setup failed: {0}")]
    Setup(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
