//! # engine2d
//!
//! A small 2D game runtime built around an Entity-Component-System.
//!
//! ## Features
//!
//! - **ECS Architecture**: entities join systems by kind name at insertion time
//! - **Parallel Dispatch**: large systems fan out over a worker pool with a frame barrier
//! - **Message Bus**: topic-based publish/subscribe between systems
//! - **AABB Collision**: probe-driven overlap detection and separation
//! - **Tiered Rendering**: priority tiers split between a world batch and a HUD batch
//! - **Headless Mode**: run simulations without any graphics backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engine2d::prelude::*;
//!
//! struct MyGame;
//!
//! impl Game for MyGame {
//!     fn setup(&mut self, world: &mut World) -> Result<(), AppError> {
//!         world.register_system(CollisionSystem::new());
//!         world.add_entity(
//!             Entity::new([CollisionSystem::KIND])
//!                 .with(SpaceComponent::new(vec2(0.0, 0.0), 10.0, 10.0))
//!                 .with(CollisionComponent::solid_probe()),
//!         );
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::new()
//!         .with_max_frames(60)
//!         .with_world(WorldConfig::headless());
//!     let mut engine = Engine::new(config, None)?;
//!     engine.run(&mut MyGame, &mut FixedClock::from_fps(60))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod events;
pub mod physics;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Game};
pub use engine::{Engine, EngineError, RunSummary};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Game,
        Engine, EngineError, RunSummary,
        core::config::{Config, ConfigError, ConfigFormat, EngineConfig, WorldConfig},
        foundation::{
            math::{vec2, Color, Vec2},
            time::{Clock, FixedClock, Timer},
        },
        ecs::{
            Component, ComponentKind, Context, Entity, EntityId, EntitySet, Frame,
            FrameStatus, System, World,
            components::{CollisionComponent, CollisionFlags, RenderComponent, SpaceComponent, UnpauseComponent},
            systems::{CollisionSystem, PauseSystem, RenderSystem},
        },
        events::{CollisionMessage, Message, MessageBus, PauseMessage, RenderChanged},
        physics::Aabb,
        render::{Batch, BatchKind, Batches, Drawable, PriorityLevel, RecordingBatch},
    };
}
