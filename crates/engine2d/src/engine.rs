//! Core engine implementation
//!
//! The engine owns the world and runs the frame loop: ask the clock for a
//! delta, let the game react, update the world, then sleep off whatever is
//! left of the frame budget.

use std::time::{Duration, Instant};
use thiserror::Error;

use crate::application::{AppError, Game};
use crate::config::ConfigError;
use crate::core::config::EngineConfig;
use crate::ecs::{FrameStatus, World, WorldError};
use crate::foundation::logging;
use crate::foundation::time::Clock;
use crate::render::Batches;

/// Main engine struct
///
/// The engine coordinates the world and manages the main loop.
pub struct Engine {
    world: World,
    config: EngineConfig,
}

/// What a finished run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames executed
    pub frames: u64,
    /// Whether the run ended through an exit request rather than the frame cap
    pub exit_requested: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Validates `config`, initializes logging and builds the world.
    /// `batches` are only used when the world is not headless.
    pub fn new(config: EngineConfig, batches: Option<Batches>) -> Result<Self, EngineError> {
        config.validate()?;
        logging::init_with_level(&config.log_level);
        log::info!("Initializing engine...");

        let world = World::new(&config.world, batches)?;
        Ok(Self { world, config })
    }

    /// Run `game` until an exit is requested or `max_frames` is reached
    pub fn run<G: Game>(&mut self, game: &mut G, clock: &mut dyn Clock) -> Result<RunSummary, EngineError> {
        game.setup(&mut self.world)?;

        let budget = self.frame_budget();
        log::info!("Starting main loop...");

        let mut summary = RunSummary { frames: 0, exit_requested: false };
        loop {
            if self.config.max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }

            let frame_start = Instant::now();
            let dt = clock.tick();

            game.frame(&mut self.world, dt)?;
            let status = self.world.update(dt);
            summary.frames += 1;

            if status == FrameStatus::Exit {
                summary.exit_requested = true;
                break;
            }

            if let Some(budget) = budget {
                let spent = frame_start.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }

        log::info!("Engine stopped after {} frames", summary.frames);
        Ok(summary)
    }

    /// Frame duration to pad up to, if any
    fn frame_budget(&self) -> Option<Duration> {
        if self.world.is_headless() || self.config.fps_limit == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(1.0 / f64::from(self.config.fps_limit)))
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change the frame rate cap for the next run (0 = unlimited)
    pub fn set_fps_limit(&mut self, fps: u32) -> Result<(), EngineError> {
        let config = self.config.clone().with_fps_limit(fps);
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// World construction error
    #[error("World error: {0}")]
    World(#[from] WorldError),

    /// Application error
    #[error("Application error: {0}")]
    Application(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;
    use crate::foundation::time::FixedClock;

    struct Idle {
        setups: usize,
        frames: usize,
    }

    impl Game for Idle {
        fn setup(&mut self, _world: &mut World) -> Result<(), AppError> {
            self.setups += 1;
            Ok(())
        }

        fn frame(&mut self, world: &mut World, _dt: f32) -> Result<(), AppError> {
            self.frames += 1;
            if self.frames == 3 {
                world.context().request_exit();
            }
            Ok(())
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::new()
            .with_log_level("warn")
            .with_world(WorldConfig::headless().with_worker_threads(1))
    }

    #[test]
    fn test_run_stops_on_exit_request() {
        let mut engine = Engine::new(config(), None).expect("engine");
        let mut game = Idle { setups: 0, frames: 0 };
        let summary = engine.run(&mut game, &mut FixedClock::from_fps(60)).expect("run");

        assert_eq!(game.setups, 1);
        assert_eq!(summary, RunSummary { frames: 3, exit_requested: true });
    }

    #[test]
    fn test_run_stops_at_frame_cap() {
        let mut engine = Engine::new(config().with_max_frames(2), None).expect("engine");
        let mut game = Idle { setups: 0, frames: 0 };
        let summary = engine.run(&mut game, &mut FixedClock::from_fps(60)).expect("run");

        assert_eq!(summary, RunSummary { frames: 2, exit_requested: false });
        assert_eq!(engine.world().frame_count(), 2);
    }

    #[test]
    fn test_setup_error_propagates() {
        struct Broken;
        impl Game for Broken {
            fn setup(&mut self, _world: &mut World) -> Result<(), AppError> {
                Err(AppError::Setup("no level".into()))
            }
        }

        let mut engine = Engine::new(config(), None).expect("engine");
        let result = engine.run(&mut Broken, &mut FixedClock::from_fps(60));
        assert!(matches!(result, Err(EngineError::Application(AppError::Setup(_)))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = config().with_world(WorldConfig::headless().with_worker_threads(0));
        assert!(matches!(Engine::new(config, None), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_headless_has_no_frame_budget() {
        let engine = Engine::new(config().with_fps_limit(30), None).expect("engine");
        assert!(engine.frame_budget().is_none());
    }

    #[test]
    fn test_fps_limit_sets_budget_when_windowed() {
        let windowed = config().with_world(WorldConfig::new().with_worker_threads(1));
        let mut engine = Engine::new(windowed, None).expect("engine");

        engine.set_fps_limit(50).expect("fps limit");
        assert_eq!(engine.frame_budget(), Some(Duration::from_millis(20)));

        engine.set_fps_limit(0).expect("unlimited");
        assert!(engine.frame_budget().is_none());
    }
}
