//! Headless pong
//!
//! Two computer paddles rally a ball across a court while a field of
//! particles drifts behind them. Runs a fixed number of frames and logs the
//! outcome.
//!
//! ```text
//! pong [--config pong.toml] [--frames N] [--particles N]
//! ```

mod components;
mod config;
mod systems;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use engine2d::prelude::*;
use parking_lot::RwLock;
use rand::Rng;

use components::{BallComponent, PaddleComponent, Rect, Side, SpeedComponent};
use config::PongConfig;
use systems::{BallSystem, ControlSystem, ParticleSystem, ScoreSystem, SpeedSystem};

const PADDLE_WIDTH: f32 = 12.0;
const PADDLE_HEIGHT: f32 = 80.0;
const PADDLE_MARGIN: f32 = 24.0;
const BALL_SIZE: f32 = 10.0;
const PARTICLE_SIZE: f32 = 2.0;
const PARTICLE_DRIFT: f32 = 20.0;

/// Command line options
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    frames: Option<u64>,
    particles: Option<usize>,
}

impl Args {
    fn parse() -> Result<Self, AppError> {
        let mut args = Self::default();
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let value = iter
                .next()
                .ok_or_else(|| AppError::Setup(format!("{flag} needs a value")))?;
            match flag.as_str() {
                "--config" => args.config = Some(PathBuf::from(value)),
                "--frames" => args.frames = Some(parse_number(&flag, &value)?),
                "--particles" => args.particles = Some(parse_number(&flag, &value)?),
                other => return Err(AppError::Setup(format!("unknown argument `{other}`"))),
            }
        }
        Ok(args)
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Setup(format!("{flag} expects a number, got `{value}`")))
}

fn rect(width: f32, height: f32, priority: PriorityLevel) -> RenderComponent {
    RenderComponent::new(Arc::new(Rect { width, height }))
        .with_priority(priority)
        .with_color(Color::WHITE)
}

struct Pong {
    config: PongConfig,
    ball: Option<Entity>,
    speed: Option<Arc<RwLock<SpeedSystem>>>,
    score: Option<Arc<RwLock<ScoreSystem>>>,
}

impl Pong {
    fn new(config: PongConfig) -> Self {
        Self { config, ball: None, speed: None, score: None }
    }

    fn court(&self) -> Vec2 {
        vec2(self.config.court_width, self.config.court_height)
    }

    fn paddle(&self, side: Side) -> Entity {
        let x = match side {
            Side::Left => PADDLE_MARGIN,
            Side::Right => self.config.court_width - PADDLE_MARGIN - PADDLE_WIDTH,
        };
        let y = (self.config.court_height - PADDLE_HEIGHT) / 2.0;

        Entity::named("paddle", [ControlSystem::KIND, CollisionSystem::KIND, RenderSystem::KIND])
            .with(SpaceComponent::new(vec2(x, y), PADDLE_WIDTH, PADDLE_HEIGHT))
            .with(CollisionComponent::solid())
            .with(PaddleComponent { side, speed: self.config.paddle_speed })
            .with(rect(PADDLE_WIDTH, PADDLE_HEIGHT, PriorityLevel::FOREGROUND))
    }

    fn ball(&self) -> Entity {
        let position = (self.court() - vec2(BALL_SIZE, BALL_SIZE)) / 2.0;
        let velocity = vec2(self.config.ball_speed, self.config.ball_speed * 0.25);

        Entity::named(
            "ball",
            [SpeedSystem::KIND, CollisionSystem::KIND, BallSystem::KIND, RenderSystem::KIND],
        )
        .with(SpaceComponent::new(position, BALL_SIZE, BALL_SIZE))
        .with(SpeedComponent::new(velocity))
        .with(CollisionComponent::solid_probe())
        .with(BallComponent { serve_speed: self.config.ball_speed })
        .with(rect(BALL_SIZE, BALL_SIZE, PriorityLevel::FOREGROUND))
    }

    fn particles(&self) -> Vec<Entity> {
        let mut rng = rand::thread_rng();
        (0..self.config.particles)
            .map(|_| {
                let position = vec2(
                    rng.gen_range(0.0..self.config.court_width),
                    rng.gen_range(0.0..self.config.court_height),
                );
                let velocity = vec2(
                    rng.gen_range(-PARTICLE_DRIFT..PARTICLE_DRIFT),
                    rng.gen_range(-PARTICLE_DRIFT..PARTICLE_DRIFT),
                );
                Entity::named("particle", [SpeedSystem::KIND, ParticleSystem::KIND, RenderSystem::KIND])
                    .with(SpaceComponent::new(position, PARTICLE_SIZE, PARTICLE_SIZE))
                    .with(SpeedComponent::new(velocity))
                    .with(rect(PARTICLE_SIZE, PARTICLE_SIZE, PriorityLevel::BACKGROUND))
            })
            .collect()
    }

    fn report(&self, summary: &RunSummary) {
        log::info!(
            "Ran {} frames (exit requested: {})",
            summary.frames,
            summary.exit_requested
        );
        if let Some(speed) = &self.speed {
            log::info!("Paddle bounces: {}", speed.read().bounces().load(Ordering::Relaxed));
        }
        if let Some(score) = &self.score {
            let (left, right) = score.read().scores();
            log::info!("Final score: {left} - {right}");
        }
        let position = self
            .ball
            .as_ref()
            .and_then(|ball| ball.get::<SpaceComponent>().map(|space| space.position));
        if let Some(position) = position {
            log::info!("Ball finished at ({:.1}, {:.1})", position.x, position.y);
        }
    }
}

impl Game for Pong {
    fn setup(&mut self, world: &mut World) -> Result<(), AppError> {
        let ball = self.ball();
        let court = self.court();

        world.register_system(PauseSystem::new());
        world.register_system(ControlSystem::new(ball.clone(), court.y));
        let speed = world.register_system(SpeedSystem::default());
        world.register_system(CollisionSystem::new());
        world.register_system(BallSystem::new(court));
        let score = world.register_system(ScoreSystem::default());
        world.register_system(ParticleSystem::new(court));
        world.register_system(RenderSystem::new());

        world.add_entity(self.paddle(Side::Left));
        world.add_entity(self.paddle(Side::Right));
        world.add_entity(ball.clone());
        world.add_entities(self.particles());

        self.ball = Some(ball);
        self.speed = Some(speed);
        self.score = Some(score);

        log::info!("Court ready with {} entities", world.entity_count());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;
    let mut config = PongConfig::load_or_default(args.config.as_deref())?;
    if let Some(frames) = args.frames {
        config.engine.max_frames = Some(frames);
    }
    if let Some(particles) = args.particles {
        config.particles = particles;
    }
    config.validate()?;

    let batches = (!config.engine.world.headless).then(|| {
        Batches::new(Box::new(RecordingBatch::new()), Box::new(RecordingBatch::new()))
    });
    let mut engine = Engine::new(config.engine.clone(), batches)?;
    let mut game = Pong::new(config);

    let summary = engine.run(&mut game, &mut FixedClock::from_fps(60))?;
    game.report(&summary);
    Ok(())
}
