//! Game systems
//!
//! Frame order matters here: paddles steer, everything moves, collisions
//! push the ball out of paddles, then the ball system handles walls and
//! goals.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use engine2d::prelude::*;
use rand::Rng;

use crate::components::{BallComponent, PaddleComponent, ScoreMessage, Side, SpeedComponent};

/// Moves every member by its velocity and bounces the ball off paddles
#[derive(Default)]
pub struct SpeedSystem {
    members: EntitySet,
    bounces: Arc<AtomicUsize>,
}

impl SpeedSystem {
    /// Kind name
    pub const KIND: &'static str = "SpeedSystem";

    /// Shared bounce counter
    pub fn bounces(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.bounces)
    }
}

/// Send the ball back the way it came after touching a paddle
fn bounce_off_paddle(message: &CollisionMessage) -> bool {
    if !message.to.has::<PaddleComponent>() {
        return false;
    }
    let Some(paddle_center) = message.to.get::<SpaceComponent>().map(|space| space.center()) else {
        return false;
    };
    let Some(ball_center) = message.entity.get::<SpaceComponent>().map(|space| space.center()) else {
        return false;
    };
    let Some(mut speed) = message.entity.get_mut::<SpeedComponent>() else {
        return false;
    };

    let away = if ball_center.x < paddle_center.x { -1.0 } else { 1.0 };
    speed.velocity.x = speed.velocity.x.abs() * away;
    // Hitting off-center adds spin
    speed.velocity.y += (ball_center.y - paddle_center.y) * 2.0;
    true
}

impl System for SpeedSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn initialize(&mut self, context: &Context) {
        let bounces = Arc::clone(&self.bounces);
        context.bus().subscribe_to::<CollisionMessage, _>(CollisionMessage::TOPIC, move |message| {
            if bounce_off_paddle(message) {
                let total = bounces.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Bounce #{total} off {}", message.to.id());
            }
        });
    }

    fn update(&self, entity: &Entity, dt: f32) {
        let Some(velocity) = entity.get::<SpeedComponent>().map(|speed| speed.velocity) else {
            return;
        };
        if let Some(mut space) = entity.get_mut::<SpaceComponent>() {
            space.position += velocity * dt;
        }
    }
}

/// Steers paddles toward the ball
pub struct ControlSystem {
    members: EntitySet,
    ball: Entity,
    court_height: f32,
}

impl ControlSystem {
    /// Kind name
    pub const KIND: &'static str = "ControlSystem";

    /// Track `ball` inside a court of the given height
    pub fn new(ball: Entity, court_height: f32) -> Self {
        Self { members: EntitySet::new(), ball, court_height }
    }
}

impl System for ControlSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn update(&self, entity: &Entity, dt: f32) {
        let Some(target) = self.ball.get::<SpaceComponent>().map(|space| space.center().y) else {
            return;
        };
        let Some(paddle) = entity.get::<PaddleComponent>().map(|paddle| *paddle) else {
            return;
        };
        let Some(mut space) = entity.get_mut::<SpaceComponent>() else {
            return;
        };

        let offset = target - space.center().y;
        let step = paddle.speed * dt;
        space.position.y += offset.clamp(-step, step);
        space.position.y = space.position.y.clamp(0.0, (self.court_height - space.height).max(0.0));
    }
}

/// Bounces the ball off the top and bottom walls and handles goals
pub struct BallSystem {
    members: EntitySet,
    court: Vec2,
    bus: Option<Arc<MessageBus>>,
}

impl BallSystem {
    /// Kind name
    pub const KIND: &'static str = "BallSystem";

    /// Create the system for a court of the given size
    pub fn new(court: Vec2) -> Self {
        Self { members: EntitySet::new(), court, bus: None }
    }

    fn serve(&self, entity: &Entity, toward: Side) {
        let serve_speed = entity.get::<BallComponent>().map_or(0.0, |ball| ball.serve_speed);
        let mut rng = rand::thread_rng();
        let angle: f32 = rng.gen_range(-0.6..0.6);
        let direction = match toward {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };

        if let Some(mut space) = entity.get_mut::<SpaceComponent>() {
            space.position = (self.court - Vec2::new(space.width, space.height)) / 2.0;
        }
        if let Some(mut speed) = entity.get_mut::<SpeedComponent>() {
            speed.velocity = Vec2::new(direction * angle.cos(), angle.sin()) * serve_speed;
        }
    }
}

impl System for BallSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn initialize(&mut self, context: &Context) {
        self.bus = Some(context.bus_handle());
    }

    fn update(&self, entity: &Entity, _dt: f32) {
        let Some(space) = entity.get::<SpaceComponent>().map(|space| *space) else {
            return;
        };

        let scorer = if space.position.x + space.width < 0.0 {
            Some(Side::Right)
        } else if space.position.x > self.court.x {
            Some(Side::Left)
        } else {
            None
        };
        if let Some(scorer) = scorer {
            if let Some(bus) = &self.bus {
                bus.dispatch(&ScoreMessage { scorer });
            }
            // Serve toward the side that conceded
            let toward = match scorer {
                Side::Left => Side::Right,
                Side::Right => Side::Left,
            };
            self.serve(entity, toward);
            return;
        }

        let Some(mut speed) = entity.get_mut::<SpeedComponent>() else {
            return;
        };
        if space.position.y < 0.0 {
            speed.velocity.y = speed.velocity.y.abs();
        } else if space.position.y + space.height > self.court.y {
            speed.velocity.y = -speed.velocity.y.abs();
        }
    }
}

/// Keeps the score
#[derive(Default)]
pub struct ScoreSystem {
    members: EntitySet,
    scores: Arc<[AtomicU32; 2]>,
}

impl ScoreSystem {
    /// Kind name
    pub const KIND: &'static str = "ScoreSystem";

    /// Current `(left, right)` score
    pub fn scores(&self) -> (u32, u32) {
        (self.scores[0].load(Ordering::Relaxed), self.scores[1].load(Ordering::Relaxed))
    }
}

impl System for ScoreSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn initialize(&mut self, context: &Context) {
        let scores = Arc::clone(&self.scores);
        context.bus().subscribe_to::<ScoreMessage, _>(ScoreMessage::TOPIC, move |message| {
            let slot = match message.scorer {
                Side::Left => 0,
                Side::Right => 1,
            };
            scores[slot].fetch_add(1, Ordering::Relaxed);
            log::info!(
                "{:?} scores ({} - {})",
                message.scorer,
                scores[0].load(Ordering::Relaxed),
                scores[1].load(Ordering::Relaxed)
            );
        });
    }

    fn update(&self, _entity: &Entity, _dt: f32) {}
}

/// Wraps drifting particles around the court edges
pub struct ParticleSystem {
    members: EntitySet,
    court: Vec2,
}

impl ParticleSystem {
    /// Kind name
    pub const KIND: &'static str = "ParticleSystem";

    /// Create the system for a court of the given size
    pub fn new(court: Vec2) -> Self {
        Self { members: EntitySet::new(), court }
    }
}

impl System for ParticleSystem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn members(&self) -> &EntitySet {
        &self.members
    }

    fn members_mut(&mut self) -> &mut EntitySet {
        &mut self.members
    }

    fn update(&self, entity: &Entity, _dt: f32) {
        if let Some(mut space) = entity.get_mut::<SpaceComponent>() {
            space.position.x = space.position.x.rem_euclid(self.court.x);
            space.position.y = space.position.y.rem_euclid(self.court.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(&WorldConfig::headless().with_worker_threads(2), None).expect("world")
    }

    fn ball(x: f32, y: f32, velocity: Vec2) -> Entity {
        Entity::named("ball", [SpeedSystem::KIND, BallSystem::KIND, CollisionSystem::KIND])
            .with(SpaceComponent::new(vec2(x, y), 10.0, 10.0))
            .with(SpeedComponent::new(velocity))
            .with(CollisionComponent::solid_probe())
            .with(BallComponent { serve_speed: 100.0 })
    }

    #[test]
    fn test_ball_bounces_off_paddle() {
        let mut world = world();
        let speed = world.register_system(SpeedSystem::default());
        world.register_system(CollisionSystem::new());

        let ball = ball(85.0, 50.0, vec2(100.0, 0.0));
        let paddle = Entity::named("paddle", [CollisionSystem::KIND])
            .with(SpaceComponent::new(vec2(100.0, 40.0), 10.0, 40.0))
            .with(CollisionComponent::solid())
            .with(PaddleComponent { side: Side::Right, speed: 0.0 });
        world.add_entities([ball.clone(), paddle]);

        for _ in 0..10 {
            world.update(0.05);
        }

        let velocity = ball.get::<SpeedComponent>().map(|speed| speed.velocity.x);
        assert!(velocity.is_some_and(|x| x < 0.0));
        assert_eq!(speed.read().bounces().load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_goal_scores_and_reserves() {
        let mut world = world();
        world.register_system(BallSystem::new(vec2(200.0, 100.0)));
        let score = world.register_system(ScoreSystem::default());

        let ball = ball(-20.0, 50.0, vec2(-100.0, 0.0));
        world.add_entity(ball.clone());
        world.update(0.016);

        assert_eq!(score.read().scores(), (0, 1));
        let position = ball.get::<SpaceComponent>().map(|space| space.position);
        assert_eq!(position, Some(vec2(95.0, 45.0)));
        // Served toward the left player, who conceded
        assert!(ball.get::<SpeedComponent>().is_some_and(|speed| speed.velocity.x < 0.0));
    }

    #[test]
    fn test_wall_flips_vertical_speed() {
        let mut world = world();
        world.register_system(BallSystem::new(vec2(200.0, 100.0)));
        let ball = ball(50.0, -1.0, vec2(10.0, -30.0));
        world.add_entity(ball.clone());

        world.update(0.016);

        let vy = ball.get::<SpeedComponent>().map(|speed| speed.velocity.y);
        assert_eq!(vy, Some(30.0));
    }

    #[test]
    fn test_paddle_tracks_ball_within_court() {
        let mut world = world();
        let ball = ball(50.0, 90.0, vec2(0.0, 0.0));
        world.register_system(ControlSystem::new(ball.clone(), 100.0));
        let paddle = Entity::new([ControlSystem::KIND])
            .with(SpaceComponent::new(vec2(0.0, 0.0), 10.0, 40.0))
            .with(PaddleComponent { side: Side::Left, speed: 100.0 });
        world.add_entity(paddle.clone());

        for _ in 0..20 {
            world.update(0.1);
        }

        let y = paddle.get::<SpaceComponent>().map(|space| space.position.y);
        assert_eq!(y, Some(60.0));
    }
}
