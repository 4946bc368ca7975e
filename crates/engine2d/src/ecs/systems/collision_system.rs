//! Probe-based AABB collision
//!
//! Every member flagged as a probe tests its (inflated) box against every
//! other live member. Each overlap publishes a [`CollisionMessage`]; when
//! both sides are solid the probe is first pushed out along the minimum
//! translation. Non-probe members never look for overlaps themselves.
//!
//! Component locks are taken one entity at a time and released before any
//! message is published, so probes may run on several workers at once.

use std::sync::Arc;

use crate::ecs::component::ComponentSet;
use crate::ecs::components::{CollisionComponent, SpaceComponent};
use crate::ecs::context::Context;
use crate::ecs::entity::Entity;
use crate::ecs::system::{EntitySet, System};
use crate::events::{CollisionMessage, MessageBus};
use crate::physics::minimum_translation;

/// Detects overlaps between collision members
#[derive(Default)]
pub struct CollisionSystem {
    members: EntitySet,
    bus: Option<Arc<MessageBus>>,
}

impl CollisionSystem {
    /// Kind name entities list to join this system
    pub const KIND: &'static str = "CollisionSystem";

    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }
}

/// Copy out the two components the collision test needs
fn collision_state(entity: &Entity) -> Option<(SpaceComponent, CollisionComponent)> {
    let components = entity.components();
    pair(&components)
}

fn pair(components: &ComponentSet) -> Option<(SpaceComponent, CollisionComponent)> {
    Some((
        *components.get::<SpaceComponent>()?,
        *components.get::<CollisionComponent>()?,
    ))
}

impl System for CollisionSystem {
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
        match collision_state(entity) {
            Some((_, collision)) if collision.is_probe() => {}
            _ => return,
        }

        for other in &self.members {
            if other.id() == entity.id() || !other.is_alive() {
                continue;
            }
            let Some((other_space, other_collision)) = collision_state(other) else {
                continue;
            };
            // Re-read every time: an earlier correction may have moved us
            let Some((space, collision)) = collision_state(entity) else {
                return;
            };

            let own_box = collision.inflate(&space.aabb());
            let other_box = other_collision.inflate(&other_space.aabb());
            if !own_box.intersects(&other_box) {
                continue;
            }

            if collision.is_solid() && other_collision.is_solid() {
                let mtd = minimum_translation(&own_box, &other_box);
                if let Some(mut space) = entity.get_mut::<SpaceComponent>() {
                    space.position += mtd;
                }
                log::trace!("Separated {} from {} by {:?}", entity.id(), other.id(), mtd);
            }

            if let Some(bus) = &self.bus {
                bus.dispatch(&CollisionMessage {
                    entity: entity.clone(),
                    to: other.clone(),
                });
            }
        }
    }
}
