//! Message bus for decoupled cross-system notifications
//!
//! Key principles:
//! - Messages are routed by topic name, every subscriber of a topic sees every message
//! - Delivery is synchronous, in subscription order, on the dispatching thread
//! - A dispatch issued from a pool worker runs its handlers on that worker,
//!   so handlers touching shared state must be safe to call concurrently
//! - Subscriptions live as long as the bus; there is no unsubscribe

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::ecs::Entity;

/// Upcast helper so a `&dyn Message` can be downcast to its concrete type
pub trait AsAny {
    /// View the value as [`Any`]
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value published on the bus under a topic name
pub trait Message: AsAny + Send + Sync + 'static {
    /// Topic the message is delivered to
    fn topic(&self) -> &str;
}

impl dyn Message {
    /// Downcast to the concrete message type
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }
}

/// Subscriber callback
pub type Handler = Arc<dyn Fn(&dyn Message) + Send + Sync>;

/// Named-topic publish/subscribe relay
#[derive(Default)]
pub struct MessageBus {
    // Copy-on-write handler lists so dispatch never holds the lock while
    // handlers run (handlers may subscribe or dispatch themselves).
    topics: RwLock<HashMap<String, Arc<[Handler]>>>,
}

impl MessageBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every future message on `topic`
    pub fn subscribe<F>(&self, topic: impl Into<String>, handler: F)
    where
        F: Fn(&dyn Message) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let mut topics = self.topics.write();
        let mut handlers: Vec<Handler> = topics
            .get(&topic)
            .map(|existing| existing.iter().cloned().collect())
            .unwrap_or_default();
        handlers.push(Arc::new(handler));
        log::trace!("Subscribed handler #{} to '{}'", handlers.len(), topic);
        topics.insert(topic, handlers.into());
    }

    /// Register a handler that only sees messages of type `M`
    ///
    /// Messages on the topic with a different concrete type are ignored.
    pub fn subscribe_to<M, F>(&self, topic: impl Into<String>, handler: F)
    where
        M: Message,
        F: Fn(&M) + Send + Sync + 'static,
    {
        self.subscribe(topic, move |message| {
            if let Some(message) = message.downcast_ref::<M>() {
                handler(message);
            }
        });
    }

    /// Deliver `message` to every current subscriber of its topic
    pub fn dispatch<M: Message>(&self, message: &M) {
        self.dispatch_dyn(message);
    }

    /// Deliver an already type-erased message
    pub fn dispatch_dyn(&self, message: &dyn Message) {
        let handlers = self.topics.read().get(message.topic()).cloned();
        if let Some(handlers) = handlers {
            for handler in handlers.iter() {
                handler(message);
            }
        }
    }

    /// Number of handlers subscribed to `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map_or(0, |handlers| handlers.len())
    }
}

/// Published by the collision system for every overlap a probe finds
#[derive(Debug, Clone)]
pub struct CollisionMessage {
    /// The probing entity
    pub entity: Entity,
    /// The entity it overlapped
    pub to: Entity,
}

impl CollisionMessage {
    /// Topic name
    pub const TOPIC: &'static str = "CollisionMessage";
}

impl Message for CollisionMessage {
    fn topic(&self) -> &str {
        Self::TOPIC
    }
}

/// Pauses or resumes the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseMessage {
    /// `true` pauses, `false` resumes
    pub pause: bool,
}

impl PauseMessage {
    /// Topic name
    pub const TOPIC: &'static str = "PauseMessage";
}

impl Message for PauseMessage {
    fn topic(&self) -> &str {
        Self::TOPIC
    }
}

/// Tells the render aggregator to rebuild its tiers next frame
///
/// Publish this after changing an entity's priority or drawable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderChanged;

impl RenderChanged {
    /// Topic name
    pub const TOPIC: &'static str = "RenderChanged";
}

impl Message for RenderChanged {
    fn topic(&self) -> &str {
        Self::TOPIC
    }
}
