//! ECS World and frame scheduler
//!
//! The world owns every live entity and every registered system. Entities
//! are matched to systems once, when they are added: an entity joins every
//! system whose kind appears in its requirement set. Systems registered
//! later do not pick up entities that already exist.
//!
//! Each call to [`World::update`] runs one frame:
//!
//! 1. Apply spawns and despawns queued through the [`Context`]
//! 2. For each system in registration order: `pre`, one `update` per
//!    member, `post`
//! 3. Report whether an exit was requested
//!
//! Systems with fewer members than the serial threshold update on the
//! calling thread. Larger systems are split across the worker pool, and
//! `post` only starts after every worker has finished.

use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use thiserror::Error;

use crossbeam::channel::Receiver;

use super::commands::WorldCommand;
use super::components::UnpauseComponent;
use super::context::{Context, WorldFlags};
use super::entity::{Entity, EntityId};
use super::scheduler::WorkerPool;
use super::system::{Frame, System};
use crate::config::ConfigError;
use crate::core::config::WorldConfig;
use crate::render::Batches;

/// Errors raised while building a world
#[derive(Error, Debug)]
pub enum WorldError {
    /// The world configuration was rejected
    #[error("Invalid world configuration: {0}")]
    Config(#[from] ConfigError),

    /// A worker thread could not be started
    #[error("Failed to start worker pool: {0}")]
    WorkerSpawn(#[source] io::Error),
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Keep running
    Continue,
    /// Something called [`Context::request_exit`] during the frame
    Exit,
}

/// Shared handle to a registered system
pub type SystemHandle = Arc<RwLock<dyn System>>;

/// ECS World containing all entities and systems
pub struct World {
    context: Context,
    commands: Receiver<WorldCommand>,
    entities: BTreeMap<EntityId, Entity>,
    systems: Vec<SystemHandle>,
    pool: WorkerPool,
    serial_threshold: usize,
    batches: Option<Batches>,
    frame: u64,
}

impl World {
    /// Create a world
    ///
    /// `batches` are ignored in headless mode.
    pub fn new(config: &WorldConfig, batches: Option<Batches>) -> Result<Self, WorldError> {
        config.validate()?;
        let workers = config.resolved_workers()?;
        let serial_threshold = config.serial_threshold()?;
        let pool = WorkerPool::new(workers).map_err(WorldError::WorkerSpawn)?;

        let batches = if config.headless {
            if batches.is_some() {
                log::debug!("Headless world, dropping supplied batches");
            }
            None
        } else {
            batches
        };

        let (context, commands) = Context::new(config.headless);
        log::info!(
            "Created world: headless={}, workers={}, serial threshold={}",
            config.headless,
            workers,
            serial_threshold
        );

        Ok(Self {
            context,
            commands,
            entities: BTreeMap::new(),
            systems: Vec::new(),
            pool,
            serial_threshold,
            batches,
            frame: 0,
        })
    }

    /// Shared services handed to systems
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Register a system and hand back a typed handle to it
    ///
    /// Entities already in the world are not matched retroactively.
    pub fn register_system<S: System + 'static>(&mut self, mut system: S) -> Arc<RwLock<S>> {
        system.initialize(&self.context);
        log::debug!(
            "Registered system '{}' (priority {})",
            system.kind(),
            system.priority()
        );

        let handle = Arc::new(RwLock::new(system));
        let erased: SystemHandle = handle.clone();
        self.systems.push(erased);
        handle
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Add an entity to the world and to every system it requires
    ///
    /// Adding an entity that is already present, or one that was removed,
    /// is ignored.
    pub fn add_entity(&mut self, entity: Entity) {
        if self.entities.contains_key(&entity.id()) {
            log::warn!("Entity {} added twice, ignoring", entity.id());
            return;
        }
        if !entity.is_alive() {
            log::warn!("Entity {} was already removed, ignoring", entity.id());
            return;
        }

        let mut matched = 0;
        for system in &self.systems {
            let mut system = system.write();
            if entity.requires(system.kind()) {
                system.add_entity(entity.clone());
                matched += 1;
            }
        }

        log::debug!("Added entity {} to {} systems", entity.id(), matched);
        self.entities.insert(entity.id(), entity);
    }

    /// Add several entities
    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) {
        for entity in entities {
            self.add_entity(entity);
        }
    }

    /// Remove an entity from the world and every system
    ///
    /// Returns `false` when the entity was not in the world.
    pub fn remove_entity(&mut self, entity: &Entity) -> bool {
        self.remove_by_id(entity.id())
    }

    fn remove_by_id(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        entity.mark_dead();

        for system in &self.systems {
            system.write().remove_entity(id);
        }

        log::debug!("Removed entity {id}");
        true
    }

    /// Look up a live entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All live entities, oldest first
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.values().cloned().collect()
    }

    /// Live entities created with the given label
    pub fn entities_named(&self, pattern: &str) -> Vec<Entity> {
        self.entities
            .values()
            .filter(|entity| entity.pattern() == Some(pattern))
            .cloned()
            .collect()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Whether the world is paused
    pub fn is_paused(&self) -> bool {
        self.context.is_paused()
    }

    /// Pause or resume the world
    pub fn set_paused(&self, paused: bool) {
        self.context.set_paused(paused);
    }

    /// Whether the world runs without a renderer
    pub fn is_headless(&self) -> bool {
        self.context.is_headless()
    }

    /// Run one frame
    pub fn update(&mut self, dt: f32) -> FrameStatus {
        self.apply_commands();

        let headless = self.context.is_headless();
        let flags = self.context.flags();

        for handle in &self.systems {
            let mut system = handle.write();
            if headless && system.skip_on_headless() {
                continue;
            }

            let pruned = system.members_mut().prune_dead();
            if pruned > 0 {
                log::trace!("Pruned {} dead members from '{}'", pruned, system.kind());
            }
            system.pre();

            let gated = system.respects_pause();
            let count = system.members().len();

            // Members update under a shared lock in both modes, so handlers
            // fired from `update` may read this system through its handle
            let system = RwLockWriteGuard::downgrade(system);
            if count < self.serial_threshold {
                log::trace!("'{}': {} members, serial", system.kind(), count);
                for entity in system.members() {
                    if should_update(entity, gated, &flags) {
                        system.update(entity, dt);
                    }
                }
                drop(system);
            } else {
                log::trace!("'{}': {} members, parallel", system.kind(), count);
                let members = system.members().snapshot();
                drop(system);

                let shared = Arc::clone(handle);
                let flags = Arc::clone(&flags);
                self.pool.for_each_partitioned(members, move |chunk| {
                    let system = shared.read();
                    for entity in chunk {
                        if should_update(entity, gated, &flags) {
                            system.update(entity, dt);
                        }
                    }
                });
            }

            let mut system = handle.write();
            let mut frame = Frame::new(dt, self.batches.as_mut());
            system.post(&mut frame);
        }

        self.frame += 1;
        if self.context.take_exit_request() {
            log::info!("Exit requested after frame {}", self.frame);
            FrameStatus::Exit
        } else {
            FrameStatus::Continue
        }
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            log::trace!("Applying {command:?}");
            match command {
                WorldCommand::Spawn(entity) => self.add_entity(entity),
                WorldCommand::Despawn(id) => {
                    self.remove_by_id(id);
                }
            }
        }
    }
}

/// Per-member filter applied during dispatch
///
/// The pause flag is read for every member, so a pause issued mid-frame
/// gates the members that have not run yet.
fn should_update(entity: &Entity, gated: bool, flags: &WorldFlags) -> bool {
    if !entity.is_alive() {
        return false;
    }
    !(gated && flags.is_paused() && !entity.has::<UnpauseComponent>())
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("systems", &self.systems.len())
            .field("workers", &self.pool.size())
            .field("serial_threshold", &self.serial_threshold)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}
