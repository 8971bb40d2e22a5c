//! World state for one zone.
//!
//! The World owns every actor and projectile in the zone plus the sinks the
//! resolver writes into (outbox, event log, enchantments). It provides:
//! - Actor and projectile storage with deterministic iteration order (`BTreeMap`)
//! - Handle resolution: a missing id is `None`, never a panic
//! - The zone tick counter
//!
//! # Example
//!
//! ```
//! use spellbolt_core::world::World;
//! use spellbolt_core::actor::{ActorInner, ActorTag, CreatureComponents};
//! use glam::Vec3;
//!
//! let mut world = World::new();
//! let id = world.spawn(
//!     ActorTag::Creature,
//!     "Drudge Skulker",
//!     ActorInner::Creature(CreatureComponents::at_position(Vec3::ZERO, 0.0)),
//! );
//!
//! assert!(world.actor(id).is_some());
//! assert_eq!(world.actor_count(), 1);
//! ```

use std::collections::BTreeMap;

use tracing::trace;

use crate::actor::{Actor, ActorId, ActorInner, ActorTag};
use crate::enchantment::EnchantmentRegistry;
use crate::error::CoreError;
use crate::event::EventLog;
use crate::message::Outbox;
use crate::projectile::{Projectile, ProjectileId};

/// Container for all zone state.
#[derive(Debug, Clone)]
pub struct World {
    /// Monotonically increasing actor ID counter.
    next_actor_id: u64,
    /// Monotonically increasing projectile ID counter.
    next_projectile_id: u64,
    actors: BTreeMap<ActorId, Actor>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    outbox: Outbox,
    events: EventLog,
    enchantments: EnchantmentRegistry,
    tick: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_actor_id: 1,
            next_projectile_id: 1,
            actors: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            outbox: Outbox::new(),
            events: EventLog::new(),
            enchantments: EnchantmentRegistry::new(),
            tick: 0,
        }
    }

    // =========================================================================
    // Actors
    // =========================================================================

    /// Adds an actor with a freshly allocated id.
    pub fn spawn(&mut self, tag: ActorTag, name: impl Into<String>, inner: ActorInner) -> ActorId {
        while self.actors.contains_key(&ActorId::new(self.next_actor_id)) {
            self.next_actor_id += 1;
        }
        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id += 1;
        self.actors.insert(id, Actor::new(id, tag, name, inner));
        id
    }

    /// Adds an actor that already carries its id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateActor`] if the id is taken.
    pub fn insert(&mut self, actor: Actor) -> Result<ActorId, CoreError> {
        let id = actor.id();
        if self.actors.contains_key(&id) {
            return Err(CoreError::DuplicateActor(id));
        }
        self.actors.insert(id, actor);
        Ok(id)
    }

    /// Removes an actor. Projectiles still referencing it resolve to `None`.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&id);
        if actor.is_some() {
            trace!(actor = %id, "actor despawned");
        }
        actor
    }

    /// Resolves an actor handle.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Resolves an actor handle mutably.
    #[must_use]
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Returns the actor with `id`, or [`CoreError::UnknownActor`].
    ///
    /// # Errors
    ///
    /// Fails if no such actor is registered.
    pub fn require_actor(&self, id: ActorId) -> Result<&Actor, CoreError> {
        self.actor(id).ok_or(CoreError::UnknownActor(id))
    }

    /// Iterates actors in id order.
    pub fn actors_sorted(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    /// Number of actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // =========================================================================
    // Projectiles
    // =========================================================================

    /// Allocates the next projectile id.
    pub fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        id
    }

    /// Registers a projectile, replacing any previous one with the same id.
    pub fn insert_projectile(&mut self, projectile: Projectile) {
        self.projectiles.insert(projectile.id(), projectile);
    }

    /// Resolves a projectile handle.
    #[must_use]
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Resolves a projectile handle mutably.
    #[must_use]
    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    /// Drops a projectile from the world.
    pub fn remove_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    /// Iterates projectiles in id order.
    pub fn projectiles_sorted(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.values()
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    // =========================================================================
    // Sinks
    // =========================================================================

    /// Outbound messages.
    #[must_use]
    pub const fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Outbound messages, mutably.
    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Combat events.
    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Combat events, mutably.
    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// Enchantment registry.
    #[must_use]
    pub const fn enchantments(&self) -> &EnchantmentRegistry {
        &self.enchantments
    }

    /// Enchantment registry, mutably.
    pub fn enchantments_mut(&mut self) -> &mut EnchantmentRegistry {
        &mut self.enchantments
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Current zone tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick by one.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
