//! Zone loop.
//!
//! A [`Zone`] owns one [`World`], the deferred action queue and the random
//! source, and drives them on a single thread. Physics callbacks enter
//! through [`Zone::update_position`], [`Zone::on_collide_environment`] and
//! [`Zone::on_collide_object`]; [`Zone::step`] advances the tick and runs
//! whatever became due.

use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec3};
use spellbook::{SpellId, SpellLookup};
use tracing::{debug, trace};

use crate::actor::ActorId;
use crate::config::CombatConfig;
use crate::error::CoreError;
use crate::event::CombatEvent;
use crate::message::OutboundMessage;
use crate::projectile::{Projectile, ProjectileId};
use crate::resolver::{CollisionOutcome, CollisionResolver};
use crate::rolls::{RollSource, SeededRolls};
use crate::rules::{CombatRules, StandardRules};
use crate::schedule::{ActionQueue, DeferredAction};
use crate::world::World;

/// Everything needed to put a spell projectile in the air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    /// Spell carried by the projectile.
    pub spell: SpellId,
    /// Caster, if any.
    pub source: Option<ActorId>,
    /// Explicit target, if any.
    pub target: Option<ActorId>,
    /// Where the projectile appears.
    pub spawn_position: Vec3,
    /// Initial orientation.
    pub rotation: Quat,
    /// Initial velocity.
    pub velocity: Vec3,
    /// Whether gravity applies in flight.
    pub gravity: bool,
    /// Fixed life-projectile damage computed at cast time.
    pub life_damage: u32,
}

impl LaunchRequest {
    /// A request with no target, identity rotation and zero velocity.
    #[must_use]
    pub fn new(spell: SpellId, source: Option<ActorId>, spawn_position: Vec3) -> Self {
        Self {
            spell,
            source,
            target: None,
            spawn_position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            gravity: false,
            life_damage: 0,
        }
    }

    /// Sets the explicit target.
    #[must_use]
    pub fn at(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets orientation and velocity.
    #[must_use]
    pub fn moving(mut self, rotation: Quat, velocity: Vec3) -> Self {
        self.rotation = rotation;
        self.velocity = velocity;
        self
    }

    /// Sets the fixed life damage.
    #[must_use]
    pub fn with_life_damage(mut self, life_damage: u32) -> Self {
        self.life_damage = life_damage;
        self
    }

    /// Enables gravity.
    #[must_use]
    pub fn with_gravity(mut self) -> Self {
        self.gravity = true;
        self
    }
}

/// Single-threaded driver for one zone.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use glam::Vec3;
/// use spellbolt_core::config::CombatConfig;
/// use spellbolt_core::zone::Zone;
/// use spellbook::SpellTable;
///
/// let mut zone = Zone::new(Arc::new(SpellTable::new()), CombatConfig::default(), 7);
/// zone.step();
/// assert_eq!(zone.tick(), 1);
/// ```
pub struct Zone {
    world: World,
    spells: Arc<dyn SpellLookup>,
    config: CombatConfig,
    rules: Box<dyn CombatRules>,
    rolls: Box<dyn RollSource>,
    actions: ActionQueue,
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("tick", &self.world.current_tick())
            .field("actors", &self.world.actor_count())
            .field("projectiles", &self.world.projectile_count())
            .field("pending_actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl Zone {
    /// Creates a zone with the standard rules and a seeded random source.
    #[must_use]
    pub fn new(spells: Arc<dyn SpellLookup>, config: CombatConfig, seed: u64) -> Self {
        let rules = Box::new(StandardRules::new(config.clone()));
        Self {
            world: World::new(),
            spells,
            config,
            rules,
            rolls: Box::new(SeededRolls::new(seed)),
            actions: ActionQueue::new(),
        }
    }

    /// Replaces the ruleset.
    #[must_use]
    pub fn with_rules(mut self, rules: Box<dyn CombatRules>) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_rolls(mut self, rolls: Box<dyn RollSource>) -> Self {
        self.rolls = rolls;
        self
    }

    /// Replaces the world.
    #[must_use]
    pub fn with_world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The zone's world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for spawning and test setup.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Combat tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Spell table in use.
    #[must_use]
    pub fn spells(&self) -> &dyn SpellLookup {
        self.spells.as_ref()
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.world.current_tick()
    }

    /// Number of scheduled actions not yet run.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates, sets up and launches a projectile.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownActor`] if the source is named but not in
    /// the world.
    pub fn launch(&mut self, request: LaunchRequest) -> Result<ProjectileId, CoreError> {
        if let Some(source) = request.source {
            self.world.require_actor(source)?;
        }

        let id = self.world.allocate_projectile_id();
        let mut projectile = Projectile::new(id, request.source, request.target, request.spawn_position)
            .with_life_damage(request.life_damage);
        let kind = projectile.setup_spell(self.spells.as_ref(), request.spell, &self.config.content)?;
        projectile.launch(request.rotation, request.velocity, request.target, request.gravity);

        debug!(
            projectile = %id,
            spell = %request.spell,
            kind = ?kind,
            flags = ?projectile.physics(),
            "projectile launched"
        );

        let flags = projectile.physics();
        self.world.insert_projectile(projectile);
        self.world
            .outbox_mut()
            .broadcast(OutboundMessage::PhysicsState { projectile: id, flags });
        self.world.events_mut().record(CombatEvent::ProjectileLaunched {
            projectile: id,
            source: request.source,
            kind,
        });
        Ok(id)
    }

    /// Physics callback: the projectile moved to `position`.
    ///
    /// Shield arcs are judged from the last reported position, so the
    /// physics layer reports it at least once before an object contact.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn update_position(&mut self, projectile: ProjectileId, position: Vec3) -> Result<(), CoreError> {
        self.world
            .projectile_mut(projectile)
            .ok_or(CoreError::UnknownProjectile(projectile))?
            .set_position(position);
        Ok(())
    }

    /// Physics callback: contact with terrain or static geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn on_collide_environment(
        &mut self,
        projectile: ProjectileId,
    ) -> Result<CollisionOutcome, CoreError> {
        let resolver = CollisionResolver::new(self.rules.as_ref(), &self.config);
        resolver.on_collide_environment(&mut self.world, &mut self.actions, projectile)
    }

    /// Physics callback: contact with another world object.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn on_collide_object(
        &mut self,
        projectile: ProjectileId,
        other: ActorId,
    ) -> Result<CollisionOutcome, CoreError> {
        let resolver = CollisionResolver::new(self.rules.as_ref(), &self.config);
        resolver.on_collide_object(
            &mut self.world,
            &mut self.actions,
            self.rolls.as_mut(),
            projectile,
            other,
        )
    }

    /// Physics callback: contact with another world object at `contact`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn on_collide_object_at(
        &mut self,
        projectile: ProjectileId,
        other: ActorId,
        contact: Vec3,
    ) -> Result<CollisionOutcome, CoreError> {
        self.update_position(projectile, contact)?;
        self.on_collide_object(projectile, other)
    }

    /// Advances one tick and runs every action now due.
    ///
    /// Returns the projectiles destroyed this tick.
    pub fn step(&mut self) -> Vec<ProjectileId> {
        self.world.advance_tick();
        let now = self.world.current_tick();

        let mut removed = Vec::new();
        for action in self.actions.pop_due(now) {
            match action {
                DeferredAction::Destroy(id) => {
                    let Some(mut projectile) = self.world.remove_projectile(id) else {
                        trace!(projectile = %id, "destroy for missing projectile");
                        continue;
                    };
                    projectile.mark_removed();
                    debug!(projectile = %id, tick = now, "projectile removed");
                    self.world
                        .events_mut()
                        .record(CombatEvent::ProjectileRemoved { projectile: id });
                    removed.push(id);
                }
            }
        }
        removed
    }

    /// Steps until no action is pending or `max_ticks` have passed.
    ///
    /// Returns the number of ticks stepped.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> u64 {
        let mut stepped = 0;
        while !self.actions.is_empty() && stepped < max_ticks {
            self.step();
            stepped += 1;
        }
        stepped
    }
}
