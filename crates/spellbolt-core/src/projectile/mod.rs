//! Spell projectiles.
//!
//! A [`Projectile`] is the in-flight half of a cast: it carries the resolved
//! spell, its behavior kind, and weak handles to the caster and (optionally)
//! the intended target. The physics engine moves it; this crate decides what
//! happens when it touches something.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──setup()──▶ InFlight ──impact──▶ Impacted ──schedule──▶ PendingRemoval ──delay──▶ Removed
//! ```
//!
//! A projectile is collidable only after [`Projectile::setup`], which fixes
//! its behavior kind exactly once. Phases only move forward.

mod classify;
mod setup;

pub use classify::{classify, classify_id, intensity, RING_EXPLOSION_SPELL};
pub use setup::ProjectileContent;

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use spellbook::{SpellDescriptor, SpellId};

use crate::actor::ActorId;
use crate::message::PlayScript;

/// Unique identifier for a projectile.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new `ProjectileId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectileId({})", self.0)
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery shape of a spell projectile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Unclassifiable or unresolved spell.
    #[default]
    Undefined,
    /// Single tracking missile.
    Bolt,
    /// Multi-projectile area burst.
    Blast,
    /// Multi-projectile fan.
    Volley,
    /// Single fast streak.
    Streak,
    /// Single non-tracking lobbed missile.
    Arc,
    /// Radial ring around the caster.
    Ring,
    /// Wall of projectiles.
    Wall,
    /// Projectiles that fall on the target from above.
    Strike,
}

impl ProjectileKind {
    /// Kinds that play the generic collision script on contact.
    #[must_use]
    pub const fn has_collision_script(self) -> bool {
        matches!(
            self,
            Self::Bolt | Self::Streak | Self::Arc | Self::Volley | Self::Blast
        )
    }
}

/// Collision phase of a projectile. Only ever advances.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectilePhase {
    /// Moving; collisions are processed.
    InFlight,
    /// Hit something; impact visuals have been issued.
    Impacted,
    /// Destruction has been scheduled and cannot be cancelled.
    PendingRemoval,
    /// Destroyed and dropped from the world.
    Removed,
}

bitflags! {
    /// Physics state bits mirrored to clients.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PhysicsFlags: u32 {
        /// Simulated by the physics engine.
        const ACTIVE = 1 << 0;
        /// Collisions are reported to the resolver.
        const REPORT_COLLISIONS = 1 << 1;
        /// Flies as a missile.
        const MISSILE = 1 << 2;
        /// Orientation follows the flight path.
        const ALIGN_PATH = 1 << 3;
        /// Path is clipped against geometry.
        const PATH_CLIPPED = 1 << 4;
        /// Passes through objects.
        const ETHEREAL = 1 << 5;
        /// Collision detection disabled.
        const IGNORE_COLLISIONS = 1 << 6;
        /// Plays a script when it collides.
        const SCRIPTED_COLLISION = 1 << 7;
        /// Slides along edges instead of stopping.
        const EDGE_SLIDE = 1 << 8;
        /// Affected by gravity.
        const GRAVITY = 1 << 9;
        /// Not rendered.
        const NO_DRAW = 1 << 10;
        /// Hidden from clients.
        const CLOAKED = 1 << 11;
        /// Emits light.
        const LIGHTING = 1 << 12;
    }
}

impl Default for PhysicsFlags {
    /// Defaults of a freshly created projectile object: intangible and lit.
    fn default() -> Self {
        Self::ETHEREAL | Self::SCRIPTED_COLLISION | Self::EDGE_SLIDE | Self::LIGHTING
    }
}

/// A spell projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    spell: Arc<SpellDescriptor>,
    kind: Option<ProjectileKind>,
    source: Option<ActorId>,
    target: Option<ActorId>,
    spawn_position: Vec3,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    omega: Vec3,
    life_damage: u32,
    physics: PhysicsFlags,
    default_script: Option<PlayScript>,
    script_intensity: f32,
    phase: ProjectilePhase,
}

impl Projectile {
    /// Creates a projectile that is not yet collidable.
    ///
    /// Call [`Projectile::setup`] before handing it to the physics engine.
    #[must_use]
    pub fn new(
        id: ProjectileId,
        source: Option<ActorId>,
        target: Option<ActorId>,
        spawn_position: Vec3,
    ) -> Self {
        Self {
            id,
            spell: Arc::new(SpellDescriptor::unresolved(SpellId::new(0))),
            kind: None,
            source,
            target,
            spawn_position,
            position: spawn_position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            omega: Vec3::ZERO,
            life_damage: 0,
            physics: PhysicsFlags::default(),
            default_script: None,
            script_intensity: 0.0,
            phase: ProjectilePhase::InFlight,
        }
    }

    /// Sets the base damage for life projectiles. Builder style.
    #[must_use]
    pub fn with_life_damage(mut self, life_damage: u32) -> Self {
        self.life_damage = life_damage;
        self
    }

    /// Returns the projectile's identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Returns the resolved spell.
    #[must_use]
    pub fn spell(&self) -> &SpellDescriptor {
        &self.spell
    }

    /// Returns a shared handle to the resolved spell.
    #[must_use]
    pub fn spell_arc(&self) -> Arc<SpellDescriptor> {
        Arc::clone(&self.spell)
    }

    /// Behavior kind; `Undefined` until set up.
    #[must_use]
    pub fn kind(&self) -> ProjectileKind {
        self.kind.unwrap_or_default()
    }

    /// Returns `true` once [`Projectile::setup`] has run.
    #[must_use]
    pub const fn is_set_up(&self) -> bool {
        self.kind.is_some()
    }

    /// Caster handle.
    #[must_use]
    pub const fn source(&self) -> Option<ActorId> {
        self.source
    }

    /// Intended target handle; `None` for untargeted multi-projectile casts.
    #[must_use]
    pub const fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// Where the projectile was spawned.
    #[must_use]
    pub const fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    /// Current position as last reported by the physics engine.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Updates the position from the physics engine.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orientation.
    #[must_use]
    pub const fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Linear velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Angular velocity.
    #[must_use]
    pub const fn omega(&self) -> Vec3 {
        self.omega
    }

    /// Precomputed base damage for life projectiles.
    #[must_use]
    pub const fn life_damage(&self) -> u32 {
        self.life_damage
    }

    /// Physics state bits.
    #[must_use]
    pub const fn physics(&self) -> PhysicsFlags {
        self.physics
    }

    /// Script played on contact, if any.
    #[must_use]
    pub const fn default_script(&self) -> Option<PlayScript> {
        self.default_script
    }

    /// Intensity of the contact script.
    #[must_use]
    pub const fn script_intensity(&self) -> f32 {
        self.script_intensity
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ProjectilePhase {
        self.phase
    }

    /// Returns `true` if collisions should still be processed.
    #[must_use]
    pub fn is_collidable(&self) -> bool {
        self.is_set_up()
            && self.phase == ProjectilePhase::InFlight
            && !self.physics.contains(PhysicsFlags::IGNORE_COLLISIONS)
    }

    /// Sets the launch physics state and activates the projectile.
    ///
    /// The target, when given, becomes the projectile's tracking target.
    pub fn launch(
        &mut self,
        rotation: Quat,
        velocity: Vec3,
        target: Option<ActorId>,
        use_gravity: bool,
    ) {
        if use_gravity {
            self.physics.insert(PhysicsFlags::GRAVITY);
        }
        self.rotation = rotation;
        self.velocity = velocity;
        self.position = self.spawn_position;
        if target.is_some() {
            self.target = target;
        }
        self.physics.insert(PhysicsFlags::ACTIVE);
    }

    /// Moves `InFlight` to `Impacted` and applies the impact physics state.
    ///
    /// Returns `false` (and changes nothing) if the projectile already left
    /// `InFlight`.
    pub(crate) fn mark_impacted(&mut self) -> bool {
        if self.phase != ProjectilePhase::InFlight {
            return false;
        }
        self.phase = ProjectilePhase::Impacted;
        self.physics.remove(
            PhysicsFlags::REPORT_COLLISIONS | PhysicsFlags::LIGHTING | PhysicsFlags::ACTIVE,
        );
        self.physics.insert(
            PhysicsFlags::ETHEREAL
                | PhysicsFlags::IGNORE_COLLISIONS
                | PhysicsFlags::NO_DRAW
                | PhysicsFlags::CLOAKED,
        );
        true
    }

    /// Moves `Impacted` to `PendingRemoval`.
    pub(crate) fn mark_pending_removal(&mut self) {
        if self.phase == ProjectilePhase::Impacted {
            self.phase = ProjectilePhase::PendingRemoval;
        }
    }

    /// Final transition.
    pub(crate) fn mark_removed(&mut self) {
        self.phase = ProjectilePhase::Removed;
    }
}
