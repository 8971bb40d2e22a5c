//! Actor module: the world participants a projectile can hit.
//!
//! - [`ActorId`]: Non-owning handle, resolved through the [`World`](crate::world::World) registry
//! - [`ActorTag`]: Kind classification (player, creature, plain object)
//! - [`ActorInner`]: Type-safe storage for kind-specific components
//! - [`Actor`]: The complete actor container
//!
//! # Handles
//!
//! Projectiles never own actors. They hold an [`ActorId`] and look it up on
//! every use; a missing actor is a valid outcome (it logged out, despawned or
//! died and was removed) and is treated as "no effect", never as a fault.
//!
//! # Example
//!
//! ```
//! use spellbolt_core::actor::{Actor, ActorId, ActorTag, ActorInner};
//! use spellbolt_core::actor::components::CreatureComponents;
//!
//! let drudge = Actor::new(
//!     ActorId::new(7),
//!     ActorTag::Creature,
//!     "Drudge Skulker",
//!     ActorInner::Creature(CreatureComponents::default()),
//! );
//!
//! assert!(drudge.is_combatant());
//! assert!(!drudge.is_player());
//! ```

pub mod components;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use components::{
    CasterItem, CombatMode, CreatureComponents, CreatureSkill, CreatureType, DamageHistory,
    ElementBonus, Equipment, Heritage, ObjectComponents, PkStatus, PlayerComponents, Ratings,
    Resistances, SessionId, ShieldItem, Skill, SkillAdvancement, SkillSet, SlayerBonus,
    StatusFlags, TransformState, Vital, VitalKind, Vitals,
};

/// Unique identifier for an actor.
///
/// # Example
///
/// ```
/// use spellbolt_core::actor::ActorId;
///
/// let id1 = ActorId::new(1);
/// let id2 = ActorId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Actor kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorTag {
    /// Player character with a (possibly disconnected) session.
    Player,
    /// Monster or NPC creature.
    Creature,
    /// Anything else a projectile can bump into (doors, portals, items).
    Object,
}

impl fmt::Display for ActorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Creature => write!(f, "Creature"),
            Self::Object => write!(f, "Object"),
        }
    }
}

/// Type-safe storage for actor-specific components.
///
/// The variant should always match the actor's [`ActorTag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorInner {
    /// Player components (creature components plus session state)
    Player(PlayerComponents),
    /// Creature components
    Creature(CreatureComponents),
    /// Plain object components
    Object(ObjectComponents),
}

impl ActorInner {
    /// Returns the corresponding `ActorTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> ActorTag {
        match self {
            Self::Player(_) => ActorTag::Player,
            Self::Creature(_) => ActorTag::Creature,
            Self::Object(_) => ActorTag::Object,
        }
    }

    /// Returns creature components for players and creatures.
    #[must_use]
    pub const fn as_creature(&self) -> Option<&CreatureComponents> {
        match self {
            Self::Player(player) => Some(&player.creature),
            Self::Creature(creature) => Some(creature),
            Self::Object(_) => None,
        }
    }

    /// Returns mutable creature components for players and creatures.
    #[must_use]
    pub fn as_creature_mut(&mut self) -> Option<&mut CreatureComponents> {
        match self {
            Self::Player(player) => Some(&mut player.creature),
            Self::Creature(creature) => Some(creature),
            Self::Object(_) => None,
        }
    }

    /// Returns player components, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Returns mutable player components, if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Returns the placement of any actor kind.
    #[must_use]
    pub const fn transform(&self) -> &TransformState {
        match self {
            Self::Player(player) => &player.creature.transform,
            Self::Creature(creature) => &creature.transform,
            Self::Object(object) => &object.transform,
        }
    }
}

/// A complete actor.
///
/// # Invariants
///
/// - The `ActorId` is unique within a world
/// - The `ActorTag` matches the `ActorInner` variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    tag: ActorTag,
    name: String,
    inner: ActorInner,
}

impl Actor {
    /// Creates a new actor.
    ///
    /// The caller is responsible for `tag` and `inner` agreeing.
    #[must_use]
    pub fn new(id: ActorId, tag: ActorTag, name: impl Into<String>, inner: ActorInner) -> Self {
        Self {
            id,
            tag,
            name: name.into(),
            inner,
        }
    }

    /// Creates a player from its components.
    #[must_use]
    pub fn player(id: ActorId, name: impl Into<String>, components: PlayerComponents) -> Self {
        Self::new(id, ActorTag::Player, name, ActorInner::Player(components))
    }

    /// Creates a creature from its components.
    #[must_use]
    pub fn creature(id: ActorId, name: impl Into<String>, components: CreatureComponents) -> Self {
        Self::new(id, ActorTag::Creature, name, ActorInner::Creature(components))
    }

    /// Creates a plain object.
    #[must_use]
    pub fn object(id: ActorId, name: impl Into<String>, components: ObjectComponents) -> Self {
        Self::new(id, ActorTag::Object, name, ActorInner::Object(components))
    }

    /// Returns the actor's identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the actor's kind.
    #[must_use]
    pub const fn tag(&self) -> ActorTag {
        self.tag
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &ActorInner {
        &self.inner
    }

    /// Returns the inner component storage mutably.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut ActorInner {
        &mut self.inner
    }

    /// Returns `true` if this actor is a player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.tag, ActorTag::Player)
    }

    /// Returns `true` if this actor can be a spell target (players and creatures).
    #[must_use]
    pub const fn is_combatant(&self) -> bool {
        matches!(self.tag, ActorTag::Player | ActorTag::Creature)
    }

    /// Creature components, if any.
    #[must_use]
    pub const fn as_creature(&self) -> Option<&CreatureComponents> {
        self.inner.as_creature()
    }

    /// Mutable creature components, if any.
    #[must_use]
    pub fn as_creature_mut(&mut self) -> Option<&mut CreatureComponents> {
        self.inner.as_creature_mut()
    }

    /// Player components, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        self.inner.as_player()
    }

    /// Mutable player components, if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        self.inner.as_player_mut()
    }

    /// Placement of the actor.
    #[must_use]
    pub const fn transform(&self) -> &TransformState {
        self.inner.transform()
    }

    /// Returns `true` while the actor has health left. Objects are never alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.as_creature().is_some_and(CreatureComponents::is_alive)
    }

    /// The session to deliver text to, for connected players only.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.as_player().and_then(|p| p.session)
    }

    /// Applies a signed delta to a vital pool.
    ///
    /// Returns the delta actually applied (zero for objects).
    pub fn update_vital_delta(&mut self, kind: VitalKind, delta: i64) -> i64 {
        self.as_creature_mut()
            .map_or(0, |c| c.vitals.get_mut(kind).apply_delta(delta))
    }
}
