//! Collision and damage resolution.
//!
//! Resolution runs in three stages, each in its own module:
//!
//! 1. [`CollisionResolver`]: decides what a physics contact means (ignored,
//!    environment, friendly fire, PK-blocked, or a hit) and drives the impact
//!    and removal sequence
//! 2. [`DamageEngine`]: computes the outcome of a hit without touching actor
//!    state
//! 3. [`DamageApplicator`]: turns a computed hit into vital changes, messages,
//!    events and, at zero health, death
//!
//! # Invariants
//!
//! - A projectile impacts at most once; later callbacks are ignored
//! - The damage engine never mutates actors; only the applicator does
//! - Blocked and already-dead outcomes stop all further processing

mod apply;
mod collision;
mod damage;
mod shield;
mod verbs;

pub use apply::{AppliedDamage, DamageApplicator};
pub use collision::CollisionResolver;
pub use damage::DamageEngine;
pub use shield::shield_mod;
pub use verbs::{attack_verb, AttackVerb};

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::enchantment::EffectHandle;
use crate::rules::PkViolation;

/// Why a hit did no damage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// The caster no longer exists.
    SourceMissing,
    /// The target no longer exists.
    TargetMissing,
    /// The target is an invincible player.
    Invincible,
    /// The target is a player under lifestone protection.
    LifestoneProtection,
    /// The target resisted the spell.
    Resisted,
}

/// Every factor that went into one hit.
///
/// Transient: built per collision and never stored on actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageContext {
    /// The critical roll succeeded and was not defended.
    pub critical_hit: bool,
    /// The critical roll succeeded but the target's augmentation avoided it.
    pub critical_defended: bool,
    /// Both sides are players.
    pub pvp: bool,
    /// Damage before bonuses: life base or the war/void roll.
    pub base_damage: f32,
    /// Added by a critical hit.
    pub critical_bonus: f32,
    /// Added by caster skill above the spell's difficulty.
    pub skill_bonus: f32,
    /// Target resistance after rend. Always 1.0 for life projectiles.
    pub resistance_mod: f32,
    /// Shield mitigation.
    pub shield_mod: f32,
    /// Caster element bonus.
    pub elemental_mod: f32,
    /// Caster creature-type bonus.
    pub slayer_mod: f32,
    /// Multiplier of the critical bonus.
    pub critical_damage_mod: f32,
    /// Final magnitude, never negative.
    pub magnitude: f32,
}

/// What the damage engine decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageResult {
    /// No value: resisted or blocked.
    Blocked(BlockReason),
    /// The target was already dead.
    TargetDead,
    /// A hit with a magnitude.
    Hit(DamageContext),
}

impl DamageResult {
    /// Nullable form: `None` when blocked, `-1.0` for a dead target,
    /// otherwise the magnitude.
    #[must_use]
    pub fn as_value(&self) -> Option<f32> {
        match self {
            Self::Blocked(_) => None,
            Self::TargetDead => Some(-1.0),
            Self::Hit(ctx) => Some(ctx.magnitude),
        }
    }
}

/// Mutation requested by the damage engine, applied by the collision
/// resolver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Refresh both players' PK timers.
    UpdatePkTimers {
        /// Attacker.
        attacker: ActorId,
        /// Defender.
        defender: ActorId,
    },
    /// Play lifestone protection on `target` and tell the caster.
    LifestoneProtection {
        /// Protected player.
        target: ActorId,
        /// Player caster to notify.
        notify: Option<ActorId>,
    },
}

/// Full result of [`DamageEngine::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOutcome {
    /// Decision.
    pub result: DamageResult,
    /// Mutations to apply regardless of the decision.
    pub side_effects: Vec<SideEffect>,
}

impl DamageOutcome {
    pub(crate) fn blocked(reason: BlockReason) -> Self {
        Self {
            result: DamageResult::Blocked(reason),
            side_effects: Vec::new(),
        }
    }

    /// `true` for a critical hit.
    #[must_use]
    pub fn critical_hit(&self) -> bool {
        matches!(self.result, DamageResult::Hit(ctx) if ctx.critical_hit)
    }

    /// `true` when a critical was avoided.
    #[must_use]
    pub fn critical_defended(&self) -> bool {
        matches!(self.result, DamageResult::Hit(ctx) if ctx.critical_defended)
    }
}

/// What a collision callback did.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutcome {
    /// The projectile had already impacted or was never set up.
    Ignored,
    /// Terrain, a non-combatant or the caster: impact only.
    Environment,
    /// Untargeted projectile struck someone its caster may not hurt.
    FriendlyFire,
    /// PK rules refused the hit.
    PkBlocked(PkViolation),
    /// The damage engine produced no value.
    Blocked(BlockReason),
    /// The target was already dead.
    TargetDead,
    /// A damage-over-time enchantment was registered.
    DamageOverTime(EffectHandle),
    /// Damage was applied.
    Damaged(AppliedDamage),
}

impl CollisionOutcome {
    /// `true` if the collision changed a vital or registered an enchantment.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::DamageOverTime(_) | Self::Damaged(_))
    }
}
