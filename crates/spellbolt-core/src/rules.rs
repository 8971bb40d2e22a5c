//! Combat rule checks consulted by the resolver.
//!
//! [`CombatRules`] is the seam where a server plugs in its own ruleset
//! (PvP policy, item modifiers, skill checks). [`StandardRules`] implements
//! the live rules on top of [`CombatConfig`]. Every method is a pure read:
//! rules never mutate actors.

use spellbook::{DamageType, ResistanceType, SpellDescriptor};

use crate::actor::{Actor, PkStatus, Skill, SkillAdvancement, StatusFlags};
use crate::config::CombatConfig;
use crate::message::WeenieError;

/// Role-specific rejection from the PK check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PkViolation {
    /// Sent to the attacker.
    pub attacker_error: WeenieError,
    /// Sent to the defender.
    pub defender_error: WeenieError,
}

/// Ruleset for damage eligibility and modifiers.
///
/// # Example
///
/// ```
/// use spellbolt_core::rules::{CombatRules, StandardRules};
/// use spellbolt_core::actor::{Actor, ActorId, CreatureComponents, PlayerComponents};
///
/// let rules = StandardRules::default();
/// let player = Actor::player(ActorId::new(1), "Aun", PlayerComponents::default());
/// let drudge = Actor::creature(ActorId::new(2), "Drudge", CreatureComponents::default());
///
/// assert!(rules.can_damage(&player, &drudge));
/// assert!(rules.can_damage(&drudge, &player));
/// ```
pub trait CombatRules: Send + Sync {
    /// Whether `attacker` may hurt `target` at all. PK rules are separate.
    fn can_damage(&self, attacker: &Actor, target: &Actor) -> bool;

    /// PK eligibility for a player-vs-player cast, `None` when allowed.
    fn check_pk_status(
        &self,
        attacker: &Actor,
        target: &Actor,
        spell: &SpellDescriptor,
    ) -> Option<PkViolation>;

    /// Chance in `[0, 1]` that `target` resists `spell` cast by `caster`.
    fn resist_chance(&self, caster: &Actor, target: &Actor, spell: &SpellDescriptor) -> f64;

    /// Chance in `[0, 1]` of a critical hit.
    fn critical_chance(&self, attacker: &Actor, target: &Actor) -> f32;

    /// Multiplier of critical bonus damage.
    fn critical_damage_mod(&self, attacker: &Actor) -> f32;

    /// Caster element bonus for `damage_type`.
    fn elemental_mod(&self, attacker: &Actor, damage_type: DamageType) -> f32;

    /// Caster bonus against the target's creature type.
    fn slayer_mod(&self, attacker: &Actor, target: &Actor) -> f32;

    /// Target resistance after the caster's rend.
    fn resistance_mod(&self, attacker: &Actor, target: &Actor, damage_type: DamageType) -> f32;

    /// Bonus for attacking a target from behind.
    fn sneak_attack_mod(&self, attacker: &Actor, target: &Actor) -> f32;

    /// Bonus for a caster of the attacker's own heritage.
    fn heritage_mod(&self, attacker: &Actor) -> f32;
}

// =============================================================================
// Rating math
// =============================================================================

/// Multiplier for a rating that increases an effect.
#[must_use]
pub fn positive_rating_mod(rating: i32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let r = rating.max(0) as f32;
    (100.0 + r) / 100.0
}

/// Multiplier for a rating that reduces an effect.
#[must_use]
pub fn negative_rating_mod(rating: i32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let r = rating.max(0) as f32;
    100.0 / (100.0 + r)
}

/// Combines multipliers by summing their deviations from 1.
///
/// ```
/// use spellbolt_core::rules::additive_combine;
///
/// assert!((additive_combine(&[1.1, 1.2]) - 1.3).abs() < 1e-6);
/// ```
#[must_use]
pub fn additive_combine(mods: &[f32]) -> f32 {
    1.0 + mods.iter().map(|m| m - 1.0).sum::<f32>()
}

/// Chance that `skill` beats `difficulty` in a magic skill check.
#[must_use]
pub fn magic_skill_chance(skill: u32, difficulty: u32, steepness: f64) -> f64 {
    let delta = f64::from(skill) - f64::from(difficulty);
    1.0 - 1.0 / (1.0 + (steepness * delta).exp())
}

// =============================================================================
// Standard rules
// =============================================================================

/// The live ruleset.
#[derive(Debug, Clone, Default)]
pub struct StandardRules {
    config: CombatConfig,
}

impl StandardRules {
    /// Creates rules from tuning.
    #[must_use]
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }
}

impl CombatRules for StandardRules {
    fn can_damage(&self, attacker: &Actor, target: &Actor) -> bool {
        if attacker.is_player() {
            return true;
        }
        let pet = |actor: &Actor| {
            actor
                .as_creature()
                .is_some_and(|c| c.status.contains(StatusFlags::COMBAT_PET))
        };
        target.is_player() || pet(attacker) || pet(target)
    }

    fn check_pk_status(
        &self,
        attacker: &Actor,
        target: &Actor,
        spell: &SpellDescriptor,
    ) -> Option<PkViolation> {
        if attacker.id() == target.id() || !spell.harmful {
            return None;
        }
        let (Some(a), Some(t)) = (attacker.as_player(), target.as_player()) else {
            return None;
        };

        let violation = |attacker_error, defender_error| {
            Some(PkViolation {
                attacker_error,
                defender_error,
            })
        };

        match (a.pk_status, t.pk_status) {
            (PkStatus::NonPk, _) => violation(
                WeenieError::YouFailToAffectYouAreNotPk,
                WeenieError::FailsToAffectYouTheyAreNotPk,
            ),
            (_, PkStatus::NonPk) => violation(
                WeenieError::YouFailToAffectTheyAreNotPk,
                WeenieError::FailsToAffectYouYouAreNotPk,
            ),
            (PkStatus::Pk, PkStatus::PkLite) | (PkStatus::PkLite, PkStatus::Pk) => violation(
                WeenieError::YouFailToAffectNotSamePkType,
                WeenieError::FailsToAffectYouNotSamePkType,
            ),
            _ => None,
        }
    }

    fn resist_chance(&self, caster: &Actor, target: &Actor, spell: &SpellDescriptor) -> f64 {
        if !spell.resistable || caster.id() == target.id() {
            return 0.0;
        }
        let (Some(c), Some(t)) = (caster.as_creature(), target.as_creature()) else {
            return 0.0;
        };
        let skill = c.skills.get(Skill::for_school(spell.school)).current;
        let defense = t.skills.get(Skill::MagicDefense).current;
        1.0 - magic_skill_chance(skill, defense, self.config.resist_check_steepness)
    }

    fn critical_chance(&self, attacker: &Actor, _target: &Actor) -> f32 {
        let Some(creature) = attacker.as_creature() else {
            return 0.0;
        };
        let base = creature
            .equipment
            .caster
            .and_then(|c| c.crit_frequency)
            .unwrap_or(self.config.default_magic_crit_frequency);
        #[allow(clippy::cast_precision_loss)]
        let rating = creature.ratings.crit as f32 * self.config.crit_rating_scale;
        (base + rating).clamp(0.0, 1.0)
    }

    fn critical_damage_mod(&self, attacker: &Actor) -> f32 {
        attacker
            .as_creature()
            .and_then(|c| c.equipment.caster)
            .and_then(|c| c.crit_damage_mod)
            .unwrap_or(1.0)
    }

    fn elemental_mod(&self, attacker: &Actor, damage_type: DamageType) -> f32 {
        attacker
            .as_creature()
            .and_then(|c| c.equipment.caster)
            .and_then(|c| c.elemental)
            .filter(|e| e.damage_type == damage_type)
            .map_or(1.0, |e| e.modifier)
    }

    fn slayer_mod(&self, attacker: &Actor, target: &Actor) -> f32 {
        let Some(target_type) = target.as_creature().map(|c| c.creature_type) else {
            return 1.0;
        };
        attacker
            .as_creature()
            .and_then(|c| c.equipment.caster)
            .and_then(|c| c.slayer)
            .filter(|s| s.creature_type == target_type)
            .map_or(1.0, |s| s.modifier)
    }

    fn resistance_mod(&self, attacker: &Actor, target: &Actor, damage_type: DamageType) -> f32 {
        let resistance_type = damage_type.resistance_type();
        let Some(t) = target.as_creature() else {
            return 1.0;
        };
        let resistance = if resistance_type == ResistanceType::Undefined {
            1.0
        } else {
            t.resistances.get(resistance_type)
        };

        let rend = attacker
            .as_creature()
            .and_then(|c| c.equipment.caster)
            .and_then(|c| c.resistance_rend)
            .filter(|r| r.damage_type == damage_type)
            .map_or(1.0, |r| r.modifier);

        if rend > 1.0 {
            resistance.max(rend)
        } else {
            resistance
        }
    }

    fn sneak_attack_mod(&self, attacker: &Actor, target: &Actor) -> f32 {
        let Some(a) = attacker.as_player() else {
            return 1.0;
        };
        let skill = a.creature.skills.get(Skill::SneakAttack);
        let bonus = match skill.advancement {
            SkillAdvancement::Untrained => return 1.0,
            SkillAdvancement::Trained => self.config.sneak_attack_trained,
            SkillAdvancement::Specialized => self.config.sneak_attack_specialized,
        };
        let angle = target
            .transform()
            .angle_to(attacker.transform().position)
            .abs();
        if angle > self.config.sneak_attack_angle {
            1.0 + bonus
        } else {
            1.0
        }
    }

    fn heritage_mod(&self, attacker: &Actor) -> f32 {
        let Some(player) = attacker.as_player() else {
            return 1.0;
        };
        match player.creature.equipment.caster.and_then(|c| c.heritage) {
            Some(heritage) if heritage == player.heritage => self.config.heritage_bonus,
            _ => 1.0,
        }
    }
}
