//! Combat tuning.
//!
//! Every constant the damage pipeline uses lives here so servers can retune
//! without a rebuild. Missing fields fall back to [`CombatConfig::default`].
//!
//! # Example
//!
//! ```
//! use spellbolt_core::config::CombatConfig;
//!
//! let config = CombatConfig::from_json(r#"{"removal_delay_ticks": 8}"#).unwrap();
//! assert_eq!(config.removal_delay_ticks, 8);
//! assert_eq!(config.war_difficulty_cap, 350);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::projectile::ProjectileContent;

/// Shield mitigation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Full arc, in degrees, in front of the defender that a shield covers.
    pub effective_angle: f32,
    /// Minimum base shield skill before the shield does anything.
    pub min_base_skill: u32,
    /// Base shield skill beyond which there is no further benefit.
    pub max_base_skill: u32,
    /// Skill multiplier when shield is specialized.
    pub specialized_mod: f32,
    /// Skill multiplier when shield is only trained.
    pub trained_mod: f32,
    /// Reduction per point of base skill.
    pub skill_factor: f32,
    /// Constant subtracted from the scaled reduction.
    pub skill_offset: f32,
    /// Lowest multiplier the shield can produce. `None` leaves it unclamped.
    pub floor: Option<f32>,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            effective_angle: 180.0,
            min_base_skill: 100,
            max_base_skill: 433,
            specialized_mod: 1.0,
            trained_mod: 0.8,
            skill_factor: 0.003,
            skill_offset: 0.3,
            floor: Some(0.0),
        }
    }
}

/// Damage pipeline and projectile lifecycle tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Ticks between impact and removal.
    pub removal_delay_ticks: u64,
    /// Critical chance of a caster with no critical-frequency item.
    pub default_magic_crit_frequency: f32,
    /// Per-rating change in critical chance.
    pub crit_rating_scale: f32,
    /// Critical defense chance per augmentation against player attackers.
    pub crit_defense_vs_player: f32,
    /// Critical defense chance per augmentation against everything else.
    pub crit_defense_vs_creature: f32,
    /// Spell power above which war/void skill bonus stops growing.
    pub war_difficulty_cap: u32,
    /// Divisor of the war/void skill bonus.
    pub skill_bonus_divisor: f32,
    /// Life critical bonus as a fraction of base damage.
    pub life_crit_fraction: f32,
    /// War/void critical bonus as a fraction of min (PvP) or max (PvE) damage.
    pub war_crit_fraction: f32,
    /// Multiplier for a caster matching the player's heritage.
    pub heritage_bonus: f32,
    /// Sneak attack bonus when the skill is trained.
    pub sneak_attack_trained: f32,
    /// Sneak attack bonus when the skill is specialized.
    pub sneak_attack_specialized: f32,
    /// Angle from the defender's facing beyond which an attack counts as from behind.
    pub sneak_attack_angle: f32,
    /// Steepness of the resist skill check.
    pub resist_check_steepness: f64,
    /// Shield mitigation.
    pub shield: ShieldConfig,
    /// Projectile setup exceptions.
    pub content: ProjectileContent,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            removal_delay_ticks: 5,
            default_magic_crit_frequency: 0.05,
            crit_rating_scale: 0.01,
            crit_defense_vs_player: 0.05,
            crit_defense_vs_creature: 0.25,
            war_difficulty_cap: 350,
            skill_bonus_divisor: 1000.0,
            life_crit_fraction: 0.5,
            war_crit_fraction: 0.5,
            heritage_bonus: 1.05,
            sneak_attack_trained: 0.1,
            sneak_attack_specialized: 0.2,
            sneak_attack_angle: 90.0,
            resist_check_steepness: 0.03,
            shield: ShieldConfig::default(),
            content: ProjectileContent::default(),
        }
    }
}

impl CombatConfig {
    /// Parses a config, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] on malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        debug!(
            removal_delay = config.removal_delay_ticks,
            shield_floor = ?config.shield.floor,
            "loaded combat config"
        );
        Ok(config)
    }
}
