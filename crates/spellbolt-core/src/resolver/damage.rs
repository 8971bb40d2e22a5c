//! The damage engine.
//!
//! [`DamageEngine::compute`] turns a projectile, its caster and a target into
//! a [`DamageOutcome`]. It only reads the world; every mutation it wants
//! (PK timers, lifestone protection) comes back as a [`SideEffect`].

use spellbook::MagicSchool;
use tracing::{debug, trace};

use super::shield::shield_mod;
use super::{BlockReason, DamageContext, DamageOutcome, DamageResult, SideEffect};
use crate::actor::{ActorId, Skill};
use crate::config::CombatConfig;
use crate::projectile::Projectile;
use crate::rolls::DrawSequence;
use crate::rules::CombatRules;
use crate::world::World;

/// Computes hits.
#[derive(Clone, Copy)]
pub struct DamageEngine<'a> {
    rules: &'a dyn CombatRules,
    config: &'a CombatConfig,
}

impl std::fmt::Debug for DamageEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DamageEngine")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> DamageEngine<'a> {
    /// Creates an engine over a ruleset and tuning.
    #[must_use]
    pub fn new(rules: &'a dyn CombatRules, config: &'a CombatConfig) -> Self {
        Self { rules, config }
    }

    /// Computes the outcome of `projectile` hitting `target`.
    ///
    /// Checks run in order: caster present, target present, target not
    /// invincible, target alive, target not under lifestone protection,
    /// target fails to resist. Then the critical roll, critical defense,
    /// shield, PvP timers and the school-specific formula.
    pub fn compute(
        &self,
        world: &World,
        projectile: &Projectile,
        target: ActorId,
        draws: &mut DrawSequence<'_>,
    ) -> DamageOutcome {
        let Some(source) = projectile.source().and_then(|id| world.actor(id)) else {
            return DamageOutcome::blocked(BlockReason::SourceMissing);
        };
        let Some(target) = world.actor(target) else {
            return DamageOutcome::blocked(BlockReason::TargetMissing);
        };
        let Some(target_creature) = target.as_creature() else {
            return DamageOutcome::blocked(BlockReason::TargetMissing);
        };
        let spell = projectile.spell();
        let source_player = source.as_player();
        let target_player = target.as_player();

        if target_player.is_some_and(|p| p.invincible) {
            return DamageOutcome::blocked(BlockReason::Invincible);
        }

        if target_creature.vitals.health.current == 0 {
            trace!(target = %target.id(), "target already dead");
            return DamageOutcome {
                result: DamageResult::TargetDead,
                side_effects: Vec::new(),
            };
        }

        if target_player.is_some_and(|p| p.lifestone_protection) {
            return DamageOutcome {
                result: DamageResult::Blocked(BlockReason::LifestoneProtection),
                side_effects: vec![SideEffect::LifestoneProtection {
                    target: target.id(),
                    notify: source_player.map(|_| source.id()),
                }],
            };
        }

        let resist_chance = self.rules.resist_chance(source, target, spell);
        if resist_chance > 0.0 && draws.resist().is_some_and(|roll| roll < resist_chance) {
            debug!(source = %source.id(), target = %target.id(), spell = %spell.id, "spell resisted");
            return DamageOutcome::blocked(BlockReason::Resisted);
        }

        // critical, then critical defense
        let mut critical_hit = false;
        let mut critical_defended = false;
        let crit_chance = f64::from(self.rules.critical_chance(source, target));
        if draws.critical().is_some_and(|roll| roll < crit_chance) {
            let augmentation = target_player.map_or(0, |p| p.aug_crit_defense);
            if augmentation > 0 {
                let per_aug = if source_player.is_some() {
                    self.config.crit_defense_vs_player
                } else {
                    self.config.crit_defense_vs_creature
                };
                #[allow(clippy::cast_precision_loss)]
                let defense_chance = f64::from(augmentation as f32 * per_aug);
                critical_defended = draws
                    .critical_defense()
                    .is_some_and(|roll| defense_chance > roll);
            }
            critical_hit = !critical_defended;
        }

        let shield = shield_mod(target, projectile.position(), &self.config.shield);

        let pvp = source_player.is_some() && target_player.is_some();
        let mut side_effects = Vec::new();
        if pvp && spell.harmful {
            side_effects.push(SideEffect::UpdatePkTimers {
                attacker: source.id(),
                defender: target.id(),
            });
        }

        let elemental = self.rules.elemental_mod(source, spell.damage_type);
        let slayer = self.rules.slayer_mod(source, target);
        let crit_damage_mod = if critical_hit {
            self.rules.critical_damage_mod(source)
        } else {
            1.0
        };

        #[allow(clippy::cast_precision_loss)]
        let (min, max) = (spell.min_damage as f32, spell.max_damage as f32);

        let ctx = if spell.school == MagicSchool::Life {
            #[allow(clippy::cast_precision_loss)]
            let base = projectile.life_damage() as f32 * spell.damage_ratio;
            let critical_bonus = if critical_hit {
                base * self.config.life_crit_fraction * crit_damage_mod
            } else {
                0.0
            };
            let magnitude = (base + critical_bonus) * elemental * slayer * shield;
            DamageContext {
                critical_hit,
                critical_defended,
                pvp,
                base_damage: base,
                critical_bonus,
                skill_bonus: 0.0,
                resistance_mod: 1.0,
                shield_mod: shield,
                elemental_mod: elemental,
                slayer_mod: slayer,
                critical_damage_mod: crit_damage_mod,
                magnitude: magnitude.max(0.0),
            }
        } else {
            let critical_bonus = if critical_hit {
                let anchor = if pvp { min } else { max };
                anchor * self.config.war_crit_fraction * crit_damage_mod
            } else {
                0.0
            };

            let skill_bonus = source_player.map_or(0.0, |p| {
                let difficulty = spell.power.min(self.config.war_difficulty_cap);
                let skill = p.creature.skills.get(Skill::for_school(spell.school)).current;
                if skill > difficulty {
                    #[allow(clippy::cast_precision_loss)]
                    let over = (skill - difficulty) as f32;
                    min * over / self.config.skill_bonus_divisor
                } else {
                    0.0
                }
            });

            #[allow(clippy::cast_precision_loss)]
            let base = draws
                .damage(spell.min_damage, spell.max_damage)
                .unwrap_or(spell.min_damage) as f32;
            let resistance = self
                .rules
                .resistance_mod(source, target, spell.damage_type)
                .max(0.0);

            let magnitude = (base + critical_bonus + skill_bonus) * resistance * elemental * slayer * shield;
            DamageContext {
                critical_hit,
                critical_defended,
                pvp,
                base_damage: base,
                critical_bonus,
                skill_bonus,
                resistance_mod: resistance,
                shield_mod: shield,
                elemental_mod: elemental,
                slayer_mod: slayer,
                critical_damage_mod: crit_damage_mod,
                magnitude: magnitude.max(0.0),
            }
        };

        trace!(
            source = %source.id(),
            target = %target.id(),
            spell = %spell.id,
            magnitude = ctx.magnitude,
            critical = ctx.critical_hit,
            "damage computed"
        );

        DamageOutcome {
            result: DamageResult::Hit(ctx),
            side_effects,
        }
    }
}
