//! Shield mitigation against spell projectiles.

use glam::Vec3;

use crate::actor::{Actor, CombatMode, Skill, SkillAdvancement};
use crate::config::ShieldConfig;

/// Damage multiplier from the target's shield.
///
/// 1.0 unless the target is in a combat stance, wears a shield that absorbs
/// magic, faces the projectile (within half the effective arc) and has the
/// shield skill trained with enough base skill. Otherwise the reduction is
///
/// ```text
/// cap * spec * min(base, max) * factor - cap * spec * offset
/// ```
///
/// and the multiplier is `1 - reduction`, at most 1.0 and at least the
/// configured floor.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use spellbolt_core::actor::{Actor, ActorId, CreatureComponents};
/// use spellbolt_core::config::ShieldConfig;
/// use spellbolt_core::resolver::shield_mod;
///
/// let peaceful = Actor::creature(ActorId::new(1), "Drudge", CreatureComponents::default());
/// assert_eq!(shield_mod(&peaceful, Vec3::new(0.0, 5.0, 0.0), &ShieldConfig::default()), 1.0);
/// ```
#[must_use]
pub fn shield_mod(target: &Actor, projectile_position: Vec3, config: &ShieldConfig) -> f32 {
    let Some(creature) = target.as_creature() else {
        return 1.0;
    };

    if creature.combat_mode == CombatMode::NonCombat {
        return 1.0;
    }

    let Some(cap) = creature.equipment.shield.and_then(|s| s.absorb_magic_damage) else {
        return 1.0;
    };

    let angle = creature.transform.angle_to(projectile_position);
    if angle.abs() > config.effective_angle / 2.0 {
        return 1.0;
    }

    let skill = creature.skills.get(Skill::Shield);
    if skill.advancement < SkillAdvancement::Trained || skill.base < config.min_base_skill {
        return 1.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let base = skill.base.min(config.max_base_skill) as f32;
    let spec = if skill.advancement == SkillAdvancement::Specialized {
        config.specialized_mod
    } else {
        config.trained_mod
    };

    let reduction = cap * spec * base * config.skill_factor - cap * spec * config.skill_offset;
    let multiplier = (1.0 - reduction).min(1.0);
    match config.floor {
        Some(floor) => multiplier.max(floor),
        None => multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, CreatureComponents, CreatureSkill, ShieldItem};

    fn defender(base: u32, advancement: SkillAdvancement, cap: f32) -> Actor {
        let mut components = CreatureComponents::at_position(Vec3::ZERO, 0.0);
        components.combat_mode = CombatMode::Magic;
        components.equipment.shield = Some(ShieldItem {
            absorb_magic_damage: Some(cap),
        });
        components
            .skills
            .set(Skill::Shield, CreatureSkill::new(base, advancement));
        Actor::creature(ActorId::new(1), "Guard", components)
    }

    const FRONT: Vec3 = Vec3::new(0.0, 10.0, 0.0);
    const BEHIND: Vec3 = Vec3::new(0.0, -10.0, 0.0);

    mod eligibility_tests {
        use super::*;

        #[test]
        fn non_combat_is_unmitigated() {
            let mut target = defender(433, SkillAdvancement::Specialized, 1.0);
            target.as_creature_mut().unwrap().combat_mode = CombatMode::NonCombat;
            assert_eq!(shield_mod(&target, FRONT, &ShieldConfig::default()), 1.0);
        }

        #[test]
        fn shield_without_absorption_is_unmitigated() {
            let mut target = defender(433, SkillAdvancement::Specialized, 1.0);
            target.as_creature_mut().unwrap().equipment.shield = Some(ShieldItem::default());
            assert_eq!(shield_mod(&target, FRONT, &ShieldConfig::default()), 1.0);
        }

        #[test]
        fn projectile_from_behind_is_unmitigated() {
            let target = defender(433, SkillAdvancement::Specialized, 1.0);
            assert_eq!(shield_mod(&target, BEHIND, &ShieldConfig::default()), 1.0);
        }

        #[test]
        fn low_or_untrained_skill_is_unmitigated() {
            let config = ShieldConfig::default();
            assert_eq!(shield_mod(&defender(99, SkillAdvancement::Specialized, 1.0), FRONT, &config), 1.0);
            assert_eq!(shield_mod(&defender(300, SkillAdvancement::Untrained, 1.0), FRONT, &config), 1.0);
        }

        #[test]
        fn objects_are_unmitigated() {
            use crate::actor::ObjectComponents;
            let door = Actor::object(ActorId::new(2), "Door", ObjectComponents::default());
            assert_eq!(shield_mod(&door, FRONT, &ShieldConfig::default()), 1.0);
        }
    }

    mod formula_tests {
        use super::*;

        #[test]
        fn skill_100_gives_nothing() {
            let m = shield_mod(&defender(100, SkillAdvancement::Specialized, 1.0), FRONT, &ShieldConfig::default());
            assert!((m - 1.0).abs() < 1e-5);
        }

        #[test]
        fn specialized_200_reduces_thirty_percent() {
            let m = shield_mod(&defender(200, SkillAdvancement::Specialized, 1.0), FRONT, &ShieldConfig::default());
            assert!((m - 0.7).abs() < 1e-5);
        }

        #[test]
        fn trained_200_reduces_twenty_four_percent() {
            let m = shield_mod(&defender(200, SkillAdvancement::Trained, 1.0), FRONT, &ShieldConfig::default());
            assert!((m - 0.76).abs() < 1e-5);
        }

        #[test]
        fn skill_above_433_is_capped() {
            let config = ShieldConfig::default();
            let at_cap = shield_mod(&defender(433, SkillAdvancement::Specialized, 0.5), FRONT, &config);
            let above = shield_mod(&defender(600, SkillAdvancement::Specialized, 0.5), FRONT, &config);
            assert!((at_cap - above).abs() < f32::EPSILON);
            // 0.5 * (433 * 0.003 - 0.3) = 0.4995
            assert!((at_cap - 0.5005).abs() < 1e-4);
        }

        /// Full cap at maximum skill leaves almost nothing but stays positive.
        /// Any cap past this point is what the floor clamps.
        #[test]
        fn full_cap_at_max_skill_stays_positive() {
            let m = shield_mod(&defender(433, SkillAdvancement::Specialized, 1.0), FRONT, &ShieldConfig::default());
            // 1 - (433 * 0.003 - 0.3) = 0.001
            assert!((m - 0.001).abs() < 1e-4);
            assert!(m > 0.0 && m <= 1.0);
        }

        #[test]
        fn floor_clamps_oversized_caps() {
            let target = defender(433, SkillAdvancement::Specialized, 2.0);
            assert_eq!(shield_mod(&target, FRONT, &ShieldConfig::default()), 0.0);

            let unclamped = ShieldConfig {
                floor: None,
                ..ShieldConfig::default()
            };
            assert!(shield_mod(&target, FRONT, &unclamped) < 0.0);
        }

        #[test]
        fn side_hit_within_arc_counts() {
            let target = defender(200, SkillAdvancement::Specialized, 1.0);
            let side = Vec3::new(10.0, 0.1, 0.0);
            assert!(shield_mod(&target, side, &ShieldConfig::default()) < 1.0);
        }
    }
}
