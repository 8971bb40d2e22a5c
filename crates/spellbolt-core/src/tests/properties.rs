//! Property tests for the pure parts: classification, intensity, shields.

use glam::Vec3;
use proptest::prelude::*;
use spellbook::{SpellCategory, SpellDescriptor, SpellId};

use crate::actor::{
    Actor, ActorId, CombatMode, CreatureComponents, CreatureSkill, ShieldItem, Skill,
    SkillAdvancement,
};
use crate::config::ShieldConfig;
use crate::projectile::{classify, intensity, ProjectileKind, RING_EXPLOSION_SPELL};
use crate::resolver::shield_mod;

fn any_category() -> impl Strategy<Value = SpellCategory> {
    prop_oneof![
        Just(SpellCategory::Undefined),
        Just(SpellCategory::FireMissile),
        Just(SpellCategory::AcidRing),
        Just(SpellCategory::NetherStreak),
        Just(SpellCategory::HealthLowering),
        Just(SpellCategory::StaminaLowering),
        Just(SpellCategory::NetherBolt),
        Just(SpellCategory::Fireworks),
    ]
}

prop_compose! {
    fn any_spell()(
        category in any_category(),
        num_projectiles in 0u32..12,
        spread in prop_oneof![Just(0.0f32), Just(90.0), Just(360.0)],
        non_tracking in any::<bool>(),
        wcid in prop_oneof![Just(0u32), 1u32..50_000],
        level in 0u32..10,
        name in prop_oneof![
            Just(String::new()),
            Just("Rolling Death".to_string()),
            Just("Blade Volley".to_string()),
        ],
    ) -> SpellDescriptor {
        let mut spell = SpellDescriptor::unresolved(SpellId::new(1));
        spell.category = category;
        spell.num_projectiles = num_projectiles;
        spell.spread_angle = spread;
        spell.non_tracking = non_tracking;
        spell.wcid = wcid;
        spell.level = level;
        spell.name = name;
        spell
    }
}

fn guard(base: u32, advancement: SkillAdvancement, cap: f32, mode: CombatMode) -> Actor {
    let mut components = CreatureComponents::at_position(Vec3::ZERO, 0.0);
    components.combat_mode = mode;
    components.equipment.shield = Some(ShieldItem {
        absorb_magic_damage: Some(cap),
    });
    components
        .skills
        .set(Skill::Shield, CreatureSkill::new(base, advancement));
    Actor::creature(ActorId::new(1), "Guard", components)
}

proptest! {
    #[test]
    fn classify_is_pure(spell in any_spell()) {
        prop_assert_eq!(classify(&spell), classify(&spell.clone()));
    }

    #[test]
    fn single_projectiles_have_single_kinds(mut spell in any_spell()) {
        spell.num_projectiles = 1;
        prop_assume!(spell.wcid != 0);
        let kind = classify(&spell);
        prop_assert!(matches!(
            kind,
            ProjectileKind::Streak | ProjectileKind::Arc | ProjectileKind::Wall | ProjectileKind::Bolt
        ));
    }

    #[test]
    fn full_spread_is_a_ring(mut spell in any_spell(), count in 2u32..12) {
        spell.num_projectiles = count;
        spell.spread_angle = 360.0;
        prop_assume!(spell.wcid != 0);
        prop_assert_eq!(classify(&spell), ProjectileKind::Ring);
    }

    #[test]
    fn missing_class_is_undefined(mut spell in any_spell()) {
        spell.wcid = 0;
        prop_assert_eq!(classify(&spell), ProjectileKind::Undefined);
    }

    #[test]
    fn walls_are_always_point_four(level in 0u32..20, id in 0u32..5000) {
        prop_assert!((intensity(ProjectileKind::Wall, level, SpellId::new(id)) - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn intensity_stays_in_unit_range(level in 0u32..20, ring in any::<bool>(), special in any::<bool>()) {
        let kind = if ring { ProjectileKind::Ring } else { ProjectileKind::Bolt };
        let id = if special { RING_EXPLOSION_SPELL } else { SpellId::new(1) };
        let value = intensity(kind, level, id);
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn shield_is_neutral_out_of_combat(base in 0u32..600, cap in 0.0f32..2.0) {
        let target = guard(base, SkillAdvancement::Specialized, cap, CombatMode::NonCombat);
        prop_assert!((shield_mod(&target, Vec3::new(0.0, 10.0, 0.0), &ShieldConfig::default()) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shield_is_neutral_below_minimum_skill(base in 0u32..100, cap in 0.0f32..1.0) {
        let target = guard(base, SkillAdvancement::Specialized, cap, CombatMode::Magic);
        prop_assert!((shield_mod(&target, Vec3::new(0.0, 10.0, 0.0), &ShieldConfig::default()) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn eligible_shield_stays_within_cap(
        base in 100u32..800,
        cap in 0.0f32..=1.0,
        specialized in any::<bool>(),
    ) {
        let advancement = if specialized { SkillAdvancement::Specialized } else { SkillAdvancement::Trained };
        let target = guard(base, advancement, cap, CombatMode::Magic);
        let value = shield_mod(&target, Vec3::new(0.0, 10.0, 0.0), &ShieldConfig::default());
        prop_assert!(value <= 1.0);
        prop_assert!(value >= 1.0 - cap - 1e-5);
    }
}

#[test]
fn intensity_is_monotone_then_flat() {
    let levels: Vec<f32> = (1..=8)
        .map(|level| intensity(ProjectileKind::Bolt, level, SpellId::new(1)))
        .collect();
    assert!(levels[..6].windows(2).all(|w| w[0] <= w[1]));
    assert!(levels[5..].iter().all(|v| (*v - 1.0).abs() < f32::EPSILON));
}
