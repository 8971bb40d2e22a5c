//! Projectile classification and impact intensity.
//!
//! Both functions are pure: the same inputs always produce the same output,
//! and unknown spells degrade to [`ProjectileKind::Undefined`] rather than
//! failing.

use spellbook::{SpellCategory, SpellDescriptor, SpellId, SpellLookup};
use tracing::trace;

use super::ProjectileKind;

/// The one ring spell whose impact uses the reduced ring intensity and an
/// explosion script.
pub const RING_EXPLOSION_SPELL: SpellId = SpellId::new(3818);

const ROLLING_DEATH: &str = "Rolling Death";

/// Classifies a spell descriptor into a projectile kind.
///
/// First match wins:
///
/// - single projectile: streak categories (plus nether streak and fireworks)
///   → `Streak`; non-tracking → `Arc`; "Rolling Death" → `Wall`; else `Bolt`
/// - multiple projectiles: ring categories or a full 360° spread → `Ring`;
///   burst categories or the third rising nether DoT → `Blast`; volley
///   categories or "Volley" in the name → `Volley`; wall categories →
///   `Wall`; strike categories → `Strike`; else `Undefined`
///
/// A descriptor with no projectile class is `Undefined`.
///
/// # Example
///
/// ```
/// use spellbolt_core::projectile::{classify, ProjectileKind};
/// use spellbook::{SpellCategory, SpellDescriptor, SpellId};
///
/// let mut spell = SpellDescriptor::unresolved(SpellId::new(27));
/// spell.wcid = 1635;
/// spell.num_projectiles = 1;
/// spell.category = SpellCategory::FireMissile;
///
/// assert_eq!(classify(&spell), ProjectileKind::Bolt);
/// ```
#[must_use]
pub fn classify(spell: &SpellDescriptor) -> ProjectileKind {
    if !spell.has_projectile() {
        return ProjectileKind::Undefined;
    }

    let category = spell.category;

    if spell.num_projectiles == 1 {
        return if category.is_elemental_streak()
            || matches!(category, SpellCategory::NetherStreak | SpellCategory::Fireworks)
        {
            ProjectileKind::Streak
        } else if spell.non_tracking {
            ProjectileKind::Arc
        } else if spell.name.contains(ROLLING_DEATH) {
            ProjectileKind::Wall
        } else {
            ProjectileKind::Bolt
        };
    }

    #[allow(clippy::float_cmp)]
    let full_circle = spell.spread_angle == 360.0;

    if category.is_elemental_ring() || full_circle {
        ProjectileKind::Ring
    } else if category.is_elemental_burst()
        || category == SpellCategory::NetherDamageOverTimeRaising3
    {
        ProjectileKind::Blast
    } else if category.is_elemental_volley() || spell.name.contains("Volley") {
        ProjectileKind::Volley
    } else if category.is_elemental_wall() {
        ProjectileKind::Wall
    } else if category.is_elemental_strike() {
        ProjectileKind::Strike
    } else {
        ProjectileKind::Undefined
    }
}

/// Classifies a spell by id. Unknown ids are `Undefined`.
#[must_use]
pub fn classify_id(spells: &dyn SpellLookup, id: SpellId) -> ProjectileKind {
    match spells.get(id) {
        Ok(spell) => classify(&spell),
        Err(err) => {
            trace!(spell = %id, error = %err, "classifying unknown spell as undefined");
            ProjectileKind::Undefined
        }
    }
}

/// Strength of the impact effect, in `[0, 1]`.
///
/// Walls are always 0.4. Rings use 0.4 at level 6 (or for
/// [`RING_EXPLOSION_SPELL`]) and 1.0 at level 7. Everything else, including
/// other ring levels, follows the level table.
#[must_use]
pub fn intensity(kind: ProjectileKind, level: u32, spell: SpellId) -> f32 {
    intensity_with(kind, level, spell == RING_EXPLOSION_SPELL)
}

pub(super) fn intensity_with(kind: ProjectileKind, level: u32, ring_special: bool) -> f32 {
    match kind {
        ProjectileKind::Wall => return 0.4,
        ProjectileKind::Ring if level == 6 || ring_special => return 0.4,
        ProjectileKind::Ring if level == 7 => return 1.0,
        _ => {}
    }

    match level {
        2 => 0.2,
        3 => 0.4,
        4 => 0.6,
        5 => 0.8,
        6..=8 => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellbook::SpellTable;

    fn spell(num_projectiles: u32, category: SpellCategory) -> SpellDescriptor {
        let mut spell = SpellDescriptor::unresolved(SpellId::new(100));
        spell.name = "Test Spell".into();
        spell.wcid = 1000;
        spell.num_projectiles = num_projectiles;
        spell.category = category;
        spell
    }

    mod single_projectile_tests {
        use super::*;

        #[test]
        fn plain_missile_is_bolt() {
            assert_eq!(classify(&spell(1, SpellCategory::FireMissile)), ProjectileKind::Bolt);
        }

        #[test]
        fn streak_categories_are_streaks() {
            assert_eq!(classify(&spell(1, SpellCategory::ColdStreak)), ProjectileKind::Streak);
            assert_eq!(classify(&spell(1, SpellCategory::NetherStreak)), ProjectileKind::Streak);
            assert_eq!(classify(&spell(1, SpellCategory::Fireworks)), ProjectileKind::Streak);
        }

        #[test]
        fn streak_wins_over_non_tracking() {
            let mut s = spell(1, SpellCategory::AcidStreak);
            s.non_tracking = true;
            assert_eq!(classify(&s), ProjectileKind::Streak);
        }

        #[test]
        fn non_tracking_is_arc() {
            let mut s = spell(1, SpellCategory::FireMissile);
            s.non_tracking = true;
            assert_eq!(classify(&s), ProjectileKind::Arc);
        }

        #[test]
        fn rolling_death_is_wall() {
            let mut s = spell(1, SpellCategory::NetherBolt);
            s.name = "Rolling Death".into();
            assert_eq!(classify(&s), ProjectileKind::Wall);
        }

        #[test]
        fn ring_category_with_one_projectile_is_bolt() {
            assert_eq!(classify(&spell(1, SpellCategory::FireRing)), ProjectileKind::Bolt);
        }
    }

    mod multi_projectile_tests {
        use super::*;

        #[test]
        fn ring_categories_are_rings() {
            assert_eq!(classify(&spell(8, SpellCategory::AcidRing)), ProjectileKind::Ring);
        }

        #[test]
        fn full_spread_is_ring_regardless_of_category() {
            let mut s = spell(6, SpellCategory::FireVolley);
            s.spread_angle = 360.0;
            assert_eq!(classify(&s), ProjectileKind::Ring);
        }

        #[test]
        fn bursts_and_rising_dot_are_blasts() {
            assert_eq!(classify(&spell(5, SpellCategory::FireBurst)), ProjectileKind::Blast);
            assert_eq!(
                classify(&spell(5, SpellCategory::NetherDamageOverTimeRaising3)),
                ProjectileKind::Blast
            );
        }

        #[test]
        fn volley_by_category_or_name() {
            assert_eq!(classify(&spell(3, SpellCategory::BladeVolley)), ProjectileKind::Volley);
            let mut s = spell(3, SpellCategory::FireMissile);
            s.name = "Flaming Missile Volley".into();
            assert_eq!(classify(&s), ProjectileKind::Volley);
        }

        #[test]
        fn walls_and_strikes() {
            assert_eq!(classify(&spell(5, SpellCategory::ColdWall)), ProjectileKind::Wall);
            assert_eq!(classify(&spell(1 + 1, SpellCategory::FireStrike)), ProjectileKind::Strike);
        }

        #[test]
        fn unmatched_multi_is_undefined() {
            assert_eq!(classify(&spell(3, SpellCategory::FireMissile)), ProjectileKind::Undefined);
        }
    }

    mod unresolved_tests {
        use super::*;

        #[test]
        fn no_projectile_class_is_undefined() {
            let mut s = spell(1, SpellCategory::FireMissile);
            s.wcid = 0;
            assert_eq!(classify(&s), ProjectileKind::Undefined);
        }

        #[test]
        fn unknown_id_is_undefined() {
            let table = SpellTable::new();
            assert_eq!(classify_id(&table, SpellId::new(5)), ProjectileKind::Undefined);
        }
    }

    mod intensity_tests {
        use super::*;

        #[test]
        fn wall_is_always_point_four() {
            for level in 0..10 {
                assert!((intensity(ProjectileKind::Wall, level, SpellId::new(1)) - 0.4).abs() < 1e-6);
            }
        }

        #[test]
        fn level_table() {
            let expected = [(1, 0.0), (2, 0.2), (3, 0.4), (4, 0.6), (5, 0.8), (6, 1.0), (7, 1.0), (8, 1.0), (9, 0.0)];
            for (level, value) in expected {
                let got = intensity(ProjectileKind::Bolt, level, SpellId::new(1));
                assert!((got - value).abs() < 1e-6, "level {level}: {got}");
            }
        }

        #[test]
        fn ring_special_cases() {
            assert!((intensity(ProjectileKind::Ring, 6, SpellId::new(1)) - 0.4).abs() < 1e-6);
            assert!((intensity(ProjectileKind::Ring, 7, SpellId::new(1)) - 1.0).abs() < 1e-6);
            assert!((intensity(ProjectileKind::Ring, 3, RING_EXPLOSION_SPELL) - 0.4).abs() < 1e-6);
            // other levels fall through to the table
            assert!((intensity(ProjectileKind::Ring, 5, SpellId::new(1)) - 0.8).abs() < 1e-6);
        }

        #[test]
        fn undefined_level_zero_is_lowest() {
            assert_eq!(intensity(ProjectileKind::Undefined, 0, SpellId::new(0)), 0.0);
        }
    }
}
