//! One-time projectile setup: classification plus initial physics and visuals.

use std::collections::BTreeSet;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use spellbook::{SpellDescriptor, SpellId, SpellLookup};
use tracing::debug;

use super::classify::{classify, intensity_with};
use super::{PhysicsFlags, Projectile, ProjectileKind};
use crate::error::CoreError;
use crate::message::PlayScript;

/// Per-content exceptions applied during setup.
///
/// Keyed by projectile class id (`wcid`) or spell id. Swappable so content
/// fixes do not need code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileContent {
    /// Classes that always get the collision script, whatever their kind.
    pub collision_script_classes: BTreeSet<u32>,
    /// Classes whose collisions are never scripted.
    pub unscripted_classes: BTreeSet<u32>,
    /// Ring spells that explode on contact.
    pub ring_explosion_spells: BTreeSet<SpellId>,
    /// Spinning blade classes: no path alignment, fixed spin.
    pub whirling_blade_classes: BTreeSet<u32>,
    /// Spin of whirling blades about the primary axis, radians per tick.
    pub whirl_spin: f32,
    /// Name fragments that keep a projectile intangible. Matched as
    /// substrings of the spell name, so "Rolling Death" also covers any
    /// name containing it.
    pub ethereal_names: Vec<String>,
}

impl Default for ProjectileContent {
    fn default() -> Self {
        Self {
            collision_script_classes: [7276, 7277, 7279, 7280].into_iter().collect(),
            unscripted_classes: [7278, 7281, 7282, 23144].into_iter().collect(),
            ring_explosion_spells: std::iter::once(super::RING_EXPLOSION_SPELL).collect(),
            whirling_blade_classes: [1636, 7268, 20979].into_iter().collect(),
            whirl_spin: 12.566_37,
            ethereal_names: vec!["Rolling Death".to_string()],
        }
    }
}

impl ProjectileContent {
    /// Impact intensity, honoring this table's ring explosion spells.
    #[must_use]
    pub fn intensity(&self, kind: ProjectileKind, level: u32, spell: SpellId) -> f32 {
        intensity_with(kind, level, self.ring_explosion_spells.contains(&spell))
    }

    fn is_ethereal(&self, spell: &SpellDescriptor) -> bool {
        self.ethereal_names
            .iter()
            .any(|fragment| spell.name.contains(fragment.as_str()))
    }
}

impl Projectile {
    /// Resolves `spell_id` and sets the projectile up.
    ///
    /// Unknown spells set the projectile up as `Undefined`: it still flies
    /// and collides, it just never does anything.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadySetUp`] if called twice.
    pub fn setup_spell(
        &mut self,
        spells: &dyn SpellLookup,
        spell_id: SpellId,
        content: &ProjectileContent,
    ) -> Result<ProjectileKind, CoreError> {
        self.setup(spells.get_or_unresolved(spell_id), content)
    }

    /// Fixes the behavior kind and applies the initial physics state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadySetUp`] if the kind was already fixed.
    pub fn setup(
        &mut self,
        spell: Arc<SpellDescriptor>,
        content: &ProjectileContent,
    ) -> Result<ProjectileKind, CoreError> {
        if self.kind.is_some() {
            return Err(CoreError::AlreadySetUp(self.id));
        }

        let kind = classify(&spell);
        let wcid = spell.wcid;

        self.physics.insert(
            PhysicsFlags::REPORT_COLLISIONS
                | PhysicsFlags::MISSILE
                | PhysicsFlags::ALIGN_PATH
                | PhysicsFlags::PATH_CLIPPED,
        );
        self.physics
            .remove(PhysicsFlags::IGNORE_COLLISIONS | PhysicsFlags::EDGE_SLIDE);
        self.physics
            .set(PhysicsFlags::ETHEREAL, content.is_ethereal(&spell));

        if kind.has_collision_script() || content.collision_script_classes.contains(&wcid) {
            self.default_script = Some(PlayScript::ProjectileCollision);
            self.script_intensity = 1.0;
        }

        if content.unscripted_classes.contains(&wcid) {
            self.physics.remove(PhysicsFlags::SCRIPTED_COLLISION);
        }

        if kind == ProjectileKind::Ring {
            if content.ring_explosion_spells.contains(&spell.id) {
                self.default_script = Some(PlayScript::Explode);
                self.script_intensity = 1.0;
                self.physics.insert(PhysicsFlags::SCRIPTED_COLLISION);
            } else {
                self.physics.remove(PhysicsFlags::SCRIPTED_COLLISION);
            }
        }

        if content.whirling_blade_classes.contains(&wcid) {
            self.physics.remove(PhysicsFlags::ALIGN_PATH);
            self.omega = Vec3::new(content.whirl_spin, 0.0, 0.0);
        }

        debug!(
            projectile = %self.id,
            spell = %spell.id,
            kind = ?kind,
            wcid,
            "projectile set up"
        );

        self.spell = spell;
        self.kind = Some(kind);
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::projectile::{ProjectileId, RING_EXPLOSION_SPELL};
    use spellbook::{SpellCategory, SpellTable};

    fn projectile() -> Projectile {
        Projectile::new(ProjectileId::new(1), Some(ActorId::new(1)), None, Vec3::ZERO)
    }

    fn spell(id: u32, wcid: u32, num_projectiles: u32, category: SpellCategory) -> Arc<SpellDescriptor> {
        let mut spell = SpellDescriptor::unresolved(SpellId::new(id));
        spell.name = "Test".into();
        spell.wcid = wcid;
        spell.num_projectiles = num_projectiles;
        spell.category = category;
        Arc::new(spell)
    }

    mod flags_tests {
        use super::*;

        #[test]
        fn bolt_is_tangible_scripted_missile() {
            let mut p = projectile();
            let kind = p
                .setup(spell(27, 1635, 1, SpellCategory::FireMissile), &ProjectileContent::default())
                .unwrap();
            assert_eq!(kind, ProjectileKind::Bolt);
            let flags = p.physics();
            assert!(flags.contains(PhysicsFlags::REPORT_COLLISIONS | PhysicsFlags::MISSILE));
            assert!(flags.contains(PhysicsFlags::ALIGN_PATH | PhysicsFlags::PATH_CLIPPED));
            assert!(!flags.contains(PhysicsFlags::ETHEREAL));
            assert!(!flags.contains(PhysicsFlags::EDGE_SLIDE));
            assert_eq!(p.default_script(), Some(PlayScript::ProjectileCollision));
            assert!((p.script_intensity() - 1.0).abs() < f32::EPSILON);
            assert!(p.is_collidable());
        }

        #[test]
        fn rolling_death_stays_ethereal() {
            let mut p = projectile();
            let mut s = (*spell(10, 5000, 1, SpellCategory::NetherBolt)).clone();
            s.name = "Rolling Death".into();
            p.setup(Arc::new(s), &ProjectileContent::default()).unwrap();
            assert_eq!(p.kind(), ProjectileKind::Wall);
            assert!(p.physics().contains(PhysicsFlags::ETHEREAL));
        }

        #[test]
        fn ethereal_names_match_substrings() {
            let content = ProjectileContent {
                ethereal_names: vec!["Death".to_string()],
                ..ProjectileContent::default()
            };
            let mut p = projectile();
            let mut s = (*spell(10, 5000, 1, SpellCategory::NetherBolt)).clone();
            s.name = "Rolling Death II".into();
            p.setup(Arc::new(s), &content).unwrap();
            assert!(p.physics().contains(PhysicsFlags::ETHEREAL));

            let mut other = projectile();
            let mut s = (*spell(11, 5000, 1, SpellCategory::NetherBolt)).clone();
            s.name = "Rolling Doom".into();
            other.setup(Arc::new(s), &content).unwrap();
            assert!(!other.physics().contains(PhysicsFlags::ETHEREAL));
        }

        #[test]
        fn wall_has_no_script_unless_listed() {
            let content = ProjectileContent::default();

            let mut plain = projectile();
            plain.setup(spell(1, 5000, 5, SpellCategory::FireWall), &content).unwrap();
            assert_eq!(plain.default_script(), None);

            let mut listed = projectile();
            listed.setup(spell(2, 7276, 5, SpellCategory::FireWall), &content).unwrap();
            assert_eq!(listed.default_script(), Some(PlayScript::ProjectileCollision));
        }

        #[test]
        fn unscripted_classes_lose_scripted_collision() {
            let mut p = projectile();
            p.setup(spell(1, 7278, 5, SpellCategory::FireWall), &ProjectileContent::default())
                .unwrap();
            assert!(!p.physics().contains(PhysicsFlags::SCRIPTED_COLLISION));
        }
    }

    mod ring_tests {
        use super::*;

        #[test]
        fn plain_ring_is_unscripted() {
            let mut p = projectile();
            p.setup(spell(60, 5000, 8, SpellCategory::FireRing), &ProjectileContent::default())
                .unwrap();
            assert_eq!(p.kind(), ProjectileKind::Ring);
            assert!(!p.physics().contains(PhysicsFlags::SCRIPTED_COLLISION));
            assert_eq!(p.default_script(), None);
        }

        #[test]
        fn explosion_ring_gets_explode_script() {
            let mut p = projectile();
            p.setup(
                spell(RING_EXPLOSION_SPELL.as_u32(), 5000, 8, SpellCategory::FireRing),
                &ProjectileContent::default(),
            )
            .unwrap();
            assert_eq!(p.default_script(), Some(PlayScript::Explode));
            assert!(p.physics().contains(PhysicsFlags::SCRIPTED_COLLISION));
        }
    }

    #[test]
    fn whirling_blades_spin_without_alignment() {
        let mut p = projectile();
        p.setup(spell(1, 1636, 1, SpellCategory::BladeVolley), &ProjectileContent::default())
            .unwrap();
        assert!(!p.physics().contains(PhysicsFlags::ALIGN_PATH));
        assert!((p.omega().x - 12.566_37).abs() < 1e-5);
        assert_eq!(p.omega().y, 0.0);
    }

    #[test]
    fn setup_runs_once() {
        let mut p = projectile();
        let content = ProjectileContent::default();
        p.setup(spell(27, 1635, 1, SpellCategory::FireMissile), &content)
            .unwrap();
        assert!(matches!(
            p.setup(spell(27, 1635, 1, SpellCategory::FireMissile), &content),
            Err(CoreError::AlreadySetUp(_))
        ));
        assert_eq!(p.kind(), ProjectileKind::Bolt);
    }

    #[test]
    fn unknown_spell_sets_up_undefined() {
        let mut p = projectile();
        let kind = p
            .setup_spell(&SpellTable::new(), SpellId::new(404), &ProjectileContent::default())
            .unwrap();
        assert_eq!(kind, ProjectileKind::Undefined);
        assert!(p.is_set_up());
        assert_eq!(p.spell().id, SpellId::new(404));
    }

    #[test]
    fn content_table_round_trips_through_json() {
        let content = ProjectileContent::default();
        let json = serde_json::to_string(&content).unwrap();
        let back: ProjectileContent = serde_json::from_str(&json).unwrap();
        assert_eq!(content, back);
    }

    #[test]
    fn content_intensity_honors_custom_ring_list() {
        let mut content = ProjectileContent::default();
        content.ring_explosion_spells.insert(SpellId::new(9000));
        let got = content.intensity(ProjectileKind::Ring, 3, SpellId::new(9000));
        assert!((got - 0.4).abs() < 1e-6);
    }
}
