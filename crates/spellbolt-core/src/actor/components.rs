//! Component structs for actor types.
//!
//! Actors are owned by the surrounding world; this core reads them and
//! mutates only their vitals (through [`Vital::apply_delta`]) and a handful of
//! bookkeeping fields (damage history, PK timer, last-hit spell).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use spellbook::{DamageType, MagicSchool, ResistanceType, SpellId};

use super::ActorId;

// =============================================================================
// Transform
// =============================================================================

/// World placement of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// World position.
    pub position: Vec3,
    /// Orientation; the unrotated forward axis is +Y.
    pub rotation: Quat,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl TransformState {
    /// Creates a transform at `position` facing `heading` radians about +Z.
    #[must_use]
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_z(heading),
        }
    }

    /// Forward direction in the ground plane.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Signed ground-plane angle in degrees from this actor's facing to `point`.
    ///
    /// Zero means straight ahead, ±180 directly behind. A point on top of the
    /// actor counts as straight ahead.
    #[must_use]
    pub fn angle_to(&self, point: Vec3) -> f32 {
        let forward = self.forward().truncate();
        let offset = (point - self.position).truncate();
        if offset.length_squared() < f32::EPSILON || forward.length_squared() < f32::EPSILON {
            return 0.0;
        }
        let cross = forward.x * offset.y - forward.y * offset.x;
        let dot = forward.dot(offset);
        cross.atan2(dot).to_degrees()
    }
}

// =============================================================================
// Vitals
// =============================================================================

/// A vital pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vital {
    /// Current value.
    pub current: u32,
    /// Maximum value.
    pub max: u32,
}

impl Vital {
    /// Creates a full pool.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Adds a signed delta, clamped to `[0, max]`.
    ///
    /// Returns the delta actually applied.
    pub fn apply_delta(&mut self, delta: i64) -> i64 {
        let before = i64::from(self.current);
        let after = (before + delta).clamp(0, i64::from(self.max));
        // after is within [0, max] so it fits in u32
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let current = after as u32;
        self.current = current;
        after - before
    }

    /// Fraction of the pool remaining.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.current as f32 / self.max as f32;
        fraction
    }
}

impl Default for Vital {
    fn default() -> Self {
        Self::full(100)
    }
}

/// Names a vital pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalKind {
    /// Health.
    Health,
    /// Stamina.
    Stamina,
    /// Mana.
    Mana,
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Health => write!(f, "health"),
            Self::Stamina => write!(f, "stamina"),
            Self::Mana => write!(f, "mana"),
        }
    }
}

/// The three vital pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vitals {
    /// Health pool.
    pub health: Vital,
    /// Stamina pool.
    pub stamina: Vital,
    /// Mana pool.
    pub mana: Vital,
}

impl Vitals {
    /// Returns the pool for `kind`.
    #[must_use]
    pub const fn get(&self, kind: VitalKind) -> &Vital {
        match kind {
            VitalKind::Health => &self.health,
            VitalKind::Stamina => &self.stamina,
            VitalKind::Mana => &self.mana,
        }
    }

    /// Returns the pool for `kind` mutably.
    pub fn get_mut(&mut self, kind: VitalKind) -> &mut Vital {
        match kind {
            VitalKind::Health => &mut self.health,
            VitalKind::Stamina => &mut self.stamina,
            VitalKind::Mana => &mut self.mana,
        }
    }
}

// =============================================================================
// Skills
// =============================================================================

/// Combat stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CombatMode {
    #[default]
    NonCombat,
    Melee,
    Missile,
    Magic,
}

/// Skills consulted by the projectile core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Skill {
    WarMagic,
    LifeMagic,
    VoidMagic,
    MagicDefense,
    Shield,
    SneakAttack,
}

impl Skill {
    /// The casting skill for a school.
    #[must_use]
    pub const fn for_school(school: MagicSchool) -> Self {
        match school {
            MagicSchool::War => Self::WarMagic,
            MagicSchool::Life => Self::LifeMagic,
            MagicSchool::Void => Self::VoidMagic,
        }
    }
}

/// Training level of a skill. Ordered from least to most trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SkillAdvancement {
    #[default]
    Untrained,
    Trained,
    Specialized,
}

/// A skill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreatureSkill {
    /// Base (unbuffed) level.
    pub base: u32,
    /// Current (buffed) level.
    pub current: u32,
    /// Training level.
    pub advancement: SkillAdvancement,
}

impl CreatureSkill {
    /// Creates a skill whose current level equals its base.
    #[must_use]
    pub const fn new(base: u32, advancement: SkillAdvancement) -> Self {
        Self {
            base,
            current: base,
            advancement,
        }
    }
}

/// Skill table. Missing skills read as untrained zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillSet(BTreeMap<Skill, CreatureSkill>);

impl SkillSet {
    /// Returns the skill, defaulting to untrained zero.
    #[must_use]
    pub fn get(&self, skill: Skill) -> CreatureSkill {
        self.0.get(&skill).copied().unwrap_or_default()
    }

    /// Sets a skill.
    pub fn set(&mut self, skill: Skill, value: CreatureSkill) {
        self.0.insert(skill, value);
    }

    /// Builder form of [`SkillSet::set`].
    #[must_use]
    pub fn with(mut self, skill: Skill, value: CreatureSkill) -> Self {
        self.set(skill, value);
        self
    }
}

// =============================================================================
// Equipment
// =============================================================================

/// Creature family, used by slayer bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CreatureType {
    #[default]
    Undefined,
    Human,
    Undead,
    Olthoi,
    Drudge,
    Tumerok,
    Golem,
    Virindi,
}

/// Player heritage group, matched against a caster's heritage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Heritage {
    #[default]
    Aluvian,
    Gharundim,
    Sho,
    Viamontian,
}

/// An equipped shield.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShieldItem {
    /// Maximum fraction of magic damage absorbed. `None` if the shield has no
    /// magic absorption at all.
    pub absorb_magic_damage: Option<f32>,
}

/// Bonus against a creature family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlayerBonus {
    /// Creature family affected.
    pub creature_type: CreatureType,
    /// Damage multiplier.
    pub modifier: f32,
}

/// Bonus tied to a damage type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBonus {
    /// Damage type affected.
    pub damage_type: DamageType,
    /// Multiplier.
    pub modifier: f32,
}

/// An equipped casting implement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CasterItem {
    /// Critical frequency override.
    pub crit_frequency: Option<f32>,
    /// Critical damage multiplier override.
    pub crit_damage_mod: Option<f32>,
    /// Elemental damage bonus for matching spells.
    pub elemental: Option<ElementBonus>,
    /// Slayer bonus.
    pub slayer: Option<SlayerBonus>,
    /// Resistance rend for matching damage types.
    pub resistance_rend: Option<ElementBonus>,
    /// Heritage the caster was made for.
    pub heritage: Option<Heritage>,
}

/// Equipped items relevant to spell combat.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// Shield slot.
    pub shield: Option<ShieldItem>,
    /// Wand/orb/staff slot.
    pub caster: Option<CasterItem>,
}

/// Gear and augmentation ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ratings {
    /// Damage rating.
    pub damage: i32,
    /// Damage resist rating (magic).
    pub damage_resist: i32,
    /// Critical chance rating.
    pub crit: i32,
}

/// Natural resistance multipliers. Missing entries read as 1.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resistances(BTreeMap<ResistanceType, f32>);

impl Resistances {
    /// Multiplier for a resistance type.
    #[must_use]
    pub fn get(&self, kind: ResistanceType) -> f32 {
        self.0.get(&kind).copied().unwrap_or(1.0)
    }

    /// Sets a multiplier.
    pub fn set(&mut self, kind: ResistanceType, modifier: f32) {
        self.0.insert(kind, modifier);
    }
}

bitflags! {
    /// Actor status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u32 {
        /// Death has been processed.
        const DEAD = 1 << 0;
        /// Summoned combat pet; may fight monsters.
        const COMBAT_PET = 1 << 1;
    }
}

// =============================================================================
// Damage history
// =============================================================================

/// One entry in a damage ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    /// Who dealt it, if they were known.
    pub source: Option<ActorId>,
    /// Damage type.
    pub damage_type: DamageType,
    /// Amount removed from health.
    pub amount: u32,
}

/// Damage taken by an actor, used to attribute death credit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageHistory {
    records: Vec<DamageRecord>,
}

impl DamageHistory {
    /// Appends an entry.
    pub fn add(&mut self, source: Option<ActorId>, damage_type: DamageType, amount: u32) {
        self.records.push(DamageRecord {
            source,
            damage_type,
            amount,
        });
    }

    /// All entries in arrival order.
    #[must_use]
    pub fn records(&self) -> &[DamageRecord] {
        &self.records
    }

    /// Total damage dealt by `source`.
    #[must_use]
    pub fn total_from(&self, source: ActorId) -> u64 {
        self.records
            .iter()
            .filter(|r| r.source == Some(source))
            .map(|r| u64::from(r.amount))
            .sum()
    }

    /// The source with the highest total damage. Ties go to the lowest id.
    #[must_use]
    pub fn top_damager(&self) -> Option<ActorId> {
        let mut totals: BTreeMap<ActorId, u64> = BTreeMap::new();
        for record in &self.records {
            if let Some(source) = record.source {
                *totals.entry(source).or_default() += u64::from(record.amount);
            }
        }
        totals
            .into_iter()
            .fold(None, |best: Option<(ActorId, u64)>, (id, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((id, total)),
            })
            .map(|(id, _)| id)
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Per-type components
// =============================================================================

/// Components shared by every creature, players included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatureComponents {
    /// Placement.
    pub transform: TransformState,
    /// Vital pools.
    pub vitals: Vitals,
    /// Current stance.
    pub combat_mode: CombatMode,
    /// Skills.
    pub skills: SkillSet,
    /// Equipped shield and caster.
    pub equipment: Equipment,
    /// Ratings.
    pub ratings: Ratings,
    /// Natural resistances.
    pub resistances: Resistances,
    /// Creature family.
    pub creature_type: CreatureType,
    /// Status flags.
    pub status: StatusFlags,
    /// Damage ledger.
    pub damage_history: DamageHistory,
}

impl CreatureComponents {
    /// Creates default components at a position.
    #[must_use]
    pub fn at_position(position: Vec3, heading: f32) -> Self {
        Self {
            transform: TransformState::new(position, heading),
            ..Self::default()
        }
    }

    /// Returns `true` while health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.vitals.health.current > 0
    }
}

/// Network session handle for a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Player-killer standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PkStatus {
    /// Cannot fight other players.
    #[default]
    NonPk,
    /// Full player killer.
    Pk,
    /// Limited player killer; fights only other PK-lites.
    PkLite,
}

/// Player-only components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Creature components.
    pub creature: CreatureComponents,
    /// Session, if connected.
    pub session: Option<SessionId>,
    /// Actors whose combat text this player has muted.
    pub squelches: BTreeSet<ActorId>,
    /// Admin invulnerability.
    pub invincible: bool,
    /// Recently resurrected at a lifestone.
    pub lifestone_protection: bool,
    /// Critical protection augmentation rank.
    pub aug_crit_defense: u32,
    /// Heritage group.
    pub heritage: Heritage,
    /// Player-killer standing.
    pub pk_status: PkStatus,
    /// Tick of the last PvP exchange.
    pub last_pk_activity: Option<u64>,
    /// Spell of the last projectile this player landed a collision with.
    pub last_hit_spell: Option<SpellId>,
}

/// Components for non-creature world objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectComponents {
    /// Placement.
    pub transform: TransformState,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod vital_tests {
        use super::*;

        #[test]
        fn apply_delta_clamps_at_zero() {
            let mut vital = Vital::full(50);
            assert_eq!(vital.apply_delta(-80), -50);
            assert_eq!(vital.current, 0);
        }

        #[test]
        fn apply_delta_clamps_at_max() {
            let mut vital = Vital { current: 90, max: 100 };
            assert_eq!(vital.apply_delta(25), 10);
            assert_eq!(vital.current, 100);
        }

        #[test]
        fn fraction_of_empty_pool_is_zero() {
            let vital = Vital { current: 0, max: 0 };
            assert_eq!(vital.fraction(), 0.0);
        }
    }

    mod transform_tests {
        use super::*;

        #[test]
        fn point_ahead_is_zero_degrees() {
            let t = TransformState::new(Vec3::ZERO, 0.0);
            assert!(t.angle_to(Vec3::new(0.0, 10.0, 0.0)).abs() < 0.001);
        }

        #[test]
        fn point_behind_is_180_degrees() {
            let t = TransformState::new(Vec3::ZERO, 0.0);
            assert!((t.angle_to(Vec3::new(0.0, -10.0, 0.0)).abs() - 180.0).abs() < 0.001);
        }

        #[test]
        fn point_to_the_side_is_90_degrees() {
            let t = TransformState::new(Vec3::ZERO, 0.0);
            assert!((t.angle_to(Vec3::new(10.0, 0.0, 0.0)).abs() - 90.0).abs() < 0.001);
        }

        #[test]
        fn heading_rotates_facing() {
            let t = TransformState::new(Vec3::ZERO, std::f32::consts::PI);
            assert!(t.angle_to(Vec3::new(0.0, -10.0, 0.0)).abs() < 0.001);
        }

        #[test]
        fn coincident_point_counts_as_ahead() {
            let t = TransformState::new(Vec3::new(1.0, 1.0, 0.0), 0.0);
            assert_eq!(t.angle_to(Vec3::new(1.0, 1.0, 5.0)), 0.0);
        }
    }

    mod skill_tests {
        use super::*;

        #[test]
        fn missing_skill_is_untrained_zero() {
            let skills = SkillSet::default();
            let shield = skills.get(Skill::Shield);
            assert_eq!(shield.base, 0);
            assert_eq!(shield.advancement, SkillAdvancement::Untrained);
        }

        #[test]
        fn advancement_is_ordered() {
            assert!(SkillAdvancement::Untrained < SkillAdvancement::Trained);
            assert!(SkillAdvancement::Trained < SkillAdvancement::Specialized);
        }
    }

    mod damage_history_tests {
        use super::*;

        #[test]
        fn top_damager_sums_per_source() {
            let mut history = DamageHistory::default();
            let a = ActorId::new(1);
            let b = ActorId::new(2);
            history.add(Some(a), DamageType::Fire, 30);
            history.add(Some(b), DamageType::Cold, 40);
            history.add(Some(a), DamageType::Fire, 20);
            assert_eq!(history.total_from(a), 50);
            assert_eq!(history.top_damager(), Some(a));
        }

        #[test]
        fn anonymous_damage_gets_no_credit() {
            let mut history = DamageHistory::default();
            history.add(None, DamageType::Fire, 30);
            assert_eq!(history.top_damager(), None);
        }
    }
}
