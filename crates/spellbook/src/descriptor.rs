//! Spell descriptors and the damage taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::SpellCategory;
use crate::error::SpellbookError;

/// Unique identifier for a spell.
///
/// # Example
///
/// ```
/// use spellbook::SpellId;
///
/// let id = SpellId::new(3818);
/// assert_eq!(id.as_u32(), 3818);
/// assert_eq!(id.to_string(), "3818");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellId(u32);

impl SpellId {
    /// Creates a new `SpellId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpellId({})", self.0)
    }
}

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpellId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Kind of damage a spell deals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DamageType {
    #[default]
    Undefined,
    Slash,
    Pierce,
    Bludgeon,
    Cold,
    Fire,
    Acid,
    Electric,
    Health,
    Stamina,
    Mana,
    Nether,
}

impl DamageType {
    /// Lowercase display name used in combat text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Slash => "slashing",
            Self::Pierce => "piercing",
            Self::Bludgeon => "bludgeoning",
            Self::Cold => "cold",
            Self::Fire => "fire",
            Self::Acid => "acid",
            Self::Electric => "electric",
            Self::Health => "health",
            Self::Stamina => "stamina",
            Self::Mana => "mana",
            Self::Nether => "nether",
        }
    }

    /// Resistance that mitigates this damage type.
    #[must_use]
    pub const fn resistance_type(self) -> ResistanceType {
        match self {
            Self::Undefined => ResistanceType::Undefined,
            Self::Slash => ResistanceType::Slash,
            Self::Pierce => ResistanceType::Pierce,
            Self::Bludgeon => ResistanceType::Bludgeon,
            Self::Cold => ResistanceType::Cold,
            Self::Fire => ResistanceType::Fire,
            Self::Acid => ResistanceType::Acid,
            Self::Electric => ResistanceType::Electric,
            Self::Health => ResistanceType::HealthDrain,
            Self::Stamina => ResistanceType::StaminaDrain,
            Self::Mana => ResistanceType::ManaDrain,
            Self::Nether => ResistanceType::Nether,
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resistance categories on a creature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ResistanceType {
    #[default]
    Undefined,
    Slash,
    Pierce,
    Bludgeon,
    Cold,
    Fire,
    Acid,
    Electric,
    HealthDrain,
    StaminaDrain,
    ManaDrain,
    Nether,
}

/// Top-level spell family. Selects the damage formula branch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum MagicSchool {
    /// Elemental attack spells.
    #[default]
    War,
    /// Vital manipulation, including life projectiles.
    Life,
    /// Nether spells, including damage over time.
    Void,
}

impl fmt::Display for MagicSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::War => write!(f, "War Magic"),
            Self::Life => write!(f, "Life Magic"),
            Self::Void => write!(f, "Void Magic"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_damage_ratio() -> f32 {
    1.0
}

/// Immutable description of a spell.
///
/// Descriptors are produced by a [`SpellLookup`](crate::SpellLookup) and
/// shared read-only for as long as any projectile references them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDescriptor {
    /// Spell identifier.
    pub id: SpellId,
    /// Display name.
    pub name: String,
    /// Delivery category.
    #[serde(default)]
    pub category: SpellCategory,
    /// Damage type dealt on impact.
    #[serde(default)]
    pub damage_type: DamageType,
    /// Spell school.
    #[serde(default)]
    pub school: MagicSchool,
    /// Minimum damage roll.
    #[serde(default)]
    pub min_damage: i32,
    /// Maximum damage roll.
    #[serde(default)]
    pub max_damage: i32,
    /// Effect duration in seconds; zero for instant spells.
    #[serde(default)]
    pub duration: f64,
    /// Casting difficulty.
    #[serde(default)]
    pub power: u32,
    /// Spell level (1..=8).
    #[serde(default)]
    pub level: u32,
    /// Projectiles launched per cast.
    #[serde(default)]
    pub num_projectiles: u32,
    /// Spread of a multi-projectile cast, in degrees.
    #[serde(default)]
    pub spread_angle: f32,
    /// Projectile flies a ballistic arc instead of tracking its target.
    #[serde(default)]
    pub non_tracking: bool,
    /// Multiplier applied to life projectile damage.
    #[serde(default = "default_damage_ratio")]
    pub damage_ratio: f32,
    /// Projectile class id; zero when the spell launches no projectile.
    #[serde(default)]
    pub wcid: u32,
    /// Whether the spell is hostile to its target.
    #[serde(default = "default_true")]
    pub harmful: bool,
    /// Whether the target may resist the spell with magic defense.
    #[serde(default = "default_true")]
    pub resistable: bool,
}

impl SpellDescriptor {
    /// Placeholder descriptor for an id with no backing data.
    ///
    /// Unresolved spells carry no projectile class, so they classify as
    /// undefined and deal no damage.
    #[must_use]
    pub fn unresolved(id: SpellId) -> Self {
        Self {
            id,
            name: String::new(),
            category: SpellCategory::Undefined,
            damage_type: DamageType::Undefined,
            school: MagicSchool::War,
            min_damage: 0,
            max_damage: 0,
            duration: 0.0,
            power: 0,
            level: 0,
            num_projectiles: 0,
            spread_angle: 0.0,
            non_tracking: false,
            damage_ratio: 1.0,
            wcid: 0,
            harmful: false,
            resistable: false,
        }
    }

    /// Returns `true` if this descriptor points at a projectile class.
    #[must_use]
    pub const fn has_projectile(&self) -> bool {
        self.wcid != 0
    }

    /// Returns `true` for void spells that deliver their damage over time.
    #[must_use]
    pub fn is_damage_over_time(&self) -> bool {
        self.school == MagicSchool::Void && self.duration > 0.0
    }

    /// Checks internal consistency of a loaded descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SpellbookError::InvalidDamageRange`] when `min_damage`
    /// exceeds `max_damage`.
    pub fn validate(&self) -> Result<(), SpellbookError> {
        if self.min_damage > self.max_damage {
            return Err(SpellbookError::InvalidDamageRange {
                id: self.id,
                min: self.min_damage,
                max: self.max_damage,
            });
        }
        Ok(())
    }
}
