//! Spell categories.
//!
//! Categories group spells that share a mechanical delivery shape. The
//! per-element variants of one shape are declared contiguously so that a
//! single range check covers all of them; the declaration order of this enum
//! is therefore part of its contract.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Ordered spell category.
///
/// Ordering follows declaration order (`PartialOrd` is derived), which is
/// what the range helpers below rely on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SpellCategory {
    #[default]
    Undefined,

    // Single tracking missiles
    AcidMissile,
    BludgeoningMissile,
    ColdMissile,
    ElectricMissile,
    FireMissile,
    PiercingMissile,
    SlashingMissile,

    // Streaks
    AcidStreak,
    BludgeoningStreak,
    ColdStreak,
    ElectricStreak,
    FireStreak,
    PiercingStreak,
    SlashingStreak,

    // Rings
    AcidRing,
    BludgeoningRing,
    ColdRing,
    ElectricRing,
    FireRing,
    PiercingRing,
    SlashingRing,

    // Bursts
    AcidBurst,
    BludgeoningBurst,
    ColdBurst,
    ElectricBurst,
    FireBurst,
    PiercingBurst,
    SlashingBurst,

    // Volleys (blade volley closes the range)
    AcidVolley,
    BludgeoningVolley,
    ColdVolley,
    ElectricVolley,
    FireVolley,
    PiercingVolley,
    SlashingVolley,
    BladeVolley,

    // Walls
    AcidWall,
    BludgeoningWall,
    ColdWall,
    ElectricWall,
    FireWall,
    PiercingWall,
    SlashingWall,

    // Strikes
    AcidStrike,
    BludgeoningStrike,
    ColdStrike,
    ElectricStrike,
    FireStrike,
    PiercingStrike,
    SlashingStrike,

    // Void
    NetherBolt,
    NetherStreak,
    NetherArc,
    NetherDamageOverTimeRaising,
    NetherDamageOverTimeRaising2,
    NetherDamageOverTimeRaising3,

    // Misc
    Fireworks,
    HealthLowering,
    StaminaLowering,
    ManaLowering,
}

impl SpellCategory {
    /// Elemental streak range.
    pub const STREAKS: RangeInclusive<Self> = Self::AcidStreak..=Self::SlashingStreak;
    /// Elemental ring range.
    pub const RINGS: RangeInclusive<Self> = Self::AcidRing..=Self::SlashingRing;
    /// Elemental burst range.
    pub const BURSTS: RangeInclusive<Self> = Self::AcidBurst..=Self::SlashingBurst;
    /// Elemental volley range.
    pub const VOLLEYS: RangeInclusive<Self> = Self::AcidVolley..=Self::BladeVolley;
    /// Elemental wall range.
    pub const WALLS: RangeInclusive<Self> = Self::AcidWall..=Self::SlashingWall;
    /// Elemental strike range.
    pub const STRIKES: RangeInclusive<Self> = Self::AcidStrike..=Self::SlashingStrike;

    /// Returns `true` for the elemental streak categories.
    #[must_use]
    pub fn is_elemental_streak(self) -> bool {
        Self::STREAKS.contains(&self)
    }

    /// Returns `true` for the elemental ring categories.
    #[must_use]
    pub fn is_elemental_ring(self) -> bool {
        Self::RINGS.contains(&self)
    }

    /// Returns `true` for the elemental burst categories.
    #[must_use]
    pub fn is_elemental_burst(self) -> bool {
        Self::BURSTS.contains(&self)
    }

    /// Returns `true` for the elemental volley categories.
    #[must_use]
    pub fn is_elemental_volley(self) -> bool {
        Self::VOLLEYS.contains(&self)
    }

    /// Returns `true` for the elemental wall categories.
    #[must_use]
    pub fn is_elemental_wall(self) -> bool {
        Self::WALLS.contains(&self)
    }

    /// Returns `true` for the elemental strike categories.
    #[must_use]
    pub fn is_elemental_strike(self) -> bool {
        Self::STRIKES.contains(&self)
    }

    /// Returns `true` for categories that drain a non-health vital.
    #[must_use]
    pub const fn is_vital_drain(self) -> bool {
        matches!(self, Self::StaminaLowering | Self::ManaLowering)
    }
}
