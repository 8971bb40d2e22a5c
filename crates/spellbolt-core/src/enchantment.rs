//! Enchantment registry.
//!
//! Void damage-over-time spells do not deal damage on impact. They register
//! an enchantment on the target seeded with the computed magnitude, and the
//! registry ticks it down elsewhere.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use spellbook::{SpellDescriptor, SpellId};
use tracing::debug;

use crate::actor::ActorId;

/// Handle to a registered enchantment.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectHandle(u64);

impl EffectHandle {
    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectHandle({})", self.0)
    }
}

/// A registered enchantment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    /// Handle.
    pub handle: EffectHandle,
    /// Who carries it.
    pub target: ActorId,
    /// Who cast it.
    pub caster: ActorId,
    /// Spell.
    pub spell: SpellId,
    /// Damage per pulse source value.
    pub magnitude: f32,
    /// Seconds it lasts.
    pub duration: f64,
}

/// Result of [`EnchantmentRegistry::create_enchantment`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnchantmentStatus {
    /// Handle of the new or refreshed enchantment.
    pub handle: EffectHandle,
    /// Text for the caster.
    pub message: String,
}

/// In-memory enchantment store.
///
/// One enchantment per (target, spell): casting the same spell again
/// refreshes the existing entry in place.
#[derive(Debug, Clone, Default)]
pub struct EnchantmentRegistry {
    active: BTreeMap<(ActorId, SpellId), Enchantment>,
    next_handle: u64,
}

impl EnchantmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or refreshes) `spell` on `target`.
    pub fn create_enchantment(
        &mut self,
        target: ActorId,
        target_name: &str,
        caster: ActorId,
        spell: &SpellDescriptor,
        magnitude: f32,
    ) -> EnchantmentStatus {
        let key = (target, spell.id);

        if let Some(existing) = self.active.get_mut(&key) {
            existing.caster = caster;
            existing.magnitude = magnitude;
            existing.duration = spell.duration;
            debug!(target = %target, spell = %spell.id, handle = existing.handle.0, "refreshed enchantment");
            return EnchantmentStatus {
                handle: existing.handle,
                message: format!(
                    "You cast {} on {target_name}, refreshing {}",
                    spell.name, spell.name
                ),
            };
        }

        self.next_handle += 1;
        let handle = EffectHandle(self.next_handle);
        self.active.insert(
            key,
            Enchantment {
                handle,
                target,
                caster,
                spell: spell.id,
                magnitude,
                duration: spell.duration,
            },
        );
        debug!(target = %target, spell = %spell.id, handle = handle.0, magnitude, "created enchantment");

        EnchantmentStatus {
            handle,
            message: format!("You cast {} on {target_name}", spell.name),
        }
    }

    /// Enchantments carried by `target`, in spell order.
    pub fn on_target(&self, target: ActorId) -> impl Iterator<Item = &Enchantment> + '_ {
        self.active
            .range((target, SpellId::new(0))..=(target, SpellId::new(u32::MAX)))
            .map(|(_, e)| e)
    }

    /// Removes everything on `target`, returning how many were removed.
    pub fn dispel_all(&mut self, target: ActorId) -> usize {
        let before = self.active.len();
        self.active.retain(|(t, _), _| *t != target);
        before - self.active.len()
    }

    /// Number of active enchantments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if nothing is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
