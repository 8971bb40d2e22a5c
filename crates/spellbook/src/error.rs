//! Spellbook errors.

use thiserror::Error;

use crate::descriptor::SpellId;

/// Errors raised while loading or querying spell data.
#[derive(Debug, Error)]
pub enum SpellbookError {
    /// No descriptor exists for the requested id.
    #[error("spell {0} not found")]
    NotFound(SpellId),

    /// A table contained the same id twice.
    #[error("duplicate spell {0} in table")]
    DuplicateSpell(SpellId),

    /// A descriptor's damage range is inverted.
    #[error("spell {id} has min damage {min} above max damage {max}")]
    InvalidDamageRange {
        /// Offending spell.
        id: SpellId,
        /// Declared minimum.
        min: i32,
        /// Declared maximum.
        max: i32,
    },

    /// The table source was not valid JSON for a descriptor list.
    #[error("failed to parse spell table: {0}")]
    Parse(#[from] serde_json::Error),
}
