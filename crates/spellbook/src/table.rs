//! Spell lookup.
//!
//! [`SpellLookup`] is the seam between the projectile core and whatever owns
//! spell data. [`SpellTable`] is the in-memory implementation: descriptors
//! are stored behind `Arc` so projectiles can hold them for their whole
//! lifetime without copying.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{SpellDescriptor, SpellId};
use crate::error::SpellbookError;

/// Read-only spell metadata source.
///
/// Implementations must be pure reads: the same id always yields an equal
/// descriptor for the lifetime of the lookup.
pub trait SpellLookup: Send + Sync {
    /// Returns the descriptor for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SpellbookError::NotFound`] if the id is unknown.
    fn get(&self, id: SpellId) -> Result<Arc<SpellDescriptor>, SpellbookError>;

    /// Returns the descriptor for `id`, or an unresolved placeholder.
    ///
    /// The placeholder has no projectile class, which callers treat as
    /// "undefined behavior, no effect".
    fn get_or_unresolved(&self, id: SpellId) -> Arc<SpellDescriptor> {
        self.get(id)
            .unwrap_or_else(|_| Arc::new(SpellDescriptor::unresolved(id)))
    }
}

/// In-memory spell table keyed by id.
///
/// # Example
///
/// ```
/// use spellbook::{SpellDescriptor, SpellId, SpellLookup, SpellTable};
///
/// let mut table = SpellTable::new();
/// let mut spell = SpellDescriptor::unresolved(SpellId::new(1));
/// spell.name = "Test".into();
/// table.insert(spell).unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert!(table.get(SpellId::new(2)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpellTable {
    spells: BTreeMap<SpellId, Arc<SpellDescriptor>>,
}

impl SpellTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spells: BTreeMap::new(),
        }
    }

    /// Parses a JSON array of descriptors.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, duplicate ids or inverted damage ranges.
    pub fn from_json(json: &str) -> Result<Self, SpellbookError> {
        let descriptors: Vec<SpellDescriptor> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for descriptor in descriptors {
            table.insert(descriptor)?;
        }
        debug!(spells = table.len(), "loaded spell table");
        Ok(table)
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    ///
    /// Fails if the id is already present or the descriptor is inconsistent.
    pub fn insert(&mut self, descriptor: SpellDescriptor) -> Result<(), SpellbookError> {
        descriptor.validate()?;
        let id = descriptor.id;
        if self.spells.contains_key(&id) {
            return Err(SpellbookError::DuplicateSpell(id));
        }
        self.spells.insert(id, Arc::new(descriptor));
        Ok(())
    }

    /// Number of spells in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Iterates descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SpellDescriptor> + '_ {
        self.spells.values().map(AsRef::as_ref)
    }
}

impl SpellLookup for SpellTable {
    fn get(&self, id: SpellId) -> Result<Arc<SpellDescriptor>, SpellbookError> {
        self.spells
            .get(&id)
            .cloned()
            .ok_or(SpellbookError::NotFound(id))
    }
}
