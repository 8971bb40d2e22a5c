//! # Spellbook
//!
//! Spell descriptor data for the Spellbolt projectile core.
//!
//! The spellbook is the read-only side of spellcasting: it answers "what is
//! spell N?" with an immutable [`SpellDescriptor`]. Nothing in this crate
//! mutates a descriptor after it has been loaded.
//!
//! - [`SpellId`]: Identifier newtype
//! - [`SpellCategory`]: Ordered category enumeration (element x delivery shape)
//! - [`DamageType`], [`MagicSchool`], [`ResistanceType`]: Damage taxonomy
//! - [`SpellLookup`]: The lookup seam consumed by the projectile core
//! - [`SpellTable`]: In-memory lookup, loadable from JSON
//!
//! ## Usage
//!
//! ```
//! use spellbook::{SpellId, SpellLookup, SpellTable};
//!
//! let json = r#"[{
//!     "id": 27, "name": "Flame Bolt I", "category": "FireMissile",
//!     "damage_type": "Fire", "school": "War", "min_damage": 8, "max_damage": 15,
//!     "level": 1, "num_projectiles": 1, "wcid": 1635
//! }]"#;
//!
//! let table = SpellTable::from_json(json).unwrap();
//! let spell = table.get(SpellId::new(27)).unwrap();
//! assert_eq!(spell.name, "Flame Bolt I");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod category;
pub mod descriptor;
pub mod error;
pub mod table;

pub use category::SpellCategory;
pub use descriptor::{DamageType, MagicSchool, ResistanceType, SpellDescriptor, SpellId};
pub use error::SpellbookError;
pub use table::{SpellLookup, SpellTable};
