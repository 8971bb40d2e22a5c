//! Crate-level scenario tests.
//!
//! - `helpers.rs`: Spell, actor and zone factories
//! - `integration.rs`: Launch-to-removal scenarios through the zone
//! - `determinism.rs`: Same seed, same outcome
//! - `properties.rs`: Property tests for classification, intensity and shields

mod helpers;
mod properties;
