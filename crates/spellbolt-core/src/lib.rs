//! # Spellbolt Core
//!
//! Spell projectile lifecycle and damage resolution.
//!
//! This crate takes a spell projectile from setup to removal: classification
//! into a behavior kind, the physics state it flies with, the collision state
//! machine that fires exactly once, and the damage pipeline that turns a hit
//! into vital changes, messages and events.
//!
//! ## Architecture
//!
//! - **Actors**: Players, creatures and plain objects in a [`World`]
//! - **Projectiles**: Spell carriers with a one-way phase machine
//! - **Resolvers**: Collision, damage computation, shield, application
//! - **Rules**: The [`CombatRules`] seam for PK, resistance and rating checks
//!
//! Damage computation is pure over the world; every mutation goes through
//! the applicator or comes back as a side effect. Random draws happen in a
//! fixed order (resist, critical, critical defense, damage), so a seeded
//! [`Zone`] replays identically.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use glam::Vec3;
//! use spellbolt_core::actor::{Actor, ActorId, CreatureComponents};
//! use spellbolt_core::config::CombatConfig;
//! use spellbolt_core::zone::{LaunchRequest, Zone};
//! use spellbook::{SpellId, SpellTable};
//!
//! let json = r#"[{
//!     "id": 27, "name": "Flame Bolt I", "category": "FireMissile",
//!     "damage_type": "Fire", "school": "War", "min_damage": 8, "max_damage": 15,
//!     "level": 1, "num_projectiles": 1, "wcid": 1635, "harmful": true
//! }]"#;
//! let spells = Arc::new(SpellTable::from_json(json).unwrap());
//! let mut zone = Zone::new(spells, CombatConfig::default(), 42);
//!
//! let drudge = zone
//!     .world_mut()
//!     .insert(Actor::creature(ActorId::new(1), "Drudge", CreatureComponents::default()))
//!     .unwrap();
//! let bolt = zone
//!     .launch(LaunchRequest::new(SpellId::new(27), None, Vec3::ZERO).at(drudge))
//!     .unwrap();
//!
//! zone.on_collide_environment(bolt).unwrap();
//! zone.run_until_idle(10);
//! assert!(zone.world().projectile(bolt).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod config;
pub mod enchantment;
pub mod error;
pub mod event;
pub mod message;
pub mod projectile;
pub mod resolver;
pub mod rolls;
pub mod rules;
pub mod schedule;
pub mod world;
pub mod zone;

pub use actor::{Actor, ActorId, ActorInner, ActorTag};
pub use config::CombatConfig;
pub use error::CoreError;
pub use event::{CombatEvent, EventLog};
pub use message::{OutboundMessage, Outbox};
pub use projectile::{Projectile, ProjectileId, ProjectileKind, ProjectilePhase};
pub use resolver::{CollisionOutcome, DamageResult};
pub use rolls::{RollSource, ScriptedRolls, SeededRolls, SharedRolls};
pub use rules::{CombatRules, StandardRules};
pub use world::World;
pub use zone::{LaunchRequest, Zone};

#[cfg(test)]
mod tests;
