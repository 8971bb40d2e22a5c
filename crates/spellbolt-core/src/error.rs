//! Error types for the projectile core.
//!
//! Gameplay outcomes (resisted, dead target, PK violation, friendly fire) are
//! not errors and never show up here; see [`DamageResult`](crate::resolver::DamageResult)
//! and [`CollisionOutcome`](crate::resolver::CollisionOutcome).

use thiserror::Error;

use crate::actor::ActorId;
use crate::projectile::ProjectileId;

/// Errors raised by the zone and its registries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No actor with this id is registered.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// No live projectile with this id is registered.
    #[error("unknown projectile {0}")]
    UnknownProjectile(ProjectileId),

    /// An actor with this id is already registered.
    #[error("actor {0} already registered")]
    DuplicateActor(ActorId),

    /// The projectile's behavior kind was already fixed.
    #[error("projectile {0} is already set up")]
    AlreadySetUp(ProjectileId),

    /// Configuration could not be parsed.
    #[error("invalid combat config: {0}")]
    Config(#[from] serde_json::Error),
}
