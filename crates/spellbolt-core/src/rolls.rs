//! Random draws for combat resolution.
//!
//! All randomness goes through [`RollSource`] so a zone can run seeded
//! (replays, tests) or share one generator with other zones. Per collision,
//! draws are taken through a [`DrawSequence`], which only exposes them in
//! the fixed order resist, critical, critical defense, damage. A given seed
//! therefore always yields the same outcome for the same hit.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Source of uniform draws in `[0, 1)`.
pub trait RollSource: Send {
    /// Draws the next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Zone-local seeded generator.
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: ChaCha8Rng,
}

impl SeededRolls {
    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RollSource for SeededRolls {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Generator shared between zones.
///
/// Clones draw from the same stream.
#[derive(Debug, Clone)]
pub struct SharedRolls {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SharedRolls {
    /// Creates a shared generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }
}

impl RollSource for SharedRolls {
    fn next_unit(&mut self) -> f64 {
        // A panic elsewhere cannot leave a ChaCha state half-written.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen()
    }
}

/// Fixed queue of draws, for tests and replays.
///
/// Once the queue runs dry every draw returns the fallback.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRolls {
    /// Queues `draws` in order. The fallback is `0.5`.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: draws.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Sets the value returned after the queue is empty.
    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl RollSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

/// Which draw of a collision is being taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Draw {
    /// Magic resistance check.
    Resist,
    /// Critical hit roll.
    Critical,
    /// Critical defense roll.
    CriticalDefense,
    /// Damage within the spell's range.
    Damage,
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resist => write!(f, "resist"),
            Self::Critical => write!(f, "critical"),
            Self::CriticalDefense => write!(f, "critical_defense"),
            Self::Damage => write!(f, "damage"),
        }
    }
}

/// Ordered draws for one collision.
///
/// Each draw may be taken at most once and only after the ones before it;
/// skipped draws consume nothing. Taking a draw out of order returns `None`.
pub struct DrawSequence<'a> {
    rolls: &'a mut dyn RollSource,
    next: Draw,
    exhausted: bool,
}

impl fmt::Debug for DrawSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawSequence")
            .field("next", &self.next)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<'a> DrawSequence<'a> {
    /// Starts a sequence over `rolls`.
    pub fn new(rolls: &'a mut dyn RollSource) -> Self {
        Self {
            rolls,
            next: Draw::Resist,
            exhausted: false,
        }
    }

    fn take(&mut self, draw: Draw) -> Option<f64> {
        if self.exhausted || draw < self.next {
            return None;
        }
        let value = self.rolls.next_unit();
        trace!(draw = %draw, value, "combat draw");
        match draw {
            Draw::Resist => self.next = Draw::Critical,
            Draw::Critical => self.next = Draw::CriticalDefense,
            Draw::CriticalDefense => self.next = Draw::Damage,
            Draw::Damage => self.exhausted = true,
        }
        Some(value)
    }

    /// Resist check draw.
    pub fn resist(&mut self) -> Option<f64> {
        self.take(Draw::Resist)
    }

    /// Critical roll.
    pub fn critical(&mut self) -> Option<f64> {
        self.take(Draw::Critical)
    }

    /// Critical defense roll.
    pub fn critical_defense(&mut self) -> Option<f64> {
        self.take(Draw::CriticalDefense)
    }

    /// Uniform integer in `[min, max]`. Returns `min` if the range is empty.
    pub fn damage(&mut self, min: i32, max: i32) -> Option<i32> {
        let unit = self.take(Draw::Damage)?;
        if max <= min {
            return Some(min);
        }
        let span = f64::from(max) - f64::from(min) + 1.0;
        #[allow(clippy::cast_possible_truncation)]
        let offset = (unit * span).floor() as i64;
        let value = (i64::from(min) + offset).min(i64::from(max));
        Some(i32::try_from(value).unwrap_or(max))
    }
}
