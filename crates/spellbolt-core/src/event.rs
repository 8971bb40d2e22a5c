//! Combat event log.
//!
//! Events are facts for other systems (proficiency, item procs, monster AI,
//! reaction emotes, telemetry). Recording one never changes game state.
//! The host drains the log with [`EventLog::take_events`], typically once per
//! tick.

use serde::{Deserialize, Serialize};
use spellbook::{DamageType, MagicSchool, SpellId};

use crate::actor::{ActorId, Skill, VitalKind};
use crate::enchantment::EffectHandle;
use crate::projectile::{ProjectileId, ProjectileKind};
use crate::resolver::BlockReason;

/// Something that happened during collision resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Projectile set up and launched.
    ProjectileLaunched {
        /// Projectile.
        projectile: ProjectileId,
        /// Caster.
        source: Option<ActorId>,
        /// Behavior kind.
        kind: ProjectileKind,
    },
    /// Projectile hit something and started its removal countdown.
    ProjectileImpacted {
        /// Projectile.
        projectile: ProjectileId,
        /// Actor hit, if any.
        struck: Option<ActorId>,
        /// Removal tick.
        remove_at: u64,
    },
    /// Projectile removed from the world.
    ProjectileRemoved {
        /// Projectile.
        projectile: ProjectileId,
    },
    /// A hit was stopped before damage.
    DamageBlocked {
        /// Caster, if still around.
        source: Option<ActorId>,
        /// Target.
        target: ActorId,
        /// Why.
        reason: BlockReason,
    },
    /// PK rules refused the hit.
    PkBlocked {
        /// Attacker.
        source: ActorId,
        /// Defender.
        target: ActorId,
    },
    /// An untargeted projectile struck an actor its caster may not damage.
    FriendlyFireSkipped {
        /// Caster.
        source: ActorId,
        /// Actor struck.
        target: ActorId,
    },
    /// Both sides of a PvP exchange had their PK timers refreshed.
    PkTimersUpdated {
        /// Attacker.
        attacker: ActorId,
        /// Defender.
        defender: ActorId,
        /// Tick of the refresh.
        tick: u64,
    },
    /// Vital damage applied.
    DamageDealt {
        /// Caster.
        source: ActorId,
        /// Target.
        target: ActorId,
        /// Pool drained.
        vital: VitalKind,
        /// Amount removed.
        amount: u32,
        /// Element.
        damage_type: DamageType,
        /// Critical hit.
        critical: bool,
    },
    /// Damage-over-time effect created instead of direct damage.
    DamageOverTimeApplied {
        /// Caster.
        source: ActorId,
        /// Target.
        target: ActorId,
        /// Spell.
        spell: SpellId,
        /// Registry handle.
        handle: EffectHandle,
    },
    /// Target should play its critical-received reaction.
    CriticalReceived {
        /// Target.
        target: ActorId,
        /// Attacker.
        attacker: ActorId,
    },
    /// Player used a magic skill successfully.
    SkillUsed {
        /// Player.
        actor: ActorId,
        /// Skill.
        skill: Skill,
        /// Difficulty of the use.
        difficulty: u32,
    },
    /// Equipped-item procs may fire.
    ProcAttempt {
        /// Attacker.
        source: ActorId,
        /// Target.
        target: ActorId,
    },
    /// Player attacked a monster; wakes its AI.
    MonsterAttacked {
        /// Player.
        attacker: ActorId,
        /// Monster.
        monster: ActorId,
    },
    /// Lifestone protection absorbed a hit.
    LifestoneProtected {
        /// Protected player.
        target: ActorId,
    },
    /// Actor died.
    ActorDied {
        /// Victim.
        victim: ActorId,
        /// Last hit.
        killer: Option<ActorId>,
        /// Most damage dealt overall.
        top_damager: Option<ActorId>,
        /// Element of the killing blow.
        damage_type: DamageType,
        /// Killing blow was critical.
        critical: bool,
    },
}

impl CombatEvent {
    /// Skill-use event for a school.
    #[must_use]
    pub const fn skill_used(actor: ActorId, school: MagicSchool, difficulty: u32) -> Self {
        Self::SkillUsed {
            actor,
            skill: Skill::for_school(school),
            difficulty,
        }
    }
}

/// In-order record of combat events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clears the log without returning the events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
