//! The collision state machine.
//!
//! Physics callbacks land here. The first callback for a projectile impacts
//! it (visuals, physics state, delayed removal); every later one is
//! ignored. Contacts with a valid target then run the PK check, the damage
//! engine and the applicator, or register a damage-over-time enchantment.

use tracing::{debug, trace, warn};

use super::apply::DamageApplicator;
use super::damage::DamageEngine;
use super::{BlockReason, CollisionOutcome, DamageResult, SideEffect};
use crate::actor::ActorId;
use crate::config::CombatConfig;
use crate::error::CoreError;
use crate::event::CombatEvent;
use crate::message::{ChatChannel, OutboundMessage, PlayScript, ScriptSubject};
use crate::projectile::{Projectile, ProjectileId};
use crate::rolls::{DrawSequence, RollSource};
use crate::rules::CombatRules;
use crate::schedule::{ActionQueue, DeferredAction};
use crate::world::World;

/// Resolves physics contacts for spell projectiles.
#[derive(Clone, Copy)]
pub struct CollisionResolver<'a> {
    rules: &'a dyn CombatRules,
    config: &'a CombatConfig,
}

impl std::fmt::Debug for CollisionResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionResolver")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> CollisionResolver<'a> {
    /// Creates a resolver over a ruleset and tuning.
    #[must_use]
    pub fn new(rules: &'a dyn CombatRules, config: &'a CombatConfig) -> Self {
        Self { rules, config }
    }

    /// Contact with terrain or static geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn on_collide_environment(
        &self,
        world: &mut World,
        actions: &mut ActionQueue,
        projectile: ProjectileId,
    ) -> Result<CollisionOutcome, CoreError> {
        if !Self::is_live(world, projectile)? {
            return Ok(CollisionOutcome::Ignored);
        }
        self.impact(world, actions, projectile, None);
        Ok(CollisionOutcome::Environment)
    }

    /// Contact with another world object.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProjectile`] if the projectile is gone.
    pub fn on_collide_object(
        &self,
        world: &mut World,
        actions: &mut ActionQueue,
        rolls: &mut dyn RollSource,
        projectile: ProjectileId,
        other: ActorId,
    ) -> Result<CollisionOutcome, CoreError> {
        if !Self::is_live(world, projectile)? {
            return Ok(CollisionOutcome::Ignored);
        }

        let snapshot = world
            .projectile(projectile)
            .cloned()
            .ok_or(CoreError::UnknownProjectile(projectile))?;
        let source_id = snapshot.source();

        // bookkeeping happens for every contact, valid target or not
        if let Some(player) = source_id
            .and_then(|id| world.actor_mut(id))
            .and_then(|a| a.as_player_mut())
        {
            player.last_hit_spell = Some(snapshot.spell().id);
        }

        let valid_target = world
            .actor(other)
            .is_some_and(|a| a.is_combatant())
            && source_id != Some(other);
        if !valid_target {
            trace!(projectile = %projectile, other = %other, "not a valid target, treating as environment");
            self.impact(world, actions, projectile, None);
            return Ok(CollisionOutcome::Environment);
        }

        self.impact(world, actions, projectile, Some(other));

        let source = source_id.and_then(|id| world.actor(id));

        if let Some(source) = source {
            let target = world.actor(other);
            let explicit = snapshot.target() == Some(other);
            if let Some(target) = target.filter(|t| !explicit && !self.rules.can_damage(source, t)) {
                debug!(projectile = %projectile, source = %source.id(), target = %target.id(), "friendly fire skipped");
                let event = CombatEvent::FriendlyFireSkipped {
                    source: source.id(),
                    target: target.id(),
                };
                world.events_mut().record(event);
                return Ok(CollisionOutcome::FriendlyFire);
            }
        }

        if let Some(outcome) = self.check_pk(world, &snapshot, other) {
            return Ok(outcome);
        }

        let outcome = {
            let engine = DamageEngine::new(self.rules, self.config);
            let mut draws = DrawSequence::new(rolls);
            engine.compute(world, &snapshot, other, &mut draws)
        };

        for effect in &outcome.side_effects {
            Self::apply_side_effect(world, *effect);
        }

        let result = match outcome.result {
            DamageResult::Blocked(reason) => {
                Self::report_block(world, source_id, other, reason);
                CollisionOutcome::Blocked(reason)
            }
            DamageResult::TargetDead => CollisionOutcome::TargetDead,
            DamageResult::Hit(ctx) => {
                let Some(source_id) = source_id else {
                    return Ok(CollisionOutcome::Blocked(BlockReason::SourceMissing));
                };
                let result = self.deliver(world, &snapshot, source_id, other, &ctx);
                Self::after_hit(world, &snapshot, source_id, other);
                result
            }
        };

        Self::notify_monster_attacked(world, source_id, other);
        Ok(result)
    }

    fn is_live(world: &World, id: ProjectileId) -> Result<bool, CoreError> {
        let projectile = world
            .projectile(id)
            .ok_or(CoreError::UnknownProjectile(id))?;
        if projectile.is_collidable() {
            Ok(true)
        } else {
            trace!(projectile = %id, phase = ?projectile.phase(), "collision ignored");
            Ok(false)
        }
    }

    /// Impact visuals plus delayed removal. Runs at most once per projectile.
    fn impact(
        &self,
        world: &mut World,
        actions: &mut ActionQueue,
        id: ProjectileId,
        struck: Option<ActorId>,
    ) {
        let now = world.current_tick();
        let remove_at = now + self.config.removal_delay_ticks;

        let Some(projectile) = world.projectile_mut(id) else {
            return;
        };
        if !projectile.mark_impacted() {
            return;
        }
        let flags = projectile.physics();
        let spell = projectile.spell();
        let intensity = self
            .config
            .content
            .intensity(projectile.kind(), spell.level, spell.id);
        projectile.mark_pending_removal();

        actions.schedule(remove_at, DeferredAction::Destroy(id));

        let outbox = world.outbox_mut();
        outbox.broadcast(OutboundMessage::PhysicsState {
            projectile: id,
            flags,
        });
        outbox.broadcast(OutboundMessage::PlayScript {
            subject: ScriptSubject::Projectile(id),
            script: PlayScript::Explode,
            intensity,
        });

        world.events_mut().record(CombatEvent::ProjectileImpacted {
            projectile: id,
            struck,
            remove_at,
        });
        debug!(projectile = %id, struck = ?struck, remove_at, "projectile impacted");
    }

    fn check_pk(&self, world: &mut World, projectile: &Projectile, other: ActorId) -> Option<CollisionOutcome> {
        let source = world.actor(projectile.source()?)?;
        let target = world.actor(other)?;
        let violation = self.rules.check_pk_status(source, target, projectile.spell())?;

        let (source_id, source_name, source_session) =
            (source.id(), source.name().to_string(), source.session());
        let (target_name, target_session) = (target.name().to_string(), target.session());

        debug!(source = %source_id, target = %other, "pk check refused hit");

        if let Some(session) = source_session {
            world.outbox_mut().enqueue(
                session,
                OutboundMessage::ErrorWithString {
                    code: violation.attacker_error,
                    text: violation.attacker_error.render(&target_name),
                },
            );
        }
        if let Some(session) = target_session {
            world.outbox_mut().enqueue(
                session,
                OutboundMessage::ErrorWithString {
                    code: violation.defender_error,
                    text: violation.defender_error.render(&source_name),
                },
            );
        }
        world.events_mut().record(CombatEvent::PkBlocked {
            source: source_id,
            target: other,
        });
        Some(CollisionOutcome::PkBlocked(violation))
    }

    fn apply_side_effect(world: &mut World, effect: SideEffect) {
        match effect {
            SideEffect::UpdatePkTimers { attacker, defender } => {
                let tick = world.current_tick();
                for id in [attacker, defender] {
                    if let Some(player) = world.actor_mut(id).and_then(|a| a.as_player_mut()) {
                        player.last_pk_activity = Some(tick);
                    }
                }
                world.events_mut().record(CombatEvent::PkTimersUpdated {
                    attacker,
                    defender,
                    tick,
                });
            }
            SideEffect::LifestoneProtection { target, notify } => {
                let Some(protected) = world.actor(target) else {
                    return;
                };
                let name = protected.name().to_string();
                let session = protected.session();

                world.outbox_mut().broadcast(OutboundMessage::PlayScript {
                    subject: ScriptSubject::Actor(target),
                    script: PlayScript::ShieldUpGrey,
                    intensity: 1.0,
                });
                if let Some(session) = session {
                    world.outbox_mut().enqueue(
                        session,
                        chat("The Lifestone's magic protects you from the attack!"),
                    );
                }
                if let Some(session) = notify.and_then(|id| world.actor(id)).and_then(|a| a.session()) {
                    world.outbox_mut().enqueue(
                        session,
                        chat(&format!("The Lifestone's magic protects {name} from the attack!")),
                    );
                }
                world
                    .events_mut()
                    .record(CombatEvent::LifestoneProtected { target });
            }
        }
    }

    fn report_block(world: &mut World, source: Option<ActorId>, target: ActorId, reason: BlockReason) {
        if reason == BlockReason::Resisted {
            let source_actor = source.and_then(|id| world.actor(id));
            let source_name = source_actor.map(|a| a.name().to_string()).unwrap_or_default();
            let source_session = source_actor.and_then(|a| a.session());
            let target_actor = world.actor(target);
            let target_name = target_actor.map(|a| a.name().to_string()).unwrap_or_default();
            let target_session = target_actor.and_then(|a| a.session());

            if let Some(session) = source_session {
                world
                    .outbox_mut()
                    .enqueue(session, chat(&format!("{target_name} resists your spell")));
            }
            if let Some(session) = target_session {
                world
                    .outbox_mut()
                    .enqueue(session, chat(&format!("You resist the spell cast by {source_name}")));
            }
        }
        world.events_mut().record(CombatEvent::DamageBlocked {
            source,
            target,
            reason,
        });
    }

    /// Damage-over-time registration or direct damage.
    fn deliver(
        &self,
        world: &mut World,
        projectile: &Projectile,
        source: ActorId,
        target: ActorId,
        ctx: &super::DamageContext,
    ) -> CollisionOutcome {
        let spell = projectile.spell();

        if spell.is_damage_over_time() {
            let target_name = world.actor(target).map(|a| a.name().to_string()).unwrap_or_default();
            let status = world
                .enchantments_mut()
                .create_enchantment(target, &target_name, source, spell, ctx.magnitude);
            if let Some(session) = world
                .actor(source)
                .filter(|a| a.is_player())
                .and_then(|a| a.session())
            {
                world.outbox_mut().enqueue(session, chat(&status.message));
            }
            world.events_mut().record(CombatEvent::DamageOverTimeApplied {
                source,
                target,
                spell: spell.id,
                handle: status.handle,
            });
            return CollisionOutcome::DamageOverTime(status.handle);
        }

        match DamageApplicator::new(self.rules).apply(world, source, target, spell, ctx) {
            Some(applied) => CollisionOutcome::Damaged(applied),
            None => {
                warn!(source = %source, target = %target, "hit computed but target could not be damaged");
                CollisionOutcome::TargetDead
            }
        }
    }

    /// Proficiency and item procs after a successful hit.
    fn after_hit(world: &mut World, projectile: &Projectile, source: ActorId, target: ActorId) {
        let Some(actor) = world.actor(source) else {
            return;
        };
        let spell = projectile.spell();

        let is_player = actor.is_player();
        let can_proc = actor.is_combatant() && projectile.target().is_some();

        if is_player {
            world
                .events_mut()
                .record(CombatEvent::skill_used(source, spell.school, spell.power));
        }
        // untargeted casts never proc
        if can_proc {
            world
                .events_mut()
                .record(CombatEvent::ProcAttempt { source, target });
        }
    }

    fn notify_monster_attacked(world: &mut World, source: Option<ActorId>, target: ActorId) {
        let Some(source) = source else {
            return;
        };
        let attacker_is_player = world.actor(source).is_some_and(|a| a.is_player());
        let target_is_player = world.actor(target).is_some_and(|a| a.is_player());
        if attacker_is_player && !target_is_player {
            world.events_mut().record(CombatEvent::MonsterAttacked {
                attacker: source,
                monster: target,
            });
        }
    }
}

fn chat(text: &str) -> OutboundMessage {
    OutboundMessage::SystemChat {
        text: text.to_string(),
        channel: ChatChannel::Magic,
    }
}
