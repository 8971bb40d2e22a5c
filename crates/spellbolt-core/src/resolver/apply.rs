//! The damage applicator.
//!
//! Turns a computed hit into a vital change on the target. Stamina and mana
//! drains go straight to their pools. Health damage picks up sneak attack,
//! heritage and ratings first, is written to the damage history, and kills
//! the target at zero.

use serde::{Deserialize, Serialize};
use spellbook::{SpellCategory, SpellDescriptor};
use tracing::{debug, info};

use super::verbs::attack_verb;
use super::DamageContext;
use crate::actor::{ActorId, SessionId, StatusFlags, VitalKind};
use crate::event::CombatEvent;
use crate::message::{ChatChannel, OutboundMessage};
use crate::rules::{additive_combine, negative_rating_mod, positive_rating_mod, CombatRules};
use crate::world::World;

/// What the applicator did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDamage {
    /// Pool that was drained.
    pub vital: VitalKind,
    /// Rounded damage after ratings, as shown in messages.
    pub amount: u32,
    /// Amount actually removed from the pool.
    pub applied: u32,
    /// Critical hit.
    pub critical: bool,
    /// The hit killed the target.
    pub killed: bool,
}

/// Applies computed hits.
#[derive(Clone, Copy)]
pub struct DamageApplicator<'a> {
    rules: &'a dyn CombatRules,
}

impl std::fmt::Debug for DamageApplicator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DamageApplicator").finish_non_exhaustive()
    }
}

/// Everything read from the caster before the target is mutated.
struct SourceView {
    id: ActorId,
    name: String,
    session: Option<SessionId>,
    is_player: bool,
    squelches_target: bool,
    damage_rating: i32,
    sneak_attack: f32,
    heritage: f32,
}

impl<'a> DamageApplicator<'a> {
    /// Creates an applicator over a ruleset.
    #[must_use]
    pub fn new(rules: &'a dyn CombatRules) -> Self {
        Self { rules }
    }

    /// Applies `ctx` from `source` to `target`.
    ///
    /// Returns `None` if either actor is gone or the target is already dead.
    pub fn apply(
        &self,
        world: &mut World,
        source: ActorId,
        target: ActorId,
        spell: &SpellDescriptor,
        ctx: &DamageContext,
    ) -> Option<AppliedDamage> {
        let view = {
            let src = world.actor(source)?;
            let tgt = world.actor(target)?;
            if !tgt.is_alive() {
                return None;
            }
            let ratings = src.as_creature().map(|c| c.ratings).unwrap_or_default();
            SourceView {
                id: source,
                name: src.name().to_string(),
                session: src.session(),
                is_player: src.is_player(),
                squelches_target: src.as_player().is_some_and(|p| p.squelches.contains(&target)),
                damage_rating: ratings.damage,
                sneak_attack: self.rules.sneak_attack_mod(src, tgt),
                heritage: self.rules.heritage_mod(src),
            }
        };

        match spell.category {
            SpellCategory::StaminaLowering => {
                self.drain(world, &view, target, spell, ctx, VitalKind::Stamina)
            }
            SpellCategory::ManaLowering => self.drain(world, &view, target, spell, ctx, VitalKind::Mana),
            _ => self.damage_health(world, &view, target, spell, ctx),
        }
    }

    fn drain(
        &self,
        world: &mut World,
        source: &SourceView,
        target: ActorId,
        spell: &SpellDescriptor,
        ctx: &DamageContext,
        vital: VitalKind,
    ) -> Option<AppliedDamage> {
        let damage = ctx.magnitude;
        let tgt = world.actor_mut(target)?;
        let applied = take_from(tgt, vital, damage);

        let amount = round_amount(damage);
        let vital_name = if vital == VitalKind::Stamina { "stamina" } else { "mana" };
        let attacker_text = format!(
            "With {} you drain {amount} points of {vital_name} from {}.",
            spell.name,
            tgt.name()
        );
        let defender_text = format!(
            "{} casts {} and drains {amount} points of your {vital_name}.",
            source.name, spell.name
        );

        self.finish(world, source, target, spell, ctx, vital, amount, applied, &attacker_text, &defender_text)
    }

    fn damage_health(
        &self,
        world: &mut World,
        source: &SourceView,
        target: ActorId,
        spell: &SpellDescriptor,
        ctx: &DamageContext,
    ) -> Option<AppliedDamage> {
        let sneak_attack = if source.is_player { source.sneak_attack } else { 1.0 };

        let damage_rating_mod = additive_combine(&[
            positive_rating_mod(source.damage_rating),
            source.heritage,
            sneak_attack,
        ]);

        let tgt = world.actor_mut(target)?;
        let resist_rating_mod =
            negative_rating_mod(tgt.as_creature().map_or(0, |c| c.ratings.damage_resist));

        let damage = ctx.magnitude * damage_rating_mod * resist_rating_mod;
        let applied = take_from(tgt, VitalKind::Health, damage);
        if let Some(creature) = tgt.as_creature_mut() {
            creature
                .damage_history
                .add(Some(source.id), spell.damage_type, applied);
        }

        let amount = round_amount(damage);
        let percent = percent_of_max(tgt, VitalKind::Health, damage);
        let verb = attack_verb(spell.damage_type, percent);
        let prefix = format!(
            "{}{}",
            if ctx.critical_hit { "Critical hit! " } else { "" },
            if sneak_attack > 1.0 { "Sneak Attack! " } else { "" }
        );
        let (attacker_suffix, defender_suffix) = if ctx.critical_defended {
            (
                " Your critical hit was avoided with their augmentation!",
                " Your augmentation allows you to avoid a critical hit!",
            )
        } else {
            ("", "")
        };
        let attacker_text = format!(
            "{prefix}You {} {} for {amount} points with {}.{attacker_suffix}",
            verb.verb,
            tgt.name(),
            spell.name
        );
        let defender_text = format!(
            "{prefix}{} {} you for {amount} points with {}.{defender_suffix}",
            source.name, verb.plural, spell.name
        );

        self.finish(
            world,
            source,
            target,
            spell,
            ctx,
            VitalKind::Health,
            amount,
            applied,
            &attacker_text,
            &defender_text,
        )
    }

    /// Messages, events and death handling shared by every pool.
    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        world: &mut World,
        source: &SourceView,
        target: ActorId,
        spell: &SpellDescriptor,
        ctx: &DamageContext,
        vital: VitalKind,
        amount: u32,
        applied: u32,
        attacker_text: &str,
        defender_text: &str,
    ) -> Option<AppliedDamage> {
        let tgt = world.actor(target)?;
        let alive = tgt.is_alive();
        let target_name = tgt.name().to_string();
        let target_session = tgt.session();
        let target_squelches_source = tgt
            .as_player()
            .is_some_and(|p| p.squelches.contains(&source.id));
        let health_fraction = tgt
            .as_creature()
            .map_or(0.0, |c| c.vitals.health.fraction());
        let top_damager = tgt.as_creature().and_then(|c| c.damage_history.top_damager());

        world.events_mut().record(CombatEvent::DamageDealt {
            source: source.id,
            target,
            vital,
            amount: applied,
            damage_type: spell.damage_type,
            critical: ctx.critical_hit,
        });

        if let Some(session) = source.session {
            world.outbox_mut().enqueue(
                session,
                OutboundMessage::UpdateHealth {
                    target,
                    fraction: health_fraction,
                },
            );
        }

        if alive {
            if let Some(session) = source.session.filter(|_| !source.squelches_target) {
                world.outbox_mut().enqueue(session, magic_chat(attacker_text));
            }
            if let Some(session) = target_session.filter(|_| !target_squelches_source) {
                world.outbox_mut().enqueue(session, magic_chat(defender_text));
            }
            if ctx.critical_hit {
                world.events_mut().record(CombatEvent::CriticalReceived {
                    target,
                    attacker: source.id,
                });
            }
            debug!(source = %source.id, target = %target, amount, vital = %vital, "damage applied");
        } else {
            self.handle_death(world, source, target, &target_name, target_session, top_damager, spell, ctx);
        }

        Some(AppliedDamage {
            vital,
            amount,
            applied,
            critical: ctx.critical_hit,
            killed: !alive,
        })
    }

    #[allow(clippy::too_many_arguments, clippy::unused_self)]
    fn handle_death(
        &self,
        world: &mut World,
        source: &SourceView,
        target: ActorId,
        target_name: &str,
        target_session: Option<SessionId>,
        top_damager: Option<ActorId>,
        spell: &SpellDescriptor,
        ctx: &DamageContext,
    ) {
        if let Some(creature) = world.actor_mut(target).and_then(|a| a.as_creature_mut()) {
            creature.status.insert(StatusFlags::DEAD);
        }

        info!(victim = %target, killer = %source.id, spell = %spell.id, "actor killed by projectile");

        world.events_mut().record(CombatEvent::ActorDied {
            victim: target,
            killer: Some(source.id),
            top_damager,
            damage_type: spell.damage_type,
            critical: ctx.critical_hit,
        });

        if let Some(session) = source.session {
            world
                .outbox_mut()
                .enqueue(session, magic_chat(&format!("You killed {target_name}!")));
        }
        if let Some(session) = target_session {
            world
                .outbox_mut()
                .enqueue(session, magic_chat(&format!("You were killed by {}!", source.name)));
        }
        world.outbox_mut().broadcast(OutboundMessage::DeathNotice {
            victim: target,
            killer: Some(source.id),
            text: format!("{} has killed {target_name}.", source.name),
        });
    }
}

fn magic_chat(text: &str) -> OutboundMessage {
    OutboundMessage::SystemChat {
        text: text.to_string(),
        channel: ChatChannel::Magic,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_amount(damage: f32) -> u32 {
    damage.max(0.0).round() as u32
}

/// Removes `damage` (rounded) from a pool and returns what was taken.
fn take_from(actor: &mut crate::actor::Actor, vital: VitalKind, damage: f32) -> u32 {
    let delta = -i64::from(round_amount(damage));
    let applied = -actor.update_vital_delta(vital, delta);
    u32::try_from(applied).unwrap_or(0)
}

fn percent_of_max(actor: &crate::actor::Actor, vital: VitalKind, damage: f32) -> f32 {
    let max = actor.as_creature().map_or(0, |c| c.vitals.get(vital).max);
    if max == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let max = max as f32;
    damage / max
}
