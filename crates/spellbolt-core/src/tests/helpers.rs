//! Test helper functions for building spells, actors and zones.

use std::sync::Arc;

use glam::Vec3;
use spellbook::{DamageType, MagicSchool, SpellCategory, SpellDescriptor, SpellId, SpellTable};

use crate::actor::{
    Actor, ActorId, CreatureComponents, PkStatus, PlayerComponents, SessionId, VitalKind,
};
use crate::config::CombatConfig;
use crate::rolls::ScriptedRolls;
use crate::zone::{LaunchRequest, Zone};

// =============================================================================
// Logging
// =============================================================================

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// =============================================================================
// Spells
// =============================================================================

/// Flame Bolt: single fire projectile, war school, 10..=20.
pub const FLAME_BOLT: SpellId = SpellId::new(27);
/// Drain Health: single life projectile.
pub const HARM_BOLT: SpellId = SpellId::new(61);
/// Corrosive Ring: eight acid projectiles in a full circle.
pub const ACID_RING: SpellId = SpellId::new(1788);
/// Nether DoT streak.
pub const NETHER_DOT: SpellId = SpellId::new(5356);
/// Stamina drain bolt.
pub const STAMINA_DRAIN: SpellId = SpellId::new(1242);

/// A single-projectile war bolt.
pub fn war_bolt() -> SpellDescriptor {
    let mut spell = SpellDescriptor::unresolved(FLAME_BOLT);
    spell.name = "Flame Bolt I".into();
    spell.category = SpellCategory::FireMissile;
    spell.damage_type = DamageType::Fire;
    spell.school = MagicSchool::War;
    spell.min_damage = 10;
    spell.max_damage = 20;
    spell.power = 100;
    spell.level = 1;
    spell.num_projectiles = 1;
    spell.wcid = 1635;
    spell.harmful = true;
    spell
}

/// A single-projectile life bolt; damage comes from the launch request.
pub fn life_bolt() -> SpellDescriptor {
    let mut spell = SpellDescriptor::unresolved(HARM_BOLT);
    spell.name = "Harm Other".into();
    spell.category = SpellCategory::HealthLowering;
    spell.damage_type = DamageType::Health;
    spell.school = MagicSchool::Life;
    spell.level = 3;
    spell.num_projectiles = 1;
    spell.wcid = 20973;
    spell.damage_ratio = 0.5;
    spell.harmful = true;
    spell
}

/// An eight-projectile ring.
pub fn acid_ring() -> SpellDescriptor {
    let mut spell = war_bolt();
    spell.id = ACID_RING;
    spell.name = "Corrosive Ring".into();
    spell.category = SpellCategory::AcidRing;
    spell.damage_type = DamageType::Acid;
    spell.level = 4;
    spell.num_projectiles = 8;
    spell.spread_angle = 360.0;
    spell.wcid = 7276;
    spell
}

/// A void damage-over-time projectile.
pub fn nether_dot() -> SpellDescriptor {
    let mut spell = war_bolt();
    spell.id = NETHER_DOT;
    spell.name = "Corruption".into();
    spell.category = SpellCategory::NetherStreak;
    spell.damage_type = DamageType::Nether;
    spell.school = MagicSchool::Void;
    spell.duration = 15.0;
    spell.wcid = 43233;
    spell
}

/// A stamina drain bolt.
pub fn stamina_drain() -> SpellDescriptor {
    let mut spell = life_bolt();
    spell.id = STAMINA_DRAIN;
    spell.name = "Exhaustion".into();
    spell.category = SpellCategory::StaminaLowering;
    spell.damage_type = DamageType::Stamina;
    spell.damage_ratio = 1.0;
    spell
}

/// A table with every helper spell.
pub fn spell_table() -> Arc<SpellTable> {
    let mut table = SpellTable::new();
    for spell in [war_bolt(), life_bolt(), acid_ring(), nether_dot(), stamina_drain()] {
        table.insert(spell).expect("helper spells are unique");
    }
    Arc::new(table)
}

// =============================================================================
// Zones and actors
// =============================================================================

/// A zone over the helper spells with scripted draws.
pub fn scripted_zone(draws: impl IntoIterator<Item = f64>) -> Zone {
    init_tracing();
    Zone::new(spell_table(), CombatConfig::default(), 0)
        .with_rolls(Box::new(ScriptedRolls::new(draws)))
}

/// A zone over the helper spells with seeded draws.
pub fn seeded_zone(seed: u64) -> Zone {
    init_tracing();
    Zone::new(spell_table(), CombatConfig::default(), seed)
}

/// Inserts a connected player at `position` with session `id`.
pub fn spawn_player(zone: &mut Zone, id: u64, name: &str, position: Vec3, pk: PkStatus) -> ActorId {
    let components = PlayerComponents {
        creature: CreatureComponents::at_position(position, 0.0),
        session: Some(SessionId(id)),
        pk_status: pk,
        ..PlayerComponents::default()
    };
    zone.world_mut()
        .insert(Actor::player(ActorId::new(id), name, components))
        .expect("player id is free")
}

/// Inserts a creature at `position`.
pub fn spawn_creature(zone: &mut Zone, id: u64, name: &str, position: Vec3) -> ActorId {
    zone.world_mut()
        .insert(Actor::creature(
            ActorId::new(id),
            name,
            CreatureComponents::at_position(position, 0.0),
        ))
        .expect("creature id is free")
}

/// Launches `spell` from `source` at `target`.
pub fn fire(zone: &mut Zone, spell: SpellId, source: ActorId, target: ActorId) -> crate::projectile::ProjectileId {
    fire_with_life(zone, spell, source, target, 0)
}

/// Launches with fixed life damage.
pub fn fire_with_life(
    zone: &mut Zone,
    spell: SpellId,
    source: ActorId,
    target: ActorId,
    life_damage: u32,
) -> crate::projectile::ProjectileId {
    let spawn = zone
        .world()
        .actor(source)
        .map_or(Vec3::ZERO, |a| a.transform().position);
    zone.launch(
        LaunchRequest::new(spell, Some(source), spawn)
            .at(target)
            .moving(glam::Quat::IDENTITY, Vec3::Y * 10.0)
            .with_life_damage(life_damage),
    )
    .expect("source exists")
}

/// Current health of an actor, 0 if missing.
pub fn health(zone: &Zone, id: ActorId) -> u32 {
    zone.world()
        .actor(id)
        .and_then(|a| a.as_creature())
        .map_or(0, |c| c.vitals.get(VitalKind::Health).current)
}

/// All chat and error texts queued for a session.
pub fn texts(zone: &Zone, session: u64) -> Vec<String> {
    zone.world()
        .outbox()
        .texts_for(SessionId(session))
        .map(str::to_string)
        .collect()
}
