//! Attack verbs for hit messages.

use spellbook::DamageType;

/// First- and third-person verb for a hit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttackVerb {
    /// "You {verb} the drudge"
    pub verb: &'static str,
    /// "The drudge {plural} you"
    pub plural: &'static str,
}

type Tier = (&'static str, &'static str);

// severity tiers, heaviest first: > 50%, > 25%, > 10%, anything else
const SLASH: [Tier; 4] = [("mangle", "mangles"), ("slash", "slashes"), ("cut", "cuts"), ("scratch", "scratches")];
const PIERCE: [Tier; 4] = [("gore", "gores"), ("impale", "impales"), ("stab", "stabs"), ("nick", "nicks")];
const BLUDGEON: [Tier; 4] = [("crush", "crushes"), ("smash", "smashes"), ("bash", "bashes"), ("graze", "grazes")];
const FIRE: [Tier; 4] = [("incinerate", "incinerates"), ("burn", "burns"), ("scorch", "scorches"), ("singe", "singes")];
const COLD: [Tier; 4] = [("freeze", "freezes"), ("frost", "frosts"), ("chill", "chills"), ("numb", "numbs")];
const ACID: [Tier; 4] = [("dissolve", "dissolves"), ("corrode", "corrodes"), ("sear", "sears"), ("blister", "blisters")];
const ELECTRIC: [Tier; 4] = [("blast", "blasts"), ("jolt", "jolts"), ("shock", "shocks"), ("spark", "sparks")];
const DRAIN: [Tier; 4] = [("deplete", "depletes"), ("siphon", "siphons"), ("exhaust", "exhausts"), ("drain", "drains")];
const NETHER: [Tier; 4] = [("eradicate", "eradicates"), ("wither", "withers"), ("twist", "twists"), ("scar", "scars")];

/// Picks the verb for `damage_type` at `percent` of the target's pool.
///
/// ```
/// use spellbook::DamageType;
/// use spellbolt_core::resolver::attack_verb;
///
/// assert_eq!(attack_verb(DamageType::Fire, 0.6).verb, "incinerate");
/// assert_eq!(attack_verb(DamageType::Fire, 0.05).plural, "singes");
/// ```
#[must_use]
pub fn attack_verb(damage_type: DamageType, percent: f32) -> AttackVerb {
    let table = match damage_type {
        DamageType::Slash => &SLASH,
        DamageType::Pierce => &PIERCE,
        DamageType::Bludgeon => &BLUDGEON,
        DamageType::Fire => &FIRE,
        DamageType::Cold => &COLD,
        DamageType::Acid => &ACID,
        DamageType::Electric => &ELECTRIC,
        DamageType::Health | DamageType::Stamina | DamageType::Mana => &DRAIN,
        DamageType::Nether => &NETHER,
        DamageType::Undefined => {
            return AttackVerb {
                verb: "hit",
                plural: "hits",
            }
        }
    };

    let tier = if percent > 0.5 {
        0
    } else if percent > 0.25 {
        1
    } else if percent > 0.1 {
        2
    } else {
        3
    };
    let (verb, plural) = table[tier];
    AttackVerb { verb, plural }
}
