//! In-code static unit tables — the shipped catalog.
//!
//! This is the shape the code synthesizer emits: keep field order here in
//! sync with `muster-recon`'s generator.

use crate::model::{SourceId, SourceRecord};

/// One in-code unit definition.
#[derive(Debug, Clone, Copy)]
pub struct StaticDef {
    pub id: &'static str,
    pub name: &'static str,
    pub faction: &'static str,
    pub points: u32,
    pub availability: u32,
    pub command: u32,
    pub high_command: bool,
    pub keywords: &'static [&'static str],
    pub special_rules: &'static [&'static str],
    pub image: &'static str,
}

pub const STATIC_UNITS: &[StaticDef] = &[
    // ── northern-tribes ─────────────────────────────────────────────
    StaticDef {
        id: "wrathmane",
        name: "Wrathmane",
        faction: "northern-tribes",
        points: 30,
        availability: 1,
        command: 0,
        high_command: true,
        keywords: &["Beast", "Character"],
        special_rules: &["Fearless", "Intimidating 1"],
        image: "northern-tribes/wrathmane_card.jpg",
    },
    StaticDef {
        id: "frostborn-raiders",
        name: "Frostborn Raiders",
        faction: "northern-tribes",
        points: 20,
        availability: 3,
        command: 0,
        high_command: false,
        keywords: &["Infantry"],
        special_rules: &["Ambusher"],
        image: "northern-tribes/frostborn-raiders_card.jpg",
    },
    StaticDef {
        id: "skaldic-warhorn",
        name: "Skaldic Warhorn",
        faction: "northern-tribes",
        points: 15,
        availability: 2,
        command: 1,
        high_command: false,
        keywords: &["Infantry", "Character"],
        special_rules: &["Join (Infantry)"],
        image: "northern-tribes/skaldic-warhorn_card.jpg",
    },
    StaticDef {
        id: "icefang-pack",
        name: "Icefang Pack",
        faction: "northern-tribes",
        points: 25,
        availability: 2,
        command: 0,
        high_command: false,
        keywords: &["Beast", "Pack"],
        special_rules: &["Scout"],
        image: "northern-tribes/icefang-pack_card.jpg",
    },
    StaticDef {
        id: "tundra-shaman",
        name: "Tundra Shaman",
        faction: "northern-tribes",
        points: 35,
        availability: 1,
        command: 2,
        high_command: true,
        keywords: &["Infantry", "Character", "Spellcaster"],
        special_rules: &["Dispel", "Join (Infantry)"],
        image: "northern-tribes/tundra-shaman_card.jpg",
    },
    // ── ashen-covenant ──────────────────────────────────────────────
    StaticDef {
        id: "cinder-prophet",
        name: "Cinder Prophet",
        faction: "ashen-covenant",
        points: 40,
        availability: 1,
        command: 2,
        high_command: true,
        keywords: &["Infantry", "Character", "Spellcaster"],
        special_rules: &["Dispel", "Fearless"],
        image: "ashen-covenant/cinder-prophet_card.jpg",
    },
    StaticDef {
        id: "ashen-vanguard",
        name: "Ashen Vanguard",
        faction: "ashen-covenant",
        points: 25,
        availability: 3,
        command: 0,
        high_command: false,
        keywords: &["Infantry", "Elite"],
        special_rules: &[],
        image: "ashen-covenant/ashen-vanguard_card.jpg",
    },
    StaticDef {
        id: "pyre-wardens",
        name: "Pyre Wardens",
        faction: "ashen-covenant",
        points: 30,
        availability: 2,
        command: 0,
        high_command: false,
        keywords: &["Infantry"],
        special_rules: &["Intimidating 1"],
        image: "ashen-covenant/pyre-wardens_card.jpg",
    },
    StaticDef {
        id: "ember-houndmaster",
        name: "Ember Houndmaster",
        faction: "ashen-covenant",
        points: 20,
        availability: 2,
        command: 1,
        high_command: false,
        keywords: &["Infantry", "Character"],
        special_rules: &["Join (Infantry)", "Scout"],
        image: "ashen-covenant/ember-houndmaster_card.jpg",
    },
];

/// Convert the static tables into canonical records. Pure, no I/O; a
/// failure here indicates a bug in the tables, not a runtime condition.
pub fn load_static() -> Vec<SourceRecord> {
    STATIC_UNITS.iter().map(to_record).collect()
}

fn to_record(def: &StaticDef) -> SourceRecord {
    SourceRecord {
        origin: SourceId::Static,
        id: Some(def.id.to_string()),
        name: def.name.to_string(),
        faction: def.faction.to_string(),
        points: def.points,
        availability: def.availability,
        command: def.command,
        high_command: def.high_command,
        keywords: def.keywords.iter().map(|s| s.to_string()).collect(),
        special_rules: def.special_rules.iter().map(|s| s.to_string()).collect(),
    }
}

/// Distinct faction slugs in the shipped catalog, in first-seen order.
pub fn static_factions() -> Vec<String> {
    let mut factions: Vec<String> = Vec::new();
    for def in STATIC_UNITS {
        if !factions.iter().any(|f| f == def.faction) {
            factions.push(def.faction.to_string());
        }
    }
    factions
}
