//! Static-definition source synthesis.
//!
//! Turns a faction's flat-file records into `StaticDef { ... }` blocks ready
//! to paste over the tables in `muster-core`. Advisory text only — nothing
//! here writes to the static source.

use std::fmt::Write;

use muster_core::{normalize_faction, slugify, SourceRecord};

use crate::differ::diff_pair;
use crate::matcher::match_records;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedFile {
    pub faction_slug: String,
    pub text: String,
    pub record_count: usize,
    /// Field mismatches against the current static records for the same
    /// faction — how much would actually change on paste.
    pub changed_field_count: usize,
}

/// Generate replacement static-definition text for one faction.
///
/// Deterministic and pure: same input, same text (record order follows the
/// input; field order never does). Records outside the faction are ignored.
pub fn synthesize(
    records: &[SourceRecord],
    current_static: &[SourceRecord],
    faction_slug: &str,
) -> SynthesizedFile {
    let faction_records: Vec<SourceRecord> = records
        .iter()
        .filter(|r| normalize_faction(&r.faction) == faction_slug)
        .cloned()
        .collect();
    let static_records: Vec<SourceRecord> = current_static
        .iter()
        .filter(|r| normalize_faction(&r.faction) == faction_slug)
        .cloned()
        .collect();

    let matched = match_records(&static_records, &faction_records);
    let changed_field_count = matched
        .pairs
        .iter()
        .map(|(l, r)| diff_pair(l, r).len())
        .sum();

    let mut text = String::new();
    let _ = writeln!(
        text,
        "// {faction_slug} unit table — generated from the flat reference export."
    );
    let _ = writeln!(
        text,
        "// Review before pasting over the faction's entries in the static tables."
    );

    for rec in &faction_records {
        let slug = slugify(&rec.name);
        let id = rec.id.clone().unwrap_or_else(|| slug.clone());
        let _ = writeln!(text, "StaticDef {{");
        let _ = writeln!(text, "    id: {},", rust_str(&id));
        let _ = writeln!(text, "    name: {},", rust_str(&rec.name));
        let _ = writeln!(text, "    faction: {},", rust_str(faction_slug));
        let _ = writeln!(text, "    points: {},", rec.points);
        let _ = writeln!(text, "    availability: {},", rec.availability);
        let _ = writeln!(text, "    command: {},", rec.command);
        let _ = writeln!(text, "    high_command: {},", rec.high_command);
        let _ = writeln!(text, "    keywords: {},", rust_str_slice(&rec.keywords));
        let _ = writeln!(
            text,
            "    special_rules: {},",
            rust_str_slice(&rec.special_rules)
        );
        let _ = writeln!(
            text,
            "    image: {},",
            rust_str(&format!("{faction_slug}/{slug}_card.jpg"))
        );
        let _ = writeln!(text, "}},");
    }

    SynthesizedFile {
        faction_slug: faction_slug.to_string(),
        text,
        record_count: faction_records.len(),
        changed_field_count,
    }
}

fn rust_str(s: &str) -> String {
    format!("{s:?}")
}

fn rust_str_slice(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| rust_str(s)).collect();
    format!("&[{}]", quoted.join(", "))
}
