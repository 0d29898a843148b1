//! Identity normalization — one matchable key per unit, independent of
//! punctuation, case, or file-naming convention.

use serde::Serialize;

use crate::model::SourceRecord;

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Canonicalize a faction label into its slug form.
///
/// Lowercases, folds diacritics to ASCII, turns whitespace/underscores into
/// hyphens, drops other punctuation, and collapses hyphen runs. Idempotent:
/// re-normalizing a slug returns it unchanged. An unknown label still
/// normalizes deterministically — it just won't match any canonical slug,
/// which is a reportable condition, not an error.
pub fn normalize_faction(label: &str) -> String {
    slugify(label)
}

/// Slugify an arbitrary name (also used for image paths and file naming).
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        let ch = fold_diacritic(ch);
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        }
        // Remaining punctuation contributes nothing to identity.
    }

    out
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' => 'n',
        'ç' => 'c',
        _ => ch,
    }
}

// ---------------------------------------------------------------------------
// Unit keys
// ---------------------------------------------------------------------------

/// Normalized identity of a unit. Two records denote the same entity iff
/// their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UnitKey {
    pub faction: String,
    pub ident: String,
}

impl std::fmt::Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.faction, self.ident)
    }
}

/// Key of a record: the id when the source supplies one, otherwise the
/// lowercased name. The matcher prefers id-equality and falls back to
/// name-equality when either side lacks an id.
pub fn key_of(record: &SourceRecord) -> UnitKey {
    let ident = match &record.id {
        Some(id) => id.to_lowercase(),
        None => record.name.to_lowercase(),
    };
    UnitKey {
        faction: normalize_faction(&record.faction),
        ident,
    }
}

/// Name-based key, used as the matcher's fallback index.
pub fn name_key_of(record: &SourceRecord) -> UnitKey {
    UnitKey {
        faction: normalize_faction(&record.faction),
        ident: record.name.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceId;

    fn record(id: Option<&str>, name: &str, faction: &str) -> SourceRecord {
        SourceRecord {
            origin: SourceId::Static,
            id: id.map(String::from),
            name: name.into(),
            faction: faction.into(),
            points: 0,
            availability: 0,
            command: 0,
            high_command: false,
            keywords: vec![],
            special_rules: vec![],
        }
    }

    #[test]
    fn faction_label_variants_collapse() {
        assert_eq!(normalize_faction("Northern Tribes"), "northern-tribes");
        assert_eq!(normalize_faction("northern_tribes"), "northern-tribes");
        assert_eq!(normalize_faction("NORTHERN--TRIBES"), "northern-tribes");
        assert_eq!(normalize_faction("  Northern   Tribes  "), "northern-tribes");
    }

    #[test]
    fn diacritics_fold_to_ascii() {
        assert_eq!(normalize_faction("Sûrne Covenant"), "surne-covenant");
        assert_eq!(slugify("Néma's Chosen"), "nemas-chosen");
    }

    #[test]
    fn normalization_is_idempotent() {
        for label in ["Northern Tribes", "Sûrne Covenant", "a_b-c d"] {
            let once = normalize_faction(label);
            assert_eq!(normalize_faction(&once), once);
        }
    }

    #[test]
    fn key_prefers_id_over_name() {
        let rec = record(Some("Wrathmane"), "The Wrathmane", "Northern Tribes");
        let key = key_of(&rec);
        assert_eq!(key.faction, "northern-tribes");
        assert_eq!(key.ident, "wrathmane");
    }

    #[test]
    fn key_falls_back_to_name() {
        let rec = record(None, "Wrathmane", "Northern Tribes");
        assert_eq!(key_of(&rec).ident, "wrathmane");
        assert_eq!(key_of(&rec), name_key_of(&rec));
    }

    #[test]
    fn key_display() {
        let rec = record(Some("wrathmane"), "Wrathmane", "Northern Tribes");
        assert_eq!(key_of(&rec).to_string(), "northern-tribes/wrathmane");
    }
}
