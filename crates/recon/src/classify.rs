//! Bucket mismatches and one-side-only results into report categories.

use serde::ser::Serializer;
use serde::Serialize;

use muster_core::{key_of, Field, SourceId, UnitKey};

use crate::differ::{FieldDelta, FieldMismatch};
use crate::matcher::MatchResult;

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// The record exists elsewhere but not in this source.
    MissingIn(SourceId),
    NameConflict,
    PointsConflict,
    HighCommandConflict,
    FieldConflict(Field),
    DuplicateIdentity,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIn(source) => write!(f, "missing_in_{source}"),
            Self::NameConflict => write!(f, "name_conflict"),
            Self::PointsConflict => write!(f, "points_conflict"),
            Self::HighCommandConflict => write!(f, "high_command_conflict"),
            Self::FieldConflict(field) => write!(f, "field_conflict({field})"),
            Self::DuplicateIdentity => write!(f, "duplicate_identity"),
        }
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Bucket for a field-level mismatch. Name, points, and the high-command
/// flag get their own categories; everything else is a generic field
/// conflict.
pub fn bucket_for(field: Field) -> Bucket {
    match field {
        Field::Name => Bucket::NameConflict,
        Field::Points => Bucket::PointsConflict,
        Field::HighCommand => Bucket::HighCommandConflict,
        other => Bucket::FieldConflict(other),
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub bucket: Bucket,
    pub key: UnitKey,
    pub detail: String,
}

/// Classify one pairwise comparison into issues.
pub fn classify_pair(
    result: &MatchResult,
    mismatches: &[FieldMismatch],
    left: SourceId,
    right: SourceId,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rec in &result.only_left {
        issues.push(Issue {
            bucket: Bucket::MissingIn(right),
            key: key_of(rec),
            detail: format!("present in {left}, missing in {right}"),
        });
    }

    for rec in &result.only_right {
        issues.push(Issue {
            bucket: Bucket::MissingIn(left),
            key: key_of(rec),
            detail: format!("present in {right}, missing in {left}"),
        });
    }

    for m in mismatches {
        issues.push(Issue {
            bucket: bucket_for(m.field),
            key: m.key.clone(),
            detail: render_delta(m),
        });
    }

    for dup in &result.duplicates {
        issues.push(Issue {
            bucket: Bucket::DuplicateIdentity,
            key: dup.key.clone(),
            detail: format!("duplicate identity in {}; last occurrence wins", dup.source),
        });
    }

    issues
}

fn render_delta(m: &FieldMismatch) -> String {
    let ls = m.left_source;
    let rs = m.right_source;
    match &m.delta {
        FieldDelta::Text { left, right } => format!("{ls}: {left:?}, {rs}: {right:?}"),
        FieldDelta::Number { left, right } => format!("{ls}: {left}, {rs}: {right}"),
        FieldDelta::Flag { left, right } => format!("{ls}: {left}, {rs}: {right}"),
        FieldDelta::SetDiff {
            left_only,
            right_only,
        } => {
            let mut parts = Vec::new();
            if !left_only.is_empty() {
                parts.push(format!("missing in {rs}: {}", left_only.join(", ")));
            }
            if !right_only.is_empty() {
                parts.push(format!("missing in {ls}: {}", right_only.join(", ")));
            }
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_core::SourceRecord;

    fn rec(origin: SourceId, name: &str, points: u32) -> SourceRecord {
        SourceRecord {
            origin,
            id: None,
            name: name.into(),
            faction: "northern-tribes".into(),
            points,
            availability: 1,
            command: 0,
            high_command: false,
            keywords: vec![],
            special_rules: vec![],
        }
    }

    #[test]
    fn bucket_names() {
        assert_eq!(
            Bucket::MissingIn(SourceId::Static).to_string(),
            "missing_in_static"
        );
        assert_eq!(Bucket::PointsConflict.to_string(), "points_conflict");
        assert_eq!(
            Bucket::FieldConflict(Field::Keywords).to_string(),
            "field_conflict(keywords)"
        );
    }

    #[test]
    fn special_fields_get_their_own_buckets() {
        assert_eq!(bucket_for(Field::Name), Bucket::NameConflict);
        assert_eq!(bucket_for(Field::Points), Bucket::PointsConflict);
        assert_eq!(bucket_for(Field::HighCommand), Bucket::HighCommandConflict);
        assert_eq!(
            bucket_for(Field::Command),
            Bucket::FieldConflict(Field::Command)
        );
    }

    #[test]
    fn only_sides_become_missing_in() {
        let result = MatchResult {
            pairs: vec![],
            only_left: vec![rec(SourceId::Static, "Wrathmane", 30)],
            only_right: vec![rec(SourceId::FlatFile, "Icefang Pack", 25)],
            duplicates: vec![],
        };
        let issues = classify_pair(&result, &[], SourceId::Static, SourceId::FlatFile);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].bucket, Bucket::MissingIn(SourceId::FlatFile));
        assert_eq!(issues[1].bucket, Bucket::MissingIn(SourceId::Static));
        assert_eq!(issues[1].key.ident, "icefang pack");
    }

    #[test]
    fn set_diff_detail_names_the_missing_side() {
        let m = FieldMismatch {
            key: UnitKey {
                faction: "northern-tribes".into(),
                ident: "wrathmane".into(),
            },
            field: Field::Keywords,
            delta: FieldDelta::SetDiff {
                left_only: vec!["B".into()],
                right_only: vec![],
            },
            left_source: SourceId::Static,
            right_source: SourceId::FlatFile,
        };
        assert_eq!(render_delta(&m), "missing in flatfile: B");
    }
}
