//! Type-aware field diffing for a matched pair.

use std::collections::BTreeSet;

use muster_core::{key_of, Field, SourceId, SourceRecord, UnitKey};

/// What differs, shaped by the field's comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDelta {
    Text { left: String, right: String },
    Number { left: i64, right: i64 },
    Flag { left: bool, right: bool },
    /// Symmetric difference of a collection field. Elements present on one
    /// side only, sorted.
    SetDiff {
        left_only: Vec<String>,
        right_only: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub key: UnitKey,
    pub field: Field,
    pub delta: FieldDelta,
    pub left_source: SourceId,
    pub right_source: SourceId,
}

/// Compare every tracked field of a matched pair.
///
/// Numeric and boolean fields use exact equality. The display name is
/// case-sensitive: a difference there is a real content discrepancy, not
/// formatting. Collections compare as sets — order and duplicates are
/// irrelevant, and a mismatch reports the symmetric difference rather than
/// the raw lists.
pub fn diff_pair(left: &SourceRecord, right: &SourceRecord) -> Vec<FieldMismatch> {
    let key = key_of(left);
    let mut mismatches = Vec::new();

    let mut push = |field: Field, delta: FieldDelta| {
        mismatches.push(FieldMismatch {
            key: key.clone(),
            field,
            delta,
            left_source: left.origin,
            right_source: right.origin,
        });
    };

    if left.name != right.name {
        push(
            Field::Name,
            FieldDelta::Text {
                left: left.name.clone(),
                right: right.name.clone(),
            },
        );
    }

    for (field, l, r) in [
        (Field::Points, left.points, right.points),
        (Field::Availability, left.availability, right.availability),
        (Field::Command, left.command, right.command),
    ] {
        if l != r {
            push(
                field,
                FieldDelta::Number {
                    left: i64::from(l),
                    right: i64::from(r),
                },
            );
        }
    }

    if left.high_command != right.high_command {
        push(
            Field::HighCommand,
            FieldDelta::Flag {
                left: left.high_command,
                right: right.high_command,
            },
        );
    }

    if let Some(delta) = set_delta(&left.keywords, &right.keywords) {
        push(Field::Keywords, delta);
    }
    if let Some(delta) = set_delta(&left.special_rules, &right.special_rules) {
        push(Field::SpecialRules, delta);
    }

    mismatches
}

fn set_delta(left: &[String], right: &[String]) -> Option<FieldDelta> {
    let left: BTreeSet<&str> = left.iter().map(String::as_str).collect();
    let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();

    let left_only: Vec<String> = left.difference(&right).map(|s| s.to_string()).collect();
    let right_only: Vec<String> = right.difference(&left).map(|s| s.to_string()).collect();

    if left_only.is_empty() && right_only.is_empty() {
        None
    } else {
        Some(FieldDelta::SetDiff {
            left_only,
            right_only,
        })
    }
}
