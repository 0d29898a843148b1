//! Entity matching across two sources.

use std::collections::BTreeMap;

use muster_core::identity::{key_of, name_key_of};
use muster_core::{normalize_faction, SourceId, SourceRecord, UnitKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentity {
    pub source: SourceId,
    pub key: UnitKey,
}

#[derive(Debug)]
pub struct MatchResult {
    pub pairs: Vec<(SourceRecord, SourceRecord)>,
    pub only_left: Vec<SourceRecord>,
    pub only_right: Vec<SourceRecord>,
    /// Records shadowed by a later record with the same identity.
    pub duplicates: Vec<DuplicateIdentity>,
}

/// Partition two record sets into matched pairs and one-side-only sets.
///
/// Id-equality is tried first; name-equality is the fallback when either
/// side lacks an id. Duplicate identity within one side: the last record
/// wins for matching, earlier ones are reported, never silently dropped.
pub fn match_records(left: &[SourceRecord], right: &[SourceRecord]) -> MatchResult {
    let mut duplicates = Vec::new();
    let left = collapse_duplicates(left, &mut duplicates);
    let right = collapse_duplicates(right, &mut duplicates);

    // Right-side indexes. Keys are normalized, iteration order fixed.
    let mut by_id: BTreeMap<UnitKey, usize> = BTreeMap::new();
    let mut by_name: BTreeMap<UnitKey, usize> = BTreeMap::new();
    for (i, rec) in right.iter().enumerate() {
        if let Some(id) = &rec.id {
            by_id.insert(
                UnitKey {
                    faction: normalize_faction(&rec.faction),
                    ident: id.to_lowercase(),
                },
                i,
            );
        }
        by_name.insert(name_key_of(rec), i);
    }

    let mut consumed = vec![false; right.len()];
    let mut pairs = Vec::new();
    let mut only_left = Vec::new();

    for lrec in &left {
        let mut hit = None;

        if let Some(id) = &lrec.id {
            let key = UnitKey {
                faction: normalize_faction(&lrec.faction),
                ident: id.to_lowercase(),
            };
            if let Some(&ri) = by_id.get(&key) {
                if !consumed[ri] {
                    hit = Some(ri);
                }
            }
        }

        if hit.is_none() {
            if let Some(&ri) = by_name.get(&name_key_of(lrec)) {
                // Name fallback applies only when an id is missing on
                // either side; two differing ids never match by name.
                if !consumed[ri] && (lrec.id.is_none() || right[ri].id.is_none()) {
                    hit = Some(ri);
                }
            }
        }

        match hit {
            Some(ri) => {
                consumed[ri] = true;
                pairs.push((lrec.clone(), right[ri].clone()));
            }
            None => only_left.push(lrec.clone()),
        }
    }

    let only_right = right
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !consumed[*i])
        .map(|(_, rec)| rec)
        .collect();

    MatchResult {
        pairs,
        only_left,
        only_right,
        duplicates,
    }
}

/// Collapse same-key records within one side: last wins, earlier reported.
fn collapse_duplicates(
    records: &[SourceRecord],
    duplicates: &mut Vec<DuplicateIdentity>,
) -> Vec<SourceRecord> {
    let mut kept: Vec<SourceRecord> = Vec::with_capacity(records.len());
    let mut index: BTreeMap<UnitKey, usize> = BTreeMap::new();

    for rec in records {
        let key = key_of(rec);
        match index.get(&key) {
            Some(&i) => {
                duplicates.push(DuplicateIdentity {
                    source: rec.origin,
                    key,
                });
                kept[i] = rec.clone();
            }
            None => {
                index.insert(key, kept.len());
                kept.push(rec.clone());
            }
        }
    }

    kept
}
