//! Single-field fix application with a stale-write guard.
//!
//! One field of one record per call — never a bulk operation. The target is
//! re-read before writing; if the live value no longer matches what was
//! captured when the mismatch was detected, the write is refused so a
//! concurrent edit is never overwritten blindly.

use muster_core::{Field, SourceRecord, UnitKey};
use serde_json::Value;

use crate::client::{RecordStore, StoreError, StoreRow};

/// One accepted mismatch, ready to apply.
#[derive(Debug, Clone)]
pub struct FieldFix {
    pub record_id: String,
    pub key: UnitKey,
    pub field: Field,
    /// Store-side value captured when the mismatch was detected.
    pub observed: Value,
    /// Value to write (normally the static side of the mismatch).
    pub desired: Value,
}

#[derive(Debug)]
pub enum ApplyError {
    /// The live value moved since the mismatch was detected — a concurrent
    /// edit happened. Reload and re-derive before retrying.
    Stale {
        key: UnitKey,
        field: Field,
        expected: Value,
        found: Value,
    },
    Store(StoreError),
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stale {
                key,
                field,
                expected,
                found,
            } => write!(
                f,
                "stale mismatch for {key} {field}: expected {expected}, store now has {found}"
            ),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApplyError {}

/// Apply one fix. Re-reads the record, refuses to write when stale, and
/// otherwise issues exactly one field update. Callers re-run the matcher
/// and differ afterwards to confirm convergence rather than trusting the
/// write.
pub fn apply_fix<S: RecordStore>(store: &S, table: &str, fix: &FieldFix) -> Result<(), ApplyError> {
    let row = store
        .fetch_record(table, &fix.record_id)
        .map_err(ApplyError::Store)?;

    let live = row_field_value(&row, fix.field);
    if !values_match(fix.field, &live, &fix.observed) {
        return Err(ApplyError::Stale {
            key: fix.key.clone(),
            field: fix.field,
            expected: fix.observed.clone(),
            found: live,
        });
    }

    store
        .update_field(table, &fix.record_id, fix.field.as_str(), &fix.desired)
        .map_err(ApplyError::Store)
}

/// Re-read the record and report whether the field now holds the desired
/// value.
pub fn verify_fix<S: RecordStore>(
    store: &S,
    table: &str,
    fix: &FieldFix,
) -> Result<bool, StoreError> {
    let row = store.fetch_record(table, &fix.record_id)?;
    Ok(values_match(fix.field, &row_field_value(&row, fix.field), &fix.desired))
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// JSON value of one field of a store row.
pub fn row_field_value(row: &StoreRow, field: Field) -> Value {
    match field {
        Field::Name => Value::from(row.name.clone()),
        Field::Points => Value::from(row.points),
        Field::Availability => Value::from(row.availability),
        Field::Command => Value::from(row.command),
        Field::HighCommand => Value::from(row.high_command),
        Field::Keywords => Value::from(row.keywords.clone()),
        Field::SpecialRules => Value::from(row.special_rules.clone()),
    }
}

/// JSON value of one field of a canonical record (used to build fixes).
pub fn record_field_value(record: &SourceRecord, field: Field) -> Value {
    match field {
        Field::Name => Value::from(record.name.clone()),
        Field::Points => Value::from(record.points),
        Field::Availability => Value::from(record.availability),
        Field::Command => Value::from(record.command),
        Field::HighCommand => Value::from(record.high_command),
        Field::Keywords => Value::from(record.keywords.clone()),
        Field::SpecialRules => Value::from(record.special_rules.clone()),
    }
}

/// Collection fields compare as sets; everything else compares exactly.
fn values_match(field: Field, a: &Value, b: &Value) -> bool {
    match field {
        Field::Keywords | Field::SpecialRules => as_sorted_set(a) == as_sorted_set(b),
        _ => a == b,
    }
}

fn as_sorted_set(value: &Value) -> Vec<String> {
    let mut items: Vec<String> = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    items.sort();
    items.dedup();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecordPage;
    use std::cell::RefCell;

    /// In-memory store double.
    struct FakeStore {
        rows: RefCell<Vec<StoreRow>>,
        updates: RefCell<Vec<(String, String)>>,
    }

    impl FakeStore {
        fn with_row(row: StoreRow) -> Self {
            Self {
                rows: RefCell::new(vec![row]),
                updates: RefCell::new(Vec::new()),
            }
        }
    }

    impl RecordStore for FakeStore {
        fn list_page(&self, _table: &str, _offset: Option<&str>) -> Result<RecordPage, StoreError> {
            Ok(RecordPage {
                rows: self.rows.borrow().clone(),
                next_offset: None,
            })
        }

        fn fetch_record(&self, _table: &str, id: &str) -> Result<StoreRow, StoreError> {
            self.rows
                .borrow()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        }

        fn update_field(
            &self,
            _table: &str,
            id: &str,
            field: &str,
            value: &Value,
        ) -> Result<(), StoreError> {
            self.updates
                .borrow_mut()
                .push((field.to_string(), value.to_string()));
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            match field {
                "points" => row.points = value.as_u64().unwrap_or(0) as u32,
                "name" => row.name = value.as_str().unwrap_or_default().to_string(),
                _ => {}
            }
            Ok(())
        }
    }

    fn row(points: u32) -> StoreRow {
        StoreRow {
            id: "rec_wrathmane".into(),
            name: "Wrathmane".into(),
            faction: "northern-tribes".into(),
            points,
            availability: 1,
            command: 0,
            high_command: true,
            keywords: vec!["Beast".into()],
            special_rules: vec![],
        }
    }

    fn fix(observed: u32, desired: u32) -> FieldFix {
        FieldFix {
            record_id: "rec_wrathmane".into(),
            key: UnitKey {
                faction: "northern-tribes".into(),
                ident: "wrathmane".into(),
            },
            field: Field::Points,
            observed: Value::from(observed),
            desired: Value::from(desired),
        }
    }

    #[test]
    fn apply_writes_when_value_unchanged() {
        let store = FakeStore::with_row(row(35));
        apply_fix(&store, "units", &fix(35, 30)).unwrap();
        assert_eq!(
            store.updates.borrow().as_slice(),
            &[("points".to_string(), "30".to_string())]
        );
        assert!(verify_fix(&store, "units", &fix(35, 30)).unwrap());
    }

    #[test]
    fn concurrent_edit_is_stale_not_overwritten() {
        // Mismatch captured points=35, but someone already changed it to 40.
        let store = FakeStore::with_row(row(40));
        let err = apply_fix(&store, "units", &fix(35, 30)).unwrap_err();
        match err {
            ApplyError::Stale { expected, found, .. } => {
                assert_eq!(expected, Value::from(35));
                assert_eq!(found, Value::from(40));
            }
            other => panic!("expected stale, got {other:?}"),
        }
        assert!(store.updates.borrow().is_empty(), "no write on stale");
    }

    #[test]
    fn missing_record_is_a_store_error() {
        let store = FakeStore::with_row(row(35));
        let mut f = fix(35, 30);
        f.record_id = "rec_gone".into();
        let err = apply_fix(&store, "units", &f).unwrap_err();
        assert!(matches!(err, ApplyError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn collection_values_compare_as_sets() {
        let a = Value::from(vec!["B".to_string(), "A".to_string()]);
        let b = Value::from(vec!["A".to_string(), "B".to_string(), "B".to_string()]);
        assert!(values_match(Field::Keywords, &a, &b));
        assert!(!values_match(
            Field::Keywords,
            &a,
            &Value::from(vec!["A".to_string()])
        ));
    }

    #[test]
    fn verify_reports_unconverged_value() {
        let store = FakeStore::with_row(row(35));
        assert!(!verify_fix(&store, "units", &fix(35, 30)).unwrap());
    }
}
