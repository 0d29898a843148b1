//! Run the full reconciliation over pre-loaded snapshots.

use muster_core::{SourceId, SourceRecord};

use crate::classify::{classify_pair, Issue};
use crate::differ::diff_pair;
use crate::error::RowWarning;
use crate::matcher::match_records;
use crate::report::{compute_summary, ReconciliationReport, ReportMeta};

/// Compare the static tables against the store and flat-file snapshots and
/// return the classified report.
///
/// Pure and stateless: nothing is cached between runs, and identical
/// snapshots yield byte-identical reports. Pass `store: None` to skip the
/// static↔store pairing (offline validation).
pub fn reconcile(
    statics: &[SourceRecord],
    store: Option<&[SourceRecord]>,
    flatfile: &[SourceRecord],
    warnings: &[RowWarning],
) -> ReconciliationReport {
    let mut issues: Vec<Issue> = Vec::new();

    if let Some(store_records) = store {
        issues.extend(run_pair(statics, store_records, SourceId::Store));
    }
    issues.extend(run_pair(statics, flatfile, SourceId::FlatFile));

    issues.sort_by_cached_key(|i| (i.bucket.to_string(), i.key.clone(), i.detail.clone()));
    // The static side participates in both pairings; de-duplicate the
    // identical duplicate-identity entries it can contribute twice.
    issues.dedup();

    let summary = compute_summary(&issues);

    ReconciliationReport {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            static_records: statics.len(),
            store_records: store.map(<[SourceRecord]>::len),
            flatfile_records: flatfile.len(),
        },
        summary,
        issues,
        warnings: warnings.iter().map(RowWarning::to_string).collect(),
    }
}

fn run_pair(left: &[SourceRecord], right: &[SourceRecord], right_source: SourceId) -> Vec<Issue> {
    let result = match_records(left, right);
    let mut mismatches = Vec::new();
    for (l, r) in &result.pairs {
        mismatches.extend(diff_pair(l, r));
    }
    classify_pair(&result, &mismatches, SourceId::Static, right_source)
}
