//! Report shapes returned to the caller.
//!
//! The engine returns the report by value and keeps no reference; output is
//! fully deterministic (ordered maps, sorted issues, no clock reads) so the
//! same snapshots always serialize byte-identically.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::Issue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub static_records: usize,
    /// `None` when the run was offline and the store pairing was skipped.
    pub store_records: Option<usize>,
    pub flatfile_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Sum across all buckets — the single validation pass/fail number.
    pub total_issues: usize,
    pub passed: bool,
    pub bucket_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub issues: Vec<Issue>,
    /// Row-level flat-file warnings, carried alongside the issues.
    pub warnings: Vec<String>,
}

/// Compute summary statistics from classified issues.
pub fn compute_summary(issues: &[Issue]) -> ReportSummary {
    let mut bucket_counts: BTreeMap<String, usize> = BTreeMap::new();
    for issue in issues {
        *bucket_counts.entry(issue.bucket.to_string()).or_insert(0) += 1;
    }
    ReportSummary {
        total_issues: issues.len(),
        passed: issues.is_empty(),
        bucket_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Bucket;
    use muster_core::{SourceId, UnitKey};

    fn issue(bucket: Bucket) -> Issue {
        Issue {
            bucket,
            key: UnitKey {
                faction: "northern-tribes".into(),
                ident: "wrathmane".into(),
            },
            detail: String::new(),
        }
    }

    #[test]
    fn summary_counts() {
        let issues = vec![
            issue(Bucket::PointsConflict),
            issue(Bucket::PointsConflict),
            issue(Bucket::MissingIn(SourceId::Static)),
        ];
        let summary = compute_summary(&issues);
        assert_eq!(summary.total_issues, 3);
        assert!(!summary.passed);
        assert_eq!(summary.bucket_counts["points_conflict"], 2);
        assert_eq!(summary.bucket_counts["missing_in_static"], 1);
    }

    #[test]
    fn empty_run_passes() {
        let summary = compute_summary(&[]);
        assert!(summary.passed);
        assert_eq!(summary.total_issues, 0);
    }
}
