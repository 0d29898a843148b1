//! `muster-recon` — multi-source unit-data reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns a classified
//! report. No HTTP or store dependencies; the only I/O-adjacent piece is
//! the flat-file parser, which works on already-read text.

pub mod classify;
pub mod differ;
pub mod engine;
pub mod error;
pub mod flatfile;
pub mod matcher;
pub mod report;
pub mod synth;

pub use classify::{Bucket, Issue};
pub use differ::{diff_pair, FieldDelta, FieldMismatch};
pub use engine::reconcile;
pub use error::{LoadError, RowWarning};
pub use flatfile::{load_flat_file, FlatFileLoad, FlatFileOptions};
pub use matcher::{match_records, DuplicateIdentity, MatchResult};
pub use report::{ReconciliationReport, ReportMeta, ReportSummary};
pub use synth::{synthesize, SynthesizedFile};
