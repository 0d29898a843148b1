//! Record-store client.
//!
//! Blocking reqwest client (no Tokio runtime required) for the hosted
//! structured store that holds unit records, plus the fix applicator that
//! pushes single-field corrections back with a stale-write guard.

pub mod apply;
pub mod client;

pub use apply::{apply_fix, record_field_value, verify_fix, ApplyError, FieldFix};
pub use client::{load_all, HttpStore, RecordPage, RecordStore, StoreError, StoreRow};
