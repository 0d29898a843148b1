//! `muster-core` — canonical unit-record model shared by every other crate.
//!
//! Each data source (static tables, record store, flat reference files) loads
//! into the one [`SourceRecord`] shape here, so downstream stages never
//! branch on origin.

pub mod identity;
pub mod model;
pub mod statics;

pub use identity::{key_of, normalize_faction, slugify, UnitKey};
pub use model::{Field, SourceId, SourceRecord};
pub use statics::{load_static, static_factions, StaticDef, STATIC_UNITS};
