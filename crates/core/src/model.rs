use serde::Serialize;

// ---------------------------------------------------------------------------
// Source origins
// ---------------------------------------------------------------------------

/// Where a record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Static,
    Store,
    FlatFile,
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Store => write!(f, "store"),
            Self::FlatFile => write!(f, "flatfile"),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical record
// ---------------------------------------------------------------------------

/// A unit definition normalized from any source.
///
/// Loaders convert their native shape into this immediately; nothing
/// downstream branches on `origin`. Optional numeric fields default to 0 and
/// optional collections to empty, so "absent" and "empty" compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub origin: SourceId,
    /// Stable identifier. Reliable when present; static and flat-file
    /// sources do not always supply one.
    pub id: Option<String>,
    pub name: String,
    /// Faction label as the source spells it (not yet normalized).
    pub faction: String,
    pub points: u32,
    pub availability: u32,
    pub command: u32,
    pub high_command: bool,
    /// Set semantics for equality; source order preserved for display and
    /// code generation.
    pub keywords: Vec<String>,
    pub special_rules: Vec<String>,
}

// ---------------------------------------------------------------------------
// Diffable fields
// ---------------------------------------------------------------------------

/// The closed set of semantic fields the differ tracks and the fix
/// applicator can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Points,
    Availability,
    Command,
    HighCommand,
    Keywords,
    SpecialRules,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Points,
        Field::Availability,
        Field::Command,
        Field::HighCommand,
        Field::Keywords,
        Field::SpecialRules,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Points => "points",
            Self::Availability => "availability",
            Self::Command => "command",
            Self::HighCommand => "high_command",
            Self::Keywords => "keywords",
            Self::SpecialRules => "special_rules",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "points" => Ok(Self::Points),
            "availability" => Ok(Self::Availability),
            "command" => Ok(Self::Command),
            "high_command" => Ok(Self::HighCommand),
            "keywords" => Ok(Self::Keywords),
            "special_rules" => Ok(Self::SpecialRules),
            other => Err(format!("unknown field: {other}")),
        }
    }
}
