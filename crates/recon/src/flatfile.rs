//! Flat reference-file parsing.
//!
//! Delimited text, one header row. The schema table below maps header names
//! to canonical fields; unrecognized columns are ignored and missing
//! optional columns default to absent/zero. Row-level failures are skipped
//! with a warning — best-effort ingestion of reference data, not strict
//! validation. Only a missing required column or unreadable input is fatal.

use muster_core::{SourceId, SourceRecord};

use crate::error::{LoadError, RowWarning};

// ---------------------------------------------------------------------------
// Schema table
// ---------------------------------------------------------------------------

const COL_ID: &str = "id";
const COL_NAME: &str = "name";
const COL_FACTION: &str = "faction";
const COL_POINTS: &str = "points";
const COL_KEYWORDS: &str = "keywords";
const COL_AVAILABILITY: &str = "availability";
const COL_COMMAND: &str = "command";
const COL_HIGH_COMMAND: &str = "high_command";
const COL_SPECIAL_RULES: &str = "special_rules";

const REQUIRED_COLUMNS: &[&str] = &[COL_NAME, COL_FACTION, COL_POINTS];

// ---------------------------------------------------------------------------
// Options + output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FlatFileOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Delimiter inside sub-list columns (keywords, special rules).
    pub list_delimiter: char,
}

impl Default for FlatFileOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            list_delimiter: '|',
        }
    }
}

#[derive(Debug)]
pub struct FlatFileLoad {
    pub records: Vec<SourceRecord>,
    pub warnings: Vec<RowWarning>,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Parse flat-file text into canonical records.
pub fn load_flat_file(data: &str, opts: &FlatFileOptions) -> Result<FlatFileLoad, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(opts.delimiter)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| fatal(format!("cannot read header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let idx = |name: &str| headers.iter().position(|h| h == name);

    for col in REQUIRED_COLUMNS {
        if idx(col).is_none() {
            return Err(fatal(format!("missing required column '{col}'")));
        }
    }

    let name_idx = idx(COL_NAME).unwrap();
    let faction_idx = idx(COL_FACTION).unwrap();
    let points_idx = idx(COL_POINTS).unwrap();
    let id_idx = idx(COL_ID);
    let keywords_idx = idx(COL_KEYWORDS);
    let availability_idx = idx(COL_AVAILABILITY);
    let command_idx = idx(COL_COMMAND);
    let high_command_idx = idx(COL_HIGH_COMMAND);
    let special_rules_idx = idx(COL_SPECIAL_RULES);

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (i, row) in reader.records().enumerate() {
        // Header is line 1.
        let line = i + 2;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warnings.push(RowWarning {
                    line,
                    reason: format!("unparseable row: {e}"),
                });
                continue;
            }
        };

        let field = |idx: usize| row.get(idx).unwrap_or("").trim();

        let name = field(name_idx);
        if name.is_empty() {
            warnings.push(RowWarning {
                line,
                reason: "empty name".into(),
            });
            continue;
        }

        let faction = field(faction_idx);
        if faction.is_empty() {
            warnings.push(RowWarning {
                line,
                reason: "empty faction".into(),
            });
            continue;
        }

        let points = match parse_count(field(points_idx)) {
            Some(n) => n,
            None => {
                warnings.push(RowWarning {
                    line,
                    reason: format!("non-numeric points {:?}", field(points_idx)),
                });
                continue;
            }
        };

        let availability = match optional_count(&row, availability_idx) {
            Ok(n) => n,
            Err(value) => {
                warnings.push(RowWarning {
                    line,
                    reason: format!("non-numeric availability {value:?}"),
                });
                continue;
            }
        };

        let command = match optional_count(&row, command_idx) {
            Ok(n) => n,
            Err(value) => {
                warnings.push(RowWarning {
                    line,
                    reason: format!("non-numeric command {value:?}"),
                });
                continue;
            }
        };

        let high_command = match parse_flag(high_command_idx.map(|idx| field(idx))) {
            Some(flag) => flag,
            None => {
                warnings.push(RowWarning {
                    line,
                    reason: format!(
                        "bad high_command flag {:?}",
                        high_command_idx.map(|idx| field(idx)).unwrap_or("")
                    ),
                });
                continue;
            }
        };

        let id = id_idx
            .map(|idx| field(idx))
            .filter(|v| !v.is_empty())
            .map(String::from);

        records.push(SourceRecord {
            origin: SourceId::FlatFile,
            id,
            name: name.to_string(),
            faction: faction.to_string(),
            points,
            availability,
            command,
            high_command,
            keywords: split_list(keywords_idx.map(|idx| field(idx)), opts.list_delimiter),
            special_rules: split_list(
                special_rules_idx.map(|idx| field(idx)),
                opts.list_delimiter,
            ),
        });
    }

    Ok(FlatFileLoad { records, warnings })
}

fn fatal(cause: String) -> LoadError {
    LoadError {
        source: SourceId::FlatFile,
        cause,
    }
}

fn parse_count(value: &str) -> Option<u32> {
    value.parse().ok()
}

/// Optional numeric column: absent column or empty cell means zero,
/// anything else must parse.
fn optional_count(row: &csv::StringRecord, idx: Option<usize>) -> Result<u32, String> {
    let value = match idx.and_then(|i| row.get(i)) {
        Some(v) => v.trim(),
        None => return Ok(0),
    };
    if value.is_empty() {
        return Ok(0);
    }
    parse_count(value).ok_or_else(|| value.to_string())
}

/// Boolean column: absent/empty means false. Accepts the spellings the
/// export tool has been seen to produce.
fn parse_flag(cell: Option<&str>) -> Option<bool> {
    let value = match cell {
        Some(v) => v.trim(),
        None => return Some(false),
    };
    match value.to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}

fn split_list(cell: Option<&str>, delimiter: char) -> Vec<String> {
    match cell {
        Some(cell) => cell
            .split(delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_basic() {
        let data = "\
id,name,faction,points,keywords,availability,command,high_command,special_rules
wrathmane,Wrathmane,Northern Tribes,35,Beast|Character,1,0,true,Fearless
,Frostborn Raiders,Northern Tribes,20,Infantry,3,,,Ambusher
";
        let load = load_flat_file(data, &FlatFileOptions::default()).unwrap();
        assert!(load.warnings.is_empty());
        assert_eq!(load.records.len(), 2);

        let first = &load.records[0];
        assert_eq!(first.origin, SourceId::FlatFile);
        assert_eq!(first.id.as_deref(), Some("wrathmane"));
        assert_eq!(first.points, 35);
        assert!(first.high_command);
        assert_eq!(first.keywords, vec!["Beast", "Character"]);

        let second = &load.records[1];
        assert_eq!(second.id, None);
        assert_eq!(second.command, 0);
        assert!(!second.high_command);
    }

    #[test]
    fn bad_rows_skipped_with_warnings() {
        let data = "\
name,faction,points
Wrathmane,Northern Tribes,35
Frostborn Raiders,Northern Tribes,twenty
,Northern Tribes,10
Icefang Pack,Northern Tribes,25
";
        let load = load_flat_file(data, &FlatFileOptions::default()).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.warnings.len(), 2);
        assert_eq!(load.warnings[0].line, 3);
        assert!(load.warnings[0].reason.contains("twenty"));
        assert_eq!(load.warnings[1].line, 4);
        assert!(load.warnings[1].reason.contains("empty name"));
    }

    #[test]
    fn wrong_column_count_skipped() {
        let data = "\
name,faction,points
Wrathmane,Northern Tribes,35
Frostborn Raiders,Northern Tribes
";
        let load = load_flat_file(data, &FlatFileOptions::default()).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.warnings.len(), 1);
        assert_eq!(load.warnings[0].line, 3);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let data = "name,faction\nWrathmane,Northern Tribes\n";
        let err = load_flat_file(data, &FlatFileOptions::default()).unwrap_err();
        assert_eq!(err.source, SourceId::FlatFile);
        assert!(err.cause.contains("'points'"));
    }

    #[test]
    fn unrecognized_columns_ignored() {
        let data = "\
name,faction,points,artist
Wrathmane,Northern Tribes,35,someone
";
        let load = load_flat_file(data, &FlatFileOptions::default()).unwrap();
        assert_eq!(load.records.len(), 1);
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn semicolon_delimiter() {
        let data = "\
name;faction;points;keywords
Wrathmane;Northern Tribes;35;Beast|Character
";
        let opts = FlatFileOptions {
            delimiter: b';',
            ..FlatFileOptions::default()
        };
        let load = load_flat_file(data, &opts).unwrap();
        assert_eq!(load.records[0].keywords, vec!["Beast", "Character"]);
    }
}
