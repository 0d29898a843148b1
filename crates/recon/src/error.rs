use std::fmt;

use muster_core::SourceId;

/// Fatal load failure. Aborts the whole run; no partial report is produced
/// from an incomplete load.
#[derive(Debug)]
pub struct LoadError {
    pub source: SourceId,
    pub cause: String,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} load failed: {}", self.source, self.cause)
    }
}

impl std::error::Error for LoadError {}

/// Non-fatal row-level parse failure. The row is skipped and the warning
/// carried alongside the report, so one bad line cannot block the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    pub line: usize,
    pub reason: String,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}
