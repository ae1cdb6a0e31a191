use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{table} table is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        table: TableKind,
        columns: Vec<String>,
    },
}

impl IngestError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Which input table an error or issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Subjects,
    Rules,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subjects => f.write_str("subject"),
            Self::Rules => f.write_str("dispensing rule"),
        }
    }
}

/// A data row that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestIssue {
    pub table: TableKind,
    /// 1-based line of the row in the source file.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} table line {}: {}", self.table, self.line, self.message)
    }
}
