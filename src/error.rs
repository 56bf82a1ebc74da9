// Pipeline error taxonomy
// Every failure is fatal: the run either yields one complete table or nothing

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {source_name} (found: {})", available.join(", "))]
    Schema {
        source_name: String,
        column: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' appears more than once in {source_name}")]
    AmbiguousColumn { source_name: String, column: String },

    #[error("Row at line {line} of {source_name} has {found} fields, header has {expected}")]
    TooManyFields {
        source_name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Unparseable release date '{value}' at merged row {row} (expected Mon-YY, e.g. Jan-15)")]
    Parse { row: usize, value: String },

    #[error("No female or male lead rows survived the joins; year range is undefined")]
    EmptyResult,
}

impl PipelineError {
    pub fn schema(source_name: &str, column: &str, available: &[String]) -> Self {
        PipelineError::Schema {
            source_name: source_name.to_string(),
            column: column.to_string(),
            available: available.to_vec(),
        }
    }

    /// Short machine-readable kind, logged when a run fails
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Io { .. } => "io",
            PipelineError::Csv { .. } | PipelineError::TooManyFields { .. } => "csv",
            PipelineError::Schema { .. } | PipelineError::AmbiguousColumn { .. } => "schema",
            PipelineError::Parse { .. } => "parse",
            PipelineError::EmptyResult => "empty_result",
        }
    }
}
