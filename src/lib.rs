// Lead Counts - Core Library
// Exposes the pipeline for the dashboard server, the terminal preview, and tests

pub mod error;
pub mod config;
pub mod logging;
pub mod table;
pub mod records;
pub mod release;
pub mod join;
pub mod counts;
pub mod pipeline;
pub mod chart;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use config::Config;
pub use table::{normalize_column_name, RawTable};
pub use records::{CharacterRecord, GameRecord, Gender, Relevance, SexualizationRecord};
pub use release::{parse_release, release_year};
pub use join::{inner_join, merge_records, MergedRecord};
pub use counts::{count_by_year, LeadCategory, LeadCountRow, YearlyLeadCounts};
pub use pipeline::{LeadCountPipeline, PipelineOutput, PipelineStats, Sources};
pub use chart::{ChartSpec, Figure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
