//! Error types for the CSV record source.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required column '{column}' in {source_name} (found: {found})")]
    MissingColumn {
        source_name: String,
        column: String,
        found: String,
    },

    #[error("Failed to read CSV from {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;
