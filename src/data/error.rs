use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a file into a [`Dataset`].
///
/// Loading is all-or-nothing: any of these aborts the load and no partial
/// dataset is produced.
///
/// [`Dataset`]: super::model::Dataset
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet file: {0}")]
    Parquet(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    /// `row` is 1-based over data rows (the header is not counted).
    #[error("row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        reason: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl From<parquet::errors::ParquetError> for DataLoadError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        DataLoadError::Parquet(e.to_string())
    }
}

impl From<arrow::error::ArrowError> for DataLoadError {
    fn from(e: arrow::error::ArrowError) -> Self {
        DataLoadError::Parquet(e.to_string())
    }
}
