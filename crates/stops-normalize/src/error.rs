//! Error types for stop normalization.

use thiserror::Error;

use stops_ingest::IngestError;

/// Errors raised while normalizing a batch.
///
/// Rows with missing values are never errors; they are filtered and counted.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The batch does not carry a required column at all.
    #[error("stop batch is missing required column '{column}'")]
    MissingColumn { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for NormalizeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Errors raised by [`StopBatch::load`](crate::StopBatch::load).
#[derive(Debug, Error)]
pub enum StopBatchError {
    /// Neither a chunk nor a source path was configured.
    #[error("no stop file path or chunk configured")]
    NoSource,

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, NormalizeError>;
