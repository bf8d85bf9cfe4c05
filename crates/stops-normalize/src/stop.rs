//! Stop batch context.
//!
//! A [`StopBatch`] is configured with a [`StopSource`] and, optionally, a
//! pre-sliced chunk. [`StopBatch::load`] normalizes the chunk (or the whole
//! source file when no chunk was given) and keeps the result so downstream
//! consumers can read it.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::info;

use stops_ingest::{DEFAULT_CHUNK_SIZE, LoadOptions, ReferenceDataset, read_stop_file};
use stops_model::{NormalizationSummary, NormalizeOptions};

use crate::error::StopBatchError;
use crate::normalizer::normalize_stops;

/// Where stop data comes from and what travels with it.
#[derive(Debug, Clone)]
pub struct StopSource {
    /// Stop file path. Not needed when the batch is built from a chunk.
    pub path: Option<PathBuf>,
    /// Row-count threshold used by the loading collaborator when streaming.
    pub chunk_size: usize,
    /// Auxiliary dataset passed through for downstream joins.
    pub reference: Option<ReferenceDataset>,
}

impl Default for StopSource {
    fn default() -> Self {
        Self {
            path: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            reference: None,
        }
    }
}

impl StopSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_reference(mut self, reference: Option<ReferenceDataset>) -> Self {
        self.reference = reference;
        self
    }
}

/// One normalization unit and its result.
#[derive(Debug, Clone)]
pub struct StopBatch {
    source: StopSource,
    chunk: Option<DataFrame>,
    frame: Option<DataFrame>,
    summary: Option<NormalizationSummary>,
}

impl StopBatch {
    /// A batch that loads the whole source file.
    pub fn from_source(source: StopSource) -> Self {
        Self {
            source,
            chunk: None,
            frame: None,
            summary: None,
        }
    }

    /// A batch over a chunk already read by the caller.
    pub fn from_chunk(chunk: DataFrame, source: StopSource) -> Self {
        Self {
            chunk: Some(chunk),
            ..Self::from_source(source)
        }
    }

    /// Normalize the chunk, or the whole source file, and store the result.
    pub fn load(&mut self, options: &NormalizeOptions) -> Result<&DataFrame, StopBatchError> {
        let normalized = match &self.chunk {
            Some(chunk) => normalize_stops(chunk, options)?,
            None => {
                let path = self.source.path.as_deref().ok_or(StopBatchError::NoSource)?;
                let load_options = LoadOptions::default().with_chunk_size(self.source.chunk_size);
                let raw = read_stop_file(path, &load_options)?;
                info!(path = %path.display(), rows = raw.height(), "loaded stop file");
                normalize_stops(&raw, options)?
            }
        };
        self.summary = Some(normalized.summary);
        let frame: &DataFrame = self.frame.insert(normalized.frame);
        Ok(frame)
    }

    /// The normalized frame, once [`load`](Self::load) has succeeded.
    pub fn frame(&self) -> Option<&DataFrame> {
        self.frame.as_ref()
    }

    /// Take ownership of the normalized frame.
    pub fn into_frame(self) -> Option<DataFrame> {
        self.frame
    }

    pub fn summary(&self) -> Option<&NormalizationSummary> {
        self.summary.as_ref()
    }

    pub fn reference(&self) -> Option<&ReferenceDataset> {
        self.source.reference.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.source.path.as_deref()
    }

    pub fn chunk_size(&self) -> usize {
        self.source.chunk_size
    }
}
