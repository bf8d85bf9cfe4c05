//! Chunked reading of large stop files.
//!
//! The file is parsed forward once with Polars' batched CSV reader. Parsed
//! batches are buffered only until a full chunk can be cut, so at most one
//! chunk plus one parse batch is held in memory.
//!
//! # Usage
//!
//! ```ignore
//! use stops_ingest::{LoadOptions, StopChunkReader};
//!
//! let options = LoadOptions::default().with_chunk_size(250_000);
//! for chunk in StopChunkReader::new(&path, &options)? {
//!     let chunk = chunk?;
//!     // normalize chunk
//! }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::loader::{
    LoadOptions, check_required_columns, read_csv_header, scan_stop_file, text_overrides,
};

/// Upper bound on rows per parse batch, independent of the chunk size.
const MAX_PARSE_BATCH_ROWS: usize = 1 << 16;

/// Iterator over bounded-size chunks of a stop file.
///
/// Every chunk except the last has exactly `chunk_size` rows. A file with a
/// header but no rows yields exactly one empty chunk so that callers still
/// see the column set.
pub struct StopChunkReader {
    path: PathBuf,
    batches: OwnedBatchedCsvReader,
    /// Zero-row frame with the file's columns, for header-only files.
    empty: DataFrame,
    pending: Option<DataFrame>,
    chunk_size: usize,
    rows_read: usize,
    chunks_read: usize,
    exhausted: bool,
    finished: bool,
}

impl StopChunkReader {
    /// Validate the file header and open a forward-only batched reader.
    pub fn new(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        if options.chunk_size == 0 {
            return Err(IngestError::InvalidChunkSize { size: 0 });
        }
        let path = path.as_ref().to_path_buf();
        let headers = read_csv_header(&path)?;
        check_required_columns(&path, &headers)?;

        let empty = scan_stop_file(&path, options)?
            .limit(0)
            .collect()
            .map_err(|err| IngestError::csv_parse(&path, &err))?;

        let file = File::open(&path).map_err(|source| IngestError::FileRead {
            path: path.clone(),
            source,
        })?;
        let handle: Box<dyn MmapBytesReader> = Box::new(file);
        let batches = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(options.infer_schema_length)
            .with_low_memory(options.low_memory)
            .with_schema_overwrite(Some(text_overrides(&headers)))
            .with_chunk_size(options.chunk_size.min(MAX_PARSE_BATCH_ROWS))
            .into_reader_with_file_handle(handle)
            .batched(None)
            .map_err(|err| IngestError::csv_parse(&path, &err))?;

        Ok(Self {
            path,
            batches,
            empty,
            pending: None,
            chunk_size: options.chunk_size,
            rows_read: 0,
            chunks_read: 0,
            exhausted: false,
            finished: false,
        })
    }

    /// Rows handed out so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Chunks handed out so far.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    fn pending_rows(&self) -> usize {
        self.pending.as_ref().map_or(0, DataFrame::height)
    }

    /// Parse batches until a full chunk is buffered or the file ends.
    fn fill(&mut self) -> Result<()> {
        while !self.exhausted && self.pending_rows() < self.chunk_size {
            let batch = self
                .batches
                .next_batches(1)
                .map_err(|err| IngestError::csv_parse(&self.path, &err))?;
            let Some(frames) = batch.filter(|frames| !frames.is_empty()) else {
                self.exhausted = true;
                break;
            };
            for frame in frames {
                match &mut self.pending {
                    Some(pending) => {
                        pending.vstack_mut(&frame)?;
                    }
                    None => self.pending = Some(frame),
                }
            }
        }
        Ok(())
    }

    /// Cut the next chunk from the buffer. `None` once the file is drained.
    fn take_chunk(&mut self) -> Option<DataFrame> {
        let pending = self.pending.take()?;
        if pending.height() > self.chunk_size {
            let offset = i64::try_from(self.chunk_size).unwrap_or(i64::MAX);
            let (chunk, rest) = pending.split_at(offset);
            self.pending = Some(rest);
            Some(chunk)
        } else if pending.height() == 0 {
            None
        } else {
            Some(pending)
        }
    }
}

impl Iterator for StopChunkReader {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Err(err) = self.fill() {
            self.finished = true;
            return Some(Err(err));
        }
        let chunk = match self.take_chunk() {
            Some(chunk) => chunk,
            None if self.chunks_read == 0 => self.empty.clone(),
            None => {
                self.finished = true;
                return None;
            }
        };
        let height = chunk.height();
        if self.exhausted && self.pending_rows() == 0 {
            self.finished = true;
        }
        self.rows_read += height;
        self.chunks_read += 1;
        debug!(
            path = %self.path.display(),
            chunk = self.chunks_read,
            rows = height,
            "read stop chunk"
        );
        Some(Ok(chunk))
    }
}
