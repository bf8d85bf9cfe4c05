//! Incremental CSV output for normalized chunks.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Appends normalized frames to one CSV file, header first.
///
/// The header is taken from the first frame written; later frames must have
/// the same columns. Nothing is buffered beyond the frame being written.
pub struct StopFrameWriter {
    path: PathBuf,
    file: Option<File>,
    writer: Option<BatchedWriter<File>>,
    rows_written: usize,
}

impl StopFrameWriter {
    /// Create (or truncate) the output file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| IngestError::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            file: Some(file),
            writer: None,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn write(&mut self, df: &DataFrame) -> Result<()> {
        if self.writer.is_none() {
            if let Some(file) = self.file.take() {
                let writer = CsvWriter::new(file)
                    .include_header(true)
                    .batched(&df.schema())?;
                self.writer = Some(writer);
            }
        }
        if let Some(writer) = &mut self.writer {
            writer.write_batch(df)?;
            self.rows_written += df.height();
        }
        Ok(())
    }

    /// Flush the remaining output.
    pub fn finish(mut self) -> Result<usize> {
        if let Some(writer) = &mut self.writer {
            writer.finish()?;
        }
        debug!(
            path = %self.path.display(),
            rows = self.rows_written,
            "stop output finished"
        );
        Ok(self.rows_written)
    }
}
