//! Auxiliary reference datasets (e.g. population statistics).
//!
//! A reference dataset travels with the stop configuration so that later
//! consumers can join against it. Normalization itself never reads it.

use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDataset {
    path: PathBuf,
}

impl ReferenceDataset {
    /// Point at an existing CSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole dataset.
    pub fn load(&self) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .map_err(|err| IngestError::csv_parse(&self.path, &err))?
            .finish()
            .map_err(|err| IngestError::csv_parse(&self.path, &err))
    }
}
