//! Whole-file loading and writing of stop tables.
//!
//! The header is inspected before any data is read so that structural
//! problems (a required column missing entirely) surface as
//! [`IngestError::MissingColumn`] instead of a parse failure deep inside
//! Polars.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stops_model::columns::{COUNTY_FIPS, OFFICER_ID};
use stops_model::REQUIRED_COLUMNS;

use crate::error::{IngestError, Result};

/// Default number of rows per streamed chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Default number of rows Polars inspects to infer column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Options for loading stop files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Maximum rows per chunk when streaming.
    /// Defaults to 1,000,000.
    pub chunk_size: usize,

    /// Rows sampled for dtype inference. `None` scans the whole file.
    pub infer_schema_length: Option<usize>,

    /// Low memory mode - trades performance for memory efficiency.
    /// Defaults to false.
    pub low_memory: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            infer_schema_length: Some(DEFAULT_INFER_SCHEMA_LENGTH),
            low_memory: false,
        }
    }
}

impl LoadOptions {
    /// Set the chunk size for streaming.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set how many rows are used for dtype inference.
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Enable low memory mode.
    pub fn with_low_memory(mut self, enabled: bool) -> Self {
        self.low_memory = enabled;
        self
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn lazy_reader(path: &Path) -> LazyCsvReader {
    let path_str = path.to_string_lossy();
    LazyCsvReader::new(PlPath::new(&path_str)).with_has_header(true)
}

/// Read the column names of a CSV file without loading any rows.
pub fn read_csv_header(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let mut lf = lazy_reader(path)
        .with_infer_schema_length(Some(0))
        .finish()
        .map_err(|err| IngestError::csv_parse(path, &err))?;
    let schema = lf
        .collect_schema()
        .map_err(|err| IngestError::csv_parse(path, &err))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

pub(crate) fn check_required_columns(path: &Path, headers: &[String]) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Columns whose dtype is forced to text: `county_fips` keeps its leading
/// zeros and `officer_id` keeps the identifier exactly as written.
pub(crate) fn text_overrides(headers: &[String]) -> SchemaRef {
    let mut schema = Schema::with_capacity(2);
    schema.with_column(COUNTY_FIPS.into(), DataType::String);
    if headers.iter().any(|header| header == OFFICER_ID) {
        schema.with_column(OFFICER_ID.into(), DataType::String);
    }
    Arc::new(schema)
}

/// Validate the header and return a lazy scan of a stop file.
///
/// Shared by [`read_stop_file`] and the chunked reader so both see the same
/// dtypes.
pub fn scan_stop_file(path: &Path, options: &LoadOptions) -> Result<LazyFrame> {
    let headers = read_csv_header(path)?;
    check_required_columns(path, &headers)?;
    debug!(
        path = %path.display(),
        column_count = headers.len(),
        "stop file header validated"
    );
    lazy_reader(path)
        .with_low_memory(options.low_memory)
        .with_infer_schema_length(options.infer_schema_length)
        .with_dtype_overwrite(Some(text_overrides(&headers)))
        .finish()
        .map_err(|err| IngestError::csv_parse(path, &err))
}

/// Read a whole stop file into memory.
pub fn read_stop_file(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let df = scan_stop_file(path, options)?
        .collect()
        .map_err(|err| IngestError::csv_parse(path, &err))?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "stop file loaded"
    );
    Ok(df)
}

/// Write a normalized frame as CSV with a header row.
pub fn write_stop_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
