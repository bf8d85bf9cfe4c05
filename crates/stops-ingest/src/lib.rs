//! Loading collaborator for traffic-stop batches.
//!
//! Reads stop files with Polars, forcing `county_fips` (and `officer_id`
//! when present) to text, reads large files forward in bounded chunks that
//! can be normalized independently, and appends normalized frames to CSV.

pub mod error;
pub mod loader;
pub mod reference;
pub mod streaming;
pub mod writer;

pub use error::{IngestError, Result};
pub use loader::{
    DEFAULT_CHUNK_SIZE, DEFAULT_INFER_SCHEMA_LENGTH, LoadOptions, read_csv_header,
    read_stop_file, scan_stop_file, write_stop_frame,
};
pub use reference::ReferenceDataset;
pub use streaming::StopChunkReader;
pub use writer::StopFrameWriter;
