//! Traffic-stop normalization.
//!
//! This crate turns a raw stop batch into a privacy-reduced table:
//!
//! - **normalizer**: the filter-then-transform pipeline over one batch
//! - **stop**: [`StopBatch`], which loads a source (or takes a chunk),
//!   normalizes it and keeps the result for downstream consumers
//! - **error**: error types for both

pub mod error;
pub mod normalizer;
pub mod stop;

pub use error::{NormalizeError, Result, StopBatchError};
pub use normalizer::{NormalizedBatch, normalize_stops};
pub use stop::{StopBatch, StopSource};
