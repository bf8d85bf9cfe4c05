//! Library side of the `stops` binary: logging setup and normalization runs.

pub mod logging;
pub mod pipeline;
