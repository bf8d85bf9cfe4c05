//! Shared vocabulary for traffic-stop normalization.
//!
//! - **columns**: names of the columns the normalizer reads, writes and drops
//! - **schema**: tagged presence of optional columns in a batch
//! - **options**: normalization options and the missing-state policy
//! - **summary**: per-batch row accounting

pub mod columns;
pub mod options;
pub mod schema;
pub mod summary;

pub use columns::{
    COLUMN_RULES, ColumnRole, ColumnRule, DROPPED_COLUMNS, REQUIRED_COLUMNS, column_rule, is_pruned,
};
pub use options::{MissingStatePolicy, NormalizeOptions};
pub use schema::{ColumnPresence, StopSchema};
pub use summary::NormalizationSummary;
