//! Configuration options for stop normalization.

use serde::{Deserialize, Serialize};

/// What to do with a row that has an officer id but no state.
///
/// Without a state the officer key cannot be made unique across states, so
/// the row either keeps an empty key or is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingStatePolicy {
    /// Keep the row with an empty `state_officer_id`.
    #[default]
    LeaveEmpty,
    /// Remove the row from the normalized batch.
    DropRow,
}

/// Options applied to every normalized batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Handling of rows with an officer id and a null state.
    pub missing_state: MissingStatePolicy,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_state(mut self, policy: MissingStatePolicy) -> Self {
        self.missing_state = policy;
        self
    }
}
