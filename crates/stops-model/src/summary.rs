//! Row accounting for a normalized batch.

use serde::{Deserialize, Serialize};

use crate::schema::ColumnPresence;

/// Counts describing what normalization did to one batch (or, after
/// [`merge`](NormalizationSummary::merge), to several).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationSummary {
    /// Rows in the input batch.
    pub input_rows: usize,
    /// Rows removed because `county_fips` was null.
    pub dropped_missing_county_fips: usize,
    /// Rows removed because `driver_race` was null (after the county filter).
    pub dropped_missing_driver_race: usize,
    /// Rows removed by [`MissingStatePolicy::DropRow`](crate::MissingStatePolicy::DropRow).
    pub dropped_missing_state: usize,
    /// Rows in the normalized batch.
    pub output_rows: usize,
    /// Rows that received a non-empty `state_officer_id`.
    pub officer_keys: usize,
    /// Rows with an officer id but no state.
    pub keys_without_state: usize,
    /// Whether any merged batch carried an `officer_id` column.
    pub officer_id: ColumnPresence,
}

impl NormalizationSummary {
    /// Total rows removed by any filter.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_missing_county_fips
            + self.dropped_missing_driver_race
            + self.dropped_missing_state
    }

    /// Returns true when every input row is either kept or counted as dropped.
    pub fn is_balanced(&self) -> bool {
        self.input_rows == self.output_rows + self.dropped_rows()
    }

    /// Fold another summary into this one. Order of merging does not matter.
    pub fn merge(&mut self, other: &NormalizationSummary) {
        self.input_rows += other.input_rows;
        self.dropped_missing_county_fips += other.dropped_missing_county_fips;
        self.dropped_missing_driver_race += other.dropped_missing_driver_race;
        self.dropped_missing_state += other.dropped_missing_state;
        self.output_rows += other.output_rows;
        self.officer_keys += other.officer_keys;
        self.keys_without_state += other.keys_without_state;
        if other.officer_id.is_present() {
            self.officer_id = ColumnPresence::Present;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(input: usize, fips: usize, race: usize, keys: usize) -> NormalizationSummary {
        NormalizationSummary {
            input_rows: input,
            dropped_missing_county_fips: fips,
            dropped_missing_driver_race: race,
            output_rows: input - fips - race,
            officer_keys: keys,
            ..NormalizationSummary::default()
        }
    }

    #[test]
    fn merge_sums_counts() {
        let mut total = chunk(10, 2, 1, 7);
        total.merge(&chunk(5, 0, 1, 0));

        assert_eq!(total.input_rows, 15);
        assert_eq!(total.output_rows, 11);
        assert_eq!(total.dropped_rows(), 4);
        assert_eq!(total.officer_keys, 7);
        assert!(total.is_balanced());
    }

    #[test]
    fn merge_keeps_officer_presence() {
        let mut total = NormalizationSummary::default();
        let mut with_officer = chunk(1, 0, 0, 1);
        with_officer.officer_id = ColumnPresence::Present;

        total.merge(&with_officer);
        total.merge(&chunk(1, 0, 0, 0));

        assert_eq!(total.officer_id, ColumnPresence::Present);
    }
}
