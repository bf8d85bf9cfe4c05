//! Structural shape of a stop batch.
//!
//! The presence of optional columns is captured once, up front, so that
//! downstream steps branch on a tag instead of probing column names.

use serde::{Deserialize, Serialize};

use crate::columns::{COUNTY_FIPS, DRIVER_RACE, OFFICER_ID, REQUIRED_COLUMNS, STATE};

/// Whether a column exists in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnPresence {
    Present,
    #[default]
    Absent,
}

impl ColumnPresence {
    pub fn is_present(self) -> bool {
        matches!(self, ColumnPresence::Present)
    }

    fn of<'a>(mut names: impl Iterator<Item = &'a str>, column: &str) -> Self {
        if names.any(|name| name == column) {
            ColumnPresence::Present
        } else {
            ColumnPresence::Absent
        }
    }
}

/// Presence of every column normalization depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSchema {
    pub county_fips: ColumnPresence,
    pub driver_race: ColumnPresence,
    pub state: ColumnPresence,
    pub officer_id: ColumnPresence,
}

impl StopSchema {
    /// Build the schema from a batch's column names.
    pub fn from_columns<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let names = names.into_iter();
        Self {
            county_fips: ColumnPresence::of(names.clone(), COUNTY_FIPS),
            driver_race: ColumnPresence::of(names.clone(), DRIVER_RACE),
            state: ColumnPresence::of(names.clone(), STATE),
            officer_id: ColumnPresence::of(names, OFFICER_ID),
        }
    }

    /// Required columns that are structurally missing, in declaration order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .zip([self.county_fips, self.driver_race, self.state])
            .filter(|(_, presence)| !presence.is_present())
            .map(|(name, _)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_optional_officer_id() {
        let with = StopSchema::from_columns(["county_fips", "driver_race", "state", "officer_id"]);
        assert_eq!(with.officer_id, ColumnPresence::Present);
        assert!(with.missing_required().is_empty());

        let without = StopSchema::from_columns(["county_fips", "driver_race", "state"]);
        assert_eq!(without.officer_id, ColumnPresence::Absent);
    }

    #[test]
    fn reports_missing_required_columns() {
        let schema = StopSchema::from_columns(["driver_race", "officer_id"]);
        assert_eq!(schema.missing_required(), vec!["county_fips", "state"]);
    }
}
