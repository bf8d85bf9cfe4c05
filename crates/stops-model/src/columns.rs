//! Column vocabulary for traffic-stop batches.
//!
//! Only the columns listed here are touched by normalization; every other
//! source column passes through unchanged.

use serde::{Deserialize, Serialize};

/// County-level jurisdiction identifier. Loaded as text to keep leading zeros.
pub const COUNTY_FIPS: &str = "county_fips";
/// Free-text race label of the driver.
pub const DRIVER_RACE: &str = "driver_race";
/// Jurisdiction (state) code.
pub const STATE: &str = "state";
/// Raw officer identifier, unique only within one state's numbering scheme.
pub const OFFICER_ID: &str = "officer_id";
/// Synthesized officer key, unique across states.
pub const STATE_OFFICER_ID: &str = "state_officer_id";

pub const LOCATION_RAW: &str = "location_raw";
pub const COUNTY_NAME: &str = "county_name";
pub const DRIVER_RACE_RAW: &str = "driver_race_raw";

/// Columns a batch must carry structurally (values may still be null).
pub const REQUIRED_COLUMNS: [&str; 3] = [COUNTY_FIPS, DRIVER_RACE, STATE];

/// Columns removed unconditionally from every normalized batch.
///
/// `officer_id` is not listed: it is removed only when it was used to
/// synthesize [`STATE_OFFICER_ID`].
pub const DROPPED_COLUMNS: [&str; 3] = [LOCATION_RAW, COUNTY_NAME, DRIVER_RACE_RAW];

/// How normalization treats a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnRole {
    /// Must exist; rows with a null value are filtered out.
    Required,
    /// Must exist; values pass through.
    Passthrough,
    /// May be absent; consumed by key synthesis and then dropped.
    Consumed,
    /// Always removed.
    Dropped,
    /// Produced by normalization.
    Derived,
}

impl ColumnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Required => "required",
            ColumnRole::Passthrough => "passthrough",
            ColumnRole::Consumed => "consumed",
            ColumnRole::Dropped => "dropped",
            ColumnRole::Derived => "derived",
        }
    }
}

/// A column together with its role and a one-line description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub name: &'static str,
    pub role: ColumnRole,
    pub description: &'static str,
}

/// Every column with special handling, in processing order.
pub const COLUMN_RULES: [ColumnRule; 8] = [
    ColumnRule {
        name: COUNTY_FIPS,
        role: ColumnRole::Required,
        description: "rows without a county are dropped",
    },
    ColumnRule {
        name: DRIVER_RACE,
        role: ColumnRole::Required,
        description: "rows without a race are dropped; values are lowercased",
    },
    ColumnRule {
        name: STATE,
        role: ColumnRole::Passthrough,
        description: "lowercased into the officer key prefix",
    },
    ColumnRule {
        name: OFFICER_ID,
        role: ColumnRole::Consumed,
        description: "rendered as text into the officer key, then removed",
    },
    ColumnRule {
        name: STATE_OFFICER_ID,
        role: ColumnRole::Derived,
        description: "lowercase state + officer id, empty when unavailable",
    },
    ColumnRule {
        name: LOCATION_RAW,
        role: ColumnRole::Dropped,
        description: "free-text location",
    },
    ColumnRule {
        name: COUNTY_NAME,
        role: ColumnRole::Dropped,
        description: "redundant with county_fips",
    },
    ColumnRule {
        name: DRIVER_RACE_RAW,
        role: ColumnRole::Dropped,
        description: "superseded by driver_race",
    },
];

/// Look up the rule for a column name.
pub fn column_rule(name: &str) -> Option<&'static ColumnRule> {
    let rules: &'static [ColumnRule] = &COLUMN_RULES;
    rules.iter().find(|rule| rule.name == name)
}

/// Returns true when the column never survives normalization.
pub fn is_pruned(name: &str) -> bool {
    name == OFFICER_ID || DROPPED_COLUMNS.contains(&name)
}
