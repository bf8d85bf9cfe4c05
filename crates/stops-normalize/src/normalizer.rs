//! The stop normalizer.
//!
//! A batch goes through five ordered steps, each consuming the output of the
//! previous one:
//!
//! 1. drop rows with a null `county_fips`
//! 2. drop rows with a null `driver_race`
//! 3. lowercase `driver_race`
//! 4. synthesize `state_officer_id` from `state` and `officer_id`
//! 5. prune `location_raw`, `county_name`, `driver_race_raw` and `officer_id`
//!
//! The input frame is only borrowed; every step produces a new frame.

use polars::prelude::*;
use tracing::{debug, warn};

use stops_model::columns::{COUNTY_FIPS, DRIVER_RACE, OFFICER_ID, STATE, STATE_OFFICER_ID};
use stops_model::{
    ColumnPresence, MissingStatePolicy, NormalizationSummary, NormalizeOptions, StopSchema,
    is_pruned,
};

use crate::error::{NormalizeError, Result};

/// A normalized frame together with its row accounting.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub frame: DataFrame,
    pub summary: NormalizationSummary,
}

/// Normalize one batch (a whole file or one chunk of it).
///
/// Deterministic and free of I/O. Missing values in `county_fips` or
/// `driver_race` filter rows out; they are not errors. A batch that lacks a
/// required column entirely returns [`NormalizeError::MissingColumn`].
pub fn normalize_stops(batch: &DataFrame, options: &NormalizeOptions) -> Result<NormalizedBatch> {
    let names = batch.get_column_names();
    let schema = StopSchema::from_columns(names.iter().map(|name| name.as_str()));
    if let Some(column) = schema.missing_required().first() {
        return Err(NormalizeError::MissingColumn {
            column: (*column).to_string(),
        });
    }

    let mut summary = NormalizationSummary {
        input_rows: batch.height(),
        officer_id: schema.officer_id,
        ..NormalizationSummary::default()
    };

    let with_county = drop_nulls(batch, COUNTY_FIPS)?;
    summary.dropped_missing_county_fips = batch.height() - with_county.height();

    let mut df = drop_nulls(&with_county, DRIVER_RACE)?;
    summary.dropped_missing_driver_race = with_county.height() - df.height();

    if df.height() > 0 {
        lowercase_column(&mut df, DRIVER_RACE)?;
    }

    let keys = match schema.officer_id {
        ColumnPresence::Present => synthesize_officer_keys(&df, options.missing_state)?,
        ColumnPresence::Absent => OfficerKeys::empty(df.height()),
    };
    summary.officer_keys = keys.synthesized;
    summary.keys_without_state = keys.without_state;
    df.with_column(keys.column)?;
    if let Some(mask) = keys.keep {
        let before = df.height();
        df = df.filter(&mask)?;
        summary.dropped_missing_state = before - df.height();
    }
    if keys.without_state > 0 {
        warn!(
            rows = keys.without_state,
            policy = ?options.missing_state,
            "officer id without state; key left unsynthesized"
        );
    }

    let frame = prune_columns(&df)?;
    summary.output_rows = frame.height();
    debug!(
        input_rows = summary.input_rows,
        output_rows = summary.output_rows,
        dropped_missing_county_fips = summary.dropped_missing_county_fips,
        dropped_missing_driver_race = summary.dropped_missing_driver_race,
        dropped_missing_state = summary.dropped_missing_state,
        officer_keys = summary.officer_keys,
        "normalized stop batch"
    );

    Ok(NormalizedBatch { frame, summary })
}

fn drop_nulls(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let mask = df.column(column)?.is_not_null();
    Ok(df.filter(&mask)?)
}

/// Rewrite a column as lowercase text. Nulls stay null.
fn lowercase_column(df: &mut DataFrame, column: &str) -> Result<()> {
    let text = df.column(column)?.cast(&DataType::String)?;
    let lowered = text.str()?.to_lowercase().with_name(column.into());
    df.with_column(lowered.into_series())?;
    Ok(())
}

struct OfficerKeys {
    column: Column,
    /// Row mask, present only when rows must be removed.
    keep: Option<BooleanChunked>,
    synthesized: usize,
    without_state: usize,
}

impl OfficerKeys {
    fn empty(height: usize) -> Self {
        Self {
            column: Column::new(STATE_OFFICER_ID.into(), vec![""; height]),
            keep: None,
            synthesized: 0,
            without_state: 0,
        }
    }
}

/// Build `state_officer_id = lowercase(state) + text(officer_id)`.
///
/// A null officer id yields an empty key. A state that is null or blank
/// cannot prefix the key; such rows are handled by `policy`.
fn synthesize_officer_keys(df: &DataFrame, policy: MissingStatePolicy) -> Result<OfficerKeys> {
    let officer = df.column(OFFICER_ID)?.cast(&DataType::String)?;
    let state = df.column(STATE)?.cast(&DataType::String)?;
    let officer = officer.str()?;
    let state = state.str()?;

    let mut builder = StringChunkedBuilder::new(STATE_OFFICER_ID.into(), df.height());
    let mut keep = Vec::with_capacity(df.height());
    let mut synthesized = 0;
    let mut without_state = 0;

    for (state, officer) in state.into_iter().zip(officer) {
        let state = state.filter(|state| !state.trim().is_empty());
        match (state, officer) {
            (Some(state), Some(officer)) => {
                let mut key = state.to_lowercase();
                key.push_str(officer);
                builder.append_value(key);
                synthesized += 1;
                keep.push(true);
            }
            (None, Some(_)) => {
                builder.append_value("");
                without_state += 1;
                keep.push(policy == MissingStatePolicy::LeaveEmpty);
            }
            (_, None) => {
                builder.append_value("");
                keep.push(true);
            }
        }
    }

    let keep = if keep.iter().all(|kept| *kept) {
        None
    } else {
        Some(BooleanChunked::from_slice("keep".into(), &keep))
    };

    Ok(OfficerKeys {
        column: builder.finish().into_column(),
        keep,
        synthesized,
        without_state,
    })
}

/// Select every column except the pruned ones, preserving order.
fn prune_columns(df: &DataFrame) -> Result<DataFrame> {
    let kept: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !is_pruned(name.as_str()))
        .cloned()
        .collect();
    Ok(df.select(kept)?)
}
