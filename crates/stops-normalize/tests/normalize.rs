//! Integration tests for stop batch normalization.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use stops_model::{ColumnPresence, MissingStatePolicy, NormalizeOptions};
use stops_normalize::{NormalizeError, normalize_stops};

fn test_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(String::from))
        .collect()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn scenario_a_lowercases_race_and_prefixes_officer_id() {
    let df = DataFrame::new(vec![
        Series::new("county_fips".into(), &["06037"]).into_column(),
        Series::new("driver_race".into(), &["WHITE"]).into_column(),
        Series::new("state".into(), &["CA"]).into_column(),
        Series::new("officer_id".into(), &[42i64]).into_column(),
    ])
    .unwrap();

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();
    let frame = &normalized.frame;

    assert_eq!(frame.height(), 1);
    assert_eq!(strings(frame, "driver_race"), vec![Some("white".to_string())]);
    assert_eq!(
        strings(frame, "state_officer_id"),
        vec![Some("ca42".to_string())]
    );
    assert!(frame.column("officer_id").is_err());
    assert_eq!(normalized.summary.officer_keys, 1);
    assert_eq!(normalized.summary.officer_id, ColumnPresence::Present);
}

#[test]
fn scenario_b_drops_row_without_county() {
    let df = test_df(vec![
        ("county_fips", vec![None]),
        ("driver_race", vec![Some("black")]),
        ("state", vec![Some("TX")]),
        ("officer_id", vec![Some("7")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(normalized.frame.height(), 0);
    assert_eq!(normalized.summary.dropped_missing_county_fips, 1);
    assert!(normalized.summary.is_balanced());
}

#[test]
fn scenario_c_without_officer_column_leaves_key_empty() {
    let df = test_df(vec![
        ("county_fips", vec![Some("48201")]),
        ("driver_race", vec![Some("asian")]),
        ("state", vec![Some("TX")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(
        strings(&normalized.frame, "state_officer_id"),
        vec![Some(String::new())]
    );
    assert_eq!(normalized.summary.officer_id, ColumnPresence::Absent);
    assert_eq!(normalized.summary.officer_keys, 0);
}

#[test]
fn scenario_d_empty_batch_keeps_pruned_column_set() {
    let df = test_df(vec![
        ("county_fips", vec![]),
        ("driver_race", vec![]),
        ("state", vec![]),
        ("officer_id", vec![]),
        ("location_raw", vec![]),
        ("county_name", vec![]),
        ("driver_race_raw", vec![]),
        ("stop_date", vec![]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(normalized.frame.height(), 0);
    assert_eq!(
        column_names(&normalized.frame),
        vec![
            "county_fips",
            "driver_race",
            "state",
            "stop_date",
            "state_officer_id"
        ]
    );
}

#[test]
fn race_filter_runs_after_county_filter() {
    let df = test_df(vec![
        ("county_fips", vec![None, Some("06037"), Some("06037")]),
        ("driver_race", vec![None, None, Some("Hispanic")]),
        ("state", vec![Some("CA"), Some("CA"), Some("CA")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();
    let summary = normalized.summary;

    assert_eq!(summary.input_rows, 3);
    assert_eq!(summary.dropped_missing_county_fips, 1);
    assert_eq!(summary.dropped_missing_driver_race, 1);
    assert_eq!(summary.output_rows, 1);
    assert_eq!(
        strings(&normalized.frame, "driver_race"),
        vec![Some("hispanic".to_string())]
    );
}

#[test]
fn dropped_columns_are_removed_and_others_pass_through() {
    let df = test_df(vec![
        ("stop_date", vec![Some("2015-01-01")]),
        ("county_fips", vec![Some("06037")]),
        ("location_raw", vec![Some("Los Angeles County")]),
        ("county_name", vec![Some("Los Angeles County")]),
        ("driver_race_raw", vec![Some("W")]),
        ("driver_race", vec![Some("White")]),
        ("state", vec![Some("CA")]),
        ("officer_id", vec![Some("A17")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(
        column_names(&normalized.frame),
        vec![
            "stop_date",
            "county_fips",
            "driver_race",
            "state",
            "state_officer_id"
        ]
    );
    assert_eq!(
        strings(&normalized.frame, "stop_date"),
        vec![Some("2015-01-01".to_string())]
    );
}

#[test]
fn existing_officer_key_is_overwritten_in_place() {
    let df = test_df(vec![
        ("county_fips", vec![Some("06037")]),
        ("state_officer_id", vec![Some("stale")]),
        ("driver_race", vec![Some("White")]),
        ("state", vec![Some("CA")]),
        ("officer_id", vec![Some("9")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(
        column_names(&normalized.frame),
        vec!["county_fips", "state_officer_id", "driver_race", "state"]
    );
    assert_eq!(
        strings(&normalized.frame, "state_officer_id"),
        vec![Some("ca9".to_string())]
    );
}

#[test]
fn missing_state_leaves_key_empty_by_default() {
    let df = test_df(vec![
        ("county_fips", vec![Some("06037"), Some("48201")]),
        ("driver_race", vec![Some("White"), Some("Black")]),
        ("state", vec![None, Some("TX")]),
        ("officer_id", vec![Some("1"), Some("2")]),
    ]);

    let normalized = normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert_eq!(normalized.frame.height(), 2);
    assert_eq!(
        strings(&normalized.frame, "state_officer_id"),
        vec![Some(String::new()), Some("tx2".to_string())]
    );
    assert_eq!(normalized.summary.keys_without_state, 1);
    assert_eq!(normalized.summary.dropped_missing_state, 0);
}

#[test]
fn missing_state_drop_row_policy_removes_row() {
    let df = test_df(vec![
        ("county_fips", vec![Some("06037"), Some("48201")]),
        ("driver_race", vec![Some("White"), Some("Black")]),
        ("state", vec![None, Some("TX")]),
        ("officer_id", vec![Some("1"), Some("2")]),
    ]);
    let options = NormalizeOptions::default().with_missing_state(MissingStatePolicy::DropRow);

    let normalized = normalize_stops(&df, &options).unwrap();

    assert_eq!(normalized.frame.height(), 1);
    assert_eq!(
        strings(&normalized.frame, "county_fips"),
        vec![Some("48201".to_string())]
    );
    assert_eq!(normalized.summary.dropped_missing_state, 1);
    assert!(normalized.summary.is_balanced());
}

#[test]
fn blank_state_never_yields_bare_officer_id() {
    let df = DataFrame::new(vec![
        Series::new("county_fips".into(), &["06037", "48201"]).into_column(),
        Series::new("driver_race".into(), &["WHITE", "BLACK"]).into_column(),
        Series::new("state".into(), &["", "TX"]).into_column(),
        Series::new("officer_id".into(), &[42i64, 7]).into_column(),
    ])
    .unwrap();

    let kept = normalize_stops(&df, &NormalizeOptions::default()).unwrap();
    assert_eq!(
        strings(&kept.frame, "state_officer_id"),
        vec![Some(String::new()), Some("tx7".to_string())]
    );
    assert_eq!(kept.summary.keys_without_state, 1);

    let options = NormalizeOptions::default().with_missing_state(MissingStatePolicy::DropRow);
    let dropped = normalize_stops(&df, &options).unwrap();
    assert_eq!(
        strings(&dropped.frame, "state_officer_id"),
        vec![Some("tx7".to_string())]
    );
    assert_eq!(dropped.summary.dropped_missing_state, 1);
    assert!(dropped.summary.is_balanced());
}

#[test]
fn missing_required_column_is_an_error() {
    let df = test_df(vec![
        ("driver_race", vec![Some("White")]),
        ("state", vec![Some("CA")]),
    ]);

    let err = normalize_stops(&df, &NormalizeOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        NormalizeError::MissingColumn { ref column } if column == "county_fips"
    ));
}

#[test]
fn input_batch_is_not_modified() {
    let df = test_df(vec![
        ("county_fips", vec![Some("06037"), None]),
        ("driver_race", vec![Some("WHITE"), Some("BLACK")]),
        ("state", vec![Some("CA"), Some("CA")]),
        ("officer_id", vec![Some("5"), Some("6")]),
    ]);
    let before = df.clone();

    normalize_stops(&df, &NormalizeOptions::default()).unwrap();

    assert!(df.equals_missing(&before));
}
