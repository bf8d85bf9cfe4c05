//! Tests for chunked reading of stop files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stops_ingest::{IngestError, LoadOptions, StopChunkReader, read_stop_file};

fn stop_file(dir: &TempDir, rows: usize) -> PathBuf {
    let mut contents = String::from("county_fips,driver_race,state,officer_id\n");
    for i in 0..rows {
        contents.push_str(&format!("{:05},White,CA,{}\n", 6000 + i, i));
    }
    let path = dir.path().join("stops.csv");
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn chunks_are_bounded_by_chunk_size() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 25);
    let options = LoadOptions::default().with_chunk_size(10);

    let heights: Vec<usize> = StopChunkReader::new(&path, &options)
        .expect("reader")
        .map(|chunk| chunk.expect("chunk").height())
        .collect();

    assert_eq!(heights, vec![10, 10, 5]);
}

#[test]
fn exact_multiple_does_not_yield_trailing_empty_chunk() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 20);
    let options = LoadOptions::default().with_chunk_size(10);

    let mut reader = StopChunkReader::new(&path, &options).expect("reader");
    let heights: Vec<usize> = reader
        .by_ref()
        .map(|chunk| chunk.expect("chunk").height())
        .collect();

    assert_eq!(heights, vec![10, 10]);
    assert_eq!(reader.rows_read(), 20);
    assert_eq!(reader.chunks_read(), 2);
}

#[test]
fn header_only_file_yields_one_empty_chunk() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 0);

    let chunks: Vec<_> = StopChunkReader::new(&path, &LoadOptions::default())
        .expect("reader")
        .collect::<Result<_, _>>()
        .expect("chunks");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].height(), 0);
    assert!(chunks[0].column("county_fips").is_ok());
}

#[test]
fn chunks_concatenate_to_full_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 7);
    let options = LoadOptions::default().with_chunk_size(3);

    let full = read_stop_file(&path, &options).expect("full load");
    let mut fips = Vec::new();
    for chunk in StopChunkReader::new(&path, &options).expect("reader") {
        let chunk = chunk.expect("chunk");
        let column = chunk.column("county_fips").expect("fips");
        fips.extend(column.str().expect("str").into_iter().map(|v| v.map(String::from)));
    }

    let expected: Vec<Option<String>> = full
        .column("county_fips")
        .expect("fips")
        .str()
        .expect("str")
        .into_iter()
        .map(|v| v.map(String::from))
        .collect();
    assert_eq!(fips, expected);
}

#[test]
fn zero_chunk_size_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 1);
    let options = LoadOptions::default().with_chunk_size(0);

    let err = StopChunkReader::new(&path, &options).err().expect("error");
    assert!(matches!(err, IngestError::InvalidChunkSize { size: 0 }));
}

#[test]
fn chunks_span_parse_batches_without_rereading() {
    let dir = TempDir::new().expect("temp dir");
    let path = stop_file(&dir, 150_000);
    let options = LoadOptions::default().with_chunk_size(100_000);

    let mut reader = StopChunkReader::new(&path, &options).expect("reader");
    let first = reader.next().expect("first chunk").expect("chunk");
    assert_eq!(first.height(), 100_000);
    assert_eq!(reader.rows_read(), 100_000);

    let second = reader.next().expect("second chunk").expect("chunk");
    let fips = second.column("county_fips").expect("fips").str().expect("str");
    assert_eq!(second.height(), 50_000);
    assert_eq!(fips.get(0), Some("106000"));
    assert!(reader.next().is_none());
    assert_eq!(reader.rows_read(), 150_000);
}
