//! End-to-end tests for the NDBC ingest path: a directory of drops is
//! scanned, each file parsed (plain and gzipped), and the result turned
//! into parameter frames ready for upload.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use moorfeed_core::{Parameter, Station};
use moorfeed_ndbc::{parse_path, scan_incoming};

const SST_CONTENT: &str = "\
YYYYMMDD HHMMSS  sst  sstflag
20240601 000000  14.1 0
20240601 001000  14.2 0
20240601 002000  MM   0
";

const SSS_CONTENT: &str = "\
YYYYMMDD HHMMSS  sss  sssflag
20240601 000000  35.1 0
20240601 001000  35.2 0
";

fn write_plain(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn write_gzipped(dir: &Path, name: &str, content: &str) {
    let file = std::fs::File::create(dir.join(name)).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn ts(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn test_scan_and_ingest_mixed_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_plain(dir.path(), "SSTStation5_202406.txt", SST_CONTENT);
    write_gzipped(dir.path(), "SSSStation5_202406.txt.gz", SSS_CONTENT);
    write_plain(dir.path(), "notes.md", "not a drop");

    let drops = scan_incoming(dir.path()).unwrap();
    assert_eq!(drops.len(), 2, "non-drop files must be skipped");

    for drop in &drops {
        assert_eq!(drop.station, Station::new("Station5"));
        let file = parse_path(&drop.path).unwrap();
        let frame = file.to_frame(drop.parameter).unwrap();
        assert!(!frame.is_empty());
        assert_eq!(frame.times()[0], ts(0, 0));
    }
}

#[test]
fn test_ingested_frame_matches_file_values() {
    let dir = tempfile::tempdir().unwrap();
    write_plain(dir.path(), "SSTStation5_202406.txt", SST_CONTENT);

    let drops = scan_incoming(dir.path()).unwrap();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].parameter, Parameter::SeaSurfaceTemperature);

    let file = parse_path(&drops[0].path).unwrap();
    let frame = file.to_frame(drops[0].parameter).unwrap();
    assert_eq!(frame.len(), 3);

    // The MM cell parses to NaN and drops out of the uploadable series.
    let series = frame.positive_series(Parameter::SeaSurfaceTemperature);
    assert_eq!(
        series,
        vec![(ts(0, 0), 14.1), (ts(0, 10), 14.2)]
    );

    let range = frame.date_range().unwrap();
    assert_eq!(range.start, ts(0, 0));
    assert_eq!(range.end, ts(0, 20));
}

#[test]
fn test_gzip_and_plain_agree() {
    let dir = tempfile::tempdir().unwrap();
    write_plain(dir.path(), "SSTStation5_202406.txt", SST_CONTENT);
    write_gzipped(dir.path(), "SSTStation6_202406.txt.gz", SST_CONTENT);

    let drops = scan_incoming(dir.path()).unwrap();
    assert_eq!(drops.len(), 2);

    let plain = parse_path(&drops[0].path).unwrap();
    let gzipped = parse_path(&drops[1].path).unwrap();
    assert_eq!(plain, gzipped);
}

#[test]
fn test_scan_missing_directory_errors() {
    assert!(scan_incoming(Path::new("/nonexistent/incoming")).is_err());
}
