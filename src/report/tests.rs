// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use hifitime::{Duration, Epoch};
use indoc::indoc;
use marlu::RADec;
use tempfile::TempDir;

use super::*;
use crate::{
    catalog::{CatalogEpoch, SourceRecord},
    observatory::ObservatoryRegistry,
    overlap::detect_violations,
    separation::SeparationSample,
};

fn start() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 6, 21, 0, 30, 0)
}

fn series(name: &str, ra: f64, dec: f64, line_num: u32, seps: &[f64]) -> SourceSeries {
    SourceSeries {
        source: SourceRecord {
            name: name.to_string(),
            radec: RADec::from_degrees(ra, dec),
            epoch: CatalogEpoch::Julian(2000.0),
            extra_fields: vec![],
            line_num,
        },
        samples: seps
            .iter()
            .enumerate()
            .map(|(i, &separation_deg)| SeparationSample {
                instant: start() + Duration::from_seconds(1800.0 * i as f64),
                separation_deg,
            })
            .collect(),
    }
}

/// Two sources sampled every half hour for an hour from 06:00 IST. Things are
/// handed to `assemble` out of order.
fn get_result() -> SessionResult {
    let metadata = SessionMetadata {
        observatory: ObservatoryRegistry::builtin().get("gmrt").unwrap().clone(),
        start: start(),
        start_local: "2024-06-21 06:00:00".to_string(),
        duration_hours: 1.0,
        threshold_deg: 9.0,
        cadence_seconds: 1800.0,
        num_instants: 3,
        digest: "0123abcd4567ef89".to_string(),
    };
    let a = series("A", 90.0, 23.5, 2, &[10.0, 8.0, 9.5]);
    let b = series("B", 180.0, -10.0, 3, &[40.0, 41.0, 42.0]);
    let c = series("C", 45.0, 0.0, 4, &[5.0, 9.5, 7.0]);
    let mut windows = detect_violations(&c, 9.0);
    windows.extend(detect_violations(&a, 9.0));
    windows.reverse();
    SessionResult::assemble(metadata, vec![c, b, a], windows)
}

#[test]
fn test_assemble_orders_by_catalog() {
    let result = get_result();
    let names: Vec<&str> = result
        .series
        .iter()
        .map(|s| s.source.name.as_str())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);

    assert_eq!(result.windows.len(), 3);
    assert_eq!(result.windows[0].source_name, "A");
    assert_eq!(result.windows[1].source_name, "C");
    assert_eq!(result.windows[2].source_name, "C");
    assert!(result.windows[1].start < result.windows[2].start);

    assert_eq!(result.windows_for("A").count(), 1);
    assert_eq!(result.windows_for("B").count(), 0);
    assert_eq!(result.windows_for("C").count(), 2);
}

#[test]
fn test_label() {
    let result = get_result();
    assert_eq!(result.metadata.label(), "sunsep_GMRT_20240621T003000_0123abcd");

    let mut metadata = result.metadata;
    metadata.observatory.name = "My Dish/2".to_string();
    assert_eq!(metadata.label(), "sunsep_My_Dish_2_20240621T003000_0123abcd");

    metadata.digest = "fe".to_string();
    assert_eq!(metadata.label(), "sunsep_My_Dish_2_20240621T003000_fe");
}

#[test]
fn test_summary() {
    let result = get_result();
    let expected = indoc! {"
        Observatory Name: GMRT
        Start Time: 2024-06-21 06:00:00 (UTC+05:30) = 2024-06-21T00:30:00 UTC
        Observation Duration: 1 hours
        Threshold Separation Angle: 9 degrees
        Sampling Cadence: 1800 seconds (3 instants)

        A (06h00m00.0000s 23d30m00.0000s J2000.0): minimum separation 8.000 degrees at 2024-06-21 06:30:00
            Violation 1: 2024-06-21 06:30:00 to 2024-06-21 06:30:00 (closest 8.000 degrees)

        B (12h00m00.0000s -10d00m00.0000s J2000.0): minimum separation 40.000 degrees at 2024-06-21 06:00:00
            No violations

        C (03h00m00.0000s 00d00m00.0000s J2000.0): minimum separation 5.000 degrees at 2024-06-21 06:00:00
            Violation 1: 2024-06-21 06:00:00 to 2024-06-21 06:00:00 (closest 5.000 degrees)
            Violation 2: 2024-06-21 07:00:00 to 2024-06-21 07:00:00 (closest 7.000 degrees)
    "};
    assert_eq!(result.summary(), expected);
}

#[test]
fn test_summary_empty_catalog() {
    let mut result = get_result();
    result.series.clear();
    result.windows.clear();
    let summary = result.summary();
    assert!(summary.ends_with("(3 instants)\n\nNo sources in the catalog\n"));
}

#[test]
fn test_report() {
    let report = get_result().to_report();
    assert_eq!(report.label, "sunsep_GMRT_20240621T003000_0123abcd");
    assert_eq!(report.digest, "0123abcd4567ef89");
    assert_eq!(report.start_utc, "2024-06-21T00:30:00 UTC");
    assert_eq!(report.sources.len(), 3);

    let a = &report.sources[0];
    assert_eq!(a.name, "A");
    assert_eq!(a.epoch, "J2000.0");
    assert_eq!(a.min_separation_deg, Some(8.0));
    assert_eq!(a.min_separation_utc.as_deref(), Some("2024-06-21T01:00:00 UTC"));
    assert_eq!(a.separations_deg, [10.0, 8.0, 9.5]);
    assert_eq!(
        a.violations,
        [WindowReport {
            start_utc: "2024-06-21T01:00:00 UTC".to_string(),
            end_utc: "2024-06-21T01:00:00 UTC".to_string(),
            start_local: "2024-06-21 06:30:00".to_string(),
            end_local: "2024-06-21 06:30:00".to_string(),
            closest_approach_deg: 8.0,
        }]
    );
    assert!(report.sources[1].violations.is_empty());
    assert_eq!(report.sources[2].violations.len(), 2);
}

#[test]
fn test_write_artifacts() {
    let result = get_result();
    let tmp_dir = TempDir::new().unwrap();

    for format in [ResultFormat::Json, ResultFormat::Yaml] {
        let files = write_artifacts(&result, tmp_dir.path(), format, false).unwrap();
        let dir = tmp_dir.path().join("sunsep_GMRT_20240621T003000_0123abcd");
        assert_eq!(
            files,
            [dir.join("summary.txt"), dir.join(format!("result.{format}"))]
        );

        let summary = std::fs::read_to_string(&files[0]).unwrap();
        assert_eq!(summary, result.summary());

        let contents = std::fs::read_to_string(&files[1]).unwrap();
        let report: SessionReport = match format {
            ResultFormat::Json => serde_json::from_str(&contents).unwrap(),
            ResultFormat::Yaml => serde_yaml::from_str(&contents).unwrap(),
        };
        let expected = result.to_report();
        assert_eq!(report.label, expected.label);
        assert_eq!(report.digest, expected.digest);
        assert_eq!(report.start_local, expected.start_local);
        assert_eq!(report.observatory.name, "GMRT");
        assert_eq!(report.sources, expected.sources);
    }
}

#[test]
fn test_write_artifacts_into_a_file_fails() {
    let result = get_result();
    let tmp_dir = TempDir::new().unwrap();
    let dir = tmp_dir.path().join(result.metadata.label());
    std::fs::write(&dir, "not a directory").unwrap();

    let err = write_artifacts(&result, tmp_dir.path(), ResultFormat::Json, false).unwrap_err();
    assert!(matches!(err, WriteError::NotADirectory(_)));
}
