// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the predict subcommand.

use std::fs::read_to_string;

use indoc::indoc;
use serde_json::Value;
use tempfile::TempDir;

use crate::{
    get_catalog, get_cmd_output, gmrt_solstice_dir, gmrt_solstice_dirs, sunsep,
    GMRT_SOLSTICE_LABEL_PREFIX,
};

#[test]
fn test_predict_writes_summary_and_result() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalog = get_catalog("bright_sources.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "--no-progress-bars",
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "4",
            "--threshold", "9",
            "--no-plots",
            "-o", &tmp_dir.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Sampling Cadence: 60 seconds (241 instants)"), "{stdout}");
    assert!(stdout.contains("sunsep predict complete."), "{stdout}");

    let dir = gmrt_solstice_dir(tmp_dir.path());
    let summary = read_to_string(dir.join("summary.txt")).unwrap();
    assert!(summary.starts_with(indoc! {"
        Observatory Name: GMRT
        Start Time: 2024-06-21 06:00:00 (UTC+05:30) = 2024-06-21T00:30:00 UTC
        Observation Duration: 4 hours
        Threshold Separation Angle: 9 degrees
    "}));
    assert_eq!(summary.matches("    No violations").count(), 4);
    assert!(summary.contains("3C273 (12h29m06.7000s 02d03m09.0000s B1950.0)"));

    let result: Value = serde_json::from_str(&read_to_string(dir.join("result.json")).unwrap())
        .expect("result.json is valid JSON");
    let label = result["label"].as_str().unwrap();
    assert!(label.starts_with(GMRT_SOLSTICE_LABEL_PREFIX), "{label}");
    assert_eq!(dir.file_name().unwrap().to_str().unwrap(), label);
    let digest = result["digest"].as_str().unwrap();
    assert!(digest.starts_with(&label[GMRT_SOLSTICE_LABEL_PREFIX.len()..]));
    assert_eq!(result["num_instants"], 241);
    let sources = result["sources"].as_array().unwrap();
    let names: Vec<&str> = sources.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["CasA", "CygA", "CenA", "3C273"]);
    assert_eq!(sources[2]["extra_fields"][0], "radio_galaxy");
    for source in sources {
        assert_eq!(source["separations_deg"].as_array().unwrap().len(), 241);
        assert!(source["violations"].as_array().unwrap().is_empty());
    }
    // No plots were requested.
    assert!(!dir.join("CasA.png").exists());
}

#[test]
fn test_predict_reports_violations() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalog = get_catalog("near_sun.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "--no-progress-bars",
            "predict",
            "-c", &catalog,
            "--observatory", "gmrt",
            "--start", "2024-06-21 06:00:00",
            "--duration", "4",
            "--threshold", "9",
            "--format", "yaml",
            "--no-plots",
            "-o", &tmp_dir.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());

    let dir = gmrt_solstice_dir(tmp_dir.path());
    let summary = read_to_string(dir.join("summary.txt")).unwrap();
    assert!(summary.contains(
        "    Violation 1: 2024-06-21 06:00:00 to 2024-06-21 10:00:00 (closest 0.0"
    ));
    assert_eq!(summary.matches("    No violations").count(), 1);
    assert!(dir.join("result.yaml").exists());
    assert!(!dir.join("result.json").exists());
}

#[test]
fn test_predict_catalog_from_stdin() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "--no-progress-bars",
            "predict",
            "-c", "-",
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "0",
            "--threshold", "9",
            "--no-plots",
            "-o", &tmp_dir.path().display().to_string(),
        ])
        .write_stdin("near 90.0 23.4 J2000\n")
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());

    let dir = gmrt_solstice_dir(tmp_dir.path());
    let summary = read_to_string(dir.join("summary.txt")).unwrap();
    assert!(summary.contains("(1 instants)"));
    assert!(summary.contains(
        "    Violation 1: 2024-06-21 06:00:00 to 2024-06-21 06:00:00"
    ));
}

#[test]
fn test_predict_unknown_observatory() {
    let catalog = get_catalog("bright_sources.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "predict",
            "-c", &catalog,
            "--observatory", "Arecibo",
            "--start", "2024-06-21 06:00:00",
            "--duration", "4",
            "--threshold", "9",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unknown observatory 'Arecibo'"), "{stderr}");
    assert!(stderr.contains("GMRT, ORT, MWA, Parkes"), "{stderr}");
}

#[test]
fn test_predict_malformed_catalog() {
    let catalog = get_catalog("malformed.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "4",
            "--threshold", "9",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Catalog line 2"), "{stderr}");
}

#[test]
fn test_predict_bad_start_time() {
    let catalog = get_catalog("bright_sources.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "June 21st",
            "--duration", "4",
            "--threshold", "9",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("June 21st"), "{stderr}");
}

#[test]
fn test_predict_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalog = get_catalog("bright_sources.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "--dry-run",
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "4",
            "--threshold", "9",
            "-o", &tmp_dir.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."));
    assert!(gmrt_solstice_dirs(tmp_dir.path()).is_empty());
}

#[test]
fn test_predict_save_toml_and_reuse() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalog = get_catalog("bright_sources.txt");
    let args_file = tmp_dir.path().join("args.toml");
    let out_dir = tmp_dir.path().join("out");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "--dry-run",
            "--save-toml", &args_file.display().to_string(),
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "1",
            "--threshold", "9",
            "--no-plots",
            "-o", &out_dir.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());
    assert!(args_file.exists());

    // Run again using only the saved arguments.
    let cmd = sunsep()
        .args([
            "--no-progress-bars",
            "predict",
            &args_file.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());
    let summary = read_to_string(gmrt_solstice_dir(&out_dir).join("summary.txt")).unwrap();
    assert!(summary.contains("Sampling Cadence: 60 seconds (61 instants)"));
}
