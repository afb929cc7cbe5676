// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_catalog, get_cmd_output, sunsep};

#[test]
fn test_predict_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalog = get_catalog("bright_sources.txt");

    #[rustfmt::skip]
    let cmd = sunsep()
        .args([
            "predict",
            "-c", &catalog,
            "--observatory", "GMRT",
            "--start", "2024-06-21 06:00:00",
            "--duration", "1",
            "--threshold", "9",
            "--no-plots",
            "-o", &tmp_dir.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "predict failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_catalog_verify_no_stderr() {
    let catalog = get_catalog("bright_sources.txt");
    let cmd = sunsep().args(["catalog-verify", &catalog]).ok();
    assert!(cmd.is_ok(), "catalog-verify failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
