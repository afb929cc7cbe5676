// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod catalog_verify;
mod no_stderr;
mod observatories;
mod predict;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn sunsep() -> Command {
    Command::cargo_bin("sunsep").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Get the absolute path to a catalog in the test files.
fn get_catalog(name: &str) -> String {
    let file = PathBuf::from("test_files/catalogs").join(name);
    assert!(
        file.exists(),
        "Could not find {}, which is required for this test",
        file.display()
    );
    file.canonicalize().unwrap().display().to_string()
}

/// The start of the directory name of a GMRT session starting at 2024-06-21
/// 06:00:00 IST. The rest is the session's digest.
const GMRT_SOLSTICE_LABEL_PREFIX: &str = "sunsep_GMRT_20240621T003000_";

/// The session directories in `output_dir` for the GMRT solstice session.
fn gmrt_solstice_dirs(output_dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(GMRT_SOLSTICE_LABEL_PREFIX))
                .unwrap_or(false)
        })
        .collect()
}

/// The only GMRT solstice session directory in `output_dir`.
fn gmrt_solstice_dir(output_dir: &Path) -> PathBuf {
    let mut dirs = gmrt_solstice_dirs(output_dir);
    assert_eq!(dirs.len(), 1, "expected one session directory: {dirs:?}");
    dirs.remove(0)
}
