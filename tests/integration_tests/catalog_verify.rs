// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the catalog-verify subcommand.

use crate::{get_catalog, get_cmd_output, sunsep};

#[test]
fn test_verify_good_catalog() {
    let catalog = get_catalog("bright_sources.txt");
    let cmd = sunsep().args(["catalog-verify", &catalog]).ok();
    assert!(cmd.is_ok(), "catalog-verify failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("4 sources (3 J epochs, 1 B epochs)"), "{stdout}");
    assert!(stdout.contains("1 sources have extra columns"), "{stdout}");
}

#[test]
fn test_verify_reports_every_catalog() {
    let good = get_catalog("near_sun.txt");
    let bad = get_catalog("malformed.txt");
    let cmd = sunsep().args(["catalog-verify", &bad, &good]).ok();
    assert!(cmd.is_err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stdout.contains("Catalog line 2"), "{stdout}");
    // The good catalog after the bad one is still verified.
    assert!(stdout.contains("2 sources (2 J epochs, 0 B epochs)"), "{stdout}");
    assert!(stderr.contains("1 of 2 catalogs could not be read"), "{stderr}");
}

#[test]
fn test_verify_no_catalogs() {
    let cmd = sunsep().arg("catalog-verify").ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No catalogs were supplied!"), "{stderr}");
}
