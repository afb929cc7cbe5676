// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the observatories subcommand.

use std::io::Write;

use indoc::indoc;
use tempfile::NamedTempFile;

use crate::{get_cmd_output, sunsep};

#[test]
fn test_list_builtin_observatories() {
    let cmd = sunsep().arg("observatories").ok();
    assert!(cmd.is_ok(), "observatories failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    for name in ["GMRT", "ORT", "MWA", "Parkes"] {
        assert!(stdout.contains(name), "{stdout}");
    }
    assert!(stdout.contains("UTC+05:30"));
    assert!(stdout.contains("UTC+10:00"));
}

#[test]
fn test_list_observatories_from_file() {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(
        indoc! {r#"
            [[observatory]]
            name = "VLA"
            longitude_deg = -107.6184
            latitude_deg = 34.0784
            height_metres = 2124.0
            utc_offset_hours = -7.0
        "#}
        .as_bytes(),
    )
    .unwrap();
    f.flush().unwrap();

    let cmd = sunsep()
        .args([
            "observatories",
            "--observatory-file",
            &f.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "observatories failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("VLA"), "{stdout}");
    assert!(stdout.contains("UTC-07:00"), "{stdout}");
}

#[test]
fn test_bad_observatory_file() {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(b"[[observatory]]\nname = \"Nowhere\"\n").unwrap();
    f.flush().unwrap();

    let cmd = sunsep()
        .args([
            "observatories",
            "--observatory-file",
            &f.path().display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("observatory file"), "{stderr}");
}
