// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Errors associated with reading in a source catalog file.
#[derive(Error, Debug)]
pub enum ReadCatalogError {
    #[error(transparent)]
    Malformed(#[from] MalformedCatalogError),

    #[error("Couldn't read catalog file '{}': {err}", file.display())]
    IO {
        file: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// Errors associated with the contents of a source catalog. Each variant
/// identifies the offending line, the field and the value so that the user
/// can fix their input.
#[derive(Error, Debug, PartialEq)]
pub enum MalformedCatalogError {
    #[error("Catalog line {line_num}: Missing the {field} field (expected: name RA Dec epoch [extras...])")]
    MissingField { line_num: u32, field: &'static str },

    #[error("Catalog line {line_num}: Couldn't parse {field} '{value}': {reason}")]
    BadAngle {
        line_num: u32,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Catalog line {line_num}: {field} '{value}' is out of range ({range})")]
    AngleOutOfRange {
        line_num: u32,
        field: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("Catalog line {line_num}: Couldn't parse epoch '{value}'; expected something like 2000.0, J2000 or B1950")]
    BadEpoch { line_num: u32, value: String },

    #[error("Catalog line {line_num}: Source name '{name}' was already used on line {first_line_num}")]
    DuplicateName {
        line_num: u32,
        name: String,
        first_line_num: u32,
    },
}
