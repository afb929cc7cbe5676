// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EphemerisError {
    #[error("The instant {instant} is outside the supported range of years {min_year}-{max_year}")]
    OutOfRange {
        instant: String,
        min_year: i32,
        max_year: i32,
    },

    #[error("Source '{source_name}' has epoch {epoch}, outside the supported range of years {min_year}-{max_year}")]
    EpochOutOfRange {
        source_name: String,
        epoch: String,
        min_year: i32,
        max_year: i32,
    },

    #[error("ERFA function {function} returned status {status}")]
    Erfa {
        function: &'static str,
        status: i32,
    },
}
