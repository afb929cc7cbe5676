// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Predict when astronomical sources pass too close to the Sun during a
radio-telescope observation.

A session takes a catalog of sources, an observatory, a start time in the
observatory's local civil time, a duration and a threshold angle. The Sun's
apparent topocentric position is computed once per sampled instant, every
source's angular separation from the Sun is computed over the same instants,
and the contiguous runs where a source is closer than the threshold are
reported as violation windows.

```no_run
use sunsep::{run_session, SessionInputs};

let inputs = SessionInputs::new(
    "CasA 23h23m24s +58d48m54s J2000".to_string(),
    "2024-06-21 06:00:00".to_string(),
    4.0,
    9.0,
    "GMRT".to_string(),
);
let result = run_session(&inputs).unwrap();
print!("{}", result.summary());
```
 */

pub mod catalog;
mod cli;
pub mod constants;
pub mod ephemeris;
mod misc;
pub mod observatory;
pub mod overlap;
pub mod params;
pub mod report;
pub mod separation;
pub mod sexagesimal;
pub mod time;

use crossbeam_utils::atomic::AtomicCell;

lazy_static::lazy_static! {
    /// Are progress bars being drawn? This should only ever be enabled by CLI
    /// code.
    static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}

// Re-exports.
pub use catalog::{parse_catalog, read_catalog_file, SourceCatalog, SourceRecord};
pub use cli::{Sunsep, SunsepError};
pub use observatory::{ObservatoryLocation, ObservatoryRegistry};
pub use overlap::ViolationWindow;
pub use params::{run_session, SessionError, SessionInputs};
pub use report::SessionResult;
pub use separation::SourceSeries;
