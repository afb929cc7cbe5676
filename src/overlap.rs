// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the intervals where a source is too close to the Sun.

use hifitime::Epoch;

use crate::separation::{SeparationSample, SourceSeries};

/// A contiguous run of samples where a source's separation from the Sun was
/// below the threshold. `start` and `end` are the first and last violating
/// samples, so a single-sample violation has `start == end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationWindow {
    pub source_name: String,
    pub start: Epoch,
    pub end: Epoch,

    /// The smallest separation inside the window \[degrees\].
    pub closest_approach_deg: f64,
}

/// Whether a separation violates a threshold. Strictly less-than; a source
/// exactly at the threshold (or a zero threshold with a source exactly on the
/// Sun) is not a violation.
#[inline]
pub fn is_violation(separation_deg: f64, threshold_deg: f64) -> bool {
    separation_deg < threshold_deg
}

/// Scan a series in time order and collect its violation windows. The
/// windows are in time order and never overlap.
pub fn detect_violations(series: &SourceSeries, threshold_deg: f64) -> Vec<ViolationWindow> {
    let mut windows = vec![];
    let mut open: Option<(SeparationSample, SeparationSample, f64)> = None;

    for sample in &series.samples {
        if is_violation(sample.separation_deg, threshold_deg) {
            open = Some(match open {
                None => (*sample, *sample, sample.separation_deg),
                Some((first, _, min)) => (first, *sample, min.min(sample.separation_deg)),
            });
        } else if let Some((first, last, min)) = open.take() {
            windows.push(window(&series.source.name, first, last, min));
        }
    }
    // A window still open at the end of the series closes at the last
    // instant.
    if let Some((first, last, min)) = open {
        windows.push(window(&series.source.name, first, last, min));
    }

    windows
}

fn window(
    name: &str,
    first: SeparationSample,
    last: SeparationSample,
    min: f64,
) -> ViolationWindow {
    ViolationWindow {
        source_name: name.to_string(),
        start: first.instant,
        end: last.instant,
        closest_approach_deg: min,
    }
}
