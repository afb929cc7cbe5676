// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Angular separations between sources and the Sun.

use crossbeam_utils::atomic::AtomicCell;
use hifitime::Epoch;
use thiserror::Error;

use crate::{
    catalog::SourceRecord,
    ephemeris::{catalog_direction, normalise, EphemerisError, SunEphemeris},
};

/// The great-circle angle between two directions \[degrees, [0, 180]\]. The
/// vectors needn't be normalised.
pub fn angular_separation(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let (_, a) = normalise(*a);
    let (_, b) = normalise(*b);
    let cos_sep: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    // Rounding can push the dot product of (anti)parallel vectors just past
    // ±1.
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationSample {
    pub instant: Epoch,
    pub separation_deg: f64,
}

/// The separation between a source and the Sun at every instant of a time
/// grid, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSeries {
    pub source: SourceRecord,
    pub samples: Vec<SeparationSample>,
}

impl SourceSeries {
    /// The sample with the smallest separation. The earliest one wins ties.
    pub fn closest_approach(&self) -> Option<&SeparationSample> {
        self.samples.iter().fold(None, |best, s| match best {
            Some(b) if b.separation_deg <= s.separation_deg => Some(b),
            _ => Some(s),
        })
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SeparationError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("The separation calculation was cancelled")]
    Cancelled,
}

/// Calculate the Sun separation of a source at every instant of the
/// ephemeris. The calculation stops early with
/// [`SeparationError::Cancelled`] if `cancel` is raised.
pub fn compute_series(
    source: &SourceRecord,
    sun: &SunEphemeris,
    cancel: &AtomicCell<bool>,
) -> Result<SourceSeries, SeparationError> {
    let gcrs = catalog_direction(source)?;
    let mut samples = Vec::with_capacity(sun.len());
    for frame in sun.frames().iter() {
        if cancel.load() {
            return Err(SeparationError::Cancelled);
        }
        let direction = frame.apparent_direction(gcrs);
        samples.push(SeparationSample {
            instant: frame.instant,
            separation_deg: angular_separation(&direction, &frame.sun),
        });
    }
    Ok(SourceSeries {
        source: source.clone(),
        samples,
    })
}
