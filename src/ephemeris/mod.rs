// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Apparent positions of the Sun and of catalog sources as seen from an
observatory.

All directions are unit vectors referred to the true equator and equinox of
date (IAU 2006/2000A precession-nutation, via ERFA). The Earth's position and
velocity come from ERFA's epv00 series, which is only valid within a century
of J2000. Ephemeris arguments use TT; sidereal time uses UTC as a stand-in
for UT1 (the difference is < 0.9 s, and only feeds the Sun's tiny topocentric
parallax). Diurnal aberration (<= 0.32″) is ignored for both bodies.
 */

mod erfa;
mod error;
mod observer;

pub use erfa::{radec_to_unit_vector, unit_vector_to_radec};
pub use error::EphemerisError;
pub use observer::{local_apparent_sidereal_time, observer_position};
pub(crate) use erfa::{besselian_epoch_to_mjd, julian_epoch_to_mjd, normalise};

use erfa_sys::ERFA_DJM0;
use hifitime::Epoch;
use marlu::constants::VEL_C;
use rayon::prelude::*;
use vec1::Vec1;

use crate::{
    catalog::SourceRecord,
    constants::{
        AU_M, CATALOG_EPOCH_MAX_YEAR, CATALOG_EPOCH_MIN_YEAR, DAYS_PER_JULIAN_YEAR,
        EPHEMERIS_MAX_YEAR, EPHEMERIS_MIN_YEAR, MJD_J2000, SECONDS_PER_DAY,
    },
    observatory::ObservatoryLocation,
};
use erfa::Matrix;

fn check_instant(instant: Epoch, mjd_tt: f64) -> Result<(), EphemerisError> {
    let years_from_j2000 = (mjd_tt - MJD_J2000) / DAYS_PER_JULIAN_YEAR;
    if years_from_j2000.is_finite()
        && years_from_j2000.abs() <= f64::from(EPHEMERIS_MAX_YEAR - EPHEMERIS_MIN_YEAR) / 2.0
    {
        Ok(())
    } else {
        Err(EphemerisError::OutOfRange {
            instant: instant.to_string(),
            min_year: EPHEMERIS_MIN_YEAR,
            max_year: EPHEMERIS_MAX_YEAR,
        })
    }
}

fn check_source_epoch(source: &SourceRecord) -> Result<(), EphemerisError> {
    let year = source.epoch.year();
    if year.is_finite()
        && year >= f64::from(CATALOG_EPOCH_MIN_YEAR)
        && year <= f64::from(CATALOG_EPOCH_MAX_YEAR)
    {
        Ok(())
    } else {
        Err(EphemerisError::EpochOutOfRange {
            source_name: source.name.clone(),
            epoch: source.epoch.to_string(),
            min_year: CATALOG_EPOCH_MIN_YEAR,
            max_year: CATALOG_EPOCH_MAX_YEAR,
        })
    }
}

/// A source's catalog position as a unit vector in the GCRS, i.e. precessed
/// from its catalog epoch to J2000. This doesn't depend on the instant, so it
/// only needs doing once per source.
pub fn catalog_direction(source: &SourceRecord) -> Result<[f64; 3], EphemerisError> {
    check_source_epoch(source)?;
    let mean_of_epoch = radec_to_unit_vector(source.radec);
    let bias_precession = erfa::bias_precession(source.epoch.to_mjd());
    Ok(erfa::rotate_inverse(&bias_precession, mean_of_epoch))
}

/// Everything about the sky at one instant that doesn't depend on a source:
/// the apparent topocentric Sun direction, and the aberration and
/// precession-nutation needed to turn a source's GCRS direction into an
/// apparent one.
#[derive(Debug, Clone, PartialEq)]
pub struct ApparentFrame {
    pub instant: Epoch,

    /// The Modified Julian Date (TT) of `instant`.
    pub mjd_tt: f64,

    /// Unit vector towards the Sun as seen by the observer.
    pub sun: [f64; 3],

    /// GCRS to true equator and equinox of date.
    bias_precession_nutation: Matrix,

    /// The Earth's barycentric velocity \[c\].
    velocity: [f64; 3],

    /// \[au\]
    sun_distance_au: f64,

    /// sqrt(1 - |v|^2)
    bm1: f64,
}

impl ApparentFrame {
    pub fn new(
        instant: Epoch,
        location: &ObservatoryLocation,
    ) -> Result<ApparentFrame, EphemerisError> {
        let mjd_tt = instant.to_jde_tt_days() - ERFA_DJM0;
        check_instant(instant, mjd_tt)?;
        let mut frame = Self::geocentric(instant, mjd_tt)?;

        // Move the Sun from the geocentre to the observer.
        let last =
            local_apparent_sidereal_time(instant, mjd_tt, location.longitude_deg.to_radians());
        let observer = observer_position(location, last)?;
        let distance = frame.sun_distance_au;
        let mut topocentric = [0.0; 3];
        for ((t, s), o) in topocentric.iter_mut().zip(frame.sun).zip(observer) {
            *t = s * distance - o;
        }
        frame.sun = normalise(topocentric).1;
        Ok(frame)
    }

    /// The frame as seen from the geocentre.
    fn geocentric(instant: Epoch, mjd_tt: f64) -> Result<ApparentFrame, EphemerisError> {
        let (pvh, pvb) = erfa::earth_position_velocity(mjd_tt)?;
        let (sun_distance_au, earth_from_sun) = normalise(pvh[0]);
        let velocity = pvb[1].map(|v| v * AU_M / (VEL_C * SECONDS_PER_DAY));
        let bm1 = (1.0 - velocity.iter().map(|v| v * v).sum::<f64>()).sqrt();

        let mut frame = ApparentFrame {
            instant,
            mjd_tt,
            sun: [0.0; 3],
            bias_precession_nutation: erfa::bias_precession_nutation(mjd_tt),
            velocity,
            sun_distance_au,
            bm1,
        };
        frame.sun = frame.apparent_direction(earth_from_sun.map(|x| -x));
        Ok(frame)
    }

    /// Aberrate a GCRS direction and refer it to the true equator and equinox
    /// of this frame's instant.
    pub fn apparent_direction(&self, gcrs: [f64; 3]) -> [f64; 3] {
        let aberrated = erfa::aberrate(gcrs, self.velocity, self.sun_distance_au, self.bm1);
        erfa::rotate(&self.bias_precession_nutation, aberrated)
    }

    /// The apparent direction of a catalog source at this frame's instant.
    pub fn source_direction(&self, source: &SourceRecord) -> Result<[f64; 3], EphemerisError> {
        Ok(self.apparent_direction(catalog_direction(source)?))
    }
}

/// The apparent topocentric direction of the Sun.
pub fn sun_direction(
    instant: Epoch,
    location: &ObservatoryLocation,
) -> Result<[f64; 3], EphemerisError> {
    Ok(ApparentFrame::new(instant, location)?.sun)
}

/// The apparent direction of a catalog source. Sources are infinitely far
/// away, so the observer's location only matters for the instant's validity.
pub fn source_direction(
    instant: Epoch,
    source: &SourceRecord,
    location: &ObservatoryLocation,
) -> Result<[f64; 3], EphemerisError> {
    ApparentFrame::new(instant, location)?.source_direction(source)
}

/// Per-instant frames (including the Sun direction) for a whole time grid,
/// computed once and shared by every source.
#[derive(Debug, Clone)]
pub struct SunEphemeris {
    location: ObservatoryLocation,
    frames: Vec1<ApparentFrame>,
}

impl SunEphemeris {
    pub fn new(
        grid: &Vec1<Epoch>,
        location: &ObservatoryLocation,
    ) -> Result<SunEphemeris, EphemerisError> {
        let mut frames =
            Vec1::with_capacity(ApparentFrame::new(*grid.first(), location)?, grid.len());
        frames.extend(
            grid[1..]
                .par_iter()
                .map(|&t| ApparentFrame::new(t, location))
                .collect::<Result<Vec<_>, _>>()?,
        );
        Ok(SunEphemeris {
            location: location.clone(),
            frames,
        })
    }

    /// Assemble an ephemeris from frames that were computed elsewhere.
    pub fn from_frames(
        location: &ObservatoryLocation,
        frames: Vec1<ApparentFrame>,
    ) -> SunEphemeris {
        SunEphemeris {
            location: location.clone(),
            frames,
        }
    }

    pub fn location(&self) -> &ObservatoryLocation {
        &self.location
    }

    pub fn frames(&self) -> &Vec1<ApparentFrame> {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; there's at least one instant.
    pub fn is_empty(&self) -> bool {
        false
    }
}
