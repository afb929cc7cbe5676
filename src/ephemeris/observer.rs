// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sidereal time and the observer's place in the sky's frame.

use hifitime::{Duration, Epoch};
use marlu::precession::get_lmst;

use super::{erfa, EphemerisError};
use crate::{constants::AU_M, observatory::ObservatoryLocation};

/// The local apparent sidereal time \[radians, [0, 2π)\]: marlu's local mean
/// sidereal time plus the equation of the equinoxes. UTC stands in for UT1.
pub fn local_apparent_sidereal_time(instant: Epoch, mjd_tt: f64, longitude_rad: f64) -> f64 {
    let lmst = get_lmst(longitude_rad, instant, Duration::from_seconds(0.0));
    erfa::wrap_angle(lmst + erfa::equation_of_the_equinoxes(mjd_tt))
}

/// The observer's geocentric position, referred to the true equator and
/// equinox of date, for the given local apparent sidereal time \[au\].
pub fn observer_position(
    location: &ObservatoryLocation,
    last: f64,
) -> Result<[f64; 3], EphemerisError> {
    let [x, y, z] = erfa::geodetic_to_geocentric(
        location.longitude_deg.to_radians(),
        location.latitude_deg.to_radians(),
        location.height_metres,
    )?;
    // ρ cos φ′ and ρ sin φ′.
    let rho_cos = x.hypot(y) / AU_M;
    let rho_sin = z / AU_M;
    let (s, c) = last.sin_cos();
    Ok([rho_cos * c, rho_cos * s, rho_sin])
}
