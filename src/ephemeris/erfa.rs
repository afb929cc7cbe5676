// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thin wrappers around the ERFA routines used by the ephemeris. Every ERFA
//! date here is split as (`ERFA_DJM0`, MJD).

use erfa_sys::{ERFA_DJM0, ERFA_WGS84};
use marlu::RADec;

use super::EphemerisError;

/// A 3x3 rotation matrix, row major.
pub(crate) type Matrix = [[f64; 3]; 3];

/// The bias-precession-nutation matrix (IAU 2006/2000A) at `mjd_tt`. It takes
/// GCRS directions to the true equator and equinox of date.
pub(super) fn bias_precession_nutation(mjd_tt: f64) -> Matrix {
    let mut rbpn = [[0.0; 3]; 3];
    unsafe {
        erfa_sys::eraPnm06a(ERFA_DJM0, mjd_tt, rbpn.as_mut_ptr());
    }
    rbpn
}

/// The bias-precession matrix (IAU 2006) at `mjd_tt`. It takes GCRS directions
/// to the mean equator and equinox of date.
pub(super) fn bias_precession(mjd_tt: f64) -> Matrix {
    let mut rbp = [[0.0; 3]; 3];
    unsafe {
        erfa_sys::eraPmat06(ERFA_DJM0, mjd_tt, rbp.as_mut_ptr());
    }
    rbp
}

/// The Earth's heliocentric and barycentric position-velocity vectors \[au,
/// au/day\] at `mjd_tt`, in the BCRS.
pub(super) fn earth_position_velocity(
    mjd_tt: f64,
) -> Result<([[f64; 3]; 2], [[f64; 3]; 2]), EphemerisError> {
    let mut pvh = [[0.0; 3]; 2];
    let mut pvb = [[0.0; 3]; 2];
    let status =
        unsafe { erfa_sys::eraEpv00(ERFA_DJM0, mjd_tt, pvh.as_mut_ptr(), pvb.as_mut_ptr()) };
    // A status of 1 means the date is outside 1900-2100 and the result is
    // degraded.
    if status != 0 {
        return Err(EphemerisError::Erfa {
            function: "eraEpv00",
            status,
        });
    }
    Ok((pvh, pvb))
}

/// The equation of the equinoxes (IAU 2006/2000A) \[radians\].
pub(super) fn equation_of_the_equinoxes(mjd_tt: f64) -> f64 {
    unsafe { erfa_sys::eraEe06a(ERFA_DJM0, mjd_tt) }
}

/// Geodetic coordinates on the WGS84 ellipsoid to a geocentric, Earth-fixed
/// position \[metres\].
pub(super) fn geodetic_to_geocentric(
    longitude_rad: f64,
    latitude_rad: f64,
    height_metres: f64,
) -> Result<[f64; 3], EphemerisError> {
    let mut xyz = [0.0; 3];
    let status = unsafe {
        erfa_sys::eraGd2gc(
            ERFA_WGS84 as i32, // ellipsoid identifier
            longitude_rad,     // longitude (radians, east +ve)
            latitude_rad,      // geodetic latitude (radians)
            height_metres,     // height above ellipsoid (metres)
            xyz.as_mut_ptr(),  // geocentric vector
        )
    };
    if status != 0 {
        return Err(EphemerisError::Erfa {
            function: "eraGd2gc",
            status,
        });
    }
    Ok(xyz)
}

/// Apply stellar aberration to the natural direction `pnat`, given the
/// observer's barycentric velocity `v` \[c\], the Sun-observer distance
/// \[au\] and the reciprocal of the Lorentz factor.
pub(super) fn aberrate(pnat: [f64; 3], v: [f64; 3], sun_distance_au: f64, bm1: f64) -> [f64; 3] {
    let mut pnat = pnat;
    let mut v = v;
    let mut ppr = [0.0; 3];
    unsafe {
        erfa_sys::eraAb(
            pnat.as_mut_ptr(),
            v.as_mut_ptr(),
            sun_distance_au,
            bm1,
            ppr.as_mut_ptr(),
        );
    }
    ppr
}

/// `m * p`.
pub(super) fn rotate(m: &Matrix, p: [f64; 3]) -> [f64; 3] {
    let mut m = *m;
    let mut p = p;
    let mut rp = [0.0; 3];
    unsafe {
        erfa_sys::eraRxp(m.as_mut_ptr(), p.as_mut_ptr(), rp.as_mut_ptr());
    }
    rp
}

/// `transpose(m) * p`.
pub(super) fn rotate_inverse(m: &Matrix, p: [f64; 3]) -> [f64; 3] {
    let mut m = *m;
    let mut p = p;
    let mut trp = [0.0; 3];
    unsafe {
        erfa_sys::eraTrxp(m.as_mut_ptr(), p.as_mut_ptr(), trp.as_mut_ptr());
    }
    trp
}

/// Split a vector into its modulus and a unit vector.
pub(crate) fn normalise(p: [f64; 3]) -> (f64, [f64; 3]) {
    let mut p = p;
    let mut r = 0.0;
    let mut u = [0.0; 3];
    unsafe {
        erfa_sys::eraPn(p.as_mut_ptr(), &mut r, u.as_mut_ptr());
    }
    (r, u)
}

/// The unit vector pointing at `radec`.
pub fn radec_to_unit_vector(radec: RADec) -> [f64; 3] {
    let mut c = [0.0; 3];
    unsafe {
        erfa_sys::eraS2c(radec.ra, radec.dec, c.as_mut_ptr());
    }
    c
}

/// The RA (in [0, 2π)) and Dec of a vector.
pub fn unit_vector_to_radec(p: [f64; 3]) -> RADec {
    let mut p = p;
    let mut ra = 0.0;
    let mut dec = 0.0;
    unsafe {
        erfa_sys::eraC2s(p.as_mut_ptr(), &mut ra, &mut dec);
        RADec::from_radians(erfa_sys::eraAnp(ra), dec)
    }
}

/// Normalise an angle into [0, 2π).
pub(super) fn wrap_angle(a: f64) -> f64 {
    unsafe { erfa_sys::eraAnp(a) }
}

/// The MJD (TT) of a Julian epoch, e.g. 2000.0.
pub(crate) fn julian_epoch_to_mjd(epoch: f64) -> f64 {
    let mut djm0 = 0.0;
    let mut djm = 0.0;
    unsafe {
        erfa_sys::eraEpj2jd(epoch, &mut djm0, &mut djm);
    }
    djm
}

/// The MJD (TT) of a Besselian epoch, e.g. 1950.0.
pub(crate) fn besselian_epoch_to_mjd(epoch: f64) -> f64 {
    let mut djm0 = 0.0;
    let mut djm = 0.0;
    unsafe {
        erfa_sys::eraEpb2jd(epoch, &mut djm0, &mut djm);
    }
    djm
}
