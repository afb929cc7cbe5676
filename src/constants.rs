// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `sunsep` should do as many
calculations as possible in double precision.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// The default time between samples of an observation window \[seconds\]. One
/// sample per minute moves the Sun by ~0.04° relative to a source, so no
/// violation window longer than the cadence can be missed.
pub const DEFAULT_CADENCE_SECONDS: f64 = 60.0;

/// The default session-level time budget \[seconds\].
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// The Modified Julian Date of the J2000.0 epoch (2000 January 1.5 TT).
pub const MJD_J2000: f64 = 51544.5;

/// The number of days in a Julian year.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

pub const SECONDS_PER_DAY: f64 = 86400.0;

/// One astronomical unit \[metres\].
pub const AU_M: f64 = 149597870700.0;

/// The earliest calendar year for which ephemerides are computed. ERFA's
/// Earth ephemeris (epv00) is only valid within a century of J2000.
pub const EPHEMERIS_MIN_YEAR: i32 = 1900;

/// The latest calendar year for which ephemerides are computed.
pub const EPHEMERIS_MAX_YEAR: i32 = 2100;

/// The earliest catalog epoch that sources may be referred to.
pub const CATALOG_EPOCH_MIN_YEAR: i32 = 1800;

/// The latest catalog epoch that sources may be referred to.
pub const CATALOG_EPOCH_MAX_YEAR: i32 = 2200;
