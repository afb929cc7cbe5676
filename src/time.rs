// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation windows, their time grids and conversions between
//! observatory-local civil time and absolute time.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use hifitime::{Duration, Epoch};
use thiserror::Error;
use vec1::Vec1;

/// A generous cap on the number of grid instants; anything above this is
/// almost certainly a units mistake.
const MAX_NUM_INSTANTS: f64 = 10_000_000.0;

/// Formats accepted for observatory-local civil times.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// A planned observation: the absolute start instant, how long it lasts and
/// how often to sample it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationWindow {
    pub start: Epoch,
    pub duration_hours: f64,
    pub cadence: Duration,
}

impl ObservationWindow {
    pub fn new(
        start: Epoch,
        duration_hours: f64,
        cadence: Duration,
    ) -> Result<ObservationWindow, InvalidWindowError> {
        if !duration_hours.is_finite() || duration_hours < 0.0 {
            return Err(InvalidWindowError::BadDuration(duration_hours));
        }
        let cadence_s = cadence.to_seconds();
        if cadence_s.is_nan() || cadence_s <= 0.0 {
            return Err(InvalidWindowError::BadCadence(cadence_s));
        }
        let window = ObservationWindow {
            start,
            duration_hours,
            cadence,
        };
        let n = window.num_steps() as f64 + 1.0;
        if n > MAX_NUM_INSTANTS {
            return Err(InvalidWindowError::TooManyInstants {
                duration_hours,
                cadence: cadence_s,
            });
        }
        Ok(window)
    }

    /// The nominal end of the window.
    pub fn end(&self) -> Epoch {
        self.start + Duration::from_seconds(self.duration_hours * 3600.0)
    }

    /// The number of cadence steps needed to reach (or pass) the end.
    fn num_steps(&self) -> usize {
        let ratio = self.duration_hours * 3600.0 / self.cadence.to_seconds();
        // Don't let float noise add a whole extra step.
        (ratio - 1e-9).ceil().max(0.0) as usize
    }

    /// Get the sample instants of this window. The first is the start, the
    /// spacing is the cadence and the last is at or after the nominal end. A
    /// zero-length window has exactly one instant.
    pub fn grid(&self) -> Vec1<Epoch> {
        let n = self.num_steps();
        let mut grid = Vec1::with_capacity(self.start, n + 1);
        grid.extend((1..=n).map(|i| self.start + self.cadence * i as f64));
        grid
    }
}

/// Convert observatory-local civil time text (e.g. "2024-06-21 06:00:00") to
/// an absolute [`Epoch`], given the observatory's offset from UTC in hours.
pub fn parse_local_civil_time(
    date_time: &str,
    utc_offset_hours: f64,
) -> Result<Epoch, InvalidWindowError> {
    let date_time = date_time.trim();
    let bad = || InvalidWindowError::BadStartTime(date_time.to_string());

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(date_time, f).ok())
        .ok_or_else(bad)?;
    let offset = fixed_offset(utc_offset_hours)
        .ok_or(InvalidWindowError::BadUtcOffset(utc_offset_hours))?;
    let utc = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(bad)?
        .naive_utc();

    let year = utc.year();
    if !(i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&year) {
        return Err(bad());
    }
    Ok(Epoch::from_gregorian_utc(
        year,
        utc.month() as u8,
        utc.day() as u8,
        utc.hour() as u8,
        utc.minute() as u8,
        utc.second() as u8,
        utc.nanosecond(),
    ))
}

/// Render an absolute instant as observatory-local civil time, e.g.
/// "2024-06-21 06:00:00".
pub fn format_local_civil_time(epoch: Epoch, utc_offset_hours: f64) -> String {
    let (y, mo, d, h, mi, s, _) = nearest_second(epoch).to_gregorian_utc();
    let utc = NaiveDate::from_ymd_opt(y, u32::from(mo), u32::from(d))
        .and_then(|date| date.and_hms_opt(u32::from(h), u32::from(mi), u32::from(s)));
    match (utc, fixed_offset(utc_offset_hours)) {
        (Some(utc), Some(offset)) => offset
            .from_utc_datetime(&utc)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        // Only reachable with absurd offsets or dates; fall back to UTC.
        _ => format_utc(epoch),
    }
}

/// Format a UTC offset like "UTC+05:30".
pub fn format_utc_offset(utc_offset_hours: f64) -> String {
    let total_minutes = (utc_offset_hours * 60.0).round() as i64;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let total_minutes = total_minutes.abs();
    format!(
        "UTC{sign}{:02}:{:02}",
        total_minutes / 60,
        total_minutes % 60
    )
}

/// Format an instant as UTC to the nearest second, e.g.
/// "2024-06-21T00:30:00 UTC".
pub fn format_utc(epoch: Epoch) -> String {
    let (y, mo, d, h, mi, s, _) = nearest_second(epoch).to_gregorian_utc();
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02} UTC")
}

/// Format an instant as a compact UTC label, e.g. "20240621T003000".
pub fn utc_label(epoch: Epoch) -> String {
    let (y, mo, d, h, mi, s, _) = nearest_second(epoch).to_gregorian_utc();
    format!("{y:04}{mo:02}{d:02}T{h:02}{mi:02}{s:02}")
}

/// Shift an instant so that truncating its Gregorian representation rounds
/// to the nearest second.
fn nearest_second(epoch: Epoch) -> Epoch {
    epoch + Duration::from_seconds(0.5)
}

fn fixed_offset(utc_offset_hours: f64) -> Option<FixedOffset> {
    if !utc_offset_hours.is_finite() {
        return None;
    }
    FixedOffset::east_opt((utc_offset_hours * 3600.0).round() as i32)
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidWindowError {
    #[error("The observation duration must be a non-negative number of hours; got {0}")]
    BadDuration(f64),

    #[error("The sampling cadence must be a positive number of seconds; got {0}")]
    BadCadence(f64),

    #[error("An observation of {duration_hours} hours sampled every {cadence} s has too many instants")]
    TooManyInstants { duration_hours: f64, cadence: f64 },

    #[error("Couldn't parse start time '{0}'; expected e.g. '2024-06-21 06:00:00' or '2024/06/21 06:00'")]
    BadStartTime(String),

    #[error("The UTC offset {0} hours is invalid")]
    BadUtcOffset(f64),
}
