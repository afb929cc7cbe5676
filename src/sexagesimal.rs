// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Code for handling conversion to and from sexagesimal.

Signs are always read from the text, not from the leading number, so that
values like "-00d30m00s" are negative.
 */

use thiserror::Error;

/// Split a leading sign off of a string. Returns `true` if the value is
/// negative.
fn split_sign(s: &str) -> (bool, &str) {
    let s = s.trim();
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    }
}

fn parse_field(s: &str, whole: &str) -> Result<f64, SexagesimalError> {
    // Signs are only allowed on the leading field.
    if s.is_empty() || s.starts_with(['+', '-']) {
        return Err(SexagesimalError::BadField(whole.to_string()));
    }
    Ok(s.parse()?)
}

/// Combine unsigned fields into a single number, checking that the minutes
/// and seconds are sensible.
fn combine(
    negative: bool,
    major: f64,
    minutes: f64,
    seconds: f64,
    whole: &str,
) -> Result<f64, SexagesimalError> {
    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return Err(SexagesimalError::MinutesOrSecondsOutOfRange(
            whole.to_string(),
        ));
    }
    let num = major + minutes / 60.0 + seconds / 3600.0;
    Ok(if negative { -num } else { num })
}

/// Convert "degrees minutes seconds" to a float \[degrees\]. The sign of the
/// degrees is applied to the whole value.
pub fn sexagesimal_dms_to_degrees(d: f64, m: f64, s: f64) -> f64 {
    let num = d.abs() + m / 60.0 + s / 3600.0;
    if d.is_sign_negative() {
        -num
    } else {
        num
    }
}

/// Convert "hours minutes seconds" to a float \[degrees\].
pub fn sexagesimal_hms_to_degrees(h: f64, m: f64, s: f64) -> f64 {
    15.0 * sexagesimal_dms_to_degrees(h, m, s)
}

/// Convert a sexagesimal-formatted string delimited by colons to a float
/// \[degrees\]. The input is assumed to be in "degrees minutes seconds".
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// # use approx::*;
/// # fn main() -> Result<(), SexagesimalError> {
/// let f = sexagesimal_colon_str_to_degrees("-22:58:52.56")?;
/// assert_abs_diff_eq!(f, -22.981267, epsilon = 1e-6);
/// # Ok(())
/// # }
/// ```
pub fn sexagesimal_colon_str_to_degrees(s: &str) -> Result<f64, SexagesimalError> {
    let (negative, unsigned) = split_sign(s);
    let fields = unsigned
        .split(':')
        .map(|f| parse_field(f, s))
        .collect::<Result<Vec<f64>, _>>()?;
    match fields.as_slice() {
        [d, m, sec] => combine(negative, *d, *m, *sec, s),
        [d, m] => combine(negative, *d, *m, 0.0, s),
        _ => Err(SexagesimalError::WrongFieldCount(s.to_string())),
    }
}

/// Convert a sexagesimal-formatted string delimited by colons to a float
/// \[degrees\]. The input is assumed to be in "hours minutes seconds".
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// # use approx::*;
/// # fn main() -> Result<(), SexagesimalError> {
/// let f = sexagesimal_hms_colon_str_to_degrees("06:13:43.90")?;
/// assert_abs_diff_eq!(f, 93.432917, epsilon = 1e-6);
/// # Ok(())
/// # }
/// ```
pub fn sexagesimal_hms_colon_str_to_degrees(s: &str) -> Result<f64, SexagesimalError> {
    Ok(15.0 * sexagesimal_colon_str_to_degrees(s)?)
}

/// Convert a sexagesimal-formatted string in "degrees minutes seconds" to a
/// float \[degrees\]. Both the "d m s" markers and the "d ' \"" markers are
/// understood, and the trailing seconds marker is optional.
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// # use approx::*;
/// # fn main() -> Result<(), SexagesimalError> {
/// let f = sexagesimal_dms_string_to_degrees("-11d49m01.062s")?;
/// assert_abs_diff_eq!(f, -11.81696167, epsilon = 1e-6);
/// let f = sexagesimal_dms_string_to_degrees("-02d00'47.20\"")?;
/// assert_abs_diff_eq!(f, -2.01311111, epsilon = 1e-6);
/// # Ok(())
/// # }
/// ```
pub fn sexagesimal_dms_string_to_degrees(dms: &str) -> Result<f64, SexagesimalError> {
    let (negative, unsigned) = split_sign(dms);

    let (d, rest) = unsigned
        .split_once(['d', '°'])
        .ok_or_else(|| SexagesimalError::MissingD(dms.to_string()))?;
    let (m, rest) = rest
        .split_once(['m', '\''])
        .ok_or_else(|| SexagesimalError::MissingM(dms.to_string()))?;
    let s = rest
        .strip_suffix(['s', '"'])
        .unwrap_or(rest);
    if s.is_empty() {
        return Err(SexagesimalError::MissingS(dms.to_string()));
    }

    combine(
        negative,
        parse_field(d, dms)?,
        parse_field(m, dms)?,
        parse_field(s, dms)?,
        dms,
    )
}

/// Convert a sexagesimal-formatted string in "hours minutes seconds" to a
/// float \[degrees\].
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// # use approx::*;
/// # fn main() -> Result<(), SexagesimalError> {
/// let s = "-11h49m01.062s";
/// let f = sexagesimal_hms_string_to_degrees(s)?;
/// assert_abs_diff_eq!(f, -177.254425, epsilon = 1e-6);
/// # Ok(())
/// # }
/// ```
pub fn sexagesimal_hms_string_to_degrees(hms: &str) -> Result<f64, SexagesimalError> {
    let (negative, unsigned) = split_sign(hms);

    let (h, rest) = unsigned
        .split_once('h')
        .ok_or_else(|| SexagesimalError::MissingH(hms.to_string()))?;
    let (m, rest) = rest
        .split_once('m')
        .ok_or_else(|| SexagesimalError::MissingM(hms.to_string()))?;
    let s = rest.strip_suffix('s').unwrap_or(rest);
    if s.is_empty() {
        return Err(SexagesimalError::MissingS(hms.to_string()));
    }

    Ok(15.0
        * combine(
            negative,
            parse_field(h, hms)?,
            parse_field(m, hms)?,
            parse_field(s, hms)?,
            hms,
        )?)
}

/// Break an unsigned value into whole units, whole minutes and seconds,
/// rounded to 4 decimal places of seconds. Carries are propagated, so
/// 59.99999 seconds becomes the next minute.
fn to_parts(f_abs: f64) -> (u32, u32, f64) {
    let total_tenthousandths = (f_abs * 3600.0 * 1e4).round() as u64;
    let major = total_tenthousandths / (3600 * 10_000);
    let rem = total_tenthousandths % (3600 * 10_000);
    let minutes = rem / (60 * 10_000);
    let seconds = (rem % (60 * 10_000)) as f64 / 1e4;
    (major as u32, minutes as u32, seconds)
}

/// Convert a number in degrees to a sexagesimal-formatted string in "degrees
/// minutes seconds".
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// let dms = degrees_to_sexagesimal_dms(-165.0169619);
/// assert_eq!(dms, "-165d01m01.0628s");
/// ```
pub fn degrees_to_sexagesimal_dms(f: f64) -> String {
    let (degrees, minutes, seconds) = to_parts(f.abs());
    format!(
        "{sign}{degrees:02}d{minutes:02}m{seconds:07.4}s",
        sign = if f < 0.0 { "-" } else { "" },
    )
}

/// Convert a number in degrees to a sexagesimal-formatted string in "hours
/// minutes seconds".
///
/// # Examples
///
/// ```
/// # use sunsep::sexagesimal::*;
/// let hms = degrees_to_sexagesimal_hms(93.43291667);
/// assert_eq!(hms, "06h13m43.9000s");
/// ```
pub fn degrees_to_sexagesimal_hms(f: f64) -> String {
    let (hours, minutes, seconds) = to_parts(f.abs() / 15.0);
    format!(
        "{sign}{hours:02}h{minutes:02}m{seconds:07.4}s",
        sign = if f < 0.0 { "-" } else { "" },
    )
}

#[derive(Error, Debug, PartialEq)]
pub enum SexagesimalError {
    /// Two or three numbers (fields) are expected; this error is used when the
    /// number of fields is something else.
    #[error("Did not get three sexagesimal fields: {0}")]
    WrongFieldCount(String),

    #[error("Did not find 'h' when attempting to read sexagesimal string: {0}")]
    MissingH(String),

    #[error("Did not find 'd' when attempting to read sexagesimal string: {0}")]
    MissingD(String),

    #[error("Did not find 'm' when attempting to read sexagesimal string: {0}")]
    MissingM(String),

    #[error("Did not find the seconds when attempting to read sexagesimal string: {0}")]
    MissingS(String),

    #[error("Empty or signed inner field in sexagesimal string: {0}")]
    BadField(String),

    #[error("Minutes and seconds must be in the range [0, 60) in sexagesimal string: {0}")]
    MinutesOrSecondsOutOfRange(String),

    #[error("{0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn test_sex2float_1() {
        let result = sexagesimal_colon_str_to_degrees("-22:58:52.56");
        assert!(result.is_ok());
        assert_abs_diff_eq!(result.unwrap(), -22.981266666666667, epsilon = 1e-10);
    }

    #[test]
    fn test_sex2float_2() {
        let result = sexagesimal_colon_str_to_degrees("12:30:45");
        assert!(result.is_ok());
        assert_abs_diff_eq!(result.unwrap(), 12.5125, epsilon = 1e-10);
    }

    #[test]
    fn test_sex_hms_1() {
        let result = sexagesimal_hms_string_to_degrees("11h34m23.7854s");
        assert!(result.is_ok(), "{}", result.unwrap_err());
        assert_abs_diff_eq!(result.unwrap(), 173.59910583333334, epsilon = 1e-10);
    }

    #[test]
    fn test_negative_zero_degrees() {
        let result = sexagesimal_dms_string_to_degrees("-00d30m00s").unwrap();
        assert_abs_diff_eq!(result, -0.5, epsilon = 1e-12);
        let result = sexagesimal_colon_str_to_degrees("-00:30:00").unwrap();
        assert_abs_diff_eq!(result, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quote_markers() {
        let result = sexagesimal_dms_string_to_degrees("-02d00'47.20\"").unwrap();
        assert_abs_diff_eq!(result, -(2.0 + 47.2 / 3600.0), epsilon = 1e-12);
        let result = sexagesimal_dms_string_to_degrees("+45°30'00").unwrap();
        assert_abs_diff_eq!(result, 45.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_strings() {
        assert!(matches!(
            sexagesimal_hms_string_to_degrees("06:13:43.9"),
            Err(SexagesimalError::MissingH(_))
        ));
        assert!(matches!(
            sexagesimal_dms_string_to_degrees("12d30"),
            Err(SexagesimalError::MissingM(_))
        ));
        assert!(matches!(
            sexagesimal_hms_string_to_degrees("06h13m"),
            Err(SexagesimalError::MissingS(_))
        ));
        assert!(matches!(
            sexagesimal_dms_string_to_degrees("10d-5m3s"),
            Err(SexagesimalError::BadField(_))
        ));
        assert!(matches!(
            sexagesimal_dms_string_to_degrees("10d75m3s"),
            Err(SexagesimalError::MinutesOrSecondsOutOfRange(_))
        ));
        assert!(matches!(
            sexagesimal_colon_str_to_degrees("1:2:3:4"),
            Err(SexagesimalError::WrongFieldCount(_))
        ));
        assert!(matches!(
            sexagesimal_colon_str_to_degrees("1:x:3"),
            Err(SexagesimalError::ParseFloat(_))
        ));
    }

    #[test]
    fn test_to_string_carries() {
        // 59.99999 seconds must not be displayed as "60.0000s".
        let f = 10.0 + 59.0 / 60.0 + 59.99999 / 3600.0;
        assert_eq!(degrees_to_sexagesimal_dms(f), "11d00m00.0000s");
        assert_eq!(degrees_to_sexagesimal_dms(-0.5), "-00d30m00.0000s");
        assert_eq!(degrees_to_sexagesimal_hms(0.0), "00h00m00.0000s");
    }

    #[test]
    fn test_string_round_trip() {
        for &ra in &[0.0, 93.43291667, 179.99999, 359.9999] {
            let s = degrees_to_sexagesimal_hms(ra);
            let back = sexagesimal_hms_string_to_degrees(&s).unwrap();
            assert_abs_diff_eq!(ra, back, epsilon = 1e-6);
        }
        for &dec in &[-90.0, -2.01311111, -0.25, 0.0, 45.123456, 90.0] {
            let s = degrees_to_sexagesimal_dms(dec);
            let back = sexagesimal_dms_string_to_degrees(&s).unwrap();
            assert_abs_diff_eq!(dec, back, epsilon = 1e-6);
        }
    }
}
