// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parsing of whitespace-delimited source catalogs.

use std::path::Path;

use indexmap::map::Entry;
use marlu::RADec;
use regex::Regex;

use super::{CatalogEpoch, MalformedCatalogError, ReadCatalogError, SourceCatalog, SourceRecord};
use crate::{cli::Warn, sexagesimal::*};

lazy_static::lazy_static! {
    static ref EPOCH_REGEX: Regex = Regex::new(r"^([JjBb])?(\d{3,4}(?:\.\d*)?)$").unwrap();
}

/// Read a catalog file and parse it with [`parse_catalog`].
pub fn read_catalog_file<P: AsRef<Path>>(file: P) -> Result<SourceCatalog, ReadCatalogError> {
    let file = file.as_ref();
    let text = std::fs::read_to_string(file).map_err(|err| ReadCatalogError::IO {
        file: file.to_path_buf(),
        err,
    })?;
    let catalog = parse_catalog(&text)?;
    log::debug!(
        "Read {} sources from '{}'",
        catalog.len(),
        file.display()
    );
    Ok(catalog)
}

/// Parse catalog text into a [`SourceCatalog`]. Each non-comment line must
/// look like
///
/// ```text
/// name  RA  Dec  epoch  [extra fields...]
/// ```
///
/// with fields separated by whitespace, tabs or commas. The RA may be
/// "HHhMMmSS.SSs", "HH:MM:SS.SS" (both hours) or decimal degrees. The Dec may
/// be "±DDdMMmSS.SSs", "±DDdMM'SS.SS\"", "±DD:MM:SS.SS" or decimal degrees.
/// The epoch is a year, optionally prefixed with "J" or "B" (bare years are
/// Julian). Lines starting with "#" or "//" are comments, and a leading header
/// line starting with "Source" or "Name" is ignored.
pub fn parse_catalog(text: &str) -> Result<SourceCatalog, MalformedCatalogError> {
    let mut catalog = SourceCatalog::new();
    let mut seen_data = false;
    let mut num_besselian = 0;

    for (i, line) in text.lines().enumerate() {
        let line_num = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let mut items = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty());
        // There's at least one item, because the line isn't empty.
        let name = match items.next() {
            Some(n) => n,
            None => continue,
        };
        if !seen_data
            && (name.eq_ignore_ascii_case("source") || name.eq_ignore_ascii_case("name"))
        {
            log::debug!("Skipping catalog header on line {line_num}");
            seen_data = true;
            continue;
        }
        seen_data = true;

        let ra = items.next().ok_or(MalformedCatalogError::MissingField {
            line_num,
            field: "RA",
        })?;
        let dec = items.next().ok_or(MalformedCatalogError::MissingField {
            line_num,
            field: "Dec",
        })?;
        let epoch = items.next().ok_or(MalformedCatalogError::MissingField {
            line_num,
            field: "epoch",
        })?;
        let extra_fields: Vec<String> = items.map(|s| s.to_string()).collect();

        let ra = parse_ra(ra, line_num)?;
        let dec = parse_dec(dec, line_num)?;
        let epoch = parse_epoch(epoch, line_num)?;
        if matches!(epoch, CatalogEpoch::Besselian(_)) {
            num_besselian += 1;
        }

        let record = SourceRecord {
            name: name.to_string(),
            radec: RADec::from_degrees(ra, dec),
            epoch,
            extra_fields,
            line_num,
        };
        match catalog.entry(record.name.clone()) {
            Entry::Occupied(o) => {
                return Err(MalformedCatalogError::DuplicateName {
                    line_num,
                    name: record.name,
                    first_line_num: o.get().line_num,
                })
            }
            Entry::Vacant(v) => {
                v.insert(record);
            }
        }
    }

    if num_besselian > 0 {
        format!("{num_besselian} catalog source(s) use Besselian epochs; these are precessed from the epoch without an FK4 to FK5 conversion").warn();
    }

    Ok(catalog)
}

/// Parse an RA string into degrees in [0, 360).
fn parse_ra(s: &str, line_num: u32) -> Result<f64, MalformedCatalogError> {
    let bad = |reason: String| MalformedCatalogError::BadAngle {
        line_num,
        field: "RA",
        value: s.to_string(),
        reason,
    };
    let ra = if s.contains(['h', 'H']) {
        sexagesimal_hms_string_to_degrees(&s.to_ascii_lowercase())
            .map_err(|e| bad(e.to_string()))?
    } else if s.contains(':') {
        sexagesimal_hms_colon_str_to_degrees(s).map_err(|e| bad(e.to_string()))?
    } else {
        s.parse::<f64>()
            .map_err(|_| bad("not a number or sexagesimal value".to_string()))?
    };

    if !(0.0..360.0).contains(&ra) {
        return Err(MalformedCatalogError::AngleOutOfRange {
            line_num,
            field: "RA",
            value: s.to_string(),
            range: "0 <= RA < 24h or 360°",
        });
    }
    Ok(ra)
}

/// Parse a Dec string into degrees in [-90, 90].
fn parse_dec(s: &str, line_num: u32) -> Result<f64, MalformedCatalogError> {
    let bad = |reason: String| MalformedCatalogError::BadAngle {
        line_num,
        field: "Dec",
        value: s.to_string(),
        reason,
    };
    let dec = if s.contains(['d', 'D', '°']) {
        sexagesimal_dms_string_to_degrees(&s.to_lowercase()).map_err(|e| bad(e.to_string()))?
    } else if s.contains(':') {
        sexagesimal_colon_str_to_degrees(s).map_err(|e| bad(e.to_string()))?
    } else {
        s.parse::<f64>()
            .map_err(|_| bad("not a number or sexagesimal value".to_string()))?
    };

    if !(-90.0..=90.0).contains(&dec) {
        return Err(MalformedCatalogError::AngleOutOfRange {
            line_num,
            field: "Dec",
            value: s.to_string(),
            range: "-90° <= Dec <= 90°",
        });
    }
    Ok(dec)
}

fn parse_epoch(s: &str, line_num: u32) -> Result<CatalogEpoch, MalformedCatalogError> {
    let bad = || MalformedCatalogError::BadEpoch {
        line_num,
        value: s.to_string(),
    };
    let caps = EPOCH_REGEX.captures(s).ok_or_else(bad)?;
    let year: f64 = caps[2].parse().map_err(|_| bad())?;
    match caps.get(1).map(|m| m.as_str()) {
        Some("B" | "b") => Ok(CatalogEpoch::Besselian(year)),
        _ => Ok(CatalogEpoch::Julian(year)),
    }
}
