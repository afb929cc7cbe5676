// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observatory locations.
//!
//! A handful of observatories are built in. More can be supplied (or the
//! built-in ones overridden) with a TOML file like
//!
//! ```toml
//! [[observatory]]
//! name = "GMRT"
//! longitude_deg = 74.049742
//! latitude_deg = 19.096517
//! height_metres = 650.0
//! utc_offset_hours = 5.5
//! ```

use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an observatory is and which civil time it keeps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservatoryLocation {
    pub name: String,

    /// Geodetic longitude, east positive \[degrees\]
    pub longitude_deg: f64,

    /// Geodetic latitude \[degrees\]
    pub latitude_deg: f64,

    /// Height above the ellipsoid \[metres\]
    pub height_metres: f64,

    /// The offset of local civil time from UTC \[hours\]
    pub utc_offset_hours: f64,
}

impl ObservatoryLocation {
    fn validate(&self) -> Result<(), ObservatoryError> {
        let invalid = |reason: &str| ObservatoryError::InvalidLocation {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("the name is empty"));
        }
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(invalid("latitude must be within [-90, 90] degrees"));
        }
        if !(-180.0..=360.0).contains(&self.longitude_deg) {
            return Err(invalid("longitude must be within [-180, 360] degrees"));
        }
        if !self.height_metres.is_finite() {
            return Err(invalid("height must be finite"));
        }
        if !(-14.0..=14.0).contains(&self.utc_offset_hours) {
            return Err(invalid("UTC offset must be within [-14, 14] hours"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservatoryFile {
    #[serde(default)]
    observatory: Vec<ObservatoryLocation>,
}

/// Known observatories, keyed by upper-case name.
#[derive(Clone, Debug)]
pub struct ObservatoryRegistry(IndexMap<String, ObservatoryLocation>);

impl ObservatoryRegistry {
    /// The registry of built-in observatories.
    pub fn builtin() -> ObservatoryRegistry {
        let entries = [
            ("GMRT", 74.049742, 19.096517, 650.0, 5.5),
            ("ORT", 76.666136, 11.383404, 2150.0, 5.5),
            ("MWA", 116.67081523611111, -26.703319405555554, 377.827, 8.0),
            ("Parkes", 148.263510, -32.998370, 414.8, 10.0),
        ];
        ObservatoryRegistry(
            entries
                .into_iter()
                .map(|(name, lon, lat, height, offset)| {
                    (
                        name.to_uppercase(),
                        ObservatoryLocation {
                            name: name.to_string(),
                            longitude_deg: lon,
                            latitude_deg: lat,
                            height_metres: height,
                            utc_offset_hours: offset,
                        },
                    )
                })
                .collect(),
        )
    }

    /// Add the observatories described by TOML text, replacing any existing
    /// entries with the same name.
    pub fn extend_from_toml_str(&mut self, toml_str: &str) -> Result<(), ObservatoryError> {
        let file: ObservatoryFile =
            toml::from_str(toml_str).map_err(|e| ObservatoryError::Toml(e.to_string()))?;
        for location in file.observatory {
            location.validate()?;
            log::debug!("Registering observatory '{}'", location.name);
            self.0.insert(location.name.to_uppercase(), location);
        }
        Ok(())
    }

    /// Add the observatories in a TOML file.
    pub fn extend_from_file<P: AsRef<Path>>(&mut self, file: P) -> Result<(), ObservatoryError> {
        let file = file.as_ref();
        let contents = std::fs::read_to_string(file).map_err(|err| ObservatoryError::IO {
            file: file.display().to_string(),
            err: err.to_string(),
        })?;
        self.extend_from_toml_str(&contents)
    }

    /// Look up an observatory by name (case insensitive).
    pub fn get(&self, name: &str) -> Result<&ObservatoryLocation, ObservatoryError> {
        self.0
            .get(&name.trim().to_uppercase())
            .ok_or_else(|| ObservatoryError::Unknown {
                name: name.to_string(),
                known: self.0.values().map(|l| &l.name).join(", "),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObservatoryLocation> {
        self.0.values()
    }
}

impl Default for ObservatoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ObservatoryError {
    #[error("Unknown observatory '{name}'; known observatories are: {known}")]
    Unknown { name: String, known: String },

    #[error("Observatory '{name}' is invalid: {reason}")]
    InvalidLocation { name: String, reason: String },

    #[error("Couldn't parse the observatory file: {0}")]
    Toml(String),

    #[error("Couldn't read observatory file '{file}': {err}")]
    IO { file: String, err: String },
}
