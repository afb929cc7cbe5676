// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Source catalogs: one source per line with a name, RA, Dec and the epoch of
//! the coordinates, optionally followed by extra columns that are carried
//! along untouched.

mod error;
mod read;

pub use error::{MalformedCatalogError, ReadCatalogError};
pub use read::{parse_catalog, read_catalog_file};

use std::ops::{Deref, DerefMut};

use erfa_sys::ERFA_DJM0;
use indexmap::IndexMap;
use marlu::RADec;
use serde::{Deserialize, Serialize};

use crate::{
    ephemeris::{besselian_epoch_to_mjd, julian_epoch_to_mjd},
    sexagesimal::{degrees_to_sexagesimal_dms, degrees_to_sexagesimal_hms},
};

/// The epoch that a source's coordinates are referred to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CatalogEpoch {
    /// A Julian epoch, e.g. J2000.0. Bare numbers in a catalog are Julian.
    Julian(f64),

    /// A Besselian epoch, e.g. B1950.0. Only the epoch itself is honoured;
    /// no FK4 to FK5 frame conversion is done.
    Besselian(f64),
}

impl CatalogEpoch {
    /// The Modified Julian Date (TT) of this epoch.
    pub fn to_mjd(self) -> f64 {
        match self {
            CatalogEpoch::Julian(y) => julian_epoch_to_mjd(y),
            CatalogEpoch::Besselian(y) => besselian_epoch_to_mjd(y),
        }
    }

    /// The Julian Date (TT) of this epoch.
    pub fn to_jd(self) -> f64 {
        ERFA_DJM0 + self.to_mjd()
    }

    pub fn year(self) -> f64 {
        match self {
            CatalogEpoch::Julian(y) | CatalogEpoch::Besselian(y) => y,
        }
    }
}

impl std::fmt::Display for CatalogEpoch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CatalogEpoch::Julian(y) => write!(f, "J{y:.1}"),
            CatalogEpoch::Besselian(y) => write!(f, "B{y:.1}"),
        }
    }
}

/// A single catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,

    /// The catalog coordinates, referred to `epoch`. The RA is in [0, 2π).
    pub radec: RADec,

    pub epoch: CatalogEpoch,

    /// Any columns after the epoch, verbatim.
    pub extra_fields: Vec<String>,

    /// The (1-indexed) line of the catalog text this source came from.
    pub line_num: u32,
}

impl SourceRecord {
    /// The RA formatted as "HHhMMmSS.SSSSs".
    pub fn ra_hms(&self) -> String {
        degrees_to_sexagesimal_hms(self.radec.ra.to_degrees())
    }

    /// The Dec formatted as "±DDdMMmSS.SSSSs".
    pub fn dec_dms(&self) -> String {
        degrees_to_sexagesimal_dms(self.radec.dec.to_degrees())
    }
}

/// A collection of sources, keyed by name. The order of the catalog text is
/// preserved, so iterating over a `SourceCatalog` visits the sources in the
/// order that the user listed them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceCatalog(IndexMap<String, SourceRecord>);

impl SourceCatalog {
    /// Create an empty `SourceCatalog`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the position of a source in the catalog's order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.get_index_of(name)
    }
}

impl From<IndexMap<String, SourceRecord>> for SourceCatalog {
    fn from(sl: IndexMap<String, SourceRecord>) -> Self {
        Self(sl)
    }
}

impl FromIterator<SourceRecord> for SourceCatalog {
    fn from_iter<I: IntoIterator<Item = SourceRecord>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.name.clone(), s)).collect())
    }
}

impl Deref for SourceCatalog {
    type Target = IndexMap<String, SourceRecord>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SourceCatalog {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
