// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all sunsep-related errors. This should be the *only* error
//! enum that is publicly visible from the CLI.

use thiserror::Error;

use crate::{
    catalog::{MalformedCatalogError, ReadCatalogError},
    ephemeris::EphemerisError,
    observatory::ObservatoryError,
    params::SessionError,
    report::WriteError,
    time::InvalidWindowError,
};

/// The *only* publicly visible error from the sunsep CLI. Errors are grouped
/// by what the user would need to fix.
#[derive(Error, Debug)]
pub enum SunsepError {
    /// A problem with the source catalog.
    #[error("{0}\n\nCatalog lines look like: NAME RA DEC EPOCH [EXTRA...], e.g. 'CasA 23h23m24s +58d48m54s J2000'")]
    Catalog(String),

    /// A problem with the observation window (start time, duration or
    /// cadence).
    #[error("{0}\n\nStart times look like '2024-06-21 06:00:00' and are in the observatory's local civil time")]
    Window(String),

    /// A problem with the observatory or the observatory file.
    #[error("{0}")]
    Observatory(String),

    /// An instant or epoch the ephemerides can't handle.
    #[error("{0}")]
    Ephemeris(String),

    /// The computation took too long.
    #[error("{0}\n\nIf this is expected, increase --timeout")]
    Timeout(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// An error writing results or plots.
    #[error("{0}")]
    Write(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<MalformedCatalogError> for SunsepError {
    fn from(e: MalformedCatalogError) -> Self {
        Self::Catalog(e.to_string())
    }
}

impl From<ReadCatalogError> for SunsepError {
    fn from(e: ReadCatalogError) -> Self {
        match e {
            ReadCatalogError::Malformed(e) => Self::from(e),
            ReadCatalogError::IO { .. } => Self::Generic(e.to_string()),
        }
    }
}

impl From<InvalidWindowError> for SunsepError {
    fn from(e: InvalidWindowError) -> Self {
        Self::Window(e.to_string())
    }
}

impl From<ObservatoryError> for SunsepError {
    fn from(e: ObservatoryError) -> Self {
        Self::Observatory(e.to_string())
    }
}

impl From<EphemerisError> for SunsepError {
    fn from(e: EphemerisError) -> Self {
        Self::Ephemeris(e.to_string())
    }
}

impl From<SessionError> for SunsepError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Catalog(e) => Self::from(e),
            SessionError::Window(e) => Self::from(e),
            SessionError::Observatory(e) => Self::from(e),
            SessionError::Ephemeris(e) => Self::from(e),
            SessionError::BadThreshold(_) => Self::Generic(e.to_string()),
            SessionError::ComputationTimeout { .. } => Self::Timeout(e.to_string()),
            SessionError::Cancelled | SessionError::ThreadPool(_) => Self::Generic(e.to_string()),
        }
    }
}

impl From<WriteError> for SunsepError {
    fn from(e: WriteError) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<std::io::Error> for SunsepError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
