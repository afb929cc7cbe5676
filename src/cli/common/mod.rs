// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared between `sunsep` subcommands.

mod printers;

pub(crate) use printers::{display_warnings, InfoPrinter, Warn};

use std::path::Path;

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::SunsepError;
use crate::{
    constants::{DEFAULT_CADENCE_SECONDS, DEFAULT_TIMEOUT_SECONDS},
    observatory::ObservatoryRegistry,
    report::ResultFormat,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref OBSERVATORY_HELP: String =
        format!("The observatory to predict for. Built-in observatories: {}. Case insensitive", ObservatoryRegistry::builtin().iter().map(|o| &o.name).join(", "));

    pub(super) static ref CADENCE_HELP: String =
        format!("The time between samples [seconds]. Default: {DEFAULT_CADENCE_SECONDS}");

    pub(super) static ref TIMEOUT_HELP: String =
        format!("Give up if the computation takes longer than this [seconds]. Default: {DEFAULT_TIMEOUT_SECONDS}");

    pub(super) static ref FORMAT_HELP: String =
        format!("The format of the machine-readable result. Supported formats: {}. Default: {}", ResultFormat::iter().join(", "), ResultFormat::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SunsepError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SunsepError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(SunsepError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// The built-in observatories, extended by a user's observatory file if one
/// was given.
pub(super) fn get_observatories(
    observatory_file: Option<&Path>,
) -> Result<ObservatoryRegistry, SunsepError> {
    let mut registry = ObservatoryRegistry::builtin();
    if let Some(file) = observatory_file {
        log::debug!("Reading observatories from {}", file.display());
        registry.extend_from_file(file)?;
    }
    Ok(registry)
}
