// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! List the observatories sunsep knows about.

use std::path::PathBuf;

use clap::Parser;
use log::info;

use super::common::get_observatories;
use crate::{time::format_utc_offset, SunsepError};

/// Print the built-in observatories, and those of an observatory file.
#[derive(Parser, Debug)]
pub struct ObservatoriesArgs {
    /// A TOML file of extra observatories.
    #[clap(long)]
    observatory_file: Option<PathBuf>,
}

impl ObservatoriesArgs {
    pub fn run(&self) -> Result<(), SunsepError> {
        let registry = get_observatories(self.observatory_file.as_deref())?;
        info!(
            "{:<12} {:>12} {:>12} {:>10}  {}",
            "Name", "Longitude", "Latitude", "Height", "Civil time"
        );
        for obs in registry.iter() {
            info!(
                "{:<12} {:>11.6}° {:>11.6}° {:>9.1}m  {}",
                obs.name,
                obs.longitude_deg,
                obs.latitude_deg,
                obs.height_metres,
                format_utc_offset(obs.utc_offset_hours)
            );
        }
        Ok(())
    }
}
