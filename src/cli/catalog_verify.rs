// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to verify source catalogs.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use super::common::display_warnings;
use crate::{catalog::read_catalog_file, SunsepError};

/// Verify that source catalogs can be read by sunsep.
#[derive(Parser, Debug)]
pub struct CatalogVerifyArgs {
    /// Path to the catalog(s) to be verified.
    #[clap(name = "CATALOGS", parse(from_os_str))]
    catalogs: Vec<PathBuf>,
}

impl CatalogVerifyArgs {
    pub fn run(&self) -> Result<(), SunsepError> {
        verify(&self.catalogs)
    }
}

/// Read and print stats out for each catalog. If a catalog couldn't be read,
/// print the error, continue with the others and fail at the end.
fn verify<P: AsRef<Path>>(catalogs: &[P]) -> Result<(), SunsepError> {
    if catalogs.is_empty() {
        return Err(SunsepError::Catalog("No catalogs were supplied!".to_string()));
    }

    let mut num_bad = 0;
    for catalog in catalogs {
        let catalog = catalog.as_ref();
        info!("{}:", catalog.display());

        let cat = match crate::misc::expensive_op(
            || read_catalog_file(catalog),
            "Still reading catalog file",
        ) {
            Ok(c) => c,
            Err(e) => {
                info!("    {e}");
                info!("");
                num_bad += 1;
                continue;
            }
        };

        let num_besselian = cat
            .values()
            .filter(|s| matches!(s.epoch, crate::catalog::CatalogEpoch::Besselian(_)))
            .count();
        let num_extra = cat.values().filter(|s| !s.extra_fields.is_empty()).count();
        info!(
            "    {} sources ({} J epochs, {num_besselian} B epochs)",
            cat.len(),
            cat.len() - num_besselian
        );
        if num_extra > 0 {
            info!("    {num_extra} sources have extra columns");
        }
        info!("");
    }
    display_warnings();

    if num_bad > 0 {
        return Err(SunsepError::Catalog(format!(
            "{num_bad} of {} catalogs could not be read",
            catalogs.len()
        )));
    }
    Ok(())
}
