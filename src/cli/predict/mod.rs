// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Predict when catalog sources come too close to the Sun during an
//! observation.


use std::{
    io::Read,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration as StdDuration,
};

use clap::Parser;
use hifitime::Duration;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    display_warnings, get_observatories, InfoPrinter, ARG_FILE_HELP, CADENCE_HELP, FORMAT_HELP,
    OBSERVATORY_HELP, TIMEOUT_HELP,
};
use crate::{
    constants::{DEFAULT_CADENCE_SECONDS, DEFAULT_TIMEOUT_SECONDS},
    misc::expensive_op,
    params::{SessionInputs, SessionParams},
    report::{write_artifacts, ResultFormat},
    time::{format_utc, format_utc_offset, InvalidWindowError},
    SunsepError,
};

const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PredictCliArgs {
    /// Path to the source catalog. Use "-" to read the catalog from stdin.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) catalog: Option<PathBuf>,

    /// A TOML file of extra observatories. Entries with the same name as a
    /// built-in observatory replace it.
    #[clap(long, help_heading = "INPUT FILES")]
    pub(super) observatory_file: Option<PathBuf>,

    #[clap(long, help = OBSERVATORY_HELP.as_str(), help_heading = "OBSERVATION")]
    pub(super) observatory: Option<String>,

    /// The start of the observation in the observatory's local civil time,
    /// e.g. "2024-06-21 06:00:00".
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) start: Option<String>,

    /// The length of the observation [hours].
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) duration: Option<f64>,

    /// Sources closer to the Sun than this are reported [degrees].
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) threshold: Option<f64>,

    #[clap(long, help = CADENCE_HELP.as_str(), help_heading = "COMPUTATION")]
    pub(super) cadence: Option<f64>,

    /// The most threads to use. Default: the number of CPUs.
    #[clap(long, help_heading = "COMPUTATION")]
    pub(super) max_threads: Option<usize>,

    #[clap(long, help = TIMEOUT_HELP.as_str(), help_heading = "COMPUTATION")]
    pub(super) timeout: Option<f64>,

    /// The directory to write results into. A subdirectory named after the
    /// observatory and start time is made inside it. Default: the current
    /// directory.
    #[clap(short, long, help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    #[clap(long, help = FORMAT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) format: Option<String>,

    /// Don't plot the separations.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) no_plots: bool,
}

impl PredictCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            catalog: self.catalog.or(other.catalog),
            observatory_file: self.observatory_file.or(other.observatory_file),
            observatory: self.observatory.or(other.observatory),
            start: self.start.or(other.start),
            duration: self.duration.or(other.duration),
            threshold: self.threshold.or(other.threshold),
            cadence: self.cadence.or(other.cadence),
            max_threads: self.max_threads.or(other.max_threads),
            timeout: self.timeout.or(other.timeout),
            output_dir: self.output_dir.or(other.output_dir),
            format: self.format.or(other.format),
            no_plots: self.no_plots || other.no_plots,
        }
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PredictArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "predict")]
    #[serde(default)]
    pub(super) predict_args: PredictCliArgs,
}

/// Everything needed to predict and write out the results.
struct PredictParams {
    session: SessionParams,
    output_dir: PathBuf,
    format: ResultFormat,
    plots: bool,
}

impl PredictArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct, preferring CLI arguments over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PredictArgs, SunsepError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let PredictArgs {
                args_file: _,
                predict_args,
            } = unpack_arg_file!(arg_file);

            Ok(PredictArgs {
                args_file: None,
                predict_args: cli_args.predict_args.merge(predict_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<PredictParams, SunsepError> {
        debug!("{:#?}", self);

        let PredictCliArgs {
            catalog,
            observatory_file,
            observatory,
            start,
            duration,
            threshold,
            cadence,
            max_threads,
            timeout,
            output_dir,
            format,
            no_plots,
        } = self.predict_args;

        let catalog = catalog.ok_or(PredictArgsError::NoCatalog)?;
        let observatory = observatory.ok_or(PredictArgsError::NoObservatory)?;
        let start_local = start.ok_or(PredictArgsError::NoStart)?;
        let duration_hours = duration.ok_or(PredictArgsError::NoDuration)?;
        let threshold_deg = threshold.ok_or(PredictArgsError::NoThreshold)?;

        let cadence_s = cadence.unwrap_or(DEFAULT_CADENCE_SECONDS);
        if !cadence_s.is_finite() || cadence_s <= 0.0 {
            return Err(InvalidWindowError::BadCadence(cadence_s).into());
        }
        let max_threads = match max_threads {
            None => None,
            Some(n) => Some(NonZeroUsize::new(n).ok_or(PredictArgsError::ZeroMaxThreads)?),
        };
        let timeout_s = timeout.unwrap_or(DEFAULT_TIMEOUT_SECONDS as f64);
        let timeout = match StdDuration::try_from_secs_f64(timeout_s) {
            Ok(t) if !t.is_zero() => t,
            _ => return Err(PredictArgsError::BadTimeout(timeout_s).into()),
        };
        let format = match format {
            None => ResultFormat::default(),
            Some(f) => ResultFormat::from_str(&f.to_lowercase())
                .map_err(|_| PredictArgsError::BadFormat(f))?,
        };

        let inputs = SessionInputs {
            catalog_text: read_catalog_text(&catalog)?,
            start_local,
            duration_hours,
            threshold_deg,
            observatory,
            observatories: get_observatories(observatory_file.as_deref())?,
            cadence: Duration::from_seconds(cadence_s),
            max_threads,
            timeout,
        };
        let session = inputs.parse()?;

        Ok(PredictParams {
            session,
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            format,
            plots: !no_plots,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SunsepError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let PredictParams {
            session,
            output_dir,
            format,
            plots,
        } = self.parse()?;
        print_params(&session, &output_dir, format, plots);
        display_warnings();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let result = session.run()?;
        for line in result.summary().lines() {
            info!("{line}");
        }
        info!("");

        let files = expensive_op(
            || write_artifacts(&result, &output_dir, format, plots),
            "Still writing results",
        )?;
        display_warnings();
        let mut printer = InfoPrinter::new("Wrote".into());
        for file in files {
            printer.push_line(file.display().to_string().into());
        }
        printer.display();
        Ok(())
    }
}

/// Read the catalog's text, either from a file or (if the path is "-") from
/// stdin.
fn read_catalog_text(catalog: &Path) -> Result<String, SunsepError> {
    let mut text = String::new();
    if catalog.as_os_str() == "-" {
        debug!("Reading the catalog from stdin");
        std::io::stdin().lock().read_to_string(&mut text)?;
    } else {
        debug!("Reading the catalog from {}", catalog.display());
        text = std::fs::read_to_string(catalog).map_err(|err| {
            SunsepError::Generic(format!(
                "Couldn't read catalog '{}': {err}",
                catalog.display()
            ))
        })?;
    }
    Ok(text)
}

fn print_params(session: &SessionParams, output_dir: &Path, format: ResultFormat, plots: bool) {
    let obs = &session.observatory;
    let mut printer = InfoPrinter::new("Session set up".into());
    printer.push_block(vec![
        format!("Observatory: {}", obs.name).into(),
        format!(
            "longitude {:.6}°, latitude {:.6}°, height {}m",
            obs.longitude_deg, obs.latitude_deg, obs.height_metres
        )
        .into(),
    ]);
    printer.push_block(vec![
        format!(
            "Start: {} ({})",
            session.start_local,
            format_utc_offset(obs.utc_offset_hours)
        )
        .into(),
        format!("       {}", format_utc(session.window.start)).into(),
        format!("End:   {}", format_utc(session.window.end())).into(),
        format!(
            "{} hours sampled every {} seconds",
            session.window.duration_hours,
            session.window.cadence.to_seconds()
        )
        .into(),
    ]);
    printer.push_line(format!("Threshold: {}°", session.threshold_deg).into());
    printer.push_line(
        format!(
            "{} sources using {} threads (timeout {:?})",
            session.catalog.len(),
            session.num_threads,
            session.timeout
        )
        .into(),
    );
    printer.push_line(
        format!(
            "Output: {}/ ({format}{})",
            output_dir.display(),
            if plots { ", plots" } else { "" }
        )
        .into(),
    );
    printer.display();
}

#[derive(Error, Debug)]
pub(super) enum PredictArgsError {
    #[error("No catalog was supplied")]
    NoCatalog,

    #[error("No observatory was supplied")]
    NoObservatory,

    #[error("No observation start time was supplied")]
    NoStart,

    #[error("No observation duration was supplied")]
    NoDuration,

    #[error("No threshold separation angle was supplied")]
    NoThreshold,

    #[error("The maximum number of threads cannot be 0")]
    ZeroMaxThreads,

    #[error("The timeout must be a positive number of seconds; got {0}")]
    BadTimeout(f64),

    #[error("Unrecognised result format '{0}'")]
    BadFormat(String),
}

impl From<PredictArgsError> for SunsepError {
    fn from(e: PredictArgsError) -> Self {
        match e {
            PredictArgsError::NoCatalog => Self::Catalog(e.to_string()),
            PredictArgsError::NoStart | PredictArgsError::NoDuration => Self::Window(e.to_string()),
            PredictArgsError::NoObservatory => Self::Observatory(e.to_string()),
            PredictArgsError::NoThreshold
            | PredictArgsError::ZeroMaxThreads
            | PredictArgsError::BadTimeout(_)
            | PredictArgsError::BadFormat(_) => Self::Generic(e.to_string()),
        }
    }
}
