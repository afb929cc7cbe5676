// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running a whole session: parse and validate the inputs, then compute the
//! Sun's position once per instant and every source's separation series on a
//! bounded worker pool, all within a time budget.

use std::{num::NonZeroUsize, thread, time::Duration as StdDuration};

use crossbeam_channel::{bounded, RecvTimeoutError};
use crossbeam_utils::atomic::AtomicCell;
use hifitime::{Duration, Epoch};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use scopeguard::defer_on_unwind;
use sha2::{Digest, Sha256};
use thiserror::Error;
use vec1::Vec1;

use crate::{
    catalog::{parse_catalog, MalformedCatalogError, SourceCatalog},
    constants::{DEFAULT_CADENCE_SECONDS, DEFAULT_TIMEOUT_SECONDS},
    ephemeris::{ApparentFrame, EphemerisError, SunEphemeris},
    observatory::{ObservatoryError, ObservatoryLocation, ObservatoryRegistry},
    overlap::detect_violations,
    report::{SessionMetadata, SessionResult},
    separation::{compute_series, SeparationError},
    time::{parse_local_civil_time, InvalidWindowError, ObservationWindow},
    PROGRESS_BARS,
};

/// Everything needed to run a session, as supplied by a user. Nothing here
/// has been validated yet.
#[derive(Debug, Clone)]
pub struct SessionInputs {
    /// The text of the source catalog.
    pub catalog_text: String,

    /// The observation start in observatory-local civil time, e.g.
    /// "2024-06-21 06:00:00".
    pub start_local: String,

    pub duration_hours: f64,

    /// Separations strictly below this are violations \[degrees\].
    pub threshold_deg: f64,

    /// The name of the observatory; it must be in `observatories`.
    pub observatory: String,

    pub observatories: ObservatoryRegistry,

    pub cadence: Duration,

    /// The most worker threads to use. If not given, the number of CPUs is
    /// used.
    pub max_threads: Option<NonZeroUsize>,

    pub timeout: StdDuration,
}

impl SessionInputs {
    /// Inputs with the default cadence, thread count, timeout and
    /// observatories.
    pub fn new(
        catalog_text: String,
        start_local: String,
        duration_hours: f64,
        threshold_deg: f64,
        observatory: String,
    ) -> SessionInputs {
        SessionInputs {
            catalog_text,
            start_local,
            duration_hours,
            threshold_deg,
            observatory,
            observatories: ObservatoryRegistry::builtin(),
            cadence: Duration::from_seconds(DEFAULT_CADENCE_SECONDS),
            max_threads: None,
            timeout: StdDuration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// Validate the inputs. All user errors are caught here, before anything
    /// expensive happens.
    pub fn parse(&self) -> Result<SessionParams, SessionError> {
        let observatory = self.observatories.get(&self.observatory)?.clone();
        let start = parse_local_civil_time(&self.start_local, observatory.utc_offset_hours)?;
        let window = ObservationWindow::new(start, self.duration_hours, self.cadence)?;
        // Anything above 180° is always violated, which is fine.
        if !self.threshold_deg.is_finite() || self.threshold_deg < 0.0 {
            return Err(SessionError::BadThreshold(self.threshold_deg));
        }
        let catalog = parse_catalog(&self.catalog_text)?;
        debug!(
            "Parsed {} sources; observatory {}; window starts {start}",
            catalog.len(),
            observatory.name
        );

        let max_threads = self
            .max_threads
            .map(|n| n.get())
            .unwrap_or_else(rayon::current_num_threads);
        let digest = session_digest(
            &self.catalog_text,
            &observatory,
            &window,
            self.threshold_deg,
        );
        Ok(SessionParams {
            num_threads: catalog.len().min(max_threads).max(1),
            catalog,
            window,
            start_local: self.start_local.trim().to_string(),
            threshold_deg: self.threshold_deg,
            observatory,
            timeout: self.timeout,
            digest,
        })
    }
}

/// SHA-256 (as hex) of the catalog text and the window, observatory and
/// threshold it is checked with.
fn session_digest(
    catalog_text: &str,
    observatory: &ObservatoryLocation,
    window: &ObservationWindow,
    threshold_deg: f64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(catalog_text.as_bytes());
    hasher.update(observatory.name.as_bytes());
    for x in [
        observatory.longitude_deg,
        observatory.latitude_deg,
        observatory.height_metres,
        observatory.utc_offset_hours,
        window.start.to_tai_seconds(),
        window.duration_hours,
        window.cadence.to_seconds(),
        threshold_deg,
    ] {
        hasher.update(x.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Validated session parameters.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub catalog: SourceCatalog,
    pub window: ObservationWindow,
    pub start_local: String,
    pub threshold_deg: f64,
    pub observatory: ObservatoryLocation,

    /// The size of the worker pool; never more than the number of sources.
    pub num_threads: usize,

    pub timeout: StdDuration,

    /// Identifies the session's inputs; see [`SessionMetadata::digest`].
    pub digest: String,
}

impl SessionParams {
    pub fn run(&self) -> Result<SessionResult, SessionError> {
        let grid = self.window.grid();
        let num_sources = self.catalog.len();
        let num_instants = grid.len();
        info!(
            "Calculating Sun separations for {num_sources} sources at {num_instants} instants with {} threads",
            self.num_threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .thread_name(|i| format!("sunsep-worker-{i}"))
            .build()
            .map_err(|e| SessionError::ThreadPool(e.to_string()))?;

        let multi_progress = MultiProgress::with_draw_target(if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        });
        let sun_progress = multi_progress.add(
            ProgressBar::new(num_instants as _)
                .with_style(
                    ProgressStyle::default_bar()
                        .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} instants ({elapsed_precise}<{eta_precise})").unwrap()
                        .progress_chars("=> "),
                )
                .with_position(0)
                .with_message("Sun ephemeris"),
        );
        let source_progress = multi_progress.add(
            ProgressBar::new(num_sources as _)
                .with_style(
                    ProgressStyle::default_bar()
                        .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} sources ({elapsed_precise}<{eta_precise})").unwrap()
                        .progress_chars("=> "),
                )
                .with_position(0)
                .with_message("Separations"),
        );

        // The computation runs on its own thread so that this one can enforce
        // the timeout. Raising `cancel` makes the workers give up at their
        // next instant.
        let cancel = AtomicCell::new(false);
        let (tx, rx) = bounded(1);
        let outcome = thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("session".to_string())
                .spawn_scoped(scope, || {
                    let tx = tx;
                    defer_on_unwind! { cancel.store(true); }
                    let result = pool.install(|| {
                        self.compute(&grid, &cancel, &sun_progress, &source_progress)
                    });
                    // The receiver has gone away if we timed out.
                    let _ = tx.send(result);
                })
                .expect("OS can create threads");

            let received = rx.recv_timeout(self.timeout);
            if received.is_err() {
                cancel.store(true);
            }
            handle.join().unwrap();
            match received {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => Err(SessionError::ComputationTimeout {
                    num_sources,
                    num_instants,
                    timeout: self.timeout,
                }),
                Err(RecvTimeoutError::Disconnected) => Err(SessionError::Cancelled),
            }
        });

        match &outcome {
            Ok(_) => {
                sun_progress.abandon_with_message("Finished Sun ephemeris");
                source_progress.abandon_with_message("Finished separations");
            }
            Err(_) => {
                sun_progress.abandon();
                source_progress.abandon();
            }
        }
        outcome
    }

    fn compute(
        &self,
        grid: &Vec1<Epoch>,
        cancel: &AtomicCell<bool>,
        sun_progress: &ProgressBar,
        source_progress: &ProgressBar,
    ) -> Result<SessionResult, SessionError> {
        // The Sun's direction (and everything else that doesn't depend on a
        // source) only needs to be computed once per instant.
        let frame = |instant: Epoch| -> Result<ApparentFrame, SessionError> {
            if cancel.load() {
                return Err(SessionError::Cancelled);
            }
            let frame = ApparentFrame::new(instant, &self.observatory)?;
            sun_progress.inc(1);
            Ok(frame)
        };
        let mut frames = Vec1::with_capacity(frame(*grid.first())?, grid.len());
        frames.extend(
            grid[1..]
                .par_iter()
                .map(|&instant| frame(instant))
                .collect::<Result<Vec<_>, _>>()?,
        );
        let sun = SunEphemeris::from_frames(&self.observatory, frames);

        let per_source = self
            .catalog
            .par_values()
            .map(|source| -> Result<_, SessionError> {
                let series = compute_series(source, &sun, cancel)?;
                let windows = detect_violations(&series, self.threshold_deg);
                source_progress.inc(1);
                Ok((series, windows))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (series, windows): (Vec<_>, Vec<_>) = per_source.into_iter().unzip();
        let windows: Vec<_> = windows.into_iter().flatten().collect();
        debug!("Found {} violation windows", windows.len());

        let metadata = SessionMetadata {
            observatory: self.observatory.clone(),
            start: self.window.start,
            start_local: self.start_local.clone(),
            duration_hours: self.window.duration_hours,
            threshold_deg: self.threshold_deg,
            cadence_seconds: self.window.cadence.to_seconds(),
            num_instants: grid.len(),
            digest: self.digest.clone(),
        };
        Ok(SessionResult::assemble(metadata, series, windows))
    }
}

/// Parse, validate and run a session.
pub fn run_session(inputs: &SessionInputs) -> Result<SessionResult, SessionError> {
    inputs.parse()?.run()
}

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] MalformedCatalogError),

    #[error(transparent)]
    Window(#[from] InvalidWindowError),

    #[error(transparent)]
    Observatory(#[from] ObservatoryError),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("The threshold separation angle must be a non-negative number of degrees; got {0}")]
    BadThreshold(f64),

    #[error("Calculating separations for {num_sources} sources at {num_instants} instants took longer than {timeout:?}; try fewer sources, a shorter observation or a coarser cadence")]
    ComputationTimeout {
        num_sources: usize,
        num_instants: usize,
        timeout: StdDuration,
    },

    #[error("The computation was cancelled")]
    Cancelled,

    #[error("Couldn't create a thread pool: {0}")]
    ThreadPool(String),
}

impl From<SeparationError> for SessionError {
    fn from(e: SeparationError) -> Self {
        match e {
            SeparationError::Ephemeris(e) => SessionError::Ephemeris(e),
            SeparationError::Cancelled => SessionError::Cancelled,
        }
    }
}
