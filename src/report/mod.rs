// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Assembling and presenting the results of a session.

#[cfg(feature = "plotting")]
pub mod plot;
mod write;

pub use write::{write_artifacts, ResultFormat, WriteError};

use std::collections::HashMap;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    observatory::ObservatoryLocation,
    overlap::ViolationWindow,
    separation::SourceSeries,
    time::{format_local_civil_time, format_utc, format_utc_offset, utc_label},
};

/// Everything describing how a session was set up.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetadata {
    pub observatory: ObservatoryLocation,

    /// The absolute start of the observation.
    pub start: Epoch,

    /// The start as the user gave it, in observatory-local civil time.
    pub start_local: String,

    pub duration_hours: f64,
    pub threshold_deg: f64,
    pub cadence_seconds: f64,
    pub num_instants: usize,

    /// SHA-256 of the session's inputs (hex). Sessions that differ only in
    /// their catalogs get different digests.
    pub digest: String,
}

impl SessionMetadata {
    /// A deterministic name for this session, e.g.
    /// "sunsep_GMRT_20240621T003000_1f2e3d4c". The last part is the start of
    /// the digest.
    pub fn label(&self) -> String {
        let obs: String = self
            .observatory
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let digest: String = self.digest.chars().take(8).collect();
        format!("sunsep_{obs}_{}_{digest}", utc_label(self.start))
    }

    fn local(&self, epoch: Epoch) -> String {
        format_local_civil_time(epoch, self.observatory.utc_offset_hours)
    }
}

/// The outcome of a session: a separation series for every source and every
/// violation window, both in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub metadata: SessionMetadata,
    pub series: Vec<SourceSeries>,
    pub windows: Vec<ViolationWindow>,
}

impl SessionResult {
    /// Put results together. The series are ordered as in the catalog and the
    /// windows by their source's catalog position, then by time.
    pub fn assemble(
        metadata: SessionMetadata,
        mut series: Vec<SourceSeries>,
        mut windows: Vec<ViolationWindow>,
    ) -> SessionResult {
        series.sort_by_key(|s| s.source.line_num);
        {
            let positions: HashMap<&str, usize> = series
                .iter()
                .enumerate()
                .map(|(i, s)| (s.source.name.as_str(), i))
                .collect();
            windows.sort_by(|a, b| {
                let pa = positions.get(a.source_name.as_str());
                let pb = positions.get(b.source_name.as_str());
                pa.cmp(&pb).then(a.start.cmp(&b.start))
            });
        }

        SessionResult {
            metadata,
            series,
            windows,
        }
    }

    /// The windows belonging to one source.
    pub fn windows_for<'a>(
        &'a self,
        source_name: &'a str,
    ) -> impl Iterator<Item = &'a ViolationWindow> + 'a {
        self.windows
            .iter()
            .filter(move |w| w.source_name == source_name)
    }

    /// A human-readable summary of the session.
    pub fn summary(&self) -> String {
        let m = &self.metadata;
        let mut lines = vec![
            format!("Observatory Name: {}", m.observatory.name),
            format!(
                "Start Time: {} ({}) = {}",
                m.start_local,
                format_utc_offset(m.observatory.utc_offset_hours),
                format_utc(m.start)
            ),
            format!("Observation Duration: {} hours", m.duration_hours),
            format!("Threshold Separation Angle: {} degrees", m.threshold_deg),
            format!(
                "Sampling Cadence: {} seconds ({} instants)",
                m.cadence_seconds, m.num_instants
            ),
        ];

        if self.series.is_empty() {
            lines.push(String::new());
            lines.push("No sources in the catalog".to_string());
        }

        for series in &self.series {
            let src = &series.source;
            let mut heading = format!(
                "{} ({} {} {})",
                src.name,
                src.ra_hms(),
                src.dec_dms(),
                src.epoch
            );
            if let Some(c) = series.closest_approach() {
                heading.push_str(&format!(
                    ": minimum separation {:.3} degrees at {}",
                    c.separation_deg,
                    m.local(c.instant)
                ));
            }
            lines.push(String::new());
            lines.push(heading);

            let num_lines = lines.len();
            lines.extend(self.windows_for(&src.name).enumerate().map(|(i, w)| {
                format!(
                    "    Violation {}: {} to {} (closest {:.3} degrees)",
                    i + 1,
                    m.local(w.start),
                    m.local(w.end),
                    w.closest_approach_deg
                )
            }));
            if lines.len() == num_lines {
                lines.push("    No violations".to_string());
            }
        }

        let mut summary = lines.join("\n");
        summary.push('\n');
        summary
    }

    /// Convert to a serialisable report.
    pub fn to_report(&self) -> SessionReport {
        let m = &self.metadata;
        SessionReport {
            label: m.label(),
            digest: m.digest.clone(),
            observatory: m.observatory.clone(),
            start_utc: format_utc(m.start),
            start_local: m.start_local.clone(),
            duration_hours: m.duration_hours,
            threshold_deg: m.threshold_deg,
            cadence_seconds: m.cadence_seconds,
            num_instants: m.num_instants,
            sources: self
                .series
                .iter()
                .map(|series| {
                    let src = &series.source;
                    let closest = series.closest_approach();
                    SourceReport {
                        name: src.name.clone(),
                        ra_hms: src.ra_hms(),
                        dec_dms: src.dec_dms(),
                        epoch: src.epoch.to_string(),
                        extra_fields: src.extra_fields.clone(),
                        min_separation_deg: closest.map(|c| c.separation_deg),
                        min_separation_utc: closest.map(|c| format_utc(c.instant)),
                        violations: self
                            .windows_for(&src.name)
                            .map(|w| WindowReport {
                                start_utc: format_utc(w.start),
                                end_utc: format_utc(w.end),
                                start_local: m.local(w.start),
                                end_local: m.local(w.end),
                                closest_approach_deg: w.closest_approach_deg,
                            })
                            .collect(),
                        separations_deg: series.samples.iter().map(|s| s.separation_deg).collect(),
                    }
                })
                .collect(),
        }
    }
}

/// The machine-readable form of a [`SessionResult`]. Sample instants are
/// implied by the start and cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub label: String,
    pub digest: String,
    pub observatory: ObservatoryLocation,
    pub start_utc: String,
    pub start_local: String,
    pub duration_hours: f64,
    pub threshold_deg: f64,
    pub cadence_seconds: f64,
    pub num_instants: usize,
    pub sources: Vec<SourceReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub name: String,
    pub ra_hms: String,
    pub dec_dms: String,
    pub epoch: String,
    pub extra_fields: Vec<String>,
    pub min_separation_deg: Option<f64>,
    pub min_separation_utc: Option<String>,
    pub violations: Vec<WindowReport>,
    pub separations_deg: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    pub start_utc: String,
    pub end_utc: String,
    pub start_local: String,
    pub end_local: String,
    pub closest_approach_deg: f64,
}

#[cfg(test)]
mod tests;
