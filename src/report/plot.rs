// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plots of Sun separation against time.

use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use super::SessionMetadata;
use crate::{overlap::ViolationWindow, separation::SourceSeries, time::format_local_civil_time};

/// The number of X pixels on the plots.
const X_PIXELS: u32 = 1600;
/// The number of Y pixels on the plots.
const Y_PIXELS: u32 = 900;

/// Plot a source's separation from the Sun over a session, with the
/// threshold drawn as a dashed line and violation windows shaded.
pub fn plot_series<'a>(
    series: &SourceSeries,
    windows: impl Iterator<Item = &'a ViolationWindow>,
    metadata: &SessionMetadata,
    file: &Path,
) -> Result<(), DrawError> {
    let start = metadata.start;
    let minutes = |e: hifitime::Epoch| (e - start).to_seconds() / 60.0;
    let points: Vec<(f64, f64)> = series
        .samples
        .iter()
        .map(|s| (minutes(s.instant), s.separation_deg))
        .collect();

    let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
    let (y_min, y_max) = points.iter().fold(
        (metadata.threshold_deg, metadata.threshold_deg),
        |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)),
    );
    let pad = ((y_max - y_min) * 0.1).max(0.5);
    let (y_min, y_max) = ((y_min - pad).max(0.0), (y_max + pad).min(180.0));

    let root = BitMapBackend::new(file, (X_PIXELS, Y_PIXELS)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| DrawError::Plotters(Box::new(e)))?;

    let title = format!(
        "{} from {} ({})",
        series.source.name,
        metadata.observatory.name,
        format_local_civil_time(start, metadata.observatory.utc_offset_hours)
    );
    let mut cc = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(|e| DrawError::Chart(e.to_string()))?;

    cc.configure_mesh()
        .x_desc("Minutes since start")
        .y_desc("Sun separation [deg]")
        .draw()
        .map_err(|e| DrawError::Chart(e.to_string()))?;

    for w in windows {
        let (x0, x1) = (minutes(w.start), minutes(w.end));
        cc.draw_series(std::iter::once(Rectangle::new(
            [(x0, y_min), (x1.max(x0 + 0.5), y_max)],
            RED.mix(0.15).filled(),
        )))
        .map_err(|e| DrawError::Chart(e.to_string()))?;
    }

    cc.draw_series(LineSeries::new(points, BLUE.stroke_width(2)))
        .map_err(|e| DrawError::Chart(e.to_string()))?;

    // Dashed threshold line.
    let dash = x_max / 100.0;
    let threshold = metadata.threshold_deg;
    cc.draw_series((0..50).map(|i| {
        let x0 = 2.0 * f64::from(i) * dash;
        PathElement::new(
            vec![(x0, threshold), ((x0 + dash).min(x_max), threshold)],
            RED.stroke_width(2),
        )
    }))
    .map_err(|e| DrawError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| DrawError::Plotters(Box::new(e)))?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("While drawing the chart: {0}")]
    Chart(String),

    #[error("Error from the plotters library: {0}")]
    Plotters(Box<dyn std::error::Error + Send + Sync>),
}
