// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing session artifacts to disk.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, trace};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::SessionResult;
use crate::cli::Warn;

/// Formats for the machine-readable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
pub enum ResultFormat {
    #[default]
    #[strum(serialize = "json")]
    Json,

    #[strum(serialize = "yaml")]
    Yaml,
}

/// Write a session's artifacts into `<output_dir>/<session label>/`: the
/// summary text, the result in the requested format and (if requested and
/// available) one separation plot per source. The paths of the written
/// files are returned.
pub fn write_artifacts(
    result: &SessionResult,
    output_dir: &Path,
    format: ResultFormat,
    plots: bool,
) -> Result<Vec<PathBuf>, WriteError> {
    let dir = output_dir.join(result.metadata.label());
    prepare_dir(&dir)?;
    let mut written = vec![];

    let summary_file = dir.join("summary.txt");
    trace!("Writing {}", summary_file.display());
    std::fs::write(&summary_file, result.summary()).map_err(|err| WriteError::IO {
        file: summary_file.clone(),
        err,
    })?;
    written.push(summary_file);

    let result_file = dir.join(format!("result.{format}"));
    trace!("Writing {}", result_file.display());
    let report = result.to_report();
    let io_err = |err| WriteError::IO {
        file: result_file.clone(),
        err,
    };
    let mut buf = BufWriter::new(File::create(&result_file).map_err(io_err)?);
    match format {
        ResultFormat::Json => serde_json::to_writer_pretty(&mut buf, &report)
            .map_err(|e| WriteError::Serialise(e.to_string()))?,
        ResultFormat::Yaml => serde_yaml::to_writer(&mut buf, &report)
            .map_err(|e| WriteError::Serialise(e.to_string()))?,
    }
    buf.flush().map_err(io_err)?;
    written.push(result_file);

    if plots {
        written.extend(write_plots(result, &dir)?);
    }

    debug!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(feature = "plotting")]
fn write_plots(result: &SessionResult, dir: &Path) -> Result<Vec<PathBuf>, WriteError> {
    let mut files = Vec::with_capacity(result.series.len());
    for series in &result.series {
        let file = dir.join(format!("{}.png", sanitise(&series.source.name)));
        trace!("Plotting {}", file.display());
        super::plot::plot_series(
            series,
            result.windows_for(&series.source.name),
            &result.metadata,
            &file,
        )
        .map_err(|e| WriteError::Plot(e.to_string()))?;
        files.push(file);
    }
    Ok(files)
}

#[cfg(not(feature = "plotting"))]
fn write_plots(_: &SessionResult, _: &Path) -> Result<Vec<PathBuf>, WriteError> {
    "sunsep was not compiled with the \"plotting\" feature; no plots will be made".warn();
    Ok(vec![])
}

/// Make a source name safe to use as a file name.
fn sanitise(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Create the output directory (and its parents), warning if it already
/// exists.
fn prepare_dir(dir: &Path) -> Result<(), WriteError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(WriteError::NotADirectory(dir.to_path_buf()));
        }
        format!("Will overwrite files in the existing directory '{}'", dir.display()).warn();
    }
    std::fs::create_dir_all(dir).map_err(|err| WriteError::IO {
        file: dir.to_path_buf(),
        err,
    })?;
    let readonly = std::fs::metadata(dir)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false);
    if readonly {
        return Err(WriteError::NotWritable(dir.to_path_buf()));
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("'{}' exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("The directory '{}' is not writable", .0.display())]
    NotWritable(PathBuf),

    #[error("Couldn't serialise the result: {0}")]
    Serialise(String),

    #[error("Couldn't plot: {0}")]
    Plot(String),

    #[error("IO error with '{}': {err}", file.display())]
    IO {
        file: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
