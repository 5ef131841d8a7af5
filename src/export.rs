// SPDX-License-Identifier: GPL-3.0-or-later
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::frame::ThermalFrame;
use crate::render::{encode_png, Plotter, Renderer};
use crate::temperature::TemperatureRange;

/// The three files written for one exported frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ExportPaths {
    pub(crate) visualization: PathBuf,
    pub(crate) plot: PathBuf,
    pub(crate) data: PathBuf,
}

impl ExportPaths {
    /// Derive the file names from `base`. Any extension on `base` is dropped.
    pub(crate) fn for_base(base: &Path) -> Self {
        let stem = base.with_extension("");
        Self {
            visualization: with_suffix(&stem, "_visualization.png"),
            plot: with_suffix(&stem, "_plot.png"),
            data: with_suffix(&stem, ".txt"),
        }
    }

    /// Write each artifact, creating the parent directory first if needed.
    #[instrument(level = "debug", skip(visualization, plot, data))]
    pub(crate) fn write(
        &self,
        visualization: &[u8],
        plot: &[u8],
        data: &str,
    ) -> anyhow::Result<()> {
        if let Some(parent) = self.data.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Unable to create {}", parent.display()))?;
            }
        }
        write_file(&self.visualization, visualization)?;
        write_file(&self.plot, plot)?;
        write_file(&self.data, data.as_bytes())?;
        Ok(())
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("Unable to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote export file");
    Ok(())
}

/// Render `frame` both ways and write it out next to `base`, along with its text dump.
#[instrument(level = "debug", skip(renderer, plotter, frame))]
pub(crate) fn export_frame(
    renderer: &Renderer,
    plotter: &Plotter,
    frame: &ThermalFrame,
    range: &TemperatureRange,
    base: &Path,
) -> anyhow::Result<ExportPaths> {
    let visualization = renderer.render_png(frame, range)?;
    let plot = encode_png(&plotter.plot(frame, range))?;
    let paths = ExportPaths::for_base(base);
    paths.write(&visualization, &plot, &text_dump(frame, range))?;
    Ok(paths)
}

/// A tab separated table of the frame's temperatures, headed by the range used to render it.
pub(crate) fn text_dump(frame: &ThermalFrame, range: &TemperatureRange) -> String {
    let mut dump = format!(
        "Temperature range: {:?} - {:?}\nThermal data:\n",
        range.min(),
        range.max()
    );
    for row in frame.rows() {
        dump.push_str(&row.iter().map(|value| format!("{:.2}", value)).join("\t"));
        dump.push('\n');
    }
    dump
}
