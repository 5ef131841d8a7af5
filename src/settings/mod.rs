// SPDX-License-Identifier: GPL-3.0-or-later
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use tracing::info;

mod cli;
mod export;
pub(crate) mod gradient;

use crate::camera::CameraSettings;
use crate::render::RenderSettings;
pub(crate) use cli::{Args, Command};
pub(crate) use export::ExportSettings;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct Settings {
    /// Which sensor to use, and how to reach it.
    #[serde(default)]
    pub(crate) camera: CameraSettings,

    /// How frames are turned into images.
    #[serde(default)]
    pub(crate) render: RenderSettings,

    /// Where captures are written.
    #[serde(default)]
    pub(crate) export: ExportSettings,
}

impl Settings {
    /// Load settings from a TOML file, falling back to the defaults if it does not exist.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No configuration file found, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration file {}", path.display()))?;
        let settings: Self = toml::from_str(&data)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(settings)
    }

    /// Check the values that deserializing alone can't.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        self.export.interval_duration()?;
        Ok(())
    }

    /// Apply the capture overrides given on the command line.
    ///
    /// The temperature range overrides are applied to the camera instead, so that they go
    /// through the same checks as any other range change.
    pub(crate) fn apply_args(&mut self, args: &Args) -> anyhow::Result<()> {
        if let Command::Watch {
            interval,
            count,
            directory,
        } = &args.command
        {
            if let Some(interval) = interval {
                self.export.interval = *interval;
            }
            if count.is_some() {
                self.export.max_captures = *count;
            }
            if let Some(directory) = directory {
                self.export.directory = directory.clone();
            }
        }
        self.validate().context("Invalid command line arguments")
    }
}
