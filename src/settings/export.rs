// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use serde::Deserialize;

/// tokio's interval panics on a zero period, so shorter intervals are raised to this.
const MIN_INTERVAL: f32 = 0.001;

/// One day. Anything longer is almost certainly a typo.
const MAX_INTERVAL: f32 = 86_400.0;

fn default_directory() -> PathBuf {
    PathBuf::from("captures")
}

fn default_base_name() -> String {
    "thermal".to_string()
}

fn default_interval() -> f32 {
    1.0
}

/// Where and how often captures are written by the `watch` command.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct ExportSettings {
    #[serde(default = "default_directory")]
    pub(crate) directory: PathBuf,

    /// The file name prefix for each capture. A sequence number is appended to it.
    #[serde(default = "default_base_name")]
    pub(crate) base_name: String,

    /// Seconds between captures.
    #[serde(default = "default_interval")]
    pub(crate) interval: f32,

    /// Stop after this many captures. Unlimited if not given.
    #[serde(default)]
    pub(crate) max_captures: Option<u32>,
}

impl ExportSettings {
    /// The time between captures, or an error if the configured interval is unusable.
    pub(crate) fn interval_duration(&self) -> anyhow::Result<Duration> {
        if !self.interval.is_finite() || self.interval > MAX_INTERVAL {
            bail!(
                "Capture interval must be at most {} seconds (got {})",
                MAX_INTERVAL,
                self.interval
            );
        }
        Ok(Duration::from_secs_f32(self.interval.max(MIN_INTERVAL)))
    }

    /// The base path for capture number `index`, without any extension.
    pub(crate) fn capture_base(&self, index: u32) -> PathBuf {
        self.directory.join(format!("{}_{:04}", self.base_name, index))
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            base_name: default_base_name(),
            interval: default_interval(),
            max_captures: None,
        }
    }
}
