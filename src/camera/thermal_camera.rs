// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::export::{export_frame, ExportPaths};
use crate::frame::ThermalFrame;
use crate::render::{Plotter, Renderer};
use crate::temperature::{SharedRange, TemperatureRange};

use super::sensor::ThermalSensor;

/// The connection state and active range, as reported by the `status` command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct Status {
    pub(crate) connected: bool,
    pub(crate) range: TemperatureRange,
}

/// A thermal sensor together with everything needed to turn its frames into images.
pub(crate) struct Camera {
    sensor: Box<dyn ThermalSensor>,
    range: SharedRange,
    renderer: Renderer,
    plotter: Plotter,
}

impl Camera {
    pub(crate) fn new(
        sensor: Box<dyn ThermalSensor>,
        range: SharedRange,
        renderer: Renderer,
        plotter: Plotter,
    ) -> Self {
        Self {
            sensor,
            range,
            renderer,
            plotter,
        }
    }

    /// Connect to the sensor, returning whether it is now connected.
    pub(crate) fn connect(&mut self) -> bool {
        match self.sensor.connect() {
            Ok(()) => true,
            Err(err) => {
                warn!("Unable to connect to thermal sensor: {:?}", err);
                false
            }
        }
    }

    /// Disconnect from the sensor, returning whether that succeeded.
    pub(crate) fn disconnect(&mut self) -> bool {
        match self.sensor.disconnect() {
            Ok(()) => true,
            Err(err) => {
                warn!("Error disconnecting thermal sensor: {:?}", err);
                false
            }
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.sensor.is_connected()
    }

    /// Read a frame, marking the sensor as disconnected if the read fails.
    pub(crate) fn read_frame(&mut self) -> Result<ThermalFrame, Error> {
        if !self.sensor.is_connected() {
            return Err(Error::NotConnected);
        }
        self.sensor.read_frame().map_err(|err| {
            self.disconnect();
            Error::Acquisition(err)
        })
    }

    /// The current frame, or `None` if the sensor is not connected or could not be read.
    pub(crate) fn raw_frame(&mut self) -> Option<ThermalFrame> {
        match self.read_frame() {
            Ok(frame) => Some(frame),
            Err(Error::NotConnected) => None,
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }

    /// Render a frame to a PNG with the current temperature range.
    pub(crate) fn render_image(&self, frame: &ThermalFrame) -> Result<Bytes, Error> {
        let range = self.range.snapshot();
        self.renderer.render_png(frame, &range)
    }

    /// Read a frame from the sensor and render it.
    pub(crate) fn capture_image(&mut self) -> Result<Bytes, Error> {
        let frame = self.read_frame()?;
        self.render_image(&frame)
    }

    pub(crate) fn set_temperature_range(&self, min: f32, max: f32) -> Result<(), Error> {
        self.range.set(min, max)
    }

    /// Replace either end of the temperature range, keeping the current value for the other.
    ///
    /// If the result would not be a valid range the current range is kept.
    pub(crate) fn override_temperature_range(
        &self,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<(), Error> {
        if min.is_none() && max.is_none() {
            return Ok(());
        }
        let current = self.temperature_range();
        self.set_temperature_range(
            min.unwrap_or_else(|| current.min()),
            max.unwrap_or_else(|| current.max()),
        )
    }

    pub(crate) fn temperature_range(&self) -> TemperatureRange {
        self.range.snapshot()
    }

    pub(crate) fn status(&self) -> Status {
        Status {
            connected: self.is_connected(),
            range: self.temperature_range(),
        }
    }

    /// Write the rendered image, the raw data plot, and the text dump for `frame`.
    ///
    /// All three use the same snapshot of the temperature range.
    pub(crate) fn export(
        &self,
        frame: &ThermalFrame,
        base: &Path,
    ) -> anyhow::Result<ExportPaths> {
        let range = self.range.snapshot();
        let paths = export_frame(&self.renderer, &self.plotter, frame, &range, base)?;
        debug!(?paths, "exported frame");
        Ok(paths)
    }

    /// Read a frame and export it.
    pub(crate) fn capture(&mut self, base: &Path) -> anyhow::Result<ExportPaths> {
        let frame = self.read_frame()?;
        let paths = self.export(&frame, base)?;
        info!(path = %paths.visualization.display(), "Captured thermal image");
        Ok(paths)
    }
}
