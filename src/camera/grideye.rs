// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::thread;
use std::time::Duration;

use amg88::{Address, FrameRateValue, GridEye};
use anyhow::{anyhow, Context as _};
use linux_embedded_hal::I2cdev;
use tracing::{debug, info};

use crate::frame::ThermalFrame;

use super::i2c::I2cSettings;
use super::sensor::ThermalSensor;

/// How long the sensor needs after power-on before its readings are usable.
const STABILIZATION_DELAY: Duration = Duration::from_millis(100);

/// A Panasonic AMG88xx (Grid-EYE) sensor on a Linux I²C bus.
pub(crate) struct GridEyeSensor {
    i2c: I2cSettings,
    camera: Option<GridEye<I2cdev>>,
}

impl GridEyeSensor {
    pub(crate) fn new(i2c: I2cSettings) -> Self {
        Self { i2c, camera: None }
    }

    fn open(&self) -> anyhow::Result<GridEye<I2cdev>> {
        let bus = I2cdev::try_from(&self.i2c.bus)
            .with_context(|| format!("Unable to open I2C bus {}", self.i2c.bus))?;
        let address = Address::try_from(self.i2c.address)
            .map_err(|_| anyhow!("{:#04x} is not a Grid-EYE address", self.i2c.address))?;
        let mut camera = GridEye::new(bus, address);
        camera
            .set_frame_rate(FrameRateValue::Fps10)
            .context("Error setting camera frame rate")?;
        Ok(camera)
    }
}

impl ThermalSensor for GridEyeSensor {
    fn connect(&mut self) -> anyhow::Result<()> {
        if self.camera.is_some() {
            return Ok(());
        }
        let camera = self.open()?;
        thread::sleep(STABILIZATION_DELAY);
        info!(bus = %self.i2c.bus, address = self.i2c.address, "Connected to Grid-EYE");
        self.camera = Some(camera);
        Ok(())
    }

    fn disconnect(&mut self) -> anyhow::Result<()> {
        if self.camera.take().is_some() {
            info!(bus = %self.i2c.bus, "Disconnected from Grid-EYE");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.camera.is_some()
    }

    fn read_frame(&mut self) -> anyhow::Result<ThermalFrame> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| anyhow!("Grid-EYE is not connected"))?;
        let grid = camera
            .image()
            .context("Error retrieving thermal image from camera")?;
        // Force the layout to row-major. If it's already in that order, this is a noop (and it
        // *should* be in row-major order already).
        let grid = if grid.is_standard_layout() {
            grid
        } else {
            debug!("Reversing thermal image axes (not expected normally)");
            grid.reversed_axes()
        };
        ThermalFrame::try_from(grid).context("Unexpected Grid-EYE image size")
    }
}
