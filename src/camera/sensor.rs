// SPDX-License-Identifier: GPL-3.0-or-later
use crate::frame::ThermalFrame;

/// The operations a thermal sensor needs to provide frames to a [`Camera`][super::Camera].
pub(crate) trait ThermalSensor: Send {
    /// Open the connection to the sensor. Connecting an already connected sensor is a no-op.
    fn connect(&mut self) -> anyhow::Result<()>;

    /// Close the connection. Disconnecting an already disconnected sensor is a no-op.
    fn disconnect(&mut self) -> anyhow::Result<()>;

    fn is_connected(&self) -> bool;

    /// Read the current temperatures from the sensor.
    ///
    /// Reading while disconnected is an error.
    fn read_frame(&mut self) -> anyhow::Result<ThermalFrame>;
}
