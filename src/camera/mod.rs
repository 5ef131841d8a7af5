// SPDX-License-Identifier: GPL-3.0-or-later
mod grideye;
mod i2c;
mod mock_sensor;
mod sensor;
mod settings;
mod thermal_camera;

pub(crate) use mock_sensor::{MockSensor, Recording, RepeatMode};
pub(crate) use sensor::ThermalSensor;
pub(crate) use settings::CameraSettings;
pub(crate) use thermal_camera::Camera;
