// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use serde::Deserialize;

use super::grideye::GridEyeSensor;
use super::i2c::I2cSettings;
use super::mock_sensor::{MockSensor, Recording, RepeatMode};
use super::sensor::ThermalSensor;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub(crate) enum CameraSettings {
    GridEye {
        #[serde(flatten)]
        i2c: I2cSettings,
    },
    Mock {
        /// A recording to replay.
        path: PathBuf,

        #[serde(default)]
        repeat_mode: RepeatMode,
    },
}

impl CameraSettings {
    /// Create the sensor described by these settings. The sensor is not connected yet.
    pub(crate) fn create_sensor(&self) -> anyhow::Result<Box<dyn ThermalSensor>> {
        Ok(match self {
            Self::GridEye { i2c } => Box::new(GridEyeSensor::new(i2c.clone())),
            Self::Mock { path, repeat_mode } => {
                let recording = Recording::from_path(path)?;
                Box::new(MockSensor::from_recording(recording, *repeat_mode))
            }
        })
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::GridEye {
            i2c: I2cSettings::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{CameraSettings, RepeatMode};
    use crate::camera::i2c::{Bus, I2cSettings};

    #[test]
    fn grideye() -> anyhow::Result<()> {
        let source = r#"
        kind = "grideye"
        bus = 2
        address = "0x68"
        "#;
        let parsed: CameraSettings = toml::from_str(source)?;
        let expected = CameraSettings::GridEye {
            i2c: I2cSettings {
                bus: Bus::Number(2),
                address: 0x68,
            },
        };
        assert_eq!(parsed, expected);
        Ok(())
    }

    #[test]
    fn grideye_defaults() -> anyhow::Result<()> {
        let parsed: CameraSettings = toml::from_str("kind = \"grideye\"")?;
        assert_eq!(parsed, CameraSettings::default());
        Ok(())
    }

    #[test]
    fn mock() -> anyhow::Result<()> {
        let source = r#"
        kind = "mock"
        path = "frames.toml"
        repeat_mode = "bounce"
        "#;
        let parsed: CameraSettings = toml::from_str(source)?;
        let expected = CameraSettings::Mock {
            path: PathBuf::from("frames.toml"),
            repeat_mode: RepeatMode::Bounce,
        };
        assert_eq!(parsed, expected);
        Ok(())
    }

    #[test]
    fn mock_needs_path() {
        let parsed: Result<CameraSettings, _> = toml::from_str("kind = \"mock\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn error_bad_kind() {
        let source = r#"
        kind = "NotARealCamera"
        bus = 1
        "#;
        let parsed: Result<CameraSettings, _> = toml::from_str(source);
        assert!(
            parsed.is_err(),
            "Did not detect invalid camera kind in:\n{}",
            source
        );
    }

    #[test]
    fn missing_recording() {
        let settings = CameraSettings::Mock {
            path: PathBuf::from("/nonexistent/recording.toml"),
            repeat_mode: RepeatMode::Loop,
        };
        assert!(settings.create_sensor().is_err());
    }

    #[test]
    fn grideye_sensor_starts_disconnected() {
        let sensor = CameraSettings::default().create_sensor().unwrap();
        assert!(!sensor.is_connected());
    }
}
