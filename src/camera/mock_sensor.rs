// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context as _};
use serde::de::{Deserialize, IntoDeserializer};
use tracing::trace;

use crate::frame::ThermalFrame;

use super::sensor::ThermalSensor;

/// A sequence of frames saved to a TOML file, as `frames = [ [[..], ..], .. ]`.
#[derive(Clone, Debug, Default, serde::Deserialize, PartialEq)]
pub(crate) struct Recording {
    pub(crate) frames: Vec<ThermalFrame>,
}

impl Recording {
    pub(crate) fn from_path(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Unable to read recording {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Invalid recording in {}", path.display()))
    }

    pub(crate) fn frame(&self, index: usize) -> anyhow::Result<&ThermalFrame> {
        self.frames.get(index).ok_or_else(|| {
            anyhow!(
                "Frame {} requested, but the recording only has {} frames",
                index,
                self.frames.len()
            )
        })
    }
}

/// Controls how frames are repeated by [`MockSensor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RepeatMode {
    /// Don't repeat.
    ///
    /// Once the end of the frames has been reached, an error is returned.
    None,

    /// Loop over the frames, restarting from the beginning after the last one.
    Loop,

    /// Alternate between forward and reverse playback.
    ///
    /// The frames at either end of the recording are *not* repeated.
    Bounce,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Loop
    }
}

impl FromStr for RepeatMode {
    type Err = serde::de::value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepeatMode::deserialize(s.into_deserializer())
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatMode::None => "none",
            RepeatMode::Loop => "loop",
            RepeatMode::Bounce => "bounce",
        };
        write!(f, "{}", s)
    }
}

/// A sensor replaying recorded frames, for running without hardware.
pub(crate) struct MockSensor {
    frames: Vec<ThermalFrame>,
    index: Box<dyn Iterator<Item = usize> + Send + Sync>,
    connected: bool,
}

impl MockSensor {
    pub(crate) fn new(frames: Vec<ThermalFrame>, repeat: RepeatMode) -> Self {
        let count = frames.len();
        let index: Box<dyn Iterator<Item = usize> + Send + Sync> = match repeat {
            RepeatMode::None => Box::new(0..count),
            RepeatMode::Loop => Box::new((0..count).cycle()),
            RepeatMode::Bounce => {
                let forwards = 0..count;
                let backwards = (1..count.saturating_sub(1)).rev();
                Box::new(forwards.chain(backwards).cycle())
            }
        };
        Self {
            frames,
            index,
            connected: false,
        }
    }

    pub(crate) fn from_recording(recording: Recording, repeat: RepeatMode) -> Self {
        Self::new(recording.frames, repeat)
    }
}

impl ThermalSensor for MockSensor {
    fn connect(&mut self) -> anyhow::Result<()> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> anyhow::Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_frame(&mut self) -> anyhow::Result<ThermalFrame> {
        if !self.connected {
            return Err(anyhow!("Mock sensor is not connected"));
        }
        let index = self
            .index
            .next()
            .ok_or_else(|| anyhow!("No more frames in recording"))?;
        trace!(index, "Replaying recorded frame");
        Ok(self.frames[index].clone())
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::super::sensor::ThermalSensor;
    use super::{MockSensor, Recording, RepeatMode};
    use crate::frame::ThermalFrame;

    const FRAME_COUNT: usize = 4;

    fn frames() -> Vec<ThermalFrame> {
        (0..FRAME_COUNT)
            .map(|n| ThermalFrame::uniform(20.0 + n as f32))
            .collect()
    }

    fn playback(repeat: RepeatMode, reads: usize) -> Vec<f32> {
        let mut sensor = MockSensor::new(frames(), repeat);
        sensor.connect().unwrap();
        (0..reads)
            .map(|_| sensor.read_frame().unwrap().get(0, 0))
            .collect()
    }

    #[test]
    fn repeat_none() {
        let mut sensor = MockSensor::new(frames(), RepeatMode::None);
        sensor.connect().unwrap();
        for n in 0..FRAME_COUNT {
            assert_eq!(sensor.read_frame().unwrap().get(0, 0), 20.0 + n as f32);
        }
        assert!(sensor.read_frame().is_err());
    }

    #[test]
    fn repeat_loop() {
        assert_eq!(
            playback(RepeatMode::Loop, 9),
            vec![20.0, 21.0, 22.0, 23.0, 20.0, 21.0, 22.0, 23.0, 20.0]
        );
    }

    #[test]
    fn repeat_bounce() {
        assert_eq!(
            playback(RepeatMode::Bounce, 9),
            vec![20.0, 21.0, 22.0, 23.0, 22.0, 21.0, 20.0, 21.0, 22.0]
        );
    }

    #[test]
    fn bounce_single_frame() {
        let mut sensor = MockSensor::new(vec![ThermalFrame::uniform(25.0)], RepeatMode::Bounce);
        sensor.connect().unwrap();
        for _ in 0..3 {
            assert_eq!(sensor.read_frame().unwrap().get(7, 7), 25.0);
        }
    }

    #[test]
    fn empty_recording() {
        let mut sensor = MockSensor::new(Vec::new(), RepeatMode::Bounce);
        sensor.connect().unwrap();
        assert!(sensor.read_frame().is_err());
    }

    #[test]
    fn read_while_disconnected() {
        let mut sensor = MockSensor::new(frames(), RepeatMode::Loop);
        assert!(!sensor.is_connected());
        assert!(sensor.read_frame().is_err());
        sensor.connect().unwrap();
        assert!(sensor.is_connected());
        assert!(sensor.read_frame().is_ok());
        sensor.disconnect().unwrap();
        assert!(sensor.read_frame().is_err());
    }

    #[test]
    fn repeat_mode_strings() {
        assert_eq!("bounce".parse::<RepeatMode>().unwrap(), RepeatMode::Bounce);
        assert_eq!(RepeatMode::None.to_string(), "none");
        assert!("sideways".parse::<RepeatMode>().is_err());
    }

    #[test]
    fn recording_file() {
        let row = "[26.0, 26.0, 26.0, 26.0, 26.0, 26.0, 26.0, 26.0]";
        let hot_row = "[32.0, 26.0, 26.0, 26.0, 26.0, 26.0, 26.0, 26.0]";
        let mut rows = vec![hot_row; 1];
        rows.extend(std::iter::repeat(row).take(7));
        let source = format!("frames = [[{}]]\n", rows.join(", "));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        let recording = Recording::from_path(file.path()).unwrap();
        assert_eq!(recording.frames.len(), 1);
        assert_eq!(recording.frame(0).unwrap().get(0, 0), 32.0);
        assert_eq!(recording.frame(0).unwrap().get(0, 1), 26.0);
        assert!(recording.frame(1).is_err());
    }

    #[test]
    fn recording_wrong_shape() {
        let source = "frames = [[[1.0, 2.0], [3.0, 4.0]]]\n";
        let parsed: Result<Recording, _> = toml::from_str(source);
        assert!(parsed.is_err());
    }
}
