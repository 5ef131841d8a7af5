// SPDX-License-Identifier: GPL-3.0-or-later
use std::error::Error as StdError;
use std::fmt;

/// Failures from acquiring, rendering, and encoding thermal frames.
#[derive(Debug)]
pub(crate) enum Error {
    /// The sensor is not connected, so there is nothing to read.
    NotConnected,

    /// Reading from the sensor failed.
    Acquisition(anyhow::Error),

    /// A temperature range where the minimum is not strictly less than the maximum (or either
    /// end is not finite).
    DegenerateRange { min: f32, max: f32 },

    /// A color gradient needs at least two entries.
    InvalidColorDepth(usize),

    /// Thermal frames are always 8×8.
    InvalidFrameShape { rows: usize, cols: usize },

    /// Every interpolated value was undefined, so there was nothing to fall back on.
    InterpolationUndefined,

    /// The canvas could not be serialized.
    Encoding(image::ImageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotConnected => f.write_str("Thermal sensor is not connected"),
            Error::Acquisition(err) => write!(f, "Unable to read from thermal sensor: {}", err),
            Error::DegenerateRange { min, max } => write!(
                f,
                "Invalid temperature range {} - {} (the minimum must be less than the maximum)",
                min, max
            ),
            Error::InvalidColorDepth(depth) => {
                write!(f, "Color depth must be at least 2 (got {})", depth)
            }
            Error::InvalidFrameShape { rows, cols } => {
                write!(f, "Thermal frames must be 8x8 (got {}x{})", rows, cols)
            }
            Error::InterpolationUndefined => {
                f.write_str("Interpolation produced no defined values")
            }
            Error::Encoding(err) => write!(f, "Unable to encode image: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Acquisition(err) => Some(err.as_ref()),
            Error::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err)
    }
}
