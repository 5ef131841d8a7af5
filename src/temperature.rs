// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        })
    }
}

/// A temperature tagged with its unit.
///
/// When deserializing, a bare number is taken to be in Celsius. A single-entry map of a unit
/// to a number (`{ fahrenheit = 80 }`) can be used for the other unit.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(from = "DeserializedTemperature")]
pub(crate) enum Temperature {
    Celsius(f32),
    Fahrenheit(f32),
}

impl Temperature {
    pub(crate) fn in_celsius(&self) -> f32 {
        match self {
            Self::Celsius(c) => *c,
            Self::Fahrenheit(f) => (f - 32.0) * 5.0 / 9.0,
        }
    }

    pub(crate) fn unit(&self) -> TemperatureUnit {
        match self {
            Self::Celsius(_) => TemperatureUnit::Celsius,
            Self::Fahrenheit(_) => TemperatureUnit::Fahrenheit,
        }
    }
}

impl fmt::Display for Temperature {
    /// With the alternate flag (`#`) the degree symbol and unit are appended.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Celsius(c) => c,
            Self::Fahrenheit(f) => f,
        };
        value.fmt(fmt)?;
        if fmt.alternate() {
            write!(fmt, "°{}", self.unit())?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
enum DeserializedTemperature {
    Number(f32),
    Wrapped(WrappedTemperature),
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WrappedTemperature {
    #[serde(alias = "c", alias = "C")]
    Celsius(f32),

    #[serde(alias = "f", alias = "F")]
    Fahrenheit(f32),
}

impl From<DeserializedTemperature> for Temperature {
    fn from(maybe_wrapped: DeserializedTemperature) -> Self {
        match maybe_wrapped {
            DeserializedTemperature::Number(c) => Self::Celsius(c),
            DeserializedTemperature::Wrapped(WrappedTemperature::Celsius(c)) => Self::Celsius(c),
            DeserializedTemperature::Wrapped(WrappedTemperature::Fahrenheit(f)) => {
                Self::Fahrenheit(f)
            }
        }
    }
}

/// The temperatures (in Celsius) mapped to the two ends of the color gradient.
///
/// The minimum is always strictly less than the maximum, and both are finite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct TemperatureRange {
    min: f32,
    max: f32,
}

impl TemperatureRange {
    pub(crate) const DEFAULT_MIN: f32 = 26.0;
    pub(crate) const DEFAULT_MAX: f32 = 32.0;

    pub(crate) fn new(min: f32, max: f32) -> Result<Self, Error> {
        if min.is_finite() && max.is_finite() && min < max {
            Ok(Self { min, max })
        } else {
            Err(Error::DegenerateRange { min, max })
        }
    }

    pub(crate) fn from_temperatures(min: Temperature, max: Temperature) -> Result<Self, Error> {
        Self::new(min.in_celsius(), max.in_celsius())
    }

    pub(crate) fn min(&self) -> f32 {
        self.min
    }

    pub(crate) fn max(&self) -> f32 {
        self.max
    }

    pub(crate) fn span(&self) -> f32 {
        self.max - self.min
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// A [`TemperatureRange`] that can be changed while frames are being rendered.
///
/// Readers take a copy with [`SharedRange::snapshot`], so a render always sees one consistent
/// range even if it is replaced part way through.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedRange(Arc<Mutex<TemperatureRange>>);

impl SharedRange {
    pub(crate) fn new(range: TemperatureRange) -> Self {
        Self(Arc::new(Mutex::new(range)))
    }

    pub(crate) fn snapshot(&self) -> TemperatureRange {
        *self.0.lock()
    }

    /// Replace the range. Invalid ranges are rejected and the current range is kept.
    pub(crate) fn set(&self, min: f32, max: f32) -> Result<(), Error> {
        let range = TemperatureRange::new(min, max)?;
        debug!(min, max, "Updating temperature range");
        *self.0.lock() = range;
        Ok(())
    }
}
