// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::From;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};

/// An 8-bit per channel RGB color.
///
/// This type can be formatted as a hex code using the standard formatting syntax, and parsed
/// from one (with or without the leading '#').
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl From<colorous::Color> for Color {
    fn from(other_color: colorous::Color) -> Self {
        Color {
            red: other_color.r,
            green: other_color.g,
            blue: other_color.b,
        }
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.as_array())
    }
}

impl From<&image::Rgb<u8>> for Color {
    fn from(pixel: &image::Rgb<u8>) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }
}

impl fmt::LowerHex for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.red(),
            self.green(),
            self.blue()
        )
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct ParseColorError;

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("colors must be six hex digits, optionally prefixed with '#'")
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        match hex::decode(digits).as_deref() {
            Ok([red, green, blue]) => Ok(Self::new(*red, *green, *blue)),
            _ => Err(ParseColorError),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let color_str: String = Deserialize::deserialize(deserializer)?;
        color_str.parse().map_err(|_| {
            de::Error::invalid_value(
                de::Unexpected::Str(&color_str),
                &"a hex color like #4b0082",
            )
        })
    }
}

impl Color {
    /// The cold end of the default gradient, CSS "indigo".
    pub(crate) const INDIGO: Self = Self {
        red: 0x4b,
        green: 0x00,
        blue: 0x82,
    };

    /// The hot end of the default gradient.
    pub(crate) const RED: Self = Self {
        red: u8::MAX,
        green: 0,
        blue: 0,
    };

    pub(crate) const GRAY: Self = Self {
        red: 0x80,
        green: 0x80,
        blue: 0x80,
    };

    pub(crate) const BLACK: Self = Self {
        red: u8::MIN,
        green: u8::MIN,
        blue: u8::MIN,
    };

    pub(crate) const WHITE: Self = Self {
        red: u8::MAX,
        green: u8::MAX,
        blue: u8::MAX,
    };

    /// Create a new [Color] with the given 8-bit color values.
    pub(crate) const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub(crate) fn red(&self) -> u8 {
        self.red
    }

    pub(crate) fn green(&self) -> u8 {
        self.green
    }

    pub(crate) fn blue(&self) -> u8 {
        self.blue
    }

    /// Linearly interpolate each channel between `self` (at 0.0) and `other` (at 1.0).
    ///
    /// `t` is clamped to `[0, 1]`, and each channel is rounded to the nearest integer.
    pub(crate) fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |start: u8, end: u8| -> u8 {
            let start = f32::from(start);
            let end = f32::from(end);
            (start + (end - start) * t).round() as u8
        };
        Self::new(
            channel(self.red, other.red),
            channel(self.green, other.green),
            channel(self.blue, other.blue),
        )
    }

    /// The red, green, and blue components as a 3 element array.
    pub(crate) fn as_array(&self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }
}
