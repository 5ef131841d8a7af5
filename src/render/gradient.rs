// SPDX-License-Identifier: GPL-3.0-or-later
use tracing::debug;

use crate::error::Error;

use super::color::Color;

/// A fixed lookup table of colors blending from a cold color to a hot color.
///
/// Built once at startup and shared (usually behind an [`Arc`][std::sync::Arc]) by every
/// renderer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorGradient {
    colors: Vec<Color>,
}

impl ColorGradient {
    pub(crate) const DEFAULT_DEPTH: usize = 1024;

    /// Build a gradient of `depth` colors, linearly blending each channel from `cold` (index 0)
    /// to `hot` (index `depth - 1`).
    pub(crate) fn new(cold: Color, hot: Color, depth: usize) -> Result<Self, Error> {
        if depth < 2 {
            return Err(Error::InvalidColorDepth(depth));
        }
        debug!(?cold, ?hot, depth, "Building color gradient");
        Ok(Self {
            colors: blend(cold, hot, depth),
        })
    }

    pub(crate) fn depth(&self) -> usize {
        self.colors.len()
    }

    /// The largest valid index, as a float for use with [`normalize`][super::normalize].
    pub(crate) fn max_index(&self) -> f32 {
        (self.colors.len() - 1) as f32
    }

    /// Look up a color by index.
    ///
    /// # Panics
    /// If `index` is not less than [`depth`][Self::depth]. Callers are expected to clamp first.
    pub(crate) fn get(&self, index: usize) -> Color {
        self.colors[index]
    }

    /// Look up the color for a fractional index, clamping it into the table and rounding to the
    /// nearest entry. Non-finite values are treated as the cold end.
    pub(crate) fn color_for(&self, index: f32) -> Color {
        let index = if index.is_finite() {
            index.clamp(0.0, self.max_index()).round() as usize
        } else {
            0
        };
        self.get(index)
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self {
            colors: blend(Color::INDIGO, Color::RED, Self::DEFAULT_DEPTH),
        }
    }
}

fn blend(cold: Color, hot: Color, depth: usize) -> Vec<Color> {
    let last = (depth - 1) as f32;
    (0..depth)
        .map(|index| cold.lerp(&hot, index as f32 / last))
        .collect()
}
