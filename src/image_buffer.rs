// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::Array2;

/// The pixel buffer rendered frames are painted on to before encoding.
pub(crate) type Canvas = image::RgbImage;

/// A grid of (possibly fractional) color gradient indices, one per interpolated point.
pub(crate) type IndexGrid = Array2<f32>;
