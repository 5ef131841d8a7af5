// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::ArrayView2;

use crate::image_buffer::IndexGrid;
use crate::temperature::TemperatureRange;

/// Rescale a temperature from `range` to a gradient index in `[0, max_index]`.
///
/// Values outside of the range are clamped to the nearest end. NaN is passed through so the
/// interpolator can fill it in from its neighbors.
pub(crate) fn normalize(value: f32, range: &TemperatureRange, max_index: f32) -> f32 {
    let scaled = (value - range.min()) * max_index / range.span();
    if scaled.is_nan() {
        scaled
    } else {
        scaled.clamp(0.0, max_index)
    }
}

/// Normalize every temperature in a grid.
pub(crate) fn normalize_grid(
    temperatures: ArrayView2<'_, f32>,
    range: &TemperatureRange,
    max_index: f32,
) -> IndexGrid {
    temperatures.mapv(|temperature| normalize(temperature, range, max_index))
}
