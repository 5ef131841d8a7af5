// SPDX-License-Identifier: GPL-3.0-or-later
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Zip};
use serde::Deserialize;
use tracing::{trace, warn};

use crate::error::Error;
use crate::image_buffer::IndexGrid;

/// Different ways of filling in the points between sensor pixels.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Method {
    /// Nearest neighbor sampling.
    Nearest,

    /// Linear sampling along each axis.
    #[serde(alias = "bilinear")]
    Linear,

    /// Monotone piecewise cubic Hermite sampling along each axis.
    ///
    /// The curve goes through every sample, has a continuous first derivative, and never
    /// overshoots the samples on either side of it.
    #[serde(alias = "bicubic", alias = "pchip")]
    Cubic,
}

impl Default for Method {
    fn default() -> Self {
        Self::Cubic
    }
}

/// Resamples a grid of values to a larger grid spanning the same extent.
///
/// The corners of the output line up with the corners of the input, so for an 8×8 input and
/// 32×32 output, output point `k` on each axis is at input coordinate `k * 7 / 31`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Interpolator {
    method: Method,
    output_size: usize,
}

impl Interpolator {
    pub(crate) const DEFAULT_SIZE: usize = 32;

    pub(crate) fn new(method: Method, output_size: usize) -> Self {
        Self {
            method,
            output_size,
        }
    }

    /// Upsample `input` to an `output_size` square grid.
    ///
    /// Any undefined (non-finite) results are replaced with the nearest defined result. If
    /// there are no defined results at all, [`Error::InterpolationUndefined`] is returned.
    pub(crate) fn interpolate(&self, input: ArrayView2<'_, f32>) -> Result<IndexGrid, Error> {
        let (rows, cols) = input.dim();
        let row_positions = positions(rows, self.output_size);
        let col_positions = positions(cols, self.output_size);
        // Interpolate along each row first, then along each column of that result.
        let widened = resample_rows(input, &col_positions, self.method);
        let mut output = resample_rows(widened.t(), &row_positions, self.method).reversed_axes();
        output = output.as_standard_layout().into_owned();
        trace!(?rows, ?cols, size = self.output_size, method = ?self.method, "interpolated grid");
        fill_undefined(&mut output)?;
        Ok(output)
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(Method::default(), Self::DEFAULT_SIZE)
    }
}

/// Evenly spaced coordinates covering `[0, input_len - 1]`, both ends included.
fn positions(input_len: usize, output_len: usize) -> Vec<f32> {
    let last_input = input_len.saturating_sub(1) as f32;
    if output_len < 2 {
        return vec![0.0; output_len];
    }
    let last_output = (output_len - 1) as f32;
    (0..output_len)
        // Multiply first so the final position is exactly the last input coordinate.
        .map(|k| (k as f32 * last_input / last_output).clamp(0.0, last_input))
        .collect()
}

/// Interpolate each row of `input` at the given positions.
fn resample_rows(input: ArrayView2<'_, f32>, positions: &[f32], method: Method) -> Array2<f32> {
    let mut output = Array2::zeros((input.nrows(), positions.len()));
    Zip::from(output.rows_mut())
        .and(input.rows())
        .par_for_each(|out_row, in_row| resample_line(in_row, out_row, positions, method));
    output
}

fn resample_line(
    samples: ArrayView1<'_, f32>,
    mut output: ArrayViewMut1<'_, f32>,
    positions: &[f32],
    method: Method,
) {
    let samples = samples.to_vec();
    if samples.len() == 1 {
        output.fill(samples[0]);
        return;
    }
    let slopes = if method == Method::Cubic {
        monotone_slopes(&samples)
    } else {
        Vec::new()
    };
    for (out, &position) in output.iter_mut().zip(positions) {
        let (segment, t) = locate(position, samples.len());
        let start = samples[segment];
        let end = samples[segment + 1];
        *out = match method {
            Method::Nearest => {
                if t < 0.5 {
                    start
                } else {
                    end
                }
            }
            Method::Linear => start + (end - start) * t,
            Method::Cubic => hermite(start, end, slopes[segment], slopes[segment + 1], t),
        };
    }
}

/// Find the segment containing `position`, and how far along that segment it is.
fn locate(position: f32, sample_count: usize) -> (usize, f32) {
    let last_segment = sample_count - 2;
    let segment = (position.floor().max(0.0) as usize).min(last_segment);
    (segment, position - segment as f32)
}

/// Cubic Hermite on a unit interval, written relative to `start` so that a flat segment
/// evaluates to exactly `start`.
fn hermite(start: f32, end: f32, start_slope: f32, end_slope: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h01 = 3.0 * t2 - 2.0 * t3;
    let h10 = t3 - 2.0 * t2 + t;
    let h11 = t3 - t2;
    start + (end - start) * h01 + start_slope * h10 + end_slope * h11
}

/// Fritsch–Carlson slopes for unit-spaced samples.
///
/// Interior slopes are the harmonic mean of the neighboring secants, or zero at a local
/// extremum. End slopes use the one-sided three point estimate, limited so the end segments
/// stay monotone.
fn monotone_slopes(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    let secants: Vec<f32> = samples.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let mut slopes = vec![0.0f32; n];
    if n == 2 {
        slopes[0] = secants[0];
        slopes[1] = secants[0];
        return slopes;
    }
    for k in 1..(n - 1) {
        let before = secants[k - 1];
        let after = secants[k];
        slopes[k] = if before * after > 0.0 {
            2.0 / (1.0 / before + 1.0 / after)
        } else {
            0.0
        };
    }
    slopes[0] = end_slope(secants[0], secants[1]);
    slopes[n - 1] = end_slope(secants[n - 2], secants[n - 3]);
    slopes
}

fn end_slope(edge_secant: f32, next_secant: f32) -> f32 {
    let slope = (3.0 * edge_secant - next_secant) / 2.0;
    if slope.signum() != edge_secant.signum() || edge_secant == 0.0 {
        0.0
    } else if edge_secant.signum() != next_secant.signum()
        && slope.abs() > 3.0 * edge_secant.abs()
    {
        3.0 * edge_secant
    } else {
        slope
    }
}

/// Replace non-finite values with the closest finite value in the grid.
///
/// Distance is measured in grid cells; ties go to whichever candidate comes first in
/// row-major order.
fn fill_undefined(grid: &mut Array2<f32>) -> Result<(), Error> {
    let undefined: Vec<(usize, usize)> = grid
        .indexed_iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(index, _)| index)
        .collect();
    if undefined.is_empty() {
        return Ok(());
    }
    let defined: Vec<((usize, usize), f32)> = grid
        .indexed_iter()
        .filter(|(_, value)| value.is_finite())
        .map(|(index, value)| (index, *value))
        .collect();
    if defined.is_empty() {
        return Err(Error::InterpolationUndefined);
    }
    warn!(
        count = undefined.len(),
        "Filling undefined interpolated values from nearest neighbors"
    );
    for (row, col) in undefined {
        let mut best: Option<(usize, f32)> = None;
        for &((other_row, other_col), value) in defined.iter() {
            let distance = row.abs_diff(other_row).pow(2) + col.abs_diff(other_col).pow(2);
            match best {
                Some((best_distance, _)) if best_distance <= distance => (),
                _ => best = Some((distance, value)),
            }
        }
        if let Some((_, value)) = best {
            grid[[row, col]] = value;
        }
    }
    Ok(())
}
