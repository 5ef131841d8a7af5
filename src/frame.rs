// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One snapshot from the sensor: 8×8 temperatures in Celsius, row-major.
///
/// Frames (de)serialize as a list of rows, the same shape the sensor reports them in.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub(crate) struct ThermalFrame(Array2<f32>);

impl ThermalFrame {
    pub(crate) const SIZE: usize = 8;
    pub(crate) const PIXELS: usize = Self::SIZE * Self::SIZE;

    /// A frame where every pixel has the same temperature.
    #[cfg(test)]
    pub(crate) fn uniform(temperature: f32) -> Self {
        Self(Array2::from_elem((Self::SIZE, Self::SIZE), temperature))
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: [[f32; 8]; 8]) -> Self {
        Self(Array2::from_shape_fn((Self::SIZE, Self::SIZE), |(r, c)| {
            rows[r][c]
        }))
    }

    #[cfg(test)]
    pub(crate) fn get(&self, row: usize, col: usize) -> f32 {
        self.0[[row, col]]
    }

    pub(crate) fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f32>> {
        self.0.axis_iter(Axis(0))
    }
}

impl TryFrom<Array2<f32>> for ThermalFrame {
    type Error = Error;

    fn try_from(grid: Array2<f32>) -> Result<Self, Self::Error> {
        let (rows, cols) = grid.dim();
        if rows != Self::SIZE || cols != Self::SIZE {
            return Err(Error::InvalidFrameShape { rows, cols });
        }
        // Keep everything row-major so iteration order matches the sensor layout.
        Ok(Self(grid.as_standard_layout().into_owned()))
    }
}

impl TryFrom<Vec<f32>> for ThermalFrame {
    type Error = Error;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.len() != Self::PIXELS {
            return Err(Error::InvalidFrameShape {
                rows: values.len() / Self::SIZE,
                cols: Self::SIZE,
            });
        }
        Array2::from_shape_vec((Self::SIZE, Self::SIZE), values)
            .map(Self)
            .map_err(|_| Error::InvalidFrameShape {
                rows: Self::SIZE,
                cols: Self::SIZE,
            })
    }
}

impl TryFrom<Vec<Vec<f32>>> for ThermalFrame {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        let row_count = rows.len();
        if let Some(bad_row) = rows.iter().find(|row| row.len() != Self::SIZE) {
            return Err(Error::InvalidFrameShape {
                rows: row_count,
                cols: bad_row.len(),
            });
        }
        if row_count != Self::SIZE {
            return Err(Error::InvalidFrameShape {
                rows: row_count,
                cols: Self::SIZE,
            });
        }
        Self::try_from(rows.into_iter().flatten().collect::<Vec<f32>>())
    }
}

impl From<ThermalFrame> for Vec<Vec<f32>> {
    fn from(frame: ThermalFrame) -> Self {
        frame.rows().map(|row| row.to_vec()).collect()
    }
}
