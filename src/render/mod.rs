// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use crate::error::Error;
use crate::frame::ThermalFrame;
use crate::image_buffer::{Canvas, IndexGrid};
use crate::temperature::TemperatureRange;

mod canvas;
pub(crate) mod color;
mod encode;
mod gradient;
mod interpolate;
mod normalize;
mod plot;
mod settings;

pub(crate) use self::color::Color;
pub(crate) use self::encode::encode_png;
pub(crate) use self::gradient::ColorGradient;
pub(crate) use self::interpolate::{Interpolator, Method};
pub(crate) use self::plot::Plotter;
pub(crate) use self::settings::RenderSettings;

/// Turns thermal frames into smooth false color images.
///
/// Each frame is normalized to gradient indices, upsampled by the [`Interpolator`], then
/// painted as flat blocks onto a square canvas.
#[derive(Clone, Debug)]
pub(crate) struct Renderer {
    gradient: Arc<ColorGradient>,
    interpolator: Interpolator,
    canvas_size: u32,
}

impl Renderer {
    pub(crate) const DEFAULT_CANVAS_SIZE: u32 = 240;

    pub(crate) fn new(gradient: Arc<ColorGradient>, interpolator: Interpolator) -> Self {
        Self {
            gradient,
            interpolator,
            canvas_size: Self::DEFAULT_CANVAS_SIZE,
        }
    }

    #[cfg(test)]
    pub(crate) fn gradient(&self) -> &ColorGradient {
        &self.gradient
    }

    /// Normalize and upsample a frame, without mapping it to colors yet.
    pub(crate) fn index_grid(
        &self,
        frame: &ThermalFrame,
        range: &TemperatureRange,
    ) -> Result<IndexGrid, Error> {
        let indices = normalize::normalize_grid(frame.view(), range, self.gradient.max_index());
        self.interpolator.interpolate(indices.view())
    }

    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) fn render(
        &self,
        frame: &ThermalFrame,
        range: &TemperatureRange,
    ) -> Result<Canvas, Error> {
        let grid = self.index_grid(frame, range)?;
        let mut canvas = Canvas::new(self.canvas_size, self.canvas_size);
        paint_grid(&mut canvas, &grid, &self.gradient);
        trace!(
            cells = grid.len(),
            size = self.canvas_size,
            "painted interpolated grid"
        );
        Ok(canvas)
    }

    /// Render a frame and encode it as a PNG.
    pub(crate) fn render_png(
        &self,
        frame: &ThermalFrame,
        range: &TemperatureRange,
    ) -> Result<Bytes, Error> {
        let canvas = self.render(frame, range)?;
        encode_png(&canvas)
    }
}

impl<'a> TryFrom<&'a RenderSettings> for Renderer {
    type Error = Error;

    /// Build the color gradient described by the settings, and a renderer sharing it.
    fn try_from(settings: &'a RenderSettings) -> Result<Self, Self::Error> {
        let gradient = ColorGradient::new(
            settings.cold_color,
            settings.hot_color,
            settings.color_depth,
        )?;
        debug!(
            depth = gradient.depth(),
            method = ?settings.interpolation,
            "Created renderer"
        );
        Ok(Self::new(
            Arc::new(gradient),
            Interpolator::new(settings.interpolation, Interpolator::DEFAULT_SIZE),
        ))
    }
}

fn paint_grid(canvas: &mut Canvas, grid: &IndexGrid, gradient: &ColorGradient) {
    let (width, height) = canvas.dimensions();
    canvas::paint_blocks(canvas, grid.view(), (0, 0, width, height), |index| {
        gradient.color_for(index)
    });
}
