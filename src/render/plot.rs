// SPDX-License-Identifier: GPL-3.0-or-later
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use ndarray::Array2;
use tracing::trace;

use crate::frame::ThermalFrame;
use crate::image_buffer::Canvas;
use crate::temperature::TemperatureRange;

use super::canvas::paint_blocks;
use super::color::Color;

const CELL_SIZE: u32 = 40;
const MARGIN: u32 = 10;
const LEGEND_GAP: u32 = 20;
const LEGEND_WIDTH: u32 = 24;
const TICK_LENGTH: u32 = 6;
/// Fractions of the temperature range marked on the legend.
///
/// The ticks are unlabelled since no font is available to draw with. The limits they span are
/// written at the top of the text dump exported alongside each plot.
const TICKS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Draws the raw (not interpolated) sensor grid in false color, with a color scale beside it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Plotter {
    gradient: colorous::Gradient,
}

impl Plotter {
    pub(crate) fn new(gradient: colorous::Gradient) -> Self {
        Self { gradient }
    }

    /// The color for `temperature`, scaled by `range` and clamped to the ends of the gradient.
    fn color_for(&self, temperature: f32, range: &TemperatureRange) -> Color {
        let fraction = (temperature - range.min()) / range.span();
        if fraction.is_finite() {
            self.gradient
                .eval_continuous(fraction.clamp(0.0, 1.0) as f64)
                .into()
        } else {
            Color::GRAY
        }
    }

    fn plot_size() -> u32 {
        CELL_SIZE * ThermalFrame::SIZE as u32
    }

    pub(crate) fn dimensions() -> (u32, u32) {
        let width = MARGIN + Self::plot_size() + LEGEND_GAP + LEGEND_WIDTH + TICK_LENGTH + MARGIN;
        let height = MARGIN + Self::plot_size() + MARGIN;
        (width, height)
    }

    pub(crate) fn plot(&self, frame: &ThermalFrame, range: &TemperatureRange) -> Canvas {
        let (width, height) = Self::dimensions();
        let plot_size = Self::plot_size();
        let mut canvas = Canvas::from_pixel(width, height, Color::WHITE.into());

        paint_blocks(
            &mut canvas,
            frame.view(),
            (MARGIN, MARGIN, plot_size, plot_size),
            |temperature| self.color_for(temperature, range),
        );
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(MARGIN as i32 - 1, MARGIN as i32 - 1).of_size(plot_size + 2, plot_size + 2),
            Color::BLACK.into(),
        );

        // The legend is a column of the gradient, hottest at the top.
        let legend_left = MARGIN + plot_size + LEGEND_GAP;
        let legend_rows = plot_size as usize;
        let legend = Array2::from_shape_fn((legend_rows, 1), |(row, _)| {
            let fraction = 1.0 - row as f32 / (legend_rows - 1) as f32;
            range.min() + fraction * range.span()
        });
        paint_blocks(
            &mut canvas,
            legend.view(),
            (legend_left, MARGIN, LEGEND_WIDTH, plot_size),
            |temperature| self.color_for(temperature, range),
        );
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(legend_left as i32 - 1, MARGIN as i32 - 1)
                .of_size(LEGEND_WIDTH + 2, plot_size + 2),
            Color::BLACK.into(),
        );
        let tick_start = (legend_left + LEGEND_WIDTH) as f32;
        for fraction in TICKS.iter() {
            let y = MARGIN as f32 + (1.0 - fraction) * (plot_size - 1) as f32;
            draw_line_segment_mut(
                &mut canvas,
                (tick_start, y),
                (tick_start + TICK_LENGTH as f32, y),
                Color::BLACK.into(),
            );
        }
        trace!(width, height, "plotted raw frame");
        canvas
    }
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new(colorous::INFERNO)
    }
}

#[cfg(test)]
mod test {
    use super::{Plotter, CELL_SIZE, MARGIN};
    use crate::frame::ThermalFrame;
    use crate::render::color::Color;
    use crate::temperature::TemperatureRange;

    fn cell_center(row: u32, col: u32) -> (u32, u32) {
        (
            MARGIN + col * CELL_SIZE + CELL_SIZE / 2,
            MARGIN + row * CELL_SIZE + CELL_SIZE / 2,
        )
    }

    #[test]
    fn dimensions() {
        let frame = ThermalFrame::uniform(28.0);
        let plot = Plotter::default().plot(&frame, &TemperatureRange::default());
        assert_eq!(plot.dimensions(), Plotter::dimensions());
        assert_eq!(plot.dimensions(), (390, 340));
    }

    #[test]
    fn uses_raw_cells() {
        let mut rows = [[26.0f32; 8]; 8];
        rows[0][0] = 32.0;
        let frame = ThermalFrame::from_rows(rows);
        let range = TemperatureRange::default();
        let plot = Plotter::default().plot(&frame, &range);
        let hot = Color::from(colorous::INFERNO.eval_continuous(1.0));
        let cold = Color::from(colorous::INFERNO.eval_continuous(0.0));
        let (x, y) = cell_center(0, 0);
        assert_eq!(Color::from(plot.get_pixel(x, y)), hot);
        // No interpolation, so the neighboring cell is fully cold right up to the edge.
        let (x, y) = cell_center(0, 1);
        assert_eq!(Color::from(plot.get_pixel(x - CELL_SIZE / 2, y)), cold);
        let (x, y) = cell_center(7, 7);
        assert_eq!(Color::from(plot.get_pixel(x, y)), cold);
    }

    #[test]
    fn clamps_to_range() {
        let frame = ThermalFrame::uniform(100.0);
        let plot = Plotter::default().plot(&frame, &TemperatureRange::default());
        let hot = Color::from(colorous::INFERNO.eval_continuous(1.0));
        let (x, y) = cell_center(4, 4);
        assert_eq!(Color::from(plot.get_pixel(x, y)), hot);
    }

    #[test]
    fn nan_is_gray() {
        let mut rows = [[28.0f32; 8]; 8];
        rows[2][5] = f32::NAN;
        let frame = ThermalFrame::from_rows(rows);
        let plot = Plotter::default().plot(&frame, &TemperatureRange::default());
        let (x, y) = cell_center(2, 5);
        assert_eq!(Color::from(plot.get_pixel(x, y)), Color::GRAY);
    }

    #[test]
    fn legend_runs_hot_to_cold() {
        let plotter = Plotter::default();
        let plot = plotter.plot(&ThermalFrame::uniform(28.0), &TemperatureRange::default());
        let legend_x = MARGIN + CELL_SIZE * 8 + 20 + 12;
        let hot = Color::from(colorous::INFERNO.eval_continuous(1.0));
        let cold = Color::from(colorous::INFERNO.eval_continuous(0.0));
        assert_eq!(Color::from(plot.get_pixel(legend_x, MARGIN)), hot);
        assert_eq!(Color::from(plot.get_pixel(legend_x, MARGIN + 319)), cold);
    }
}
