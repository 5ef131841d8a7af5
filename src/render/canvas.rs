// SPDX-License-Identifier: GPL-3.0-or-later
use std::ops::Range;

use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use ndarray::ArrayView2;

use crate::image_buffer::Canvas;

use super::color::Color;

/// The pixel span covered by cell `index` when `cells` cells share `length` pixels.
///
/// Boundaries are the floor of the cumulative offset, so spans of uneven sizes (7 and 8 pixels
/// for 32 cells over 240 pixels) tile the whole length with no gaps or overlaps.
pub(crate) fn block_span(index: u32, cells: u32, length: u32) -> Range<u32> {
    let start = (index as u64 * length as u64 / cells as u64) as u32;
    let end = ((index as u64 + 1) * length as u64 / cells as u64) as u32;
    start..end
}

/// Fill a region of `canvas` with one flat block of color per grid cell.
///
/// Grid rows run down the image and grid columns run across it. `region` is the
/// `(x, y, width, height)` of the area the grid is stretched over.
pub(crate) fn paint_blocks<F>(
    canvas: &mut Canvas,
    grid: ArrayView2<'_, f32>,
    region: (u32, u32, u32, u32),
    color_for: F,
) where
    F: Fn(f32) -> Color,
{
    let (left, top, width, height) = region;
    let (rows, cols) = grid.dim();
    for ((row, col), value) in grid.indexed_iter() {
        let xs = block_span(col as u32, cols as u32, width);
        let ys = block_span(row as u32, rows as u32, height);
        if xs.is_empty() || ys.is_empty() {
            continue;
        }
        let block = Rect::at((left + xs.start) as i32, (top + ys.start) as i32)
            .of_size(xs.end - xs.start, ys.end - ys.start);
        draw_filled_rect_mut(canvas, block, color_for(*value).into());
    }
}

#[cfg(test)]
mod test {
    use ndarray::Array2;

    use super::{block_span, paint_blocks};
    use crate::image_buffer::Canvas;
    use crate::render::color::Color;

    #[test]
    fn spans_tile_axis() {
        let mut next_start = 0;
        for index in 0..32 {
            let span = block_span(index, 32, 240);
            assert_eq!(span.start, next_start);
            let width = span.end - span.start;
            assert!(width == 7 || width == 8, "cell {} is {} wide", index, width);
            next_start = span.end;
        }
        assert_eq!(next_start, 240);
    }

    #[test]
    fn floor_of_cumulative_offset() {
        assert_eq!(block_span(0, 32, 240), 0..7);
        assert_eq!(block_span(1, 32, 240), 7..15);
        assert_eq!(block_span(2, 32, 240), 15..22);
        assert_eq!(block_span(31, 32, 240), 232..240);
    }

    #[test]
    fn every_pixel_painted_once() {
        // Give each cell its own color, then check each pixel got its cell's color.
        let grid = Array2::from_shape_fn((32, 32), |(r, c)| (r * 32 + c) as f32);
        let mut canvas = Canvas::new(240, 240);
        paint_blocks(&mut canvas, grid.view(), (0, 0, 240, 240), |value| {
            let value = value as u32;
            Color::new((value / 32) as u8, (value % 32) as u8, 1)
        });
        for (x, y, pixel) in canvas.enumerate_pixels() {
            let color = Color::from(pixel);
            let row = color.red() as u32;
            let col = color.green() as u32;
            assert_eq!(color.blue(), 1, "pixel ({}, {}) was not painted", x, y);
            assert!(block_span(row, 32, 240).contains(&y));
            assert!(block_span(col, 32, 240).contains(&x));
        }
    }

    #[test]
    fn offset_region() {
        let grid = Array2::from_elem((2, 2), 0.0f32);
        let mut canvas = Canvas::new(10, 10);
        paint_blocks(&mut canvas, grid.view(), (2, 4, 4, 4), |_| Color::WHITE);
        assert_eq!(Color::from(canvas.get_pixel(1, 5)), Color::BLACK);
        assert_eq!(Color::from(canvas.get_pixel(2, 4)), Color::WHITE);
        assert_eq!(Color::from(canvas.get_pixel(5, 7)), Color::WHITE);
        assert_eq!(Color::from(canvas.get_pixel(6, 8)), Color::BLACK);
    }
}
