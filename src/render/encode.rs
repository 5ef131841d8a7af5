// SPDX-License-Identifier: GPL-3.0-or-later
use bytes::{BufMut, Bytes, BytesMut};
use image::codecs::png::PngEncoder;
use image::ColorType;
use tracing::trace;

use crate::error::Error;
use crate::image_buffer::Canvas;

/// Encode a canvas as a PNG image.
///
/// The whole image is encoded into memory first, so either complete PNG data or an error is
/// returned.
pub(crate) fn encode_png(canvas: &Canvas) -> Result<Bytes, Error> {
    trace!(
        width = canvas.width(),
        height = canvas.height(),
        "encoding PNG image"
    );
    let mut png_buf = BytesMut::new().writer();
    let encoder = PngEncoder::new(&mut png_buf);
    encoder.encode(canvas, canvas.width(), canvas.height(), ColorType::Rgb8)?;
    Ok(png_buf.into_inner().freeze())
}
