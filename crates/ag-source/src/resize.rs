//! Luminance sampler: decoded frame → glyph-resolution intensity grid.

use ag_core::error::{ConvertError, Result};
use ag_core::frame::{FrameBuffer, IntensityGrid};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

/// Vertical compression compensating for glyphs being about twice as tall as wide.
pub const CELL_ASPECT: f64 = 0.5;

/// Grid size for a `src_w × src_h` source at `target_width` columns and `scale`.
///
/// Both dimensions are rounded and clamped to at least one cell.
///
/// # Example
/// ```
/// use ag_source::resize::grid_dimensions;
/// assert_eq!(grid_dimensions(50, 50, 10, 1.0), (10, 5));
/// assert_eq!(grid_dimensions(200, 100, 80, 0.5), (40, 10));
/// ```
#[must_use]
pub fn grid_dimensions(src_w: u32, src_h: u32, target_width: u32, scale: f32) -> (u32, u32) {
    let width = (f64::from(target_width) * f64::from(scale)).round().max(1.0) as u32;
    let aspect = f64::from(src_h) / f64::from(src_w.max(1));
    let height = (f64::from(width) * aspect * CELL_ASPECT).round().max(1.0) as u32;
    (width, height)
}

/// Sample `frame` down to an intensity grid of `grid_dimensions(..)` cells.
///
/// `index` only labels errors.
///
/// # Errors
/// Returns `ConvertError::Decode` if the bitmap is empty or its buffer does not
/// match its dimensions, or if resampling fails.
pub fn sample(
    frame: &FrameBuffer,
    target_width: u32,
    scale: f32,
    index: usize,
) -> Result<IntensityGrid> {
    if !frame.is_consistent() {
        return Err(ConvertError::decode(
            index,
            format!(
                "bitmap {}x{} holds {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            ),
        ));
    }
    let (width, height) = grid_dimensions(frame.width, frame.height, target_width, scale);

    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| ConvertError::decode(index, "RGBA buffer size mismatch"))?;
    let luma = DynamicImage::ImageRgba8(rgba).into_luma8();

    let src = Image::from_vec_u8(frame.width, frame.height, luma.into_raw(), PixelType::U8)
        .map_err(|e| ConvertError::decode(index, e))?;
    let mut dst = Image::new(width, height, PixelType::U8);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| ConvertError::decode(index, e))?;

    IntensityGrid::from_raw(width, height, dst.into_vec())
        .ok_or_else(|| ConvertError::decode(index, "resized buffer size mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn solid_gray_keeps_its_value() {
        let frame = FrameBuffer::filled(50, 50, [128, 128, 128, 255]);
        let grid = sample(&frame, 10, 1.0, 0).unwrap();
        assert_eq!((grid.width, grid.height), (10, 5));
        assert!(grid.data.iter().all(|&v| v == 128), "{:?}", grid.data);
    }

    #[test]
    fn scale_multiplies_columns() {
        let frame = FrameBuffer::filled(40, 20, [0, 0, 0, 255]);
        let grid = sample(&frame, 10, 2.0, 0).unwrap();
        assert_eq!((grid.width, grid.height), (20, 5));
    }

    #[test]
    fn tiny_outputs_clamp_to_one_cell() {
        assert_eq!(grid_dimensions(1000, 10, 1, 0.1), (1, 1));
        let frame = FrameBuffer::filled(1000, 10, [255, 255, 255, 255]);
        let grid = sample(&frame, 1, 0.1, 0).unwrap();
        assert_eq!(grid.data, vec![255]);
    }

    #[test]
    fn inconsistent_bitmap_is_a_decode_error() {
        let mut frame = FrameBuffer::new(4, 4);
        frame.data.truncate(10);
        assert!(matches!(
            sample(&frame, 10, 1.0, 3),
            Err(ConvertError::Decode { frame: 3, .. })
        ));
        let empty = FrameBuffer::new(0, 0);
        assert!(sample(&empty, 10, 1.0, 0).is_err());
    }

    proptest! {
        #[test]
        fn grid_height_follows_aspect(
            src_w in 1u32..400,
            src_h in 1u32..400,
            target in 1u32..200,
            scale in 0.1f32..4.0,
        ) {
            let (w, h) = grid_dimensions(src_w, src_h, target, scale);
            let expected_w = (f64::from(target) * f64::from(scale)).round().max(1.0) as u32;
            prop_assert_eq!(w, expected_w);
            let expected_h = (f64::from(w) * (f64::from(src_h) / f64::from(src_w)) * 0.5)
                .round()
                .max(1.0) as u32;
            prop_assert_eq!(h, expected_h);
        }
    }
}
