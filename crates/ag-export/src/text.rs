use std::path::Path;

use ag_core::error::{ConvertError, Result};
use ag_core::frame::{AsciiFrame, RenderedFrame};
use image::RgbImage;

/// Write `frame` as newline-separated UTF-8 text, nothing else.
///
/// # Errors
/// Returns `ConvertError::Write` if the file cannot be written.
pub fn write_text(path: &Path, frame: &AsciiFrame) -> Result<()> {
    std::fs::write(path, frame.to_text()).map_err(|e| ConvertError::write(path, e))?;
    log::info!("Wrote {} ({} lines)", path.display(), frame.height());
    Ok(())
}

/// Convert a rendered frame into an `image` buffer.
///
/// # Errors
/// Returns `ConvertError::Write` (labelled with `path`) if the pixel buffer does
/// not match the frame dimensions.
pub(crate) fn to_rgb_image(frame: RenderedFrame, path: &Path) -> Result<RgbImage> {
    let (w, h) = (frame.width, frame.height);
    RgbImage::from_raw(w, h, frame.data).ok_or_else(|| {
        ConvertError::write(
            path,
            std::io::Error::other(format!("rendered frame buffer does not match {w}x{h}")),
        )
    })
}

/// Save a rendered frame as a still image; the format follows the extension.
///
/// # Errors
/// Returns `ConvertError::Write` if encoding or writing fails.
pub fn write_image(path: &Path, frame: RenderedFrame) -> Result<()> {
    let img = to_rgb_image(frame, path)?;
    img.save(path)
        .map_err(|e| ConvertError::write(path, std::io::Error::other(e)))?;
    log::info!("Wrote {} ({}x{})", path.display(), img.width(), img.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_core::color::Rgb;

    #[test]
    fn text_file_has_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shark.png.txt");
        let frame = AsciiFrame::from_lines(vec!["vvv".into(), "$$$".into()]);
        write_text(&path, &frame).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "vvv\n$$$\n");
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.txt");
        let frame = AsciiFrame::from_lines(vec!["v".into()]);
        assert!(matches!(
            write_text(&path, &frame),
            Err(ConvertError::Write { .. })
        ));
    }

    #[test]
    fn png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut frame = RenderedFrame::filled(3, 2, Rgb::WHITE);
        frame.put_pixel(2, 1, Rgb(1, 2, 3));
        write_image(&path, frame).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [1, 2, 3]);
        assert_eq!(back.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
