//! Per-frame conversion chain and the single-pass conversions built on it.

use std::path::Path;

use ag_ascii::mapper::map_to_ascii;
use ag_core::charset::GlyphRamp;
use ag_core::config::ConvertConfig;
use ag_core::error::{ConvertError, Result};
use ag_core::frame::{AsciiFrame, Chunk, FrameBuffer, RenderedFrame};
use ag_core::traits::AnimationSource;
use ag_render::font::{GlyphFont, load_font};
use ag_render::raster::render;
use ag_source::resize::sample;

/// Sampler → Mapper → Renderer for one run configuration.
///
/// # Example
/// ```
/// use ag_app::convert::FrameConverter;
/// use ag_core::config::ConvertConfig;
/// use ag_core::frame::FrameBuffer;
///
/// let config = ConvertConfig { width: 10, ..ConvertConfig::default() };
/// let converter = FrameConverter::new(&config).unwrap();
/// let ascii = converter.to_ascii(&FrameBuffer::filled(50, 50, [128, 128, 128, 255]), 0).unwrap();
/// assert_eq!(ascii.width(), 10);
/// ```
pub struct FrameConverter {
    config: ConvertConfig,
    ramp: GlyphRamp,
    font: Box<dyn GlyphFont>,
}

impl FrameConverter {
    /// Validate `config` and load its font.
    ///
    /// # Errors
    /// Returns `ConvertError::Config` on an invalid configuration or font.
    pub fn new(config: &ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            ramp: GlyphRamp::standard(),
            font: load_font(config)?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Sample and map one frame. `index` labels errors.
    ///
    /// # Errors
    /// Returns `ConvertError::Decode` if the frame cannot be sampled.
    pub fn to_ascii(&self, frame: &FrameBuffer, index: usize) -> Result<AsciiFrame> {
        let grid = sample(frame, self.config.width, self.config.scale, index)?;
        Ok(map_to_ascii(&grid, &self.ramp))
    }

    /// Rasterize an ASCII frame with the configured colors and font.
    #[must_use]
    pub fn rasterize(&self, ascii: &AsciiFrame) -> RenderedFrame {
        render(
            ascii,
            self.config.width,
            self.config.scale,
            self.config.background,
            self.config.foreground,
            self.font.as_ref(),
        )
    }

    /// Full chain for one frame.
    ///
    /// # Errors
    /// Returns `ConvertError::Decode` if the frame cannot be sampled.
    pub fn render_frame(&self, frame: &FrameBuffer, index: usize) -> Result<RenderedFrame> {
        let ascii = self.to_ascii(frame, index)?;
        Ok(self.rasterize(&ascii))
    }
}

/// Convert a still image to ASCII text.
///
/// # Errors
/// Returns `ConvertError::Open` if the image cannot be loaded and
/// `ConvertError::Decode` if it cannot be sampled.
pub fn convert_still(path: &Path, converter: &FrameConverter) -> Result<AsciiFrame> {
    log::debug!("Resizing and mapping {}", path.display());
    let frame = ag_source::image::load_image(path)?;
    let ascii = converter.to_ascii(&frame, 0)?;
    log::info!(
        "Converted {} to {}x{} glyphs",
        path.display(),
        ascii.width(),
        ascii.height()
    );
    Ok(ascii)
}

/// Render every frame of `source` into one in-memory chunk.
///
/// Holds the whole animation; for large inputs use the chunked pipeline.
///
/// # Errors
/// Returns the first decode error, or `ConvertError::Decode` if the source is empty.
pub fn convert_all_frames(
    source: &mut dyn AnimationSource,
    converter: &FrameConverter,
) -> Result<Chunk> {
    let mut chunk = Chunk::default();
    while let Some(frame) = source.next_frame()? {
        let index = chunk.len();
        let rendered = converter.render_frame(&frame.buffer, index)?;
        chunk.push(rendered, frame.duration_ms());
        log::debug!("Rendered frame {index}");
    }
    if chunk.is_empty() {
        return Err(ConvertError::decode(0, "source has no frames"));
    }
    Ok(chunk)
}

/// Default text output for a still image: `<image>.txt` next to it.
///
/// # Example
/// ```
/// use ag_app::convert::default_text_output;
/// use std::path::Path;
/// assert_eq!(default_text_output(Path::new("img/shark.png")), Path::new("img/shark.png.txt"));
/// ```
#[must_use]
pub fn default_text_output(input: &Path) -> std::path::PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".txt");
    name.into()
}

/// Default single-pass animation output: `ascii_<name>` next to the input.
///
/// # Example
/// ```
/// use ag_app::convert::default_animation_output;
/// use std::path::Path;
/// assert_eq!(default_animation_output(Path::new("in/f.gif")), Path::new("in/ascii_f.gif"));
/// ```
#[must_use]
pub fn default_animation_output(input: &Path) -> std::path::PathBuf {
    let name = input
        .file_name()
        .map_or_else(|| "output.gif".into(), |n| n.to_string_lossy().into_owned());
    input.with_file_name(format!("ascii_{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_core::frame::SourceFrame;

    struct FixedSource(Vec<SourceFrame>, usize);

    impl AnimationSource for FixedSource {
        fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
            let frame = self.0.get(self.1).cloned();
            self.1 += 1;
            Ok(frame)
        }

        fn rewind(&mut self) -> Result<()> {
            self.1 = 0;
            Ok(())
        }
    }

    fn small_config() -> ConvertConfig {
        ConvertConfig {
            width: 10,
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn still_gray_image_maps_to_ramp_32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::RgbImage::from_pixel(50, 50, image::Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();

        let converter = FrameConverter::new(&small_config()).unwrap();
        let ascii = convert_still(&path, &converter).unwrap();
        assert_eq!(ascii.height(), 5);
        assert!(ascii.lines().iter().all(|l| l == "vvvvvvvvvv"));
    }

    #[test]
    fn missing_still_is_an_open_error() {
        let converter = FrameConverter::new(&small_config()).unwrap();
        let err = convert_still(Path::new("/definitely/not/here.png"), &converter).unwrap_err();
        assert!(matches!(err, ConvertError::Open { .. }));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = ConvertConfig {
            chunk_size: 0.0,
            ..ConvertConfig::default()
        };
        assert!(matches!(
            FrameConverter::new(&config),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn rendered_frame_size_follows_font_cells() {
        let converter = FrameConverter::new(&small_config()).unwrap();
        let frame = FrameBuffer::filled(40, 40, [0, 0, 0, 255]);
        let rendered = converter.render_frame(&frame, 0).unwrap();
        // 10 columns × 8 px, 5 rows × 16 px
        assert_eq!((rendered.width, rendered.height), (80, 80));
    }

    #[test]
    fn single_pass_keeps_every_frame_and_duration() {
        let frames = [Some(30), None, Some(70)]
            .into_iter()
            .map(|delay_ms| SourceFrame {
                buffer: FrameBuffer::filled(8, 8, [200, 200, 200, 255]),
                delay_ms,
            })
            .collect();
        let mut source = FixedSource(frames, 0);
        let converter = FrameConverter::new(&small_config()).unwrap();
        let chunk = convert_all_frames(&mut source, &converter).unwrap();
        assert_eq!(chunk.durations_ms(), &[30, 100, 70]);
    }

    #[test]
    fn empty_source_is_a_decode_error() {
        let mut source = FixedSource(Vec::new(), 0);
        let converter = FrameConverter::new(&small_config()).unwrap();
        assert!(matches!(
            convert_all_frames(&mut source, &converter),
            Err(ConvertError::Decode { .. })
        ));
    }
}
