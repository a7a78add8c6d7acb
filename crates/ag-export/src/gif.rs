//! Animated GIF artifacts: chunk files and single-pass outputs.

use std::path::{Path, PathBuf};

use ag_core::error::{ConvertError, Result};
use ag_core::frame::Chunk;
use ag_core::recipe::RecombinationRecipe;
use ag_core::traits::ArtifactSink;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};

use crate::script;
use crate::text::to_rgb_image;

/// NeuQuant sampling speed (1 = best, 30 = fastest). Two-tone frames quantize
/// well at any speed.
const ENCODE_SPEED: i32 = 10;

/// File name of chunk `index`.
///
/// # Example
/// ```
/// assert_eq!(ag_export::gif::chunk_file_name(3), "chunk_3.gif");
/// ```
#[must_use]
pub fn chunk_file_name(index: usize) -> String {
    format!("chunk_{index}.gif")
}

/// Encode `chunk` as an infinitely looping GIF, one delay per frame.
///
/// The file is encoded in memory, trailer included, and written in one call
/// so that a failed write is never mistaken for a complete artifact.
///
/// # Errors
/// Returns `ConvertError::Write` if the chunk cannot be encoded or the file
/// cannot be written.
pub fn write_animation(path: &Path, chunk: Chunk) -> Result<()> {
    let write_err = |e: image::ImageError| ConvertError::write(path, std::io::Error::other(e));

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, ENCODE_SPEED);
        encoder.set_repeat(Repeat::Infinite).map_err(write_err)?;

        for (frame, duration_ms) in chunk.into_frames() {
            let rgba = DynamicImage::ImageRgb8(to_rgb_image(frame, path)?).into_rgba8();
            let delay = Delay::from_numer_denom_ms(duration_ms, 1);
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .map_err(write_err)?;
        }
    }
    std::fs::write(path, &bytes).map_err(|e| ConvertError::write(path, e))
}

/// Writes chunk GIFs and the recombination script into one directory.
///
/// # Example
/// ```no_run
/// use ag_export::gif::GifChunkSink;
/// let sink = GifChunkSink::new("work");
/// assert_eq!(sink.script_path(), std::path::Path::new("work/combine_chunks.sh"));
/// ```
#[derive(Debug, Clone)]
pub struct GifChunkSink {
    dir: PathBuf,
}

impl GifChunkSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(chunk_file_name(index))
    }

    #[must_use]
    pub fn script_path(&self) -> PathBuf {
        self.dir.join(script::SCRIPT_FILE_NAME)
    }
}

impl ArtifactSink for GifChunkSink {
    fn persist_chunk(&mut self, index: usize, chunk: Chunk) -> Result<PathBuf> {
        let path = self.chunk_path(index);
        let frames = chunk.len();
        write_animation(&path, chunk)?;
        log::info!("Saved chunk {index} ({frames} frames) to {}", path.display());
        Ok(path)
    }

    fn persist_recipe(&mut self, recipe: &RecombinationRecipe) -> Result<PathBuf> {
        let path = self.script_path();
        script::write_script(&path, recipe)?;
        Ok(path)
    }
}
