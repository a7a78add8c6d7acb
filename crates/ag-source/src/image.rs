/// Image and animated GIF sources.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ag_core::error::{ConvertError, Result};
use ag_core::frame::{FrameBuffer, SourceFrame};
use ag_core::traits::AnimationSource;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frames};

/// Charge une image fixe depuis le disque en RGBA8.
///
/// # Errors
/// Returns `ConvertError::Open` if the file is missing or not a decodable image.
///
/// # Example
/// ```no_run
/// use ag_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("shark.png")).unwrap();
/// assert!(frame.width > 0);
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).map_err(|e| ConvertError::open(path, e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Loaded {} ({width}x{height})", path.display());
    Ok(FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

/// Open `path` as an animation: GIFs are decoded lazily frame by frame,
/// anything else is treated as a single-frame sequence.
///
/// # Errors
/// Returns `ConvertError::Open` if the source cannot be opened.
pub fn open_animation(path: &Path) -> Result<Box<dyn AnimationSource>> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if is_gif {
        Ok(Box::new(GifSource::open(path)?))
    } else {
        Ok(Box::new(ImageSource::open(path)?))
    }
}

/// Source d'image statique: une seule frame, sans durée propre.
pub struct ImageSource {
    frame: FrameBuffer,
    consumed: bool,
}

impl ImageSource {
    /// Load an image from disk.
    ///
    /// # Errors
    /// Returns `ConvertError::Open` if the image cannot be loaded.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_frame(load_image(path)?))
    }

    #[must_use]
    pub fn from_frame(frame: FrameBuffer) -> Self {
        Self {
            frame,
            consumed: false,
        }
    }
}

impl AnimationSource for ImageSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;
        Ok(Some(SourceFrame {
            buffer: self.frame.clone(),
            delay_ms: None,
        }))
    }

    fn rewind(&mut self) -> Result<()> {
        self.consumed = false;
        Ok(())
    }
}

/// Source de GIF animé, décodée à la demande.
///
/// Only the frame being read is held in memory; `rewind` reopens the file.
///
/// # Example
/// ```no_run
/// use ag_core::traits::AnimationSource;
/// use ag_source::image::GifSource;
/// use std::path::Path;
/// let mut source = GifSource::open(Path::new("anim.gif")).unwrap();
/// while let Some(frame) = source.next_frame().unwrap() {
///     println!("{} ms", frame.duration_ms());
/// }
/// ```
pub struct GifSource {
    path: PathBuf,
    frames: Frames<'static>,
    position: usize,
}

impl GifSource {
    /// Ouvre un GIF animé sans décoder ses frames.
    ///
    /// # Errors
    /// Returns `ConvertError::Open` if the file cannot be opened or is not a GIF.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            frames: decode_frames(path)?,
            position: 0,
        })
    }

    /// Index of the next frame to be read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

fn decode_frames(path: &Path) -> Result<Frames<'static>> {
    let file = File::open(path).map_err(|e| ConvertError::open(path, e))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| ConvertError::open(path, e))?;
    Ok(decoder.into_frames())
}

/// Frame delay in milliseconds, `None` when the GIF stores no delay.
///
/// A stored delay of 0 also gives `None`: viewers do not play 0 ms frames as
/// written, so such frames get [`ag_core::frame::DEFAULT_FRAME_DURATION_MS`] downstream.
fn frame_delay_ms(frame: &image::Frame) -> Option<u32> {
    let (numer, denom) = frame.delay().numer_denom_ms();
    if denom == 0 {
        return None;
    }
    let ms = numer / denom;
    (ms > 0).then_some(ms)
}

impl AnimationSource for GifSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        let frame = match self.frames.next() {
            None => return Ok(None),
            Some(Err(e)) => return Err(ConvertError::decode(self.position, e)),
            Some(Ok(frame)) => frame,
        };
        let delay_ms = frame_delay_ms(&frame);
        let buf = frame.into_buffer();
        let (width, height) = buf.dimensions();
        self.position += 1;
        Ok(Some(SourceFrame {
            buffer: FrameBuffer {
                data: buf.into_raw(),
                width,
                height,
            },
            delay_ms,
        }))
    }

    fn rewind(&mut self) -> Result<()> {
        self.frames = decode_frames(&self.path)?;
        self.position = 0;
        Ok(())
    }
}
