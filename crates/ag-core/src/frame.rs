//! Frame types flowing through Sampler → Mapper → Renderer.

use crate::color::Rgb;

/// Default frame duration when the source carries none.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Decoded RGBA8 bitmap, row-major.
///
/// # Example
/// ```
/// use ag_core::frame::FrameBuffer;
/// let frame = FrameBuffer::new(4, 2);
/// assert_eq!(frame.data.len(), 4 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FrameBuffer {
    /// Opaque black frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 255])
    }

    /// Frame where every pixel is `rgba`.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            data: rgba.repeat(pixels),
            width,
            height,
        }
    }

    /// `true` when the buffer length matches the declared dimensions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * 4
    }
}

/// One frame of a source animation.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    pub buffer: FrameBuffer,
    /// Display duration as stored in the source; `None` when absent.
    pub delay_ms: Option<u32>,
}

impl SourceFrame {
    /// Duration with the 100 ms default applied.
    #[must_use]
    pub fn duration_ms(&self) -> u32 {
        self.delay_ms.unwrap_or(DEFAULT_FRAME_DURATION_MS)
    }
}

/// 8-bit luminance grid at glyph resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` values.
    pub data: Vec<u8>,
}

impl IntensityGrid {
    /// Grid where every cell holds `value`.
    ///
    /// # Example
    /// ```
    /// use ag_core::frame::IntensityGrid;
    /// let grid = IntensityGrid::uniform(3, 2, 128);
    /// assert_eq!(grid.get(2, 1), Some(128));
    /// ```
    #[must_use]
    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wrap raw luminance values. Returns `None` on a length mismatch.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Text block produced from one `IntensityGrid`: one line per grid row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    lines: Vec<String>,
}

impl AsciiFrame {
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Characters per line (lines are equal length).
    #[must_use]
    pub fn width(&self) -> usize {
        self.lines.first().map_or(0, |l| l.chars().count())
    }

    /// Newline-terminated text, as written to `.txt` artifacts.
    ///
    /// # Example
    /// ```
    /// use ag_core::frame::AsciiFrame;
    /// let frame = AsciiFrame::from_lines(vec!["$@".into(), "vv".into()]);
    /// assert_eq!(frame.to_text(), "$@\nvv\n");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Rasterized ASCII frame, RGB8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RenderedFrame {
    /// Canvas filled with `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: color.to_array().repeat(pixels),
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Overwrite one pixel; out-of-canvas writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&color.to_array());
    }
}

/// Chunk-scoped buffer of rendered frames and their durations.
///
/// Built at chunk start, moved into the sink at chunk end.
#[derive(Debug, Default)]
pub struct Chunk {
    frames: Vec<RenderedFrame>,
    durations_ms: Vec<u32>,
}

impl Chunk {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            durations_ms: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: RenderedFrame, duration_ms: u32) {
        self.frames.push(frame);
        self.durations_ms.push(duration_ms);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn durations_ms(&self) -> &[u32] {
        &self.durations_ms
    }

    /// Iterate `(frame, duration)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&RenderedFrame, u32)> {
        self.frames.iter().zip(self.durations_ms.iter().copied())
    }

    /// Consume the chunk into `(frame, duration)` pairs.
    pub fn into_frames(self) -> impl Iterator<Item = (RenderedFrame, u32)> {
        self.frames.into_iter().zip(self.durations_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffer_consistency() {
        assert!(FrameBuffer::new(3, 3).is_consistent());
        assert!(!FrameBuffer::new(0, 3).is_consistent());
        let mut broken = FrameBuffer::new(2, 2);
        broken.data.pop();
        assert!(!broken.is_consistent());
    }

    #[test]
    fn missing_delay_defaults_to_100ms() {
        let frame = SourceFrame {
            buffer: FrameBuffer::new(1, 1),
            delay_ms: None,
        };
        assert_eq!(frame.duration_ms(), 100);
    }

    #[test]
    fn intensity_grid_rejects_length_mismatch() {
        assert!(IntensityGrid::from_raw(2, 2, vec![0; 3]).is_none());
        let grid = IntensityGrid::from_raw(2, 1, vec![7, 9]).unwrap();
        assert_eq!(grid.get(1, 0), Some(9));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn rendered_frame_pixel_access() {
        let mut frame = RenderedFrame::filled(2, 2, Rgb::WHITE);
        frame.put_pixel(1, 1, Rgb::BLACK);
        frame.put_pixel(5, 5, Rgb::BLACK);
        assert_eq!(frame.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(frame.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn chunk_keeps_durations_aligned() {
        let mut chunk = Chunk::with_capacity(2);
        chunk.push(RenderedFrame::filled(1, 1, Rgb::WHITE), 40);
        chunk.push(RenderedFrame::filled(1, 1, Rgb::BLACK), 60);
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.durations_ms(), &[40, 60]);
        let collected: Vec<u32> = chunk.into_frames().map(|(_, d)| d).collect();
        assert_eq!(collected, vec![40, 60]);
    }
}
