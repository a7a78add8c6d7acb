//! Monospace glyph faces used by the frame renderer.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use ag_core::config::ConvertConfig;
use ag_core::error::{ConvertError, Result};
use font8x8::{BASIC_FONTS, UnicodeFonts};

/// A fixed-cell glyph source.
pub trait GlyphFont {
    /// Cell size `(width, height)` in pixels.
    fn cell_size(&self) -> (u32, u32);

    /// Call `plot(x, y, coverage)` for every inked pixel of `ch`, in
    /// cell-local coordinates. Coverage is in [0, 1]. Pixels may fall
    /// outside the cell; the caller clips.
    fn draw_glyph(&self, ch: char, plot: &mut dyn FnMut(i32, i32, f32));
}

/// Face selected by the configuration: the TrueType file in `config.font`,
/// or the built-in bitmap face.
///
/// # Errors
/// Returns `ConvertError::Config` if the font file cannot be read or parsed.
pub fn load_font(config: &ConvertConfig) -> Result<Box<dyn GlyphFont>> {
    match &config.font {
        Some(path) => Ok(Box::new(TrueTypeFont::load(path, config.font_size)?)),
        None => Ok(Box::new(BitmapFont)),
    }
}

/// Face 8×8 intégrée, lignes doublées pour une cellule 8×16.
///
/// # Example
/// ```
/// use ag_render::font::{BitmapFont, GlyphFont};
/// assert_eq!(BitmapFont.cell_size(), (8, 16));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl BitmapFont {
    const WIDTH: u32 = 8;
    const ROW_REPEAT: u32 = 2;

    fn rows(ch: char) -> Option<[u8; 8]> {
        BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'))
    }
}

impl GlyphFont for BitmapFont {
    fn cell_size(&self) -> (u32, u32) {
        (Self::WIDTH, 8 * Self::ROW_REPEAT)
    }

    fn draw_glyph(&self, ch: char, plot: &mut dyn FnMut(i32, i32, f32)) {
        let Some(rows) = Self::rows(ch) else {
            return;
        };
        for (y, bits) in rows.iter().enumerate() {
            for x in 0..8 {
                // bit 0 is the leftmost column
                if bits & (1u8 << x) == 0 {
                    continue;
                }
                for dy in 0..Self::ROW_REPEAT {
                    plot(x, (y as u32 * Self::ROW_REPEAT + dy) as i32, 1.0);
                }
            }
        }
    }
}

/// TrueType/OpenType face loaded from disk, rendered at a fixed pixel size.
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
    cell: (u32, u32),
    ascent: f32,
}

impl TrueTypeFont {
    /// Load a font file and derive its cell from the advance of `A` and the
    /// line height.
    ///
    /// # Errors
    /// Returns `ConvertError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path, px_size: f32) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ConvertError::Config(format!("cannot read font {}: {e}", path.display()))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            ConvertError::Config(format!("invalid font {}: {e}", path.display()))
        })?;
        Ok(Self::from_font(font, px_size))
    }

    fn from_font(font: FontVec, px_size: f32) -> Self {
        let scale = PxScale::from(px_size);
        let scaled = font.as_scaled(scale);
        let advance = scaled.h_advance(font.glyph_id('A'));
        let cell = (
            (advance.ceil() as u32).max(1),
            (scaled.height().ceil() as u32).max(1),
        );
        let ascent = scaled.ascent();
        log::debug!("TrueType cell {}x{} at {px_size}px", cell.0, cell.1);
        Self {
            font,
            scale,
            cell,
            ascent,
        }
    }
}

impl GlyphFont for TrueTypeFont {
    fn cell_size(&self) -> (u32, u32) {
        self.cell
    }

    fn draw_glyph(&self, ch: char, plot: &mut dyn FnMut(i32, i32, f32)) {
        let glyph = self
            .font
            .glyph_id(ch)
            .with_scale_and_position(self.scale, point(0.0, self.ascent));
        if let Some(outlined) = self.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|x, y, coverage| {
                plot(ox + x as i32, oy + y as i32, coverage);
            });
        }
    }
}
