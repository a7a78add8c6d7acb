/// Rampe de glyphes, ordonnée du plus sombre au plus clair.
///
/// Only the first 64 entries are reachable: an 8-bit intensity `v` selects
/// index `v / 4`.
pub const GLYPH_RAMP: &str =
    r#"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\|()1{}[]?-_+~<>i!lI;:\",^`'.,"#;

/// Number of ramp entries an 8-bit intensity can address.
pub const USABLE_GLYPHS: usize = 64;

/// Ramp index for an 8-bit intensity.
///
/// # Example
/// ```
/// use ag_core::charset::glyph_index;
/// assert_eq!(glyph_index(0), 0);
/// assert_eq!(glyph_index(128), 32);
/// assert_eq!(glyph_index(255), 63);
/// ```
#[inline]
#[must_use]
pub fn glyph_index(intensity: u8) -> usize {
    usize::from(intensity) / 4
}

/// Lookup table mapping intensity [0..255] → glyph.
///
/// Pre-computed once so the per-pixel cost is a single index.
///
/// # Example
/// ```
/// use ag_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::standard();
/// assert_eq!(ramp.map(0), '$');
/// assert_eq!(ramp.map(128), 'v');
/// ```
#[derive(Clone)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
    lut: [char; 256],
}

impl GlyphRamp {
    /// The fixed dark→light ramp.
    #[must_use]
    pub fn standard() -> Self {
        let glyphs: Vec<char> = GLYPH_RAMP.chars().collect();
        debug_assert!(glyphs.len() >= USABLE_GLYPHS);
        let mut lut = [' '; 256];
        for (v, slot) in lut.iter_mut().enumerate() {
            *slot = glyphs[v / 4];
        }
        Self { glyphs, lut }
    }

    /// Map an intensity value to its glyph.
    #[inline]
    #[must_use]
    pub fn map(&self, intensity: u8) -> char {
        self.lut[usize::from(intensity)]
    }

    /// Glyph at a ramp position, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.glyphs.get(index).copied()
    }

    /// Total number of glyphs in the ramp, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for GlyphRamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRamp")
            .field("len", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}
