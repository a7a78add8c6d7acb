use ag_core::charset::GlyphRamp;
use ag_core::frame::{AsciiFrame, IntensityGrid};

/// Map an intensity grid to text, one line per grid row.
///
/// Each cell `v` becomes `ramp[v / 4]`; rows keep their top-to-bottom order.
///
/// # Example
/// ```
/// use ag_core::charset::GlyphRamp;
/// use ag_core::frame::IntensityGrid;
/// use ag_ascii::mapper::map_to_ascii;
///
/// let grid = IntensityGrid::from_raw(2, 2, vec![0, 255, 128, 128]).unwrap();
/// let frame = map_to_ascii(&grid, &GlyphRamp::standard());
/// assert_eq!(frame.lines(), &["$\\".to_string(), "vv".to_string()]);
/// ```
#[must_use]
pub fn map_to_ascii(grid: &IntensityGrid, ramp: &GlyphRamp) -> AsciiFrame {
    let width = grid.width as usize;
    if width == 0 {
        return AsciiFrame::default();
    }

    let lines: Vec<String> = grid
        .data
        .chunks(width)
        .map(|row| row.iter().map(|&v| ramp.map(v)).collect())
        .collect();
    log::trace!("Mapped {}x{} grid", grid.width, grid.height);
    AsciiFrame::from_lines(lines)
}
