use ag_core::color::Rgb;
use ag_core::frame::{AsciiFrame, RenderedFrame};

use crate::font::GlyphFont;

/// Canvas size for `lines` text rows at `target_width × scale` columns.
///
/// # Example
/// ```
/// use ag_render::font::BitmapFont;
/// use ag_render::raster::canvas_size;
/// assert_eq!(canvas_size(&BitmapFont, 10, 1.5, 4), (120, 64));
/// ```
#[must_use]
pub fn canvas_size(font: &dyn GlyphFont, target_width: u32, scale: f32, lines: usize) -> (u32, u32) {
    let (cw, ch) = font.cell_size();
    let width = (f64::from(cw) * f64::from(target_width) * f64::from(scale)).round() as u32;
    (width.max(1), (ch * lines as u32).max(1))
}

/// Draw `frame` as rows of monospace text on a `bg` canvas.
///
/// Line `i` starts at `(0, i × cell_height)`; glyph ink is blended from `bg`
/// toward `fg` by coverage. Ink past the canvas edge is clipped.
#[must_use]
pub fn render(
    frame: &AsciiFrame,
    target_width: u32,
    scale: f32,
    bg: Rgb,
    fg: Rgb,
    font: &dyn GlyphFont,
) -> RenderedFrame {
    let (cw, ch) = font.cell_size();
    let (width, height) = canvas_size(font, target_width, scale, frame.height());
    let mut canvas = RenderedFrame::filled(width, height, bg);

    for (row, line) in frame.lines().iter().enumerate() {
        let y0 = (row as u32 * ch) as i32;
        for (col, glyph) in line.chars().enumerate() {
            if glyph == ' ' {
                continue;
            }
            let x0 = (col as u32 * cw) as i32;
            if x0 >= width as i32 {
                break;
            }
            font.draw_glyph(glyph, &mut |x, y, coverage| {
                let (px, py) = (x0 + x, y0 + y);
                if px < 0 || py < 0 || coverage <= 0.0 {
                    return;
                }
                canvas.put_pixel(px as u32, py as u32, bg.blend(fg, coverage));
            });
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;

    #[test]
    fn canvas_follows_cell_metrics() {
        let frame = AsciiFrame::from_lines(vec!["vvvvv".into(); 3]);
        let out = render(&frame, 5, 1.0, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        assert_eq!((out.width, out.height), (40, 48));
        assert_eq!(out.data.len(), 40 * 48 * 3);
    }

    #[test]
    fn blank_frame_is_background_only() {
        let frame = AsciiFrame::from_lines(vec!["   ".into(); 2]);
        let bg = Rgb(10, 20, 30);
        let out = render(&frame, 3, 1.0, bg, Rgb::WHITE, &BitmapFont);
        assert!(out.data.chunks(3).all(|px| px == [10, 20, 30]));
    }

    #[test]
    fn glyphs_are_drawn_in_foreground() {
        let frame = AsciiFrame::from_lines(vec!["@".into()]);
        let out = render(&frame, 1, 1.0, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        let inked = out.data.chunks(3).filter(|px| *px == [0, 0, 0]).count();
        assert!(inked > 0);
        assert!(out.data.chunks(3).all(|px| px == [0, 0, 0] || px == [255, 255, 255]));
    }

    #[test]
    fn lines_land_on_their_own_rows() {
        let frame = AsciiFrame::from_lines(vec![" ".into(), "@".into()]);
        let out = render(&frame, 1, 1.0, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        let top_inked = (0..16).any(|y| (0..8).any(|x| out.pixel(x, y) == Some(Rgb::BLACK)));
        let bottom_inked = (16..32).any(|y| (0..8).any(|x| out.pixel(x, y) == Some(Rgb::BLACK)));
        assert!(!top_inked);
        assert!(bottom_inked);
    }

    #[test]
    fn narrow_canvas_clips_long_lines() {
        let frame = AsciiFrame::from_lines(vec!["@@@@".into()]);
        let out = render(&frame, 4, 0.5, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        assert_eq!(out.width, 16);
        assert_eq!(out.data.len(), 16 * 16 * 3);
    }

    #[test]
    fn rendering_is_deterministic() {
        let frame = AsciiFrame::from_lines(vec!["$@B%".into(), "8&WM".into()]);
        let a = render(&frame, 4, 1.0, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        let b = render(&frame, 4, 1.0, Rgb::WHITE, Rgb::BLACK, &BitmapFont);
        assert_eq!(a, b);
    }
}
