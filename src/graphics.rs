use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::consts::FALLBACK_ADVANCE_EM;
use crate::error::FontError;

/// A parsed TrueType/OpenType face used for every text band on a label.
pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = Font::try_from_vec(bytes).ok_or(FontError)?;
        Ok(Self { font })
    }

    /// Ink width of `text` at `font_px`, from the last glyph's right edge.
    pub fn measure(&self, text: &str, font_px: f32) -> u32 {
        let scale = Scale::uniform(font_px);
        let ascent = self.font.v_metrics(scale).ascent.ceil();
        let glyphs: Vec<_> = self.font.layout(text, scale, point(0.0, ascent)).collect();
        glyphs.iter().rev()
            .find_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x as f32))
            .unwrap_or(0.0)
            .ceil() as u32
    }

    /// Draws `text` with the top of its ascent at `y`.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i64, y: i64, font_px: f32, color: Rgba<u8>) {
        let scale = Scale::uniform(font_px);
        let ascent = self.font.v_metrics(scale).ascent;
        let (w, h) = (canvas.width() as i64, canvas.height() as i64);
        for g in self.font.layout(text, scale, point(x as f32, y as f32 + ascent)) {
            if let Some(bb) = g.pixel_bounding_box() {
                g.draw(|gx, gy, v| {
                    let px = gx as i64 + bb.min.x as i64;
                    let py = gy as i64 + bb.min.y as i64;
                    if v > 0.0 && px >= 0 && py >= 0 && px < w && py < h {
                        let dst = canvas.get_pixel_mut(px as u32, py as u32);
                        *dst = blend(*dst, color, v);
                    }
                });
            }
        }
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").field("glyphs", &self.font.glyph_count()).finish()
    }
}

/// Text width with the face if loaded, else an average-advance estimate.
pub fn text_width(face: Option<&Typeface>, text: &str, font_px: u32) -> u32 {
    match face {
        Some(face) => face.measure(text, font_px as f32),
        None => (text.chars().count() as f64 * font_px as f64 * FALLBACK_ADVANCE_EM).round() as u32,
    }
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let a = coverage.clamp(0.0, 1.0) * (src.0[3] as f32 / 255.0);
    let mix = |d: u8, s: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
    Rgba([mix(dst.0[0], src.0[0]), mix(dst.0[1], src.0[1]), mix(dst.0[2], src.0[2]), dst.0[3].max((a * 255.0) as u8)])
}

/// Fills a rectangle, clipped to the canvas.
pub fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = ((x + w as i64).max(0) as u32).min(canvas.width());
    let y1 = ((y + h as i64).max(0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Uniform scale that fits `(w, h)` into the box without upscaling.
pub fn fit_within(w: u32, h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if w == 0 || h == 0 {
        return (0, 0);
    }
    let scale = (box_w as f64 / w as f64).min(box_h as f64 / h as f64).min(1.0);
    ((w as f64 * scale).round() as u32, (h as f64 * scale).round() as u32)
}

/// Composites `img` at `(x, y)`, resized to `w × h` when it differs.
pub fn draw_image(canvas: &mut RgbaImage, img: &RgbaImage, x: i64, y: i64, w: u32, h: u32, filter: FilterType) {
    if w == 0 || h == 0 {
        return;
    }
    if img.dimensions() == (w, h) {
        imageops::overlay(canvas, img, x, y);
    } else {
        let resized = imageops::resize(img, w, h, filter);
        imageops::overlay(canvas, &resized, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BLACK, WHITE};

    #[test]
    fn fit_never_upscales() {
        assert_eq!(fit_within(40, 20, 200, 200), (40, 20));
        assert_eq!(fit_within(400, 200, 100, 100), (100, 50));
        assert_eq!(fit_within(100, 400, 100, 100), (25, 100));
    }

    #[test]
    fn fill_is_clipped_to_canvas() {
        let mut c = RgbaImage::from_pixel(10, 10, WHITE);
        fill_rect(&mut c, -5, 8, 8, 10, BLACK);
        assert_eq!(c.get_pixel(0, 9), &BLACK);
        assert_eq!(c.get_pixel(2, 9), &BLACK);
        assert_eq!(c.get_pixel(3, 9), &WHITE);
        assert_eq!(c.get_pixel(0, 7), &WHITE);
    }

    #[test]
    fn fallback_width_scales_with_length_and_size() {
        assert_eq!(text_width(None, "", 20), 0);
        assert_eq!(text_width(None, "abcd", 20), 44);
        assert!(text_width(None, "abcd", 40) > text_width(None, "abcd", 20));
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        assert!(Typeface::from_bytes(vec![0, 1, 2, 3]).is_err());
    }

    #[test]
    fn draw_image_scales_to_target_box() {
        let mut c = RgbaImage::from_pixel(20, 20, WHITE);
        let src = RgbaImage::from_pixel(2, 2, BLACK);
        draw_image(&mut c, &src, 5, 5, 10, 10, FilterType::Nearest);
        assert_eq!(c.get_pixel(5, 5), &BLACK);
        assert_eq!(c.get_pixel(14, 14), &BLACK);
        assert_eq!(c.get_pixel(15, 15), &WHITE);
    }
}
