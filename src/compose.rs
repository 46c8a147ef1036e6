//! Label compositor: turns one `LabelConfig` into a raster at a given dpi.
//!
//! Layout runs top-down: header band, optional logo, the body region holding the
//! barcode or QR symbol, up to three descriptive lines and a footer. Every drawing
//! step is recorded as a [`DrawOp`] while it is painted, so two renders of the same
//! config can be compared without diffing pixels.
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::consts::*;
use crate::error::RasterError;
use crate::graphics::{self, Typeface};
use crate::model::{Align, LabelConfig, Layout, Mode};
use crate::raster::{BarcodeOptions, QrOptions, QrRasterizer, SymbologyRasterizer, BLACK, WHITE};
use crate::units::raster_px;

pub const ERROR_BG: Rgba<u8> = Rgba([255, 238, 238, 255]);
pub const ERROR_FG: Rgba<u8> = Rgba([176, 0, 32, 255]);

/// Which raster an [`DrawOp::Image`] step composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Logo,
    Symbol,
}

/// One recorded drawing instruction, in label pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { x: i64, y: i64, w: u32, h: u32, color: Rgba<u8> },
    Text { text: String, x: i64, y: i64, size: u32, color: Rgba<u8> },
    Image { source: ImageSource, x: i64, y: i64, w: u32, h: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

/// Output of one render.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub image: RgbaImage,
    pub ops: Vec<DrawOp>,
    pub body: Region,
    /// Set when the symbol rasterizer failed; the body shows an error placeholder.
    pub error: Option<RasterError>,
}

impl RenderedLabel {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// User-facing message for the render error, if any.
    pub fn error_message(&self, mode: Mode) -> Option<String> {
        self.error.as_ref().map(|e| match mode {
            Mode::Barcode => format!("No se pudo generar el código de barras: {}", e),
            Mode::Qr => format!("No se pudo generar el QR: {}", e),
        })
    }
}

fn round(v: f64) -> i64 {
    v.round() as i64
}

fn font_px(v: f64, min: u32) -> u32 {
    let r = v.round();
    if r.is_finite() && r > min as f64 {
        r.min(u32::MAX as f64) as u32
    } else {
        min
    }
}

fn clamp_px(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

/// Paints onto the canvas and records each step.
struct Painter<'a> {
    canvas: RgbaImage,
    ops: Vec<DrawOp>,
    face: Option<&'a Typeface>,
}

impl<'a> Painter<'a> {
    fn new(w: u32, h: u32, face: Option<&'a Typeface>) -> Self {
        Self {
            canvas: RgbaImage::new(w, h),
            ops: Vec::new(),
            face,
        }
    }

    fn measure(&self, text: &str, size: u32) -> u32 {
        graphics::text_width(self.face, text, size)
    }

    fn fill(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
        graphics::fill_rect(&mut self.canvas, x, y, w, h, color);
        self.ops.push(DrawOp::Fill { x, y, w, h, color });
    }

    fn text(&mut self, text: &str, x: i64, y: i64, size: u32, color: Rgba<u8>) {
        if let Some(face) = self.face {
            face.draw(&mut self.canvas, text, x, y, size as f32, color);
        }
        self.ops.push(DrawOp::Text { text: text.to_string(), x, y, size, color });
    }

    #[allow(clippy::too_many_arguments)]
    fn image(&mut self, source: ImageSource, img: &RgbaImage, x: i64, y: i64, w: u32, h: u32, filter: FilterType) {
        graphics::draw_image(&mut self.canvas, img, x, y, w, h, filter);
        self.ops.push(DrawOp::Image { source, x, y, w, h });
    }

    /// Horizontal text placement inside a band of `width` pixels.
    fn aligned_x(&self, text: &str, size: u32, width: u32, align: Align) -> i64 {
        let tw = self.measure(text, size) as f64;
        match align {
            Align::Left => TEXT_EDGE_PX,
            Align::Center => round((width as f64 - tw) / 2.0),
            Align::Right => round(width as f64 - tw - TEXT_EDGE_PX as f64),
        }
    }
}

/// Renders labels, delegating symbol generation to the supplied rasterizers.
pub struct LabelCompositor<'a> {
    barcodes: &'a dyn SymbologyRasterizer,
    qr: &'a dyn QrRasterizer,
    face: Option<&'a Typeface>,
}

impl<'a> LabelCompositor<'a> {
    pub fn new(barcodes: &'a dyn SymbologyRasterizer, qr: &'a dyn QrRasterizer) -> Self {
        Self { barcodes, qr, face: None }
    }

    /// Text is measured and painted with `face`; without one it is only recorded.
    pub fn with_typeface(mut self, face: &'a Typeface) -> Self {
        self.face = Some(face);
        self
    }

    /// Screen preview at the fixed preview resolution.
    pub fn preview(&self, config: &LabelConfig) -> RenderedLabel {
        self.render(config, PREVIEW_DPI)
    }

    pub fn render(&self, c: &LabelConfig, dpi: f64) -> RenderedLabel {
        let w = raster_px(c.width_mm, dpi);
        let h = raster_px(c.height_mm, dpi);
        let (wf, hf) = (w as f64, h as f64);
        log::debug!("Rendering label '{}' ({:?}) at {} dpi -> {}x{}", c.value, c.mode, dpi, w, h);

        let mut p = Painter::new(w, h, self.face);
        p.fill(0, 0, w, h, WHITE);

        let pad = round(hf * PAD_RATIO);
        let mut y = pad;

        if !c.header_text.is_empty() {
            let size = font_px(hf * c.header_scale, MIN_HEADER_PX);
            let tw = p.measure(&c.header_text, size) as i64;
            let centered = round((wf - tw as f64) / 2.0);
            let x = centered.min(w as i64 - pad - tw).max(pad);
            p.text(&c.header_text, x, y, size, BLACK);
            y += round(hf * HEADER_ADVANCE);
        }

        if let Some(logo) = &c.logo {
            let (lw, lh) = graphics::fit_within(
                logo.width(),
                logo.height(),
                clamp_px(round(wf * LOGO_BOX)),
                clamp_px(round(hf * LOGO_BOX)),
            );
            p.image(ImageSource::Logo, logo, pad, y, lw, lh, FilterType::Triangle);
        }

        let body_h = match c.layout {
            Layout::CodeTop => clamp_px(round(hf * BODY_H_CODE_TOP)),
            Layout::Classic | Layout::LogoLeft => clamp_px(round(hf * BODY_H)),
        };
        let body = Region { x: pad, y, w: clamp_px(w as i64 - 2 * pad), h: body_h };

        if let (Layout::LogoLeft, Some(logo)) = (c.layout, &c.logo) {
            let (lw, lh) = graphics::fit_within(
                logo.width(),
                logo.height(),
                clamp_px(round(wf * LOGO_BOX)),
                clamp_px(round(hf * LOGO_STRIP_H)),
            );
            p.image(ImageSource::Logo, logo, pad, y, lw, lh, FilterType::Triangle);
        }

        let symbol = match c.mode {
            Mode::Barcode => self.place_barcode(&mut p, c, body, wf, hf),
            Mode::Qr => self.place_qr(&mut p, c, body, wf, hf),
        };
        if let Err(error) = symbol {
            log::warn!("Symbol rasterization failed for '{}': {}", c.value, error);
            p.fill(body.x, body.y, body.w, body.h, ERROR_BG);
            let message = match c.mode {
                Mode::Barcode => "Error al generar código",
                Mode::Qr => "Error al generar QR",
            };
            p.text(message, body.x + 6, body.y + 6, font_px(hf * ERROR_FONT, MIN_HEADER_PX), ERROR_FG);
            return RenderedLabel { image: p.canvas, ops: p.ops, body, error: Some(error) };
        }

        let mut text_y = body.y + body.h as i64 + round(hf * TEXT_GAP);
        let size = font_px(hf * c.body_scale, MIN_TEXT_PX);
        let line_gap = round(hf * LINE_GAP).max(2);
        let lines = [
            (!c.description.is_empty()).then(|| c.description.clone()),
            (!c.price.is_empty()).then(|| format!("Precio: {}", c.price)),
            (!c.lot.is_empty()).then(|| format!("Lote: {}", c.lot)),
        ];
        for line in lines.iter().flatten() {
            let x = p.aligned_x(line, size, w, c.body_align);
            p.text(line, x, text_y, size, BLACK);
            text_y += round(hf * c.body_scale * LINE_SPACING) + line_gap;
        }

        if !c.footer_text.is_empty() {
            let size = font_px(hf * c.footer_scale, MIN_TEXT_PX);
            let fy = h as i64 - pad - size as i64;
            let x = p.aligned_x(&c.footer_text, size, w, c.body_align);
            p.text(&c.footer_text, x, fy, size, BLACK);
        }

        RenderedLabel { image: p.canvas, ops: p.ops, body, error: None }
    }

    fn place_barcode(&self, p: &mut Painter<'_>, c: &LabelConfig, body: Region, wf: f64, hf: f64) -> Result<(), RasterError> {
        let options = BarcodeOptions {
            show_value: c.show_value,
            line_color: BLACK,
            background: WHITE,
            margin: clamp_px(round(hf * BAR_MARGIN)).max(MIN_BAR_MARGIN),
            bar_width: clamp_px(round(wf / BAR_WIDTH_DIV)).max(1),
            bar_height: clamp_px(round(body.h as f64 * BAR_HEIGHT)).max(MIN_RASTER_PX),
            font_size: font_px(hf * c.body_scale, MIN_TEXT_PX),
            max_width: body.w.max(MIN_RASTER_PX),
        };
        let symbol = self.barcodes.rasterize(&c.value, c.symbology, &options)?;
        let (bw, bh) = symbol.dimensions();
        let mut x = round((wf - bw as f64) / 2.0);
        if c.logo_left() {
            x = x.max(round(wf * LOGO_LEFT_SHIFT));
        }
        p.image(ImageSource::Symbol, &symbol, x, body.y, bw, bh, FilterType::Nearest);
        Ok(())
    }

    fn place_qr(&self, p: &mut Painter<'_>, c: &LabelConfig, body: Region, wf: f64, hf: f64) -> Result<(), RasterError> {
        let mut side = round(wf.min(hf) * QR_SIDE);
        if c.logo_left() {
            side = round(side as f64 * QR_LOGO_LEFT);
        }
        let side = clamp_px(side);
        let symbol = self.qr.rasterize(&c.value, &QrOptions { size: side, margin: QR_MARGIN })?;
        let x = round((wf - side as f64) / 2.0);
        let y = body.y + round((body.h as f64 - side as f64) / 2.0);
        p.image(ImageSource::Symbol, &symbol, x, y, side, side, FilterType::Nearest);
        Ok(())
    }
}
