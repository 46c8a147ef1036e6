//! Seams to the symbol rasterizers.
//!
//! Linear barcode generation is supplied by the caller through [`SymbologyRasterizer`];
//! QR codes have a default implementation on top of the `qrcode` crate.
use image::{Luma, Rgba, RgbaImage};
use qrcode::QrCode;

use crate::error::RasterError;
use crate::model::Symbology;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Drawing parameters handed to a barcode rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeOptions {
    pub show_value: bool,
    pub line_color: Rgba<u8>,
    pub background: Rgba<u8>,
    /// Quiet zone around the symbol, in pixels.
    pub margin: u32,
    /// Narrow module width, in pixels.
    pub bar_width: u32,
    pub bar_height: u32,
    /// Human-readable text size, in pixels.
    pub font_size: u32,
    /// Width of the surface the symbol is meant for.
    pub max_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Requested edge length in pixels.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
}

pub trait SymbologyRasterizer {
    fn rasterize(
        &self,
        value: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<RgbaImage, RasterError>;
}

pub trait QrRasterizer {
    fn rasterize(&self, value: &str, options: &QrOptions) -> Result<RgbaImage, RasterError>;
}

/// Placeholder for callers that only print QR labels: every barcode request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBarcodes;

impl SymbologyRasterizer for NoBarcodes {
    fn rasterize(&self, _: &str, symbology: Symbology, _: &BarcodeOptions) -> Result<RgbaImage, RasterError> {
        Err(RasterError::Unsupported(symbology))
    }
}

/// QR rasterizer backed by the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeRasterizer;

impl QrRasterizer for QrcodeRasterizer {
    fn rasterize(&self, value: &str, options: &QrOptions) -> Result<RgbaImage, RasterError> {
        let code = QrCode::new(value.as_bytes()).map_err(|e| RasterError::Qr(e.to_string()))?;
        let modules = code.width() as u32 + 2 * options.margin;
        let module_px = (options.size / modules.max(1)).max(1);

        // Draw without the crate's fixed 4-module quiet zone, then pad to the requested margin.
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(module_px, module_px)
            .build();
        let pad = options.margin * module_px;
        let side = symbol.width() + 2 * pad;
        let mut out = RgbaImage::from_pixel(side, side, WHITE);
        for (x, y, px) in symbol.enumerate_pixels() {
            if px.0[0] < 128 {
                out.put_pixel(x + pad, y + pad, BLACK);
            }
        }
        Ok(out)
    }
}
