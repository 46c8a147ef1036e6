use std::io::{Cursor, Read};

use image::RgbaImage;
use label_sheet::raster::{BarcodeOptions, BLACK};
use label_sheet::{RasterError, Symbology, SymbologyRasterizer};
use zip::ZipArchive;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Solid block sized like a 95-module symbol, enough to exercise placement.
pub struct BlockBars;

impl SymbologyRasterizer for BlockBars {
    fn rasterize(&self, _: &str, _: Symbology, o: &BarcodeOptions) -> Result<RgbaImage, RasterError> {
        Ok(RgbaImage::from_pixel(95 * o.bar_width + 2 * o.margin, o.bar_height + 2 * o.margin, BLACK))
    }
}

/// A five-row sheet whose second row fails EAN-13 validation and whose fourth asks for two copies.
pub const MIXED_SHEET: &str = "\
Codigo,Tipo,Cantidad,Descripcion
A-1,CODE128,1,Tornillo
123,EAN13,1,Corto
A-3,CODE128,1,Tuerca
A-4,CODE128,2,Arandela
A-5,CODE128,1,Clavo
";

pub fn pdf_page_count(bytes: &[u8]) -> Result<usize, Box<dyn std::error::Error>> {
    Ok(lopdf::Document::load_mem(bytes)?.get_pages().len())
}

pub struct Unzipped {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl Unzipped {
    pub fn new(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self { archive: ZipArchive::new(Cursor::new(bytes))? })
    }

    pub fn names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn read_text(&mut self, name: &str) -> Result<String, Box<dyn std::error::Error>> {
        let mut text = String::new();
        self.archive.by_name(name)?.read_to_string(&mut text)?;
        Ok(text)
    }
}
