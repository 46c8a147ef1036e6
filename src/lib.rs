//! Label designer core: batch rows -> validated label configs -> raster labels -> sheets.
//! - Maps spreadsheet/JSON rows onto label configs with per-session column aliases
//! - Validates values per symbology before anything is rendered
//! - Composes header, logo, barcode/QR and text lines at any dpi
//! - Tiles copies onto A4/Letter sheets (PDF, print HTML) or packs a ZIP with a manifest
//!
//! Barcode pixels come from a pluggable [`SymbologyRasterizer`]; QR symbols use `qrcode`.

pub mod codec;
pub mod compose;
pub mod consts;
pub mod error;
pub mod export;
pub mod graphics;
pub mod model;
pub mod raster;
pub mod rows;
pub mod session;
pub mod table;
pub mod tiler;
pub mod units;
pub mod validate;

pub use compose::{DrawOp, LabelCompositor, RenderedLabel};
pub use error::{DecodeError, ExportError, FontError, RasterError};
pub use export::{
    export_archive, export_pdf, export_pdf_per_row, export_png, export_print_html, export_summary,
    export_template,
};
pub use graphics::Typeface;
pub use model::{apply_template, Align, ExportSettings, LabelConfig, Layout, Mode, PageFormat, Symbology};
pub use raster::{NoBarcodes, QrRasterizer, QrcodeRasterizer, SymbologyRasterizer};
pub use rows::{map_row, map_rows, BatchRow, Cell, ColumnAliasMap, Field};
pub use session::LabelSession;
pub use tiler::{tile, tile_valid, Grid, Placement};
pub use validate::{validate_batch, validate_config, validate_value, ValidationResult};
