//! Error types for rasterization, decoding and export.
use thiserror::Error;

use crate::model::Symbology;

/// Failure reported by a symbology or QR rasterizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("symbology {0} is not supported by this rasterizer")]
    Unsupported(Symbology),

    #[error("invalid value '{value}' for {symbology}: {reason}")]
    InvalidValue {
        value: String,
        symbology: Symbology,
        reason: String,
    },

    #[error("QR encoding failed: {0}")]
    Qr(String),
}

#[derive(Error, Debug)]
#[error("font data could not be parsed")]
pub struct FontError;

/// Failure while turning a data URL or byte buffer into a raster.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure while producing an output artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
