//! Image codec: data URLs and byte buffers in, PNG bytes out.
use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbaImage};

use crate::error::{DecodeError, ExportError};
use crate::model::Logo;

/// Decodes any format the `image` crate recognizes.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Decodes a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, DecodeError> {
    let rest = url.trim().strip_prefix("data:").ok_or(DecodeError::NotDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(DecodeError::NotDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(DecodeError::NotBase64);
    }
    let bytes = STANDARD.decode(payload.trim())?;
    decode_image(&bytes)
}

pub fn decode_logo(url: &str) -> Result<Logo, DecodeError> {
    decode_data_url(url).map(Arc::new)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
