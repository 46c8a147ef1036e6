use crate::consts::{MIN_RASTER_PX, MM_PER_INCH};

/// Millimeters to (fractional) pixels at `dpi`.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    (mm / MM_PER_INCH) * dpi
}

/// Whole-pixel raster edge for a physical length, never below the minimum raster size.
pub fn raster_px(mm: f64, dpi: f64) -> u32 {
    let px = mm_to_px(mm, dpi).round();
    if px.is_finite() && px > MIN_RASTER_PX as f64 {
        px as u32
    } else {
        MIN_RASTER_PX
    }
}

/// Millimeters to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm_to_px(mm, 72.0)
}
