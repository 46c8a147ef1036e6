//! Export orchestrators: validated batch -> rendered labels -> tiled sheets or archives.
//!
//! Every exporter renders sequentially in batch order. A row is rendered once at its own
//! dpi and the PNG is reused for each of its copies; a rasterizer failure only turns that
//! row's labels into error placeholders.
use std::sync::LazyLock;

use regex::Regex;

use crate::codec;
use crate::compose::LabelCompositor;
use crate::consts::SAFE_NAME_MAX;
use crate::error::ExportError;
use crate::model::{ExportSettings, LabelConfig};
use crate::tiler::{by_page, Grid, Placement};
use crate::validate::ValidationResult;

mod archive;
mod html;
mod pdf;
mod tables;

pub use archive::{export_archive, ManifestRow, MANIFEST_COLUMNS};
pub use html::{export_print_html, HtmlSink};
pub use pdf::{export_pdf, export_pdf_per_row, PdfSink};
pub use tables::{export_summary, export_template, SUMMARY_COLUMNS, TEMPLATE_COLUMNS};

static UNSAFE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9_-]+").unwrap());

/// File-system safe stem: runs of other characters become `_`, capped at 40 chars.
/// An empty value falls back to `fallback`.
pub fn safe_name(value: &str, fallback: &str) -> String {
    let source = if value.is_empty() { fallback } else { value };
    UNSAFE_RUN
        .replace_all(source, "_")
        .chars()
        .take(SAFE_NAME_MAX)
        .collect()
}

/// A rendered label ready to be placed on a sheet.
#[derive(Debug, Clone)]
pub struct SheetImage {
    /// Source row index; sinks may use it to share one embedded image between copies.
    pub key: usize,
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Destination for tiled sheets (PDF document, print HTML, ...).
pub trait PageSink {
    type Output;

    fn begin_page(&mut self, grid: &Grid) -> Result<(), ExportError>;

    fn place(&mut self, placement: &Placement<&SheetImage>, grid: &Grid) -> Result<(), ExportError>;

    fn finish(self) -> Result<Self::Output, ExportError>;
}

/// Rows that passed validation, with their 0-based source index.
/// A row without a result is treated as valid.
pub fn valid_rows<'a>(
    configs: &'a [LabelConfig],
    results: &'a [ValidationResult],
) -> impl Iterator<Item = (usize, &'a LabelConfig)> + 'a {
    configs
        .iter()
        .enumerate()
        .filter(move |(i, _)| results.get(*i).map_or(true, ValidationResult::is_valid))
}

pub fn grid_for(settings: &ExportSettings) -> Grid {
    Grid::new(settings.page.size(), settings.label_size(), settings.margin_mm)
}

/// Renders one row at its own dpi and encodes it as PNG.
pub fn render_row(compositor: &LabelCompositor<'_>, key: usize, config: &LabelConfig) -> Result<SheetImage, ExportError> {
    let rendered = compositor.render(config, config.dpi as f64);
    if let Some(message) = rendered.error_message(config.mode) {
        log::warn!("Row {}: {}", key + 1, message);
    }
    let (width_px, height_px) = rendered.dimensions();
    Ok(SheetImage {
        key,
        png: codec::encode_png(&rendered.image)?,
        width_px,
        height_px,
    })
}

/// Renders each valid row once, paired with its copy count, in batch order.
/// Invalid rows are kept as `None` and never rendered.
pub(crate) fn render_rows(
    compositor: &LabelCompositor<'_>,
    configs: &[LabelConfig],
    results: &[ValidationResult],
) -> Result<Vec<(Option<SheetImage>, u32)>, ExportError> {
    configs
        .iter()
        .enumerate()
        .map(|(i, cfg)| {
            let valid = results.get(i).map_or(true, ValidationResult::is_valid);
            let image = if valid { Some(render_row(compositor, i, cfg)?) } else { None };
            Ok((image, cfg.copies()))
        })
        .collect()
}

/// Copies expanded in order: every copy of row 1, then row 2, ...
pub(crate) fn expand(rendered: &[(Option<SheetImage>, u32)]) -> impl Iterator<Item = Option<&SheetImage>> {
    rendered
        .iter()
        .flat_map(|(img, copies)| std::iter::repeat(img.as_ref()).take(*copies as usize))
}

/// Streams tiled placements into `sink`, one `begin_page` per page.
pub fn write_sheet<S: PageSink>(mut sink: S, placements: &[Placement<&SheetImage>], grid: &Grid) -> Result<S::Output, ExportError> {
    for page in by_page(placements) {
        sink.begin_page(grid)?;
        for placement in page {
            sink.place(placement, grid)?;
        }
    }
    sink.finish()
}

/// The single-label PNG download: `etiqueta_{safe}.png` at the label's dpi.
pub fn export_png(compositor: &LabelCompositor<'_>, config: &LabelConfig) -> Result<(String, Vec<u8>), ExportError> {
    let image = render_row(compositor, 0, config)?;
    let name = format!("etiqueta_{}.png", safe_name(&config.value, "etiqueta"));
    log::info!("Exported {} ({}x{})", name, image.width_px, image.height_px);
    Ok((name, image.png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_names_collapse_runs_and_truncate() {
        assert_eq!(safe_name("ABC-001", "x"), "ABC-001");
        assert_eq!(safe_name("a b//c", "x"), "a_b_c");
        assert_eq!(safe_name("Ñandú 2kg", "x"), "_and_2kg");
        assert_eq!(safe_name("", "fila-3"), "fila-3");
        assert_eq!(safe_name(&"9".repeat(60), "x").len(), 40);
    }

    #[test]
    fn valid_rows_skip_failures_and_keep_indices() {
        let configs = vec![LabelConfig::default(); 3];
        let results = vec![
            ValidationResult::valid(),
            ValidationResult::invalid("Valor vacío"),
            ValidationResult::valid(),
        ];
        let picked: Vec<usize> = valid_rows(&configs, &results).map(|(i, _)| i).collect();
        assert_eq!(picked, vec![0, 2]);
    }
}
