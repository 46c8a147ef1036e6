use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{render_row, safe_name, valid_rows};
use crate::compose::LabelCompositor;
use crate::consts::{ARCHIVE_ROOT, MANIFEST_NAME};
use crate::error::ExportError;
use crate::model::LabelConfig;
use crate::table::write_csv;
use crate::validate::ValidationResult;

pub const MANIFEST_COLUMNS: [&str; 18] = [
    "index", "value", "type", "mode", "qty", "description", "price", "lot", "width_mm",
    "height_mm", "margin_mm", "dpi", "layout", "align", "header", "footer", "has_logo", "folder",
];

/// One manifest line describing an exported row.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    /// 1-based source row number.
    pub index: usize,
    pub config: LabelConfig,
    pub folder: String,
}

impl ManifestRow {
    pub fn column(&self, name: &str) -> String {
        let c = &self.config;
        match name {
            "index" => self.index.to_string(),
            "value" => c.value.clone(),
            "type" => c.symbology.tag().to_string(),
            "mode" => c.mode.as_str().to_string(),
            "qty" => c.copies().to_string(),
            "description" => c.description.clone(),
            "price" => c.price.clone(),
            "lot" => c.lot.clone(),
            "width_mm" => c.width_mm.to_string(),
            "height_mm" => c.height_mm.to_string(),
            "margin_mm" => c.margin_mm.to_string(),
            "dpi" => c.dpi.to_string(),
            "layout" => c.layout.as_str().to_string(),
            "align" => c.body_align.as_str().to_string(),
            "header" => c.header_text.clone(),
            "footer" => c.footer_text.clone(),
            "has_logo" => c.has_logo().to_string(),
            "folder" => self.folder.clone(),
            _ => String::new(),
        }
    }
}

/// Claims `base` in `used`, else `{base}_{row}`, then `{base}_{row}_2`, `_3`, ...
fn unique_folder(used: &mut HashSet<String>, base: String, row: usize) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let suffixed = format!("{}_{}", base, row);
    let mut candidate = suffixed.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{}_{}", suffixed, n);
    }
    candidate
}

/// ZIP with `etiquetas/{safe}/etiqueta_{safe}[_{k}].png` per valid row plus `resumen.csv`.
///
/// Rows whose names collide get their row number appended so no entry is overwritten.
pub fn export_archive(
    compositor: &LabelCompositor<'_>,
    configs: &[LabelConfig],
    results: &[ValidationResult],
) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut used = HashSet::new();
    let mut manifest = Vec::new();

    for (i, cfg) in valid_rows(configs, results) {
        let safe = unique_folder(&mut used, safe_name(&cfg.value, &format!("fila-{}", i + 1)), i + 1);
        let folder = format!("{}/{}", ARCHIVE_ROOT, safe);
        zip.add_directory(format!("{}/", folder), options)?;

        let image = render_row(compositor, i, cfg)?;
        let copies = cfg.copies();
        for k in 1..=copies {
            let name = if copies > 1 {
                format!("{}/etiqueta_{}_{}.png", folder, safe, k)
            } else {
                format!("{}/etiqueta_{}.png", folder, safe)
            };
            zip.start_file(name, options)?;
            zip.write_all(&image.png)?;
        }
        manifest.push(ManifestRow { index: i + 1, config: cfg.clone(), folder });
    }

    let csv = write_csv(&MANIFEST_COLUMNS, &manifest, ManifestRow::column);
    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(csv.as_bytes())?;
    log::info!("Archive export: {} row folder(s)", manifest.len());
    Ok(zip.finish()?.into_inner())
}
