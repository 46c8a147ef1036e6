use std::collections::HashMap;

use printpdf::image::RawImage;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, XObjectId};

use super::{expand, grid_for, render_row, render_rows, safe_name, write_sheet, PageSink, SheetImage};
use crate::compose::LabelCompositor;
use crate::error::ExportError;
use crate::model::{ExportSettings, LabelConfig, SizeMm};
use crate::tiler::{tile, tile_valid, Grid, Placement};
use crate::units::mm_to_pt;
use crate::validate::ValidationResult;

/// Multi-page PDF built with `printpdf`; each label PNG is embedded once per row.
pub struct PdfSink {
    document: PdfDocument,
    pages: Vec<PdfPage>,
    current: Option<(SizeMm, Vec<Op>)>,
    images: HashMap<usize, (XObjectId, (u32, u32))>,
}

impl PdfSink {
    pub fn new(title: &str) -> Self {
        Self {
            document: PdfDocument::new(title),
            pages: Vec::new(),
            current: None,
            images: HashMap::new(),
        }
    }

    fn close_page(&mut self) {
        if let Some((size, ops)) = self.current.take() {
            self.pages.push(PdfPage::new(Mm(size.w as f32), Mm(size.h as f32), ops));
        }
    }

    fn xobject(&mut self, image: &SheetImage) -> Result<(XObjectId, (u32, u32)), ExportError> {
        if let Some(cached) = self.images.get(&image.key) {
            return Ok(cached.clone());
        }
        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&image.png, &mut warnings)
            .map_err(|e| ExportError::Pdf(format!("failed to embed label {}: {}", image.key + 1, e)))?;
        let dims = (raw.width as u32, raw.height as u32);
        let id = XObjectId::new();
        self.document.resources.xobjects.map.insert(id.clone(), XObject::Image(raw));
        self.images.insert(image.key, (id.clone(), dims));
        Ok((id, dims))
    }
}

impl PageSink for PdfSink {
    type Output = Vec<u8>;

    fn begin_page(&mut self, grid: &Grid) -> Result<(), ExportError> {
        self.close_page();
        self.current = Some((grid.page, Vec::new()));
        Ok(())
    }

    fn place(&mut self, placement: &Placement<&SheetImage>, grid: &Grid) -> Result<(), ExportError> {
        let (id, (img_w, img_h)) = self.xobject(placement.item)?;
        let Some((page, ops)) = self.current.as_mut() else {
            return Err(ExportError::Pdf("placement before first page".into()));
        };
        // PDF origin is bottom-left.
        let w_pt = mm_to_pt(grid.label.w) as f32;
        let h_pt = mm_to_pt(grid.label.h) as f32;
        let x_pt = mm_to_pt(placement.x_mm) as f32;
        let y_pt = (mm_to_pt(page.h) - mm_to_pt(placement.y_mm)) as f32 - h_pt;
        let transform = XObjectTransform {
            translate_x: Some(Pt(x_pt)),
            translate_y: Some(Pt(y_pt)),
            scale_x: Some(w_pt / img_w as f32),
            scale_y: Some(h_pt / img_h as f32),
            rotate: None,
            dpi: Some(72.0),
        };
        ops.push(Op::UseXobject { id, transform });
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        self.close_page();
        if self.pages.is_empty() {
            let a4 = crate::model::PageFormat::A4.size();
            self.pages.push(PdfPage::new(Mm(a4.w as f32), Mm(a4.h as f32), Vec::new()));
        }
        self.document.pages = self.pages;
        let mut warnings = Vec::new();
        Ok(self.document.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

/// One PDF with every valid row's copies tiled in batch order.
pub fn export_pdf(
    compositor: &LabelCompositor<'_>,
    configs: &[LabelConfig],
    results: &[ValidationResult],
    settings: &ExportSettings,
) -> Result<Vec<u8>, ExportError> {
    let grid = grid_for(settings);
    let rendered = render_rows(compositor, configs, results)?;
    let placements = tile_valid(expand(&rendered), &grid);
    log::info!(
        "PDF export: {} labels on {} page(s)",
        placements.len(),
        grid.page_count(placements.len())
    );
    write_sheet(PdfSink::new(&settings.title), &placements, &grid)
}

/// One standalone PDF per valid row, each starting on its own first page.
/// Returns `(file name, bytes)` pairs in batch order.
pub fn export_pdf_per_row(
    compositor: &LabelCompositor<'_>,
    configs: &[LabelConfig],
    results: &[ValidationResult],
    settings: &ExportSettings,
) -> Result<Vec<(String, Vec<u8>)>, ExportError> {
    let grid = grid_for(settings);
    super::valid_rows(configs, results)
        .map(|(i, cfg)| {
            let image = render_row(compositor, i, cfg)?;
            let copies = std::iter::repeat(&image).take(cfg.copies() as usize);
            let placements = tile(copies, &grid);
            let name = format!("etiquetas_{}.pdf", safe_name(&cfg.value, &format!("fila-{}", i + 1)));
            let bytes = write_sheet(PdfSink::new(&settings.title), &placements, &grid)?;
            log::info!("Per-row PDF {}: {} label(s)", name, placements.len());
            Ok((name, bytes))
        })
        .collect()
}
