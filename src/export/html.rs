use std::collections::HashMap;
use std::fmt::Write as _;

use super::{expand, grid_for, render_rows, write_sheet, PageSink, SheetImage};
use crate::codec::png_data_url;
use crate::compose::LabelCompositor;
use crate::error::ExportError;
use crate::model::{ExportSettings, LabelConfig};
use crate::tiler::{tile_valid, Grid, Placement};
use crate::validate::ValidationResult;

/// Print-ready HTML: one page-sized panel per page, labels absolutely positioned in mm.
pub struct HtmlSink {
    out: String,
    open: bool,
    urls: HashMap<usize, String>,
}

impl HtmlSink {
    pub fn new(grid: &Grid) -> Self {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Imprimir etiquetas</title>");
        write!(
            out,
            "<style>\n  @page {{ size: {pw}mm {ph}mm; margin: 0; }}\n  html, body {{ margin:0; padding:0; }}\n  \
             .page {{ position: relative; width: {pw}mm; height: {ph}mm; page-break-after: always; }}\n  \
             img {{ position: absolute; width: {lw}mm; height: {lh}mm; }}\n</style></head><body>",
            pw = grid.page.w,
            ph = grid.page.h,
            lw = grid.label.w,
            lh = grid.label.h,
        )
        .ok();
        Self { out, open: false, urls: HashMap::new() }
    }

    fn close_page(&mut self) {
        if self.open {
            self.out.push_str("</div>");
            self.open = false;
        }
    }
}

impl PageSink for HtmlSink {
    type Output = String;

    fn begin_page(&mut self, _grid: &Grid) -> Result<(), ExportError> {
        self.close_page();
        self.out.push_str("<div class=\"page\">");
        self.open = true;
        Ok(())
    }

    fn place(&mut self, placement: &Placement<&SheetImage>, _grid: &Grid) -> Result<(), ExportError> {
        let image = placement.item;
        let url = self
            .urls
            .entry(image.key)
            .or_insert_with(|| png_data_url(&image.png));
        write!(
            self.out,
            "<img src=\"{}\" style=\"left:{}mm; top:{}mm;\" />",
            url, placement.x_mm, placement.y_mm
        )
        .ok();
        Ok(())
    }

    fn finish(mut self) -> Result<String, ExportError> {
        self.close_page();
        self.out.push_str(
            "<script>window.onload = () => { window.print(); setTimeout(()=>window.close(), 200); };</script></body></html>",
        );
        Ok(self.out)
    }
}

/// Print layout for the whole batch. Invalid rows are skipped without leaving a hole.
pub fn export_print_html(
    compositor: &LabelCompositor<'_>,
    configs: &[LabelConfig],
    results: &[ValidationResult],
    settings: &ExportSettings,
) -> Result<String, ExportError> {
    let grid = grid_for(settings);
    let rendered = render_rows(compositor, configs, results)?;
    let placements = tile_valid(expand(&rendered), &grid);
    log::info!("Print layout: {} labels", placements.len());
    write_sheet(HtmlSink::new(&grid), &placements, &grid)
}
