//! Page tiling: fixed-size label cells laid row-major across fixed-size pages.
use crate::model::SizeMm;

/// Grid of label cells on one page. The margin is both the page border and the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub page: SizeMm,
    pub label: SizeMm,
    pub margin: f64,
    pub cols: usize,
    pub rows: usize,
}

fn fit(page: f64, label: f64, margin: f64) -> usize {
    let n = ((page - margin) / (label + margin)).floor();
    if n.is_finite() && n >= 1.0 { n as usize } else { 1 }
}

impl Grid {
    pub fn new(page: SizeMm, label: SizeMm, margin: f64) -> Self {
        Self {
            page,
            label,
            margin,
            cols: fit(page.w, label.w, margin),
            rows: fit(page.h, label.h, margin),
        }
    }

    pub fn per_page(&self) -> usize {
        self.cols * self.rows
    }

    /// Top-left corner, in millimeters, of the cell at intra-page index `idx`.
    pub fn slot(&self, idx: usize) -> (f64, f64) {
        let col = idx % self.cols;
        let row = idx / self.cols;
        (
            self.margin + col as f64 * (self.label.w + self.margin),
            self.margin + row as f64 * (self.label.h + self.margin),
        )
    }

    /// Pages needed for `count` items.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(self.per_page())
    }
}

/// One positioned item on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    pub page: usize,
    pub x_mm: f64,
    pub y_mm: f64,
    pub item: T,
}

/// Assigns items row-major; a new page starts at every multiple of `per_page`.
pub fn tile<T, I>(items: I, grid: &Grid) -> Vec<Placement<T>>
where
    I: IntoIterator<Item = T>,
{
    let per_page = grid.per_page();
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let (x_mm, y_mm) = grid.slot(i % per_page);
            Placement { page: i / per_page, x_mm, y_mm, item }
        })
        .collect()
}

/// Tiles only the present items; a `None` (invalid row) leaves no hole in the grid.
pub fn tile_valid<T, I>(items: I, grid: &Grid) -> Vec<Placement<T>>
where
    I: IntoIterator<Item = Option<T>>,
{
    tile(items.into_iter().flatten(), grid)
}

/// Groups placements by page, preserving order. Pages without placements are not emitted.
pub fn by_page<T>(placements: &[Placement<T>]) -> Vec<&[Placement<T>]> {
    placements.chunk_by(|a, b| a.page == b.page).collect()
}
