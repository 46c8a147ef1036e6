//! Batch session state: the loaded rows, the alias map, the current form defaults and
//! the per-row validation results. Results are recomputed on every change.
use crate::compose::{LabelCompositor, RenderedLabel};
use crate::model::LabelConfig;
use crate::rows::{map_rows, rows_from_json, BatchRow, ColumnAliasMap, Field};
use crate::table::parse_csv;
use crate::validate::{validate_batch, validate_config, ValidationResult};

#[derive(Debug, Clone, Default)]
pub struct LabelSession {
    /// Current form values; also the fallback for unmapped columns.
    pub defaults: LabelConfig,
    aliases: ColumnAliasMap,
    rows: Vec<BatchRow>,
    items: Vec<LabelConfig>,
    results: Vec<ValidationResult>,
    selected: Option<usize>,
}

impl LabelSession {
    pub fn new(defaults: LabelConfig) -> Self {
        Self { defaults, ..Self::default() }
    }

    /// Replaces the batch with `rows`. An empty sheet leaves the session untouched.
    pub fn load_rows(&mut self, rows: Vec<BatchRow>) {
        if rows.is_empty() {
            log::warn!("Ignoring batch source without data rows");
            return;
        }
        self.rows = rows;
        self.remap();
        self.selected = (!self.items.is_empty()).then_some(0);
    }

    pub fn load_csv(&mut self, text: &str) {
        self.load_rows(parse_csv(text));
    }

    /// Malformed JSON is logged and otherwise ignored.
    pub fn load_json(&mut self, json: &str) {
        match rows_from_json(json) {
            Ok(rows) => self.load_rows(rows),
            Err(e) => log::warn!("Ignoring malformed batch JSON: {}", e),
        }
    }

    pub fn aliases(&self) -> &ColumnAliasMap {
        &self.aliases
    }

    /// Sets one alias and re-maps the batch.
    pub fn set_alias(&mut self, field: Field, column: &str) {
        self.aliases.set(field, column);
        self.apply_mapping();
    }

    pub fn reset_mapping(&mut self) {
        self.aliases.clear();
        self.apply_mapping();
    }

    /// Re-maps the loaded rows with the current aliases and defaults.
    pub fn apply_mapping(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.remap();
        if let Some(i) = self.selected {
            self.selected = Some(i.min(self.items.len().saturating_sub(1)));
        }
    }

    fn remap(&mut self) {
        self.items = map_rows(&self.rows, &self.aliases, &self.defaults);
        self.results = validate_batch(&self.items);
        log::debug!("Mapped {} row(s), {} invalid", self.items.len(), self.error_count());
    }

    /// Drops the loaded batch but keeps the form and the alias map.
    pub fn reset_batch(&mut self) {
        self.rows.clear();
        self.items.clear();
        self.results.clear();
        self.selected = None;
    }

    /// Restores form defaults and clears the batch. The alias map is kept.
    pub fn reset_form(&mut self) {
        self.defaults = LabelConfig::default();
        self.reset_batch();
    }

    pub fn use_batch(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn items(&self) -> &[LabelConfig] {
        &self.items
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| !r.is_valid())
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_valid()).count()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selects a batch row; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Validation message for the form itself. Not reported while a batch is active.
    pub fn form_error(&self) -> Option<String> {
        if self.use_batch() {
            return None;
        }
        validate_config(&self.defaults).reason().map(str::to_string)
    }

    /// What an export should print: the batch with its results, or the form config alone.
    pub fn export_items(&self) -> (Vec<LabelConfig>, Vec<ValidationResult>) {
        if self.use_batch() {
            (self.items.clone(), self.results.clone())
        } else {
            (vec![self.defaults.clone()], vec![validate_config(&self.defaults)])
        }
    }

    /// The config the preview shows: the selected batch row, or the form.
    pub fn current(&self) -> &LabelConfig {
        self.selected
            .and_then(|i| self.items.get(i))
            .unwrap_or(&self.defaults)
    }

    pub fn preview(&self, compositor: &LabelCompositor<'_>) -> RenderedLabel {
        compositor.preview(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Codigo,Tipo,SKU\n7501234567890,EAN13,X1\n123,EAN13,X2\nABC-001,CODE128,X3\n";

    #[test]
    fn loading_maps_and_validates() {
        let mut s = LabelSession::default();
        s.load_csv(SHEET);
        assert!(s.use_batch());
        assert_eq!(s.items().len(), 3);
        assert_eq!(s.error_count(), 1);
        assert!(s.results()[1].as_str().contains("12 o 13"));
        assert_eq!(s.selected(), Some(0));
        assert_eq!(s.form_error(), None);
    }

    #[test]
    fn alias_change_revalidates() {
        let mut s = LabelSession::default();
        s.load_csv(SHEET);
        s.set_alias(Field::Codigo, "SKU");
        assert_eq!(s.items()[0].value, "X1");
        assert_eq!(s.error_count(), 2);
        s.reset_mapping();
        assert_eq!(s.items()[0].value, "7501234567890");
        assert_eq!(s.error_count(), 1);
    }

    #[test]
    fn bad_input_is_a_no_op() {
        let mut s = LabelSession::default();
        s.load_csv(SHEET);
        s.load_json("{ not json");
        s.load_csv("");
        assert_eq!(s.items().len(), 3);
    }

    #[test]
    fn reset_batch_keeps_aliases_and_form() {
        let mut s = LabelSession::default();
        s.defaults.header_text = "ACME".into();
        s.load_csv(SHEET);
        s.set_alias(Field::Codigo, "SKU");
        s.reset_batch();
        assert!(!s.use_batch());
        assert_eq!(s.aliases().get(Field::Codigo), Some("SKU"));
        assert_eq!(s.current().header_text, "ACME");
        s.reset_form();
        assert_eq!(s.current().header_text, "");
        assert_eq!(s.aliases().get(Field::Codigo), Some("SKU"));
    }

    #[test]
    fn form_mode_exports_the_defaults() {
        let mut s = LabelSession::default();
        s.defaults.dpi = 50;
        assert_eq!(s.form_error().as_deref(), Some("DPI muy bajo (<72)"));
        let (items, results) = s.export_items();
        assert_eq!(items.len(), 1);
        assert!(!results[0].is_valid());
    }

    #[test]
    fn selection_is_bounded() {
        let mut s = LabelSession::default();
        s.load_csv(SHEET);
        assert!(s.select(2));
        assert_eq!(s.current().value, "ABC-001");
        assert!(!s.select(9));
        assert_eq!(s.selected(), Some(2));
    }
}
