//! Row mapping: a spreadsheet row with arbitrary column names becomes a `LabelConfig`.
//!
//! Each canonical field is looked up through its alias (if set) and then through a
//! fixed list of recognized Spanish and English column names. Missing, empty or
//! unparsable cells fall back to the caller's defaults snapshot, so mapping never fails.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::model::{Align, LabelConfig, Layout, Mode, Symbology};

/// One raw cell as read from a tabular source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text rendering of the cell (numbers without a trailing `.0`).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(_) | Cell::Empty => return None,
        };
        n.is_finite().then_some(n)
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Number(n) => Some(*n != 0.0),
            Cell::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "si" | "sí" | "y" | "yes" => Some(true),
                "false" | "0" | "no" | "n" => Some(false),
                _ => None,
            },
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<Value> for Cell {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// A single source row keyed by column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRow(HashMap<String, Cell>);

impl BatchRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, cell: impl Into<Cell>) -> Self {
        self.insert(column, cell);
        self
    }

    pub fn insert(&mut self, column: &str, cell: impl Into<Cell>) {
        self.0.insert(column.to_string(), cell.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.0.get(column)
    }
}

impl FromIterator<(String, Cell)> for BatchRow {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads a JSON array of objects into rows. Non-object entries are ignored.
pub fn rows_from_json(json: &str) -> Result<Vec<BatchRow>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_str(json)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map.into_iter().map(|(k, v)| (k, Cell::from(v))).collect()),
            _ => None,
        })
        .collect())
}

/// Canonical label fields a column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Codigo,
    Tipo,
    Modo,
    Cantidad,
    MostrarValor,
    Descripcion,
    Precio,
    Lote,
    Encabezado,
    Pie,
    LogoUrl,
    AnchoMm,
    AltoMm,
    MargenMm,
    Dpi,
    Layout,
    Alineacion,
    EscalaEncabezado,
    EscalaCuerpo,
    EscalaPie,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::Codigo,
        Field::Tipo,
        Field::Modo,
        Field::Cantidad,
        Field::MostrarValor,
        Field::Descripcion,
        Field::Precio,
        Field::Lote,
        Field::Encabezado,
        Field::Pie,
        Field::LogoUrl,
        Field::AnchoMm,
        Field::AltoMm,
        Field::MargenMm,
        Field::Dpi,
        Field::Layout,
        Field::Alineacion,
        Field::EscalaEncabezado,
        Field::EscalaCuerpo,
        Field::EscalaPie,
    ];

    /// Column header used by the template sheet.
    pub fn column(self) -> &'static str {
        match self {
            Field::Codigo => "Codigo",
            Field::Tipo => "Tipo",
            Field::Modo => "Modo",
            Field::Cantidad => "Cantidad",
            Field::MostrarValor => "MostrarValor",
            Field::Descripcion => "Descripcion",
            Field::Precio => "Precio",
            Field::Lote => "Lote",
            Field::Encabezado => "Encabezado",
            Field::Pie => "Pie",
            Field::LogoUrl => "LogoUrl",
            Field::AnchoMm => "Ancho_mm",
            Field::AltoMm => "Alto_mm",
            Field::MargenMm => "Margen_mm",
            Field::Dpi => "DPI",
            Field::Layout => "Layout",
            Field::Alineacion => "Alineacion",
            Field::EscalaEncabezado => "EscalaEncabezado",
            Field::EscalaCuerpo => "EscalaCuerpo",
            Field::EscalaPie => "EscalaPie",
        }
    }

    /// Recognized headers, tried in order after the alias.
    pub fn recognized(self) -> &'static [&'static str] {
        match self {
            Field::Codigo => &["Codigo", "Código", "Valor", "Value", "Codigo_o_texto"],
            Field::Tipo => &["Tipo", "Type"],
            Field::Modo => &["Modo", "mode"],
            Field::Cantidad => &["Cantidad", "Qty", "Quantity"],
            Field::MostrarValor => &["MostrarValor", "ShowValue"],
            Field::Descripcion => &["Descripcion", "Descripción", "Description"],
            Field::Precio => &["Precio", "Price"],
            Field::Lote => &["Lote", "Lot"],
            Field::Encabezado => &["Encabezado", "Header"],
            Field::Pie => &["Pie", "Footer"],
            Field::LogoUrl => &["Logo", "LogoUrl"],
            Field::AnchoMm => &["Ancho_mm", "Width_mm"],
            Field::AltoMm => &["Alto_mm", "Height_mm"],
            Field::MargenMm => &["Margen_mm", "Margin_mm"],
            Field::Dpi => &["DPI", "dpi"],
            Field::Layout => &["Layout"],
            Field::Alineacion => &["Alineacion", "Alineación", "Align"],
            Field::EscalaEncabezado => &["EscalaEncabezado", "HeaderScale"],
            Field::EscalaCuerpo => &["EscalaCuerpo", "BodyScale"],
            Field::EscalaPie => &["EscalaPie", "FooterScale"],
        }
    }
}

/// User overrides of which column feeds a field. Lives for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnAliasMap(HashMap<Field, String>);

impl ColumnAliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias for `field`. A blank column name clears it.
    pub fn set(&mut self, field: Field, column: &str) {
        if column.trim().is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, column.to_string());
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .get(&field)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct Lookup<'a> {
    row: &'a BatchRow,
    aliases: &'a ColumnAliasMap,
}

impl<'a> Lookup<'a> {
    /// First present, non-empty cell among the alias and the recognized names.
    fn cell(&self, field: Field) -> Option<&'a Cell> {
        self.aliases
            .get(field)
            .into_iter()
            .chain(field.recognized().iter().copied())
            .filter_map(|column| self.row.get(column))
            .find(|cell| !cell.is_empty())
    }

    fn text(&self, field: Field, default: &str) -> String {
        self.cell(field)
            .map(Cell::as_text)
            .unwrap_or_else(|| default.to_string())
    }

    fn number(&self, field: Field, default: f64) -> f64 {
        self.cell(field).and_then(Cell::as_number).unwrap_or(default)
    }

    fn flag(&self, field: Field, default: bool) -> bool {
        self.cell(field).and_then(Cell::as_bool).unwrap_or(default)
    }

    fn keyword<T>(&self, field: Field, default: T, table: fn(&str) -> Option<T>) -> T {
        self.cell(field)
            .and_then(|c| table(&c.as_text().trim().to_lowercase()))
            .unwrap_or(default)
    }
}

fn layout_keyword(s: &str) -> Option<Layout> {
    match s {
        "classic" | "clasico" | "clásico" => Some(Layout::Classic),
        "logoleft" | "logo izquierda" => Some(Layout::LogoLeft),
        "codetop" | "codigo arriba" | "código arriba" => Some(Layout::CodeTop),
        _ => None,
    }
}

fn align_keyword(s: &str) -> Option<Align> {
    match s {
        "left" | "izquierda" => Some(Align::Left),
        "center" | "centro" => Some(Align::Center),
        "right" | "derecha" => Some(Align::Right),
        _ => None,
    }
}

fn whole(n: f64) -> u32 {
    if n <= 0.0 {
        0
    } else {
        n.round().min(u32::MAX as f64) as u32
    }
}

/// Resolves one row against the alias map, falling back to `defaults` per field.
pub fn map_row(row: &BatchRow, aliases: &ColumnAliasMap, defaults: &LabelConfig) -> LabelConfig {
    let at = Lookup { row, aliases };

    let mode = match at.cell(Field::Modo) {
        Some(cell) if cell.as_text().trim().eq_ignore_ascii_case("qr") => Mode::Qr,
        Some(_) => Mode::Barcode,
        None => defaults.mode,
    };

    let symbology = match at.cell(Field::Tipo) {
        Some(cell) => {
            let tag = cell.as_text();
            Symbology::from_tag(&tag).unwrap_or_else(|| {
                log::warn!("Unknown symbology '{}', using {}", tag, defaults.symbology);
                defaults.symbology
            })
        }
        None => defaults.symbology,
    };

    let logo = match at.cell(Field::LogoUrl) {
        Some(cell) => match codec::decode_logo(&cell.as_text()) {
            Ok(logo) => Some(logo),
            Err(e) => {
                log::warn!("Ignoring logo cell: {}", e);
                None
            }
        },
        None => defaults.logo.clone(),
    };

    let dpi = at
        .cell(Field::Dpi)
        .and_then(Cell::as_number)
        .map(whole)
        .unwrap_or(defaults.dpi);

    let qty = at
        .cell(Field::Cantidad)
        .and_then(Cell::as_number)
        .map(|n| whole(n.floor()).max(1))
        .unwrap_or(defaults.qty);

    LabelConfig {
        value: at.text(Field::Codigo, &defaults.value),
        symbology,
        mode,
        show_value: at.flag(Field::MostrarValor, defaults.show_value),
        description: at.text(Field::Descripcion, &defaults.description),
        price: at.text(Field::Precio, &defaults.price),
        lot: at.text(Field::Lote, &defaults.lot),
        header_text: at.text(Field::Encabezado, &defaults.header_text),
        footer_text: at.text(Field::Pie, &defaults.footer_text),
        logo,
        width_mm: at.number(Field::AnchoMm, defaults.width_mm),
        height_mm: at.number(Field::AltoMm, defaults.height_mm),
        margin_mm: at.number(Field::MargenMm, defaults.margin_mm),
        dpi,
        layout: at.keyword(Field::Layout, defaults.layout, layout_keyword),
        body_align: at.keyword(Field::Alineacion, defaults.body_align, align_keyword),
        header_scale: at.number(Field::EscalaEncabezado, defaults.header_scale),
        body_scale: at.number(Field::EscalaCuerpo, defaults.body_scale),
        footer_scale: at.number(Field::EscalaPie, defaults.footer_scale),
        qty,
    }
}

/// Maps every row with the same aliases and defaults.
pub fn map_rows(rows: &[BatchRow], aliases: &ColumnAliasMap, defaults: &LabelConfig) -> Vec<LabelConfig> {
    rows.iter().map(|r| map_row(r, aliases, defaults)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> LabelConfig {
        LabelConfig::default()
    }

    #[test]
    fn alias_wins_over_recognized_name() {
        let row = BatchRow::new().with("SKU", "ALIAS-1").with("Codigo", "PLAIN-1");
        let mut aliases = ColumnAliasMap::new();
        assert_eq!(map_row(&row, &aliases, &defaults()).value, "PLAIN-1");
        aliases.set(Field::Codigo, "  SKU ");
        assert_eq!(map_row(&row, &aliases, &defaults()).value, "ALIAS-1");
    }

    #[test]
    fn empty_alias_cell_falls_through_to_recognized_names() {
        let row = BatchRow::new().with("SKU", "").with("Value", "EN-1");
        let mut aliases = ColumnAliasMap::new();
        aliases.set(Field::Codigo, "SKU");
        assert_eq!(map_row(&row, &aliases, &defaults()).value, "EN-1");
    }

    #[test]
    fn recognized_names_are_tried_in_order() {
        let row = BatchRow::new().with("Value", "second").with("Código", "first");
        assert_eq!(map_row(&row, &ColumnAliasMap::new(), &defaults()).value, "first");
    }

    #[test]
    fn missing_fields_inherit_current_defaults() {
        let d = LabelConfig {
            width_mm: 70.0,
            dpi: 203,
            body_align: Align::Right,
            header_text: "ACME".into(),
            ..defaults()
        };
        let cfg = map_row(&BatchRow::new().with("Codigo", "X"), &ColumnAliasMap::new(), &d);
        assert_eq!(cfg.width_mm, 70.0);
        assert_eq!(cfg.dpi, 203);
        assert_eq!(cfg.body_align, Align::Right);
        assert_eq!(cfg.header_text, "ACME");
    }

    #[test]
    fn numbers_parse_from_text_or_fall_back() {
        let row = BatchRow::new()
            .with("Ancho_mm", " 62.5 ")
            .with("Alto_mm", "abc")
            .with("DPI", 203.0)
            .with("Qty", "3.9");
        let cfg = map_row(&row, &ColumnAliasMap::new(), &defaults());
        assert_eq!(cfg.width_mm, 62.5);
        assert_eq!(cfg.height_mm, defaults().height_mm);
        assert_eq!(cfg.dpi, 203);
        assert_eq!(cfg.qty, 3);
    }

    #[test]
    fn numeric_cells_become_text_without_fraction() {
        let row = BatchRow::new().with("Codigo", 7501234567890.0).with("Precio", 10.5);
        let cfg = map_row(&row, &ColumnAliasMap::new(), &defaults());
        assert_eq!(cfg.value, "7501234567890");
        assert_eq!(cfg.price, "10.5");
    }

    #[test]
    fn booleans_accept_tokens_in_both_languages() {
        let aliases = ColumnAliasMap::new();
        let d = LabelConfig { show_value: false, ..defaults() };
        for (cell, expected) in [
            (Cell::from("Sí"), true),
            (Cell::from("YES"), true),
            (Cell::from(1.0), true),
            (Cell::from(0.0), false),
            (Cell::from(true), true),
            (Cell::from("maybe"), false),
        ] {
            let row = BatchRow::new().with("MostrarValor", cell);
            assert_eq!(map_row(&row, &aliases, &d).show_value, expected);
        }
        let d = LabelConfig { show_value: true, ..defaults() };
        let row = BatchRow::new().with("ShowValue", "false");
        assert!(!map_row(&row, &aliases, &d).show_value);
    }

    #[test]
    fn enums_use_synonym_tables() {
        let row = BatchRow::new()
            .with("Layout", "Código Arriba")
            .with("Alineación", "IZQUIERDA")
            .with("Tipo", "ean13");
        let cfg = map_row(&row, &ColumnAliasMap::new(), &defaults());
        assert_eq!(cfg.layout, Layout::CodeTop);
        assert_eq!(cfg.body_align, Align::Left);
        assert_eq!(cfg.symbology, Symbology::Ean13);

        let row = BatchRow::new().with("Layout", "diagonal").with("Tipo", "QR99");
        let cfg = map_row(&row, &ColumnAliasMap::new(), &defaults());
        assert_eq!(cfg.layout, Layout::Classic);
        assert_eq!(cfg.symbology, Symbology::Code128);
    }

    #[test]
    fn mode_selects_qr_only_on_literal_token() {
        let aliases = ColumnAliasMap::new();
        assert_eq!(map_row(&BatchRow::new().with("Modo", "QR"), &aliases, &defaults()).mode, Mode::Qr);
        assert_eq!(map_row(&BatchRow::new().with("mode", "qrcode"), &aliases, &defaults()).mode, Mode::Barcode);
        let d = LabelConfig { mode: Mode::Qr, ..defaults() };
        assert_eq!(map_row(&BatchRow::new(), &aliases, &d).mode, Mode::Qr);
    }

    #[test]
    fn bad_logo_cells_yield_no_logo() {
        let row = BatchRow::new().with("Logo", "https://example.com/logo.png");
        assert!(map_row(&row, &ColumnAliasMap::new(), &defaults()).logo.is_none());
    }

    #[test]
    fn json_rows_keep_cell_kinds() {
        let rows = rows_from_json(r#"[{"Codigo":"A","Cantidad":2,"MostrarValor":false,"Lote":null}, 5]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Cantidad"), Some(&Cell::Number(2.0)));
        assert_eq!(rows[0].get("MostrarValor"), Some(&Cell::Bool(false)));
        assert!(rows[0].get("Lote").is_some_and(Cell::is_empty));
    }
}
