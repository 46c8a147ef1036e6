//! Label configuration and the page/settings types shared by the exporters.
use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A decoded logo, shared between every repetition of the row that owns it.
pub type Logo = Arc<RgbaImage>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbology {
    Code128,
    Ean13,
    Ean8,
    Upc,
    Itf14,
    Msi,
    Pharmacode,
    Codabar,
}

impl Symbology {
    pub const ALL: [Symbology; 8] = [
        Symbology::Code128,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Upc,
        Symbology::Itf14,
        Symbology::Msi,
        Symbology::Pharmacode,
        Symbology::Codabar,
    ];

    /// Tag as written in spreadsheets and by the barcode tooling.
    pub fn tag(self) -> &'static str {
        match self {
            Symbology::Code128 => "CODE128",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::Upc => "UPC",
            Symbology::Itf14 => "ITF14",
            Symbology::Msi => "MSI",
            Symbology::Pharmacode => "pharmacode",
            Symbology::Codabar => "codabar",
        }
    }

    /// Case-insensitive lookup by tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Barcode,
    Qr,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Barcode => "barcode",
            Mode::Qr => "qr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    #[default]
    Classic,
    LogoLeft,
    CodeTop,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Classic => "classic",
            Layout::LogoLeft => "logoLeft",
            Layout::CodeTop => "codeTop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Everything needed to draw one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelConfig {
    pub value: String,
    pub symbology: Symbology,
    pub mode: Mode,
    pub show_value: bool,
    pub description: String,
    pub price: String,
    pub lot: String,
    pub header_text: String,
    pub footer_text: String,
    pub logo: Option<Logo>,
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    pub dpi: u32,
    pub layout: Layout,
    pub body_align: Align,
    pub header_scale: f64,
    pub body_scale: f64,
    pub footer_scale: f64,
    pub qty: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_VALUE.to_string(),
            symbology: Symbology::Code128,
            mode: Mode::Barcode,
            show_value: true,
            description: String::new(),
            price: String::new(),
            lot: String::new(),
            header_text: String::new(),
            footer_text: String::new(),
            logo: None,
            width_mm: DEFAULT_WIDTH_MM,
            height_mm: DEFAULT_HEIGHT_MM,
            margin_mm: DEFAULT_MARGIN_MM,
            dpi: DEFAULT_DPI,
            layout: Layout::Classic,
            body_align: Align::Center,
            header_scale: DEFAULT_HEADER_SCALE,
            body_scale: DEFAULT_BODY_SCALE,
            footer_scale: DEFAULT_FOOTER_SCALE,
            qty: 1,
        }
    }
}

impl LabelConfig {
    /// Number of printed copies this row expands to.
    pub fn copies(&self) -> u32 {
        self.qty.max(1)
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// True when the LogoLeft layout actually has a logo to reserve space for.
    pub fn logo_left(&self) -> bool {
        self.layout == Layout::LogoLeft && self.logo.is_some()
    }
}

/// Width and height in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeMm {
    pub w: f64,
    pub h: f64,
}

impl SizeMm {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

impl PageFormat {
    pub fn size(self) -> SizeMm {
        match self {
            PageFormat::A4 => SizeMm::new(210.0, 297.0),
            PageFormat::Letter => SizeMm::new(216.0, 279.0),
        }
    }
}

/// Sheet-level export settings: the page, the grid cell size and the gap between cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub page: PageFormat,
    pub label_width_mm: f64,
    pub label_height_mm: f64,
    pub margin_mm: f64,
    pub title: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page: PageFormat::A4,
            label_width_mm: DEFAULT_WIDTH_MM,
            label_height_mm: DEFAULT_HEIGHT_MM,
            margin_mm: DEFAULT_MARGIN_MM,
            title: "etiquetas".to_string(),
        }
    }
}

impl ExportSettings {
    pub fn label_size(&self) -> SizeMm {
        SizeMm::new(self.label_width_mm, self.label_height_mm)
    }
}

/// A named label size preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeTemplate {
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

pub const TEMPLATES: [SizeTemplate; 4] = [
    SizeTemplate { name: "50 x 30 mm", width_mm: 50.0, height_mm: 30.0, margin_mm: 5.0 },
    SizeTemplate { name: "70 x 25 mm", width_mm: 70.0, height_mm: 25.0, margin_mm: 4.0 },
    SizeTemplate { name: "100 x 50 mm", width_mm: 100.0, height_mm: 50.0, margin_mm: 6.0 },
    SizeTemplate { name: "Custom", width_mm: 0.0, height_mm: 0.0, margin_mm: 0.0 },
];

/// Applies a named preset to `config`. "Custom" and unknown names leave the geometry untouched.
pub fn apply_template(config: &mut LabelConfig, name: &str) -> bool {
    match TEMPLATES.iter().find(|t| t.name == name) {
        Some(t) if t.name != "Custom" => {
            config.width_mm = t.width_mm;
            config.height_mm = t.height_mm;
            config.margin_mm = t.margin_mm;
            true
        }
        _ => false,
    }
}
