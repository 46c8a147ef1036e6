use crate::model::{LabelConfig, Mode};
use crate::rows::Field;
use crate::table::write_csv;

/// Column order of the batch template sheet.
pub const TEMPLATE_COLUMNS: [Field; 19] = [
    Field::Codigo,
    Field::Tipo,
    Field::Modo,
    Field::Cantidad,
    Field::Descripcion,
    Field::Precio,
    Field::Lote,
    Field::Encabezado,
    Field::Pie,
    Field::AnchoMm,
    Field::AltoMm,
    Field::MargenMm,
    Field::Dpi,
    Field::Layout,
    Field::Alineacion,
    Field::EscalaEncabezado,
    Field::EscalaCuerpo,
    Field::EscalaPie,
    Field::LogoUrl,
];

pub const SUMMARY_COLUMNS: [&str; 13] = [
    "N", "Modo", "Codigo_o_texto", "TipoBarras", "Descripcion", "Precio", "Lote", "Encabezado",
    "Pie", "Ancho_mm", "Alto_mm", "MostrarValor", "TieneLogo",
];

struct TemplateRow<'a> {
    defaults: &'a LabelConfig,
    codigo: &'a str,
    tipo: &'a str,
    cantidad: u32,
    descripcion: &'a str,
    precio: &'a str,
}

impl TemplateRow<'_> {
    fn column(&self, header: &str) -> String {
        let d = self.defaults;
        match header {
            "Codigo" => self.codigo.to_string(),
            "Tipo" => self.tipo.to_string(),
            "Modo" => Mode::Barcode.as_str().to_string(),
            "Cantidad" => self.cantidad.to_string(),
            "Descripcion" => self.descripcion.to_string(),
            "Precio" => self.precio.to_string(),
            "Ancho_mm" => d.width_mm.to_string(),
            "Alto_mm" => d.height_mm.to_string(),
            "Margen_mm" => d.margin_mm.to_string(),
            "DPI" => d.dpi.to_string(),
            "Layout" => d.layout.as_str().to_string(),
            "Alineacion" => d.body_align.as_str().to_string(),
            "EscalaEncabezado" => d.header_scale.to_string(),
            "EscalaCuerpo" => d.body_scale.to_string(),
            "EscalaPie" => d.footer_scale.to_string(),
            _ => String::new(),
        }
    }
}

/// Batch template: the recognized headers plus two sample rows (EAN13 and CODE128).
/// Geometry and presentation columns carry the current defaults.
pub fn export_template(defaults: &LabelConfig) -> String {
    let headers: Vec<&str> = TEMPLATE_COLUMNS.iter().map(|f| f.column()).collect();
    let samples = [
        TemplateRow { defaults, codigo: "7501234567890", tipo: "EAN13", cantidad: 5, descripcion: "Producto A", precio: "10.99" },
        TemplateRow { defaults, codigo: "ABC-001", tipo: "CODE128", cantidad: 2, descripcion: "Producto B", precio: "7.50" },
    ];
    write_csv(&headers, &samples, TemplateRow::column)
}

/// Sheet listing the current label once per copy.
pub fn export_summary(config: &LabelConfig) -> String {
    let rows: Vec<usize> = (1..=config.copies() as usize).collect();
    write_csv(&SUMMARY_COLUMNS, &rows, |n, header| match header {
        "N" => n.to_string(),
        "Modo" => config.mode.as_str().to_string(),
        "Codigo_o_texto" => config.value.clone(),
        "TipoBarras" => match config.mode {
            Mode::Barcode => config.symbology.tag().to_string(),
            Mode::Qr => String::new(),
        },
        "Descripcion" => config.description.clone(),
        "Precio" => config.price.clone(),
        "Lote" => config.lot.clone(),
        "Encabezado" => config.header_text.clone(),
        "Pie" => config.footer_text.clone(),
        "Ancho_mm" => config.width_mm.to_string(),
        "Alto_mm" => config.height_mm.to_string(),
        "MostrarValor" => config.show_value.to_string(),
        "TieneLogo" => config.has_logo().to_string(),
        _ => String::new(),
    })
}
