mod common;

use common::{init_logging, BlockBars, MIXED_SHEET};
use label_sheet::{Field, LabelCompositor, LabelSession, QrcodeRasterizer, Symbology};

const JSON_ROWS: &str = r#"[
    {"Codigo": 7501234567890, "Tipo": "EAN13", "SKU": "X-1", "Etiqueta": ""},
    {"Codigo": "ABC-001", "Tipo": "code128", "SKU": "", "Etiqueta": "Promo"}
]"#;

#[test]
fn alias_wins_over_recognized_names() {
    init_logging();
    let mut session = LabelSession::default();
    session.load_json(JSON_ROWS);
    assert_eq!(session.items()[0].value, "7501234567890");
    assert_eq!(session.items()[1].symbology, Symbology::Code128);

    session.set_alias(Field::Codigo, "SKU");
    assert_eq!(session.items()[0].value, "X-1");
    // An empty aliased cell falls through to the recognized columns.
    assert_eq!(session.items()[1].value, "ABC-001");

    session.set_alias(Field::Encabezado, "Etiqueta");
    assert_eq!(session.items()[1].header_text, "Promo");
    assert_eq!(session.items()[0].header_text, "");
}

#[test]
fn form_defaults_fill_unmapped_fields() {
    let mut session = LabelSession::default();
    session.defaults.footer_text = "Hecho en MX".into();
    session.defaults.width_mm = 60.0;
    session.load_csv(MIXED_SHEET);
    assert!(session.items().iter().all(|c| c.footer_text == "Hecho en MX" && c.width_mm == 60.0));
    assert!(session.has_errors());
    assert_eq!(session.error_count(), 1);
}

#[test]
fn preview_follows_the_selection() {
    let compositor = LabelCompositor::new(&BlockBars, &QrcodeRasterizer);
    let mut session = LabelSession::default();
    session.load_csv(MIXED_SHEET);
    assert!(session.select(3));
    assert_eq!(session.current().value, "A-4");
    let preview = session.preview(&compositor);
    assert_eq!(preview.dimensions(), (189, 113));

    let (items, results) = session.export_items();
    assert_eq!(items.len(), 5);
    assert_eq!(results.iter().filter(|r| r.is_valid()).count(), 4);
}
