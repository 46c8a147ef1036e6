mod common;

use common::{init_logging, BlockBars, TestResult};
use label_sheet::compose::ImageSource;
use label_sheet::{
    export_png, DrawOp, LabelCompositor, LabelConfig, Mode, NoBarcodes, QrcodeRasterizer, Symbology,
};

fn ean13() -> LabelConfig {
    LabelConfig {
        value: "7501234567890".into(),
        symbology: Symbology::Ean13,
        description: "Producto A".into(),
        price: "10.99".into(),
        ..LabelConfig::default()
    }
}

#[test]
fn ean13_label_renders_at_print_resolution() {
    init_logging();
    let compositor = LabelCompositor::new(&BlockBars, &QrcodeRasterizer);
    let label = compositor.render(&ean13(), 300.0);
    assert_eq!(label.dimensions(), (591, 354));
    assert!(label.error.is_none());
    assert!(label
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Image { source: ImageSource::Symbol, .. })));
}

#[test]
fn preview_uses_screen_resolution() {
    let compositor = LabelCompositor::new(&BlockBars, &QrcodeRasterizer);
    assert_eq!(compositor.preview(&ean13()).dimensions(), (189, 113));
}

#[test]
fn qr_labels_use_the_qrcode_backend() -> TestResult {
    init_logging();
    let compositor = LabelCompositor::new(&NoBarcodes, &QrcodeRasterizer);
    let cfg = LabelConfig { mode: Mode::Qr, value: "https://example.com/p/42".into(), ..LabelConfig::default() };
    let label = compositor.render(&cfg, 300.0);
    assert!(label.error.is_none());
    let symbol = label.ops.iter().find_map(|op| match op {
        DrawOp::Image { source: ImageSource::Symbol, w, h, .. } => Some((*w, *h)),
        _ => None,
    });
    let (w, h) = symbol.ok_or("no symbol drawn")?;
    assert_eq!(w, h);
    Ok(())
}

#[test]
fn missing_barcode_backend_shows_placeholder() {
    let compositor = LabelCompositor::new(&NoBarcodes, &QrcodeRasterizer);
    let label = compositor.render(&ean13(), 300.0);
    let message = label.error_message(Mode::Barcode).unwrap_or_default();
    assert!(message.starts_with("No se pudo generar el código de barras"));
    assert!(label
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Text { text, .. } if text == "Error al generar código")));
}

#[test]
fn png_download_is_named_after_the_value() -> TestResult {
    let compositor = LabelCompositor::new(&BlockBars, &QrcodeRasterizer);
    let (name, png) = export_png(&compositor, &ean13())?;
    assert_eq!(name, "etiqueta_7501234567890.png");
    let decoded = image::load_from_memory(&png)?;
    assert_eq!((decoded.width(), decoded.height()), (591, 354));
    Ok(())
}
