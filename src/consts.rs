// Label layout and designer tuning constants

pub const MM_PER_INCH: f64 = 25.4;
pub const PREVIEW_DPI: f64 = 96.0;
pub const MIN_DPI: u32 = 72;
pub const MIN_RASTER_PX: u32 = 10;

// Fractions of label height unless noted
pub const PAD_RATIO: f64 = 0.03;
pub const HEADER_ADVANCE: f64 = 0.12;
pub const LOGO_BOX: f64 = 0.22;          // of width and height
pub const LOGO_STRIP_H: f64 = 0.50;      // logoLeft strip height
pub const BODY_H: f64 = 0.55;
pub const BODY_H_CODE_TOP: f64 = 0.45;
pub const LOGO_LEFT_SHIFT: f64 = 0.25;   // of width
pub const TEXT_GAP: f64 = 0.02;
pub const LINE_GAP: f64 = 0.01;
pub const LINE_SPACING: f64 = 1.2;
pub const ERROR_FONT: f64 = 0.07;

pub const QR_SIDE: f64 = 0.60;           // of min(W, H)
pub const QR_LOGO_LEFT: f64 = 0.75;
pub const QR_MARGIN: u32 = 1;

pub const BAR_HEIGHT: f64 = 0.75;        // of body height
pub const BAR_WIDTH_DIV: f64 = 200.0;    // W / 200
pub const BAR_MARGIN: f64 = 0.01;
pub const MIN_BAR_MARGIN: u32 = 4;

pub const MIN_HEADER_PX: u32 = 10;
pub const MIN_TEXT_PX: u32 = 8;
pub const TEXT_EDGE_PX: i64 = 4;

// Approximate advance (em) used when no typeface is loaded
pub const FALLBACK_ADVANCE_EM: f64 = 0.55;

// Designer defaults
pub const DEFAULT_VALUE: &str = "123456789012";
pub const DEFAULT_WIDTH_MM: f64 = 50.0;
pub const DEFAULT_HEIGHT_MM: f64 = 30.0;
pub const DEFAULT_MARGIN_MM: f64 = 5.0;
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_HEADER_SCALE: f64 = 0.10;
pub const DEFAULT_BODY_SCALE: f64 = 0.08;
pub const DEFAULT_FOOTER_SCALE: f64 = 0.07;

pub const SAFE_NAME_MAX: usize = 40;
pub const ARCHIVE_ROOT: &str = "etiquetas";
pub const MANIFEST_NAME: &str = "resumen.csv";
