//! Per-row validation: symbology value rules plus the geometry/resolution gate.
use std::fmt;

use crate::consts::MIN_DPI;
use crate::model::{LabelConfig, Mode, Symbology};

/// Outcome of validating one row. Valid rows carry no reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult(Option<String>);

impl ValidationResult {
    pub fn valid() -> Self {
        Self(None)
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self(Some(reason.into()))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_none()
    }

    /// The reason, or `""` for a valid row.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    pub fn reason(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn only_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Gates obviously malformed payloads. Check digits are left to the rasterizer.
pub fn validate_value(value: &str, symbology: Symbology) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Valor vacío");
    }
    let len = value.len();
    let rule = match symbology {
        Symbology::Ean13 => Some(([12, 13], "EAN13 debe ser 12 o 13 dígitos")),
        Symbology::Ean8 => Some(([7, 8], "EAN8 debe ser 7 u 8 dígitos")),
        Symbology::Upc => Some(([11, 12], "UPC-A debe ser 11 o 12 dígitos")),
        Symbology::Itf14 => Some(([13, 14], "ITF-14 debe ser 13 o 14 dígitos")),
        Symbology::Msi | Symbology::Pharmacode | Symbology::Codabar | Symbology::Code128 => None,
    };
    match rule {
        Some((lengths, reason)) if !only_digits(value) || !lengths.contains(&len) => {
            ValidationResult::invalid(reason)
        }
        _ => ValidationResult::valid(),
    }
}

/// Full row check: value, then symbology (barcode mode only), then geometry and dpi.
pub fn validate_config(config: &LabelConfig) -> ValidationResult {
    if config.value.is_empty() {
        return ValidationResult::invalid("Valor vacío");
    }
    if config.mode == Mode::Barcode {
        let result = validate_value(&config.value, config.symbology);
        if !result.is_valid() {
            return result;
        }
    }
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(config.width_mm) || !positive(config.height_mm) {
        return ValidationResult::invalid("Tamaño etiqueta inválido");
    }
    if config.dpi < MIN_DPI {
        return ValidationResult::invalid("DPI muy bajo (<72)");
    }
    ValidationResult::valid()
}

/// One independent result per config, in input order.
pub fn validate_batch(configs: &[LabelConfig]) -> Vec<ValidationResult> {
    configs.iter().map(validate_config).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(value: &str, symbology: Symbology) -> LabelConfig {
        LabelConfig {
            value: value.to_string(),
            symbology,
            ..LabelConfig::default()
        }
    }

    #[test]
    fn ean13_accepts_12_or_13_digits() {
        assert!(validate_value("750123456789", Symbology::Ean13).is_valid());
        assert!(validate_value("7501234567890", Symbology::Ean13).is_valid());
    }

    #[test]
    fn ean13_rejections_mention_lengths() {
        for bad in ["75012345678", "75012345678901", "75012345678a", "7501-2345678"] {
            let r = validate_value(bad, Symbology::Ean13);
            assert!(!r.is_valid(), "{bad} should fail");
            assert!(r.as_str().contains("12 o 13"));
        }
    }

    #[test]
    fn fixed_length_symbologies() {
        assert!(validate_value("1234567", Symbology::Ean8).is_valid());
        assert!(!validate_value("123456", Symbology::Ean8).is_valid());
        assert!(validate_value("12345678901", Symbology::Upc).is_valid());
        assert!(!validate_value("1234567890123", Symbology::Upc).is_valid());
        assert!(validate_value("12345678901234", Symbology::Itf14).is_valid());
        assert!(!validate_value("1234567890123A", Symbology::Itf14).is_valid());
    }

    #[test]
    fn free_form_symbologies_only_need_a_value() {
        for s in [Symbology::Code128, Symbology::Msi, Symbology::Pharmacode, Symbology::Codabar] {
            assert!(validate_value("ABC-001", s).is_valid());
            assert_eq!(validate_value("", s).as_str(), "Valor vacío");
        }
    }

    #[test]
    fn qr_mode_skips_symbology_rule() {
        let mut c = cfg("https://example.com/p/1", Symbology::Ean13);
        assert!(!validate_config(&c).is_valid());
        c.mode = Mode::Qr;
        assert!(validate_config(&c).is_valid());
    }

    #[test]
    fn geometry_gate_applies_in_every_mode() {
        let mut c = cfg("ABC", Symbology::Code128);
        c.mode = Mode::Qr;
        c.width_mm = 0.0;
        assert_eq!(validate_config(&c).as_str(), "Tamaño etiqueta inválido");
        c.width_mm = 50.0;
        c.dpi = 71;
        assert_eq!(validate_config(&c).as_str(), "DPI muy bajo (<72)");
        c.dpi = 72;
        assert!(validate_config(&c).is_valid());
    }

    #[test]
    fn batch_results_follow_input_order() {
        let rows = vec![
            cfg("7501234567890", Symbology::Ean13),
            cfg("", Symbology::Code128),
            cfg("123", Symbology::Ean8),
        ];
        let results = validate_batch(&rows);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_valid());
        assert_eq!(results[1].as_str(), "Valor vacío");
        assert!(results[2].as_str().contains("7 u 8"));
    }
}
