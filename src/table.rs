//! Minimal CSV reading and writing for batch sheets and manifests.
//!
//! Writing follows the usual quoting rule: a field containing a comma, a quote or a
//! newline is wrapped in quotes and embedded quotes are doubled. Lines end with `\n`.
use crate::rows::{BatchRow, Cell};

pub fn escape_field(field: &str) -> String {
    let doubled = field.replace('"', "\"\"");
    if doubled.contains([',', '"', '\n']) {
        format!("\"{}\"", doubled)
    } else {
        doubled
    }
}

/// Header line followed by one line per record. Missing cells are written empty.
pub fn write_csv<R, F>(headers: &[&str], records: &[R], cell: F) -> String
where
    F: Fn(&R, &str) -> String,
{
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.iter().map(|h| escape_field(h)).collect::<Vec<_>>().join(","));
    for record in records {
        let line: Vec<String> = headers.iter().map(|h| escape_field(&cell(record, h))).collect();
        lines.push(line.join(","));
    }
    lines.join("\n")
}

/// Splits CSV text into records, honoring quoted fields and `\r\n` endings.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => quoted = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => quoted = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// First record is the header; each later record becomes a row of text cells.
/// Blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<BatchRow> {
    let mut records = parse_records(text.trim_start_matches('\u{feff}')).into_iter();
    let Some(headers) = records.next() else {
        return Vec::new();
    };
    records
        .filter(|r| r.iter().any(|f| !f.is_empty()))
        .map(|r| {
            headers
                .iter()
                .zip(r.into_iter().chain(std::iter::repeat(String::new())))
                .map(|(h, v)| (h.trim().to_string(), Cell::Text(v)))
                .collect()
        })
        .collect()
}
