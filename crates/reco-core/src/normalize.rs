//! Value normalizers for raw spreadsheet cells
//!
//! Every function here is total: malformed input degrades to an empty string
//! or to zero instead of producing an error. Airtable and ERP values run
//! through the same functions so that equal inputs always compare equal.

use serde_json::Value;

/// Coerce a cell to its display string.
///
/// Missing and null cells become empty strings. Numbers use their shortest
/// decimal form, with integral floats written without a fraction (`1000`, not
/// `1000.0`) so that project numbers read from a workbook match the same
/// number typed into a CSV.
pub fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    format!("{}", f)
                }
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Normalize a project number (or KV number) cell into a join key.
pub fn normalize_project_key(value: Option<&Value>) -> String {
    normalize_key_str(&cell_to_string(value))
}

/// Collapse every whitespace variant (NBSP, tabs, line breaks, runs of
/// spaces) to a single ASCII space and trim both ends.
pub fn normalize_key_str(raw: &str) -> String {
    // char::is_whitespace covers U+00A0 but not a stray byte order mark
    raw.split(|c: char| c.is_whitespace() || c == '\u{feff}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a currency cell into a number, 0 when it cannot be parsed.
pub fn parse_currency(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_currency_str(s),
        Some(other) => parse_currency_str(&cell_to_string(Some(other))),
    }
}

/// Parse a German- or English-formatted amount string.
///
/// `"1.234,56 €"` → 1234.56, `"1234,5"` → 1234.5, `"1234.5"` → 1234.5.
/// When both separators appear, periods are thousands separators and the
/// comma is the decimal separator.
pub fn parse_currency_str(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let normalized = if has_comma && has_dot {
        cleaned.replace('.', "").replace(',', ".")
    } else if has_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Round to whole cents. Half-cent values round toward positive infinity.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // avoid emitting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Add two amounts on the cent grid.
pub fn add_currency(a: f64, b: f64) -> f64 {
    round_currency(round_currency(a) + round_currency(b))
}
