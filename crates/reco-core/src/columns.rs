//! Column resolution for exports with drifting headers
//!
//! Export tools rename columns between versions, so every logical field is
//! looked up through an ordered alias list. The substring scan used for ERP
//! amounts is kept separate and only runs after the alias list is exhausted.

use serde_json::Value;

use crate::models::RawRow;
use crate::normalize::{cell_to_string, parse_currency};

/// Return the value of the first alias present in the row with a non-null
/// value.
///
/// A present empty string counts as a hit: the first matching column decides,
/// even when the export left it blank.
pub fn extract_first_available<'a, S: AsRef<str>>(row: &'a RawRow, aliases: &[S]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias.as_ref()))
        .find(|value| !value.is_null())
}

/// Resolve an alias list straight to a display string ("" on a miss).
pub fn extract_text<S: AsRef<str>>(row: &RawRow, aliases: &[S]) -> String {
    cell_to_string(extract_first_available(row, aliases))
}

/// Whether any alias appears as a column in the row at all.
pub fn has_any_column<S: AsRef<str>>(row: &RawRow, aliases: &[S]) -> bool {
    aliases.iter().any(|alias| row.contains_key(alias.as_ref()))
}

/// Resolve the net amount of an ERP line item.
///
/// The first alias whose cleaned amount is non-zero wins. When no alias
/// yields an amount, [`scan_amount_by_substring`] is consulted.
pub fn extract_erp_amount<S: AsRef<str>>(
    row: &RawRow,
    aliases: &[S],
    fallback_substrings: &[S],
) -> f64 {
    for alias in aliases {
        if let Some(value) = row.get(alias.as_ref()) {
            let amount = parse_currency(Some(value));
            if amount != 0.0 {
                return amount;
            }
        }
    }

    scan_amount_by_substring(row, fallback_substrings).unwrap_or(0.0)
}

/// Fallback only: the first column (in source order) whose lower-cased name
/// contains one of `substrings` and holds a non-zero amount.
pub fn scan_amount_by_substring<S: AsRef<str>>(row: &RawRow, substrings: &[S]) -> Option<f64> {
    row.iter()
        .filter(|(name, _)| {
            let lower = name.to_lowercase();
            substrings
                .iter()
                .any(|needle| lower.contains(&needle.as_ref().to_lowercase()))
        })
        .map(|(_, value)| parse_currency(Some(value)))
        .find(|amount| *amount != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_alias_wins() {
        let r = row(json!({"Projektname": "Name", "Titel": "Title"}));
        let title = extract_text(&r, &["Projekttitel", "Projektname", "Titel"]);
        assert_eq!(title, "Name");
    }

    #[test]
    fn test_null_is_skipped_but_empty_string_is_not() {
        let r = row(json!({"Projekttitel": null, "Projektname": "", "Titel": "Title"}));
        let value = extract_first_available(&r, &["Projekttitel", "Projektname", "Titel"]);
        assert_eq!(value, Some(&json!("")));
    }

    #[test]
    fn test_miss_is_empty_string() {
        let r = row(json!({"Other": "x"}));
        assert_eq!(extract_first_available(&r, &["Titel"]), None);
        assert_eq!(extract_text(&r, &["Titel"]), "");
    }

    #[test]
    fn test_erp_amount_skips_zero_candidates() {
        let r = row(json!({"Summe Netto": "0,00", "Betrag": "250,00"}));
        let amount = extract_erp_amount(&r, &["Summe Netto", "Betrag"], &["netto", "betrag"]);
        assert_eq!(amount, 250.0);
    }

    #[test]
    fn test_erp_amount_substring_fallback_uses_column_order() {
        let r = row(json!({
            "Rechnungsbetrag": "",
            "Leistung NETTO (EUR)": "1.200,00",
            "Brutto Betrag": "1.428,00"
        }));
        let amount = extract_erp_amount(&r, &["Summe Netto"], &["netto", "betrag"]);
        assert_eq!(amount, 1200.0);
    }

    #[test]
    fn test_erp_amount_nothing_found() {
        let r = row(json!({"KV-Nummer": "K1"}));
        assert_eq!(extract_erp_amount(&r, &["Summe Netto"], &["netto"]), 0.0);
        assert_eq!(scan_amount_by_substring(&r, &["netto"]), None);
    }

    #[test]
    fn test_has_any_column() {
        let r = row(json!({"Projektnummer": ""}));
        assert!(has_any_column(&r, &["Projektnummer"]));
        assert!(!has_any_column(&r, &["Projekt Projektnummer"]));
    }
}
