//! German currency formatting for text output

use crate::normalize::round_currency;

/// Format an amount the way German invoices print it: `1.234,56 €`.
pub fn format_eur(amount: f64) -> String {
    let cents = (round_currency(amount) * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();

    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!(
        "{}{},{:02} €",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}
