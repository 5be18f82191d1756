//! Number formatting for display.
//!
//! Mirrors the browser's default `toLocaleString` for en-US: at most three
//! fraction digits, trailing zeros dropped, comma thousands separators. Values
//! that round to zero keep their sign, so `-0.0001` shows as `-0`.

const MAX_FRACTION_DIGITS: usize = 3;

/// Group an integer digit string with commas
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a value with thousands separators and up to three decimals
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.1$}", value.abs(), MAX_FRACTION_DIGITS);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    let (integer_part, fraction) = match trimmed.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (trimmed, None),
    };

    let mut out = String::new();
    if value.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer_part));
    if let Some(frac) = fraction {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Dollar-prefixed grouped value, e.g. `$65,000.5`
pub fn format_usd(value: f64) -> String {
    format!("${}", format_grouped(value))
}
