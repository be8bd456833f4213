//! Number formatting utilities for human-readable display.
//!
//! String-level helpers shared by the `currency` sibling module: thousands
//! separators and trailing-zero trimming.

/// Inserts thousands separators into the integer part of a formatted number.
///
/// The fractional part is left untouched, so `"1234.50"` becomes `"1,234.50"`.
pub fn group_thousands(formatted: &str) -> String {
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let grouped = digits
        .chars()
        .rev()
        .collect::<String>()
        .as_bytes()
        .chunks(3)
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect::<String>();

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Trims trailing zeros, adds thousands separators.
pub fn display_formatted_string(formatted: String) -> String {
    let trimmed = if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    };

    group_thousands(&trimmed)
}

/// Format an f64 with a fixed number of decimal places and separators.
pub fn display_fixed(amount: f64, decimals: usize) -> String {
    group_thousands(&format!("{:.1$}", amount, decimals))
}
