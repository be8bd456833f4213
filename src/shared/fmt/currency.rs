//! Currency and percentage formatting for dashboard display.
//!
//! All money values are `rust_decimal::Decimal`. Output follows en-US
//! conventions: `$1,234.50`, `-$5.00`, `12.50%`, `$1.2K`.

use super::num;
use rust_decimal::prelude::*;
use std::sync::OnceLock;

static TRILLION: OnceLock<Decimal> = OnceLock::new();
static BILLION: OnceLock<Decimal> = OnceLock::new();
static MILLION: OnceLock<Decimal> = OnceLock::new();
static THOUSAND: OnceLock<Decimal> = OnceLock::new();

fn get_trillion() -> &'static Decimal {
    TRILLION.get_or_init(|| Decimal::from(1_000_000_000_000u64))
}

fn get_billion() -> &'static Decimal {
    BILLION.get_or_init(|| Decimal::from(1_000_000_000u64))
}

fn get_million() -> &'static Decimal {
    MILLION.get_or_init(|| Decimal::from(1_000_000u64))
}

fn get_thousand() -> &'static Decimal {
    THOUSAND.get_or_init(|| Decimal::from(1_000u64))
}

/// Symbol for the currencies the backend reports; `None` for anything else.
pub fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn with_currency(sign: &str, currency: &str, body: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{} {}", sign, currency.to_ascii_uppercase(), body),
    }
}

fn round_money(amount: &Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with two decimals and a currency symbol: `$1,234.50`.
pub fn format_currency(amount: &Decimal, currency: &str) -> String {
    let rounded = round_money(&amount.abs(), 2);
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let body = num::group_thousands(&format!("{:.2}", rounded));
    with_currency(sign, currency, &body)
}

/// Format a balance change with an explicit sign: `+$5.00`, `-$5.00`.
pub fn format_signed_currency(change: &Decimal, currency: &str) -> String {
    let formatted = format_currency(change, currency);
    if change > &Decimal::ZERO && !round_money(change, 2).is_zero() {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

/// Format a plain number with two decimals and separators: `1,234.50`.
pub fn format_number(value: &Decimal) -> String {
    let rounded = round_money(value, 2);
    num::group_thousands(&format!("{:.2}", rounded))
}

/// Format a value that is already expressed in percent: `12.5 → "12.50%"`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", num::display_fixed(value, decimals))
}

fn compact_units() -> [(&'static Decimal, &'static str); 4] {
    [
        (get_trillion(), "T"),
        (get_billion(), "B"),
        (get_million(), "M"),
        (get_thousand(), "K"),
    ]
}

fn round_compact(scaled: &Decimal) -> Decimal {
    let dp = if *scaled < Decimal::TEN { 1 } else { 0 };
    round_money(scaled, dp)
}

/// Abbreviate an amount with K/M/B/T suffixes: `$1.2K`, `$12K`, `-$3.4M`.
///
/// Values below ten (after scaling) keep one decimal, larger ones none.
/// A value that rounds up to a full unit moves to the next suffix, so
/// `999,950` prints as `$1M`.
pub fn format_compact_currency(amount: &Decimal, currency: &str) -> String {
    let abs_amount = amount.abs();
    let units = compact_units();

    let idx = units.iter().position(|(unit, _)| abs_amount >= **unit);
    let (mut rounded, mut suffix) = match idx {
        Some(i) => (round_compact(&(abs_amount / units[i].0)), units[i].1),
        None => (round_compact(&abs_amount), ""),
    };

    // Rounding can carry into the next unit: 999.95K -> 1000K -> 1M.
    let larger = match idx {
        Some(0) => None,
        Some(i) => Some(i - 1),
        None => Some(units.len() - 1),
    };
    if let Some(next) = larger {
        if rounded >= *get_thousand() {
            rounded = round_compact(&(rounded / get_thousand()));
            suffix = units[next].1;
        }
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let body = format!(
        "{}{}",
        num::display_formatted_string(rounded.to_string()),
        suffix
    );
    with_currency(sign, currency, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_usd() {
        assert_eq!(format_currency(&dec("0"), "USD"), "$0.00");
        assert_eq!(format_currency(&dec("1234.5"), "USD"), "$1,234.50");
        assert_eq!(format_currency(&dec("1234567.891"), "usd"), "$1,234,567.89");
        assert_eq!(format_currency(&dec("0.005"), "USD"), "$0.01");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(&dec("-12.3"), "USD"), "-$12.30");
        assert_eq!(format_currency(&dec("-0.001"), "USD"), "$0.00");
    }

    #[test]
    fn test_format_currency_other_codes() {
        assert_eq!(format_currency(&dec("10"), "EUR"), "€10.00");
        assert_eq!(format_currency(&dec("10"), "btc"), "BTC 10.00");
    }

    #[test]
    fn test_format_signed_currency() {
        assert_eq!(format_signed_currency(&dec("5"), "USD"), "+$5.00");
        assert_eq!(format_signed_currency(&dec("-5"), "USD"), "-$5.00");
        assert_eq!(format_signed_currency(&dec("0"), "USD"), "$0.00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(&dec("1234.5")), "1,234.50");
        assert_eq!(format_number(&dec("-7")), "-7.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.5, 2), "12.50%");
        assert_eq!(format_percentage(66.666, 1), "66.7%");
        assert_eq!(format_percentage(0.0, 0), "0%");
    }

    #[test]
    fn test_format_compact_currency() {
        assert_eq!(format_compact_currency(&dec("999"), "USD"), "$999");
        assert_eq!(format_compact_currency(&dec("1234"), "USD"), "$1.2K");
        assert_eq!(format_compact_currency(&dec("12345"), "USD"), "$12K");
        assert_eq!(format_compact_currency(&dec("1500000"), "USD"), "$1.5M");
        assert_eq!(format_compact_currency(&dec("2000000000"), "USD"), "$2B");
        assert_eq!(format_compact_currency(&dec("-2500"), "USD"), "-$2.5K");
        assert_eq!(format_compact_currency(&dec("0"), "USD"), "$0");
    }

    #[test]
    fn test_format_compact_currency_rounds_into_next_unit() {
        assert_eq!(format_compact_currency(&dec("999.95"), "USD"), "$1K");
        assert_eq!(format_compact_currency(&dec("999950"), "USD"), "$1M");
        assert_eq!(format_compact_currency(&dec("-999999999"), "USD"), "-$1B");
        assert_eq!(format_compact_currency(&dec("9960"), "USD"), "$10K");
        assert_eq!(format_compact_currency(&dec("999.4"), "USD"), "$999");
    }
}
