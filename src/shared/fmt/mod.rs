//! Display formatting for amounts, percentages and counts.

pub mod currency;
pub mod num;

pub use currency::{
    format_compact_currency, format_currency, format_number, format_percentage,
    format_signed_currency,
};
