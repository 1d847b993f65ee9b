//! Display strings for money and ratios, en-AU style.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::types::{Money, Rate};

/// Rendered in place of a ratio whose denominator was zero.
pub const UNDEFINED_MARKER: &str = "—";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// `$1,234` / `-$1,234`, rounded half away from zero to whole units.
pub fn format_currency(value: Money) -> String {
    format_currency_with(value, DEFAULT_CURRENCY_SYMBOL)
}

pub fn format_currency_with(value: Money, symbol: &str) -> String {
    let mut rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.rescale(0);
    let whole = group_thousands(rounded.mantissa().unsigned_abs());
    if negative {
        format!("-{}{}", symbol, whole)
    } else {
        format!("{}{}", symbol, whole)
    }
}

/// Missing values render as zero rather than failing.
pub fn format_currency_opt(value: Option<Money>) -> String {
    format_currency(value.unwrap_or(Decimal::ZERO))
}

/// Formats a loosely typed amount; anything non-numeric renders as `$0`.
pub fn format_currency_text(text: &str) -> String {
    format_currency_opt(Decimal::from_str(text.trim()).ok())
}

/// `0.1234` -> `12.3%`; `None` -> [`UNDEFINED_MARKER`].
pub fn format_percent(ratio: Option<Rate>) -> String {
    let Some(ratio) = ratio else {
        return UNDEFINED_MARKER.to_string();
    };
    let Some(pct) = ratio.checked_mul(dec!(100)) else {
        return UNDEFINED_MARKER.to_string();
    };
    let mut pct = pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if pct.is_zero() {
        pct = Decimal::ZERO;
    }
    pct.rescale(1);
    format!("{}%", pct)
}

fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
