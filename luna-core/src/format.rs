//! Formatting and parsing for the values the calculators display: dollar
//! amounts, percentages, dates, and timestamps.
//!
//! Formatting is forgiving: it accepts whatever is in a text field, strips
//! decoration, and re-renders, so formatting an already-formatted value is
//! idempotent. Parsing never errors; empty or malformed input comes back as
//! `None` and the engines treat it as missing. Clamping of negative values
//! is deliberately NOT done here; that belongs to the engines.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;

/// Renders a raw field value as `$1,234.56`.
///
/// Empty input stays empty; input that does not contain a number after
/// stripping decoration also renders as empty rather than erroring.
pub fn format_currency(raw: &str) -> String {
    match cleaned_number(raw) {
        Some(value) => currency_string(value),
        None => String::new(),
    }
}

/// Renders a raw field value as `12.34%`. Same empty/invalid policy as
/// [`format_currency`]; no thousands grouping.
pub fn format_percentage(raw: &str) -> String {
    match cleaned_number(raw) {
        Some(value) => percentage_string(value),
        None => String::new(),
    }
}

/// Parses a displayed currency string back into a number.
///
/// Strips `$` and thousands separators. Empty input is `None`; malformed
/// non-empty input logs a warning and is also `None`.
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).map_or_else(
        |e| {
            warn!(input = %text, "invalid currency value: {e}");
            None
        },
        Some,
    )
}

/// Parses a displayed percentage string back into a number.
pub fn parse_percentage(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace('%', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).map_or_else(
        |e| {
            warn!(input = %text, "invalid percentage value: {e}");
            None
        },
        Some,
    )
}

/// Parses a date field value.
///
/// Accepts the date-input wire format `YYYY-MM-DD` and the display format
/// `MM/DD/YYYY`. Anything else is `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_or_else(
            |e| {
                warn!(input = %text, "invalid date: {e}");
                None
            },
            Some,
        )
}

/// Renders a decimal as `$`-prefixed, two-decimal, thousands-grouped text.
pub fn currency_string(value: Decimal) -> String {
    let (sign, integer, fraction) = signed_two_decimal_parts(value);
    format!("${sign}{}.{fraction}", group_thousands(&integer))
}

/// Renders a decimal as two-decimal text with a `%` suffix.
pub fn percentage_string(value: Decimal) -> String {
    let (sign, integer, fraction) = signed_two_decimal_parts(value);
    format!("{sign}{integer}.{fraction}%")
}

/// Creation timestamp for a record, from the wall clock.
///
/// `for_filename` selects the sortable `YYYYMMDD_HHMMSS` form used in
/// export file names; otherwise the human-readable display form. Filename
/// stamps for records created in sequence never decrease.
pub fn generate_timestamp(for_filename: bool) -> String {
    let now = Local::now();
    if for_filename {
        filename_timestamp(now)
    } else {
        display_timestamp(now)
    }
}

/// Human-readable timestamp, e.g. `8/5/2026, 2:30:15 PM`.
pub fn display_timestamp(at: DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Sortable timestamp, e.g. `20260805_143015`.
pub fn filename_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Strips everything but digits and the decimal point, then parses.
/// This is what makes re-formatting formatted text idempotent.
fn cleaned_number(raw: &str) -> Option<Decimal> {
    if raw.trim().is_empty() {
        return None;
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(&cleaned).map_or_else(
        |e| {
            warn!(input = %raw, "unformattable numeric value: {e}");
            None
        },
        Some,
    )
}

/// Splits a value rounded to cents into sign, integer digits, and exactly
/// two fraction digits.
fn signed_two_decimal_parts(value: Decimal) -> (&'static str, String, String) {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    match text.split_once('.') {
        Some((integer, fraction)) => (sign, integer.to_string(), format!("{fraction:0<2}")),
        None => (sign, text, "00".to_string()),
    }
}

/// Inserts a comma every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
