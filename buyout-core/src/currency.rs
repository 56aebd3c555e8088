//! Conversion between dollar amounts and their display text.
//!
//! Rendering follows the en-CA convention: `$` symbol, `,` thousands
//! separator, `.` decimal point, and a leading `-` before the symbol for
//! negative amounts (`-$1,234`).
//!
//! Parsing is permissive. It is fed whatever a user has typed so far, so it
//! never fails: text that does not start with a number parses as zero.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::calculations::common::{CENTS_PRECISION, round_currency, round_half_up};

/// Fraction digits kept by the unfocused input display.
const INPUT_DISPLAY_PRECISION: u32 = 3;

/// Leading number accepted by [`parse_currency`]: sign, digits, fraction, exponent.
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
});

/// Leading integer accepted by [`parse_count`].
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer pattern"));

/// Formats an amount as a dollar string.
///
/// Whole dollars are shown unless `show_cents` is set, in which case exactly
/// two decimal places are shown. Midpoints round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567), false), "$1,234,567");
/// assert_eq!(format_currency(dec!(-1234), false), "-$1,234");
/// assert_eq!(format_currency(dec!(0), false), "$0");
/// assert_eq!(format_currency(dec!(1234.56), true), "$1,234.56");
/// assert_eq!(format_currency(dec!(1234.56), false), "$1,235");
/// ```
pub fn format_currency(
    amount: Decimal,
    show_cents: bool,
) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let mut magnitude = round_currency(amount.abs(), show_cents);
    magnitude.rescale(if show_cents { CENTS_PRECISION } else { 0 });

    format!("{sign}${}", group_thousands(&magnitude.to_string()))
}

/// Parses user-typed currency text into an amount.
///
/// Removes every `$` and `,`, trims surrounding whitespace and reads the
/// leading number. Returns zero when there is no leading number.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::parse_currency;
///
/// assert_eq!(parse_currency("$1,234.56"), dec!(1234.56));
/// assert_eq!(parse_currency("  $1,234  "), dec!(1234));
/// assert_eq!(parse_currency("abc"), dec!(0));
/// assert_eq!(parse_currency(""), dec!(0));
/// ```
pub fn parse_currency(text: &str) -> Decimal {
    let cleaned = text.replace(['$', ','], "");
    LEADING_NUMBER
        .find(cleaned.trim())
        .and_then(|number| parse_number(number.as_str()))
        .unwrap_or(Decimal::ZERO)
}

/// Parses a payment count the way a numeric form field does.
///
/// Reads the leading integer, returning zero when there is none or when it
/// is negative or out of range.
///
/// # Examples
///
/// ```
/// use buyout_core::currency::parse_count;
///
/// assert_eq!(parse_count("12"), 12);
/// assert_eq!(parse_count("7.5"), 7);
/// assert_eq!(parse_count("-3"), 0);
/// assert_eq!(parse_count(""), 0);
/// ```
pub fn parse_count(text: &str) -> u32 {
    LEADING_INTEGER
        .find(text.trim())
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0)
}

/// Text shown in a currency field while it has focus: the raw number, or
/// nothing when the amount is not positive.
pub fn format_plain_amount(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        amount.normalize().to_string()
    } else {
        String::new()
    }
}

/// Text shown in a currency field once focus leaves it.
///
/// Grouped with a spaced symbol (`"$ 1,234.5"`), keeping up to three typed
/// fraction digits. Empty when the amount is not positive.
pub fn format_input_display(amount: Decimal) -> String {
    if amount <= Decimal::ZERO {
        return String::new();
    }
    let rounded = round_half_up(amount, INPUT_DISPLAY_PRECISION).normalize();
    format!("$ {}", group_thousands(&rounded.to_string()))
}

fn parse_number(number: &str) -> Option<Decimal> {
    let number = number.strip_prefix('+').unwrap_or(number);
    let (mantissa, exponent) = match number.find(['e', 'E']) {
        Some(idx) => (&number[..idx], Some(&number[idx + 1..])),
        None => (number, None),
    };

    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let digits = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };

    let mut value = Decimal::from_str(&digits).ok()?;
    if let Some(exponent) = exponent {
        value = scale_by_power_of_ten(value, exponent.parse().ok()?)?;
    }

    Some(if negative { -value } else { value })
}

fn scale_by_power_of_ten(
    value: Decimal,
    exponent: i64,
) -> Option<Decimal> {
    let ten = Decimal::TEN;
    let mut value = value;
    for _ in 0..exponent.unsigned_abs().min(64) {
        value = if exponent >= 0 {
            value.checked_mul(ten)?
        } else {
            value.checked_div(ten)?
        };
    }
    Some(value)
}

/// Inserts `,` between every three digits of the integer part of `digits`.
fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
