//! Rounding shared by the calculations and the currency codec.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown when cents are displayed.
pub const CENTS_PRECISION: u32 = 2;

/// Rounds to `dp` decimal places, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(1234.5), 0), dec!(1235));
/// assert_eq!(round_half_up(dec!(-1234.5), 0), dec!(-1235)); // Away from zero
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount for display: to whole dollars, or to cents when
/// `show_cents` is set.
pub fn round_currency(
    value: Decimal,
    show_cents: bool,
) -> Decimal {
    round_half_up(value, if show_cents { CENTS_PRECISION } else { 0 })
}
