//! Lease buyout calculations.
//!
//! Given a buyout price, a sales tax rate and the lease-end fees, these
//! functions work out what it costs to keep the vehicle and what a sale
//! would have to bring in to match it.
//!
//! # Derived Values
//!
//! | Value | Formula |
//! |-------|---------|
//! | Tax savings | buyout × tax rate |
//! | Total buyout cost | buyout + tax savings + purchase option fee + other fees |
//! | Break-even offer | buyout + purchase option fee + other fees |
//! | Keeping cost with tax | total buyout cost |
//! | Remaining lease cost | remaining payments × monthly payment |
//! | Total cost if keeping | remaining lease cost + total buyout cost |
//! | Equity | vehicle value − (buyout + purchase option fee + other fees) |
//! | Vehicle value band | vehicle value × (1 ∓ 5%) |
//! | Net proceeds range | each end of the value band − (buyout + fees) |
//!
//! Tax is left out of the break-even offer because a sale to a third party
//! carries no purchase tax for the lessee. For any non-negative tax rate the
//! break-even offer therefore never exceeds the total buyout cost.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use buyout_core::{CalcInputs, calculate};
//!
//! let inputs = CalcInputs::new(dec!(20000), dec!(0.13))
//!     .with_fees(dec!(300), dec!(150))
//!     .with_vehicle_value(dec!(25000));
//!
//! let results = calculate(&inputs);
//!
//! assert_eq!(results.tax_savings, dec!(2600));
//! assert_eq!(results.total_buyout_cost, dec!(23050));
//! assert_eq!(results.break_even_offer, dec!(20450));
//! assert_eq!(results.equity, Some(dec!(4550)));
//! assert_eq!(results.net_proceeds_low, Some(dec!(3300)));
//! assert_eq!(results.net_proceeds_high, Some(dec!(5800)));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{CalcInputs, CalcResults, NetProceedsRange};

/// Relative uncertainty applied either side of the estimated vehicle value.
pub const VALUE_UNCERTAINTY: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Sales tax that would be paid on the buyout.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::calculations::tax_savings;
///
/// assert_eq!(tax_savings(dec!(20000), dec!(0.14975)), dec!(2995));
/// ```
pub fn tax_savings(
    buyout_amount: Decimal,
    tax_rate: Decimal,
) -> Decimal {
    buyout_amount * tax_rate
}

/// All-in cost of exercising the purchase option and keeping the vehicle.
pub fn total_buyout_cost(
    buyout_amount: Decimal,
    tax_rate: Decimal,
    purchase_option_fee: Decimal,
    other_fees: Decimal,
) -> Decimal {
    buyout_amount + tax_savings(buyout_amount, tax_rate) + purchase_option_fee + other_fees
}

/// Buyout plus fees, the cost base every sale is measured against.
pub fn cost_base(
    buyout_amount: Decimal,
    purchase_option_fee: Decimal,
    other_fees: Decimal,
) -> Decimal {
    buyout_amount + purchase_option_fee + other_fees
}

/// Lowest third-party offer at which selling is equivalent to keeping.
///
/// Excludes tax, see the module docs.
pub fn break_even_offer(
    buyout_amount: Decimal,
    purchase_option_fee: Decimal,
    other_fees: Decimal,
) -> Decimal {
    cost_base(buyout_amount, purchase_option_fee, other_fees)
}

/// Estimated vehicle value minus the cost of buying it out.
///
/// A negative result means the lease is underwater.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::calculations::equity;
///
/// assert_eq!(equity(dec!(18000), dec!(20000), dec!(300), dec!(150)), dec!(-2450));
/// ```
pub fn equity(
    vehicle_value: Decimal,
    buyout_amount: Decimal,
    purchase_option_fee: Decimal,
    other_fees: Decimal,
) -> Decimal {
    vehicle_value - cost_base(buyout_amount, purchase_option_fee, other_fees)
}

/// Net proceeds at either end of a ±[`VALUE_UNCERTAINTY`] band on the
/// vehicle value.
pub fn net_proceeds_range(
    vehicle_value: Decimal,
    buyout_amount: Decimal,
    purchase_option_fee: Decimal,
    other_fees: Decimal,
) -> NetProceedsRange {
    BuyoutCalculator::default().net_proceeds_range(
        vehicle_value,
        buyout_amount,
        purchase_option_fee,
        other_fees,
    )
}

/// Runs every calculation that `inputs` supports.
///
/// Shorthand for `BuyoutCalculator::default().calculate(inputs)`.
pub fn calculate(inputs: &CalcInputs) -> CalcResults {
    BuyoutCalculator::default().calculate(inputs)
}

/// Calculator holding the fixed constants of the buyout model.
///
/// [`BuyoutCalculator::default`] uses [`VALUE_UNCERTAINTY`]. Callers normally
/// go through the free [`calculate`] function; the struct exists so that the
/// value band can be changed without widening every call site.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::{BuyoutCalculator, CalcInputs};
///
/// let calculator = BuyoutCalculator::default().with_uncertainty(dec!(0.10));
/// let inputs = CalcInputs::new(dec!(20000), dec!(0.13)).with_vehicle_value(dec!(25000));
///
/// let results = calculator.calculate(&inputs);
///
/// assert_eq!(results.vehicle_value_low, Some(dec!(22500)));
/// assert_eq!(results.vehicle_value_high, Some(dec!(27500)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyoutCalculator {
    uncertainty: Decimal,
}

impl Default for BuyoutCalculator {
    fn default() -> Self {
        Self {
            uncertainty: VALUE_UNCERTAINTY,
        }
    }
}

impl BuyoutCalculator {
    /// Replaces the relative uncertainty of the vehicle value band.
    pub fn with_uncertainty(
        mut self,
        uncertainty: Decimal,
    ) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// The relative uncertainty in use.
    pub fn uncertainty(&self) -> Decimal {
        self.uncertainty
    }

    /// Net proceeds at either end of the vehicle value band.
    ///
    /// `low` may be negative while `high` is positive when the value sits
    /// close to the break-even offer.
    pub fn net_proceeds_range(
        &self,
        vehicle_value: Decimal,
        buyout_amount: Decimal,
        purchase_option_fee: Decimal,
        other_fees: Decimal,
    ) -> NetProceedsRange {
        let value_low = vehicle_value * (Decimal::ONE - self.uncertainty);
        let value_high = vehicle_value * (Decimal::ONE + self.uncertainty);
        let costs = cost_base(buyout_amount, purchase_option_fee, other_fees);

        NetProceedsRange {
            low: value_low - costs,
            high: value_high - costs,
            value_low,
            value_high,
        }
    }

    /// Computes the full result set for `inputs`.
    ///
    /// The remaining-lease fields are filled only when both
    /// `remaining_payments` and `monthly_payment` are present and positive.
    /// The vehicle-value fields are filled only when `vehicle_value` is
    /// present and positive. The two groups are decided independently.
    pub fn calculate(
        &self,
        inputs: &CalcInputs,
    ) -> CalcResults {
        let CalcInputs {
            buyout_amount,
            tax_rate,
            purchase_option_fee,
            other_fees,
            vehicle_value,
            remaining_payments,
            monthly_payment,
        } = *inputs;

        let total_buyout_cost =
            total_buyout_cost(buyout_amount, tax_rate, purchase_option_fee, other_fees);

        let mut results = CalcResults {
            tax_savings: tax_savings(buyout_amount, tax_rate),
            total_buyout_cost,
            break_even_offer: break_even_offer(buyout_amount, purchase_option_fee, other_fees),
            keeping_cost_with_tax: total_buyout_cost,
            remaining_lease_cost: None,
            total_cost_if_keeping: None,
            equity: None,
            net_proceeds_low: None,
            net_proceeds_high: None,
            vehicle_value_low: None,
            vehicle_value_high: None,
        };

        let remaining_lease = remaining_payments
            .zip(monthly_payment)
            .filter(|&(payments, monthly)| payments > 0 && monthly > Decimal::ZERO);
        if let Some((payments, monthly)) = remaining_lease {
            let remaining_lease_cost = Decimal::from(payments) * monthly;
            results.remaining_lease_cost = Some(remaining_lease_cost);
            results.total_cost_if_keeping = Some(remaining_lease_cost + total_buyout_cost);
        }

        if let Some(value) = vehicle_value.filter(|value| *value > Decimal::ZERO) {
            let range =
                self.net_proceeds_range(value, buyout_amount, purchase_option_fee, other_fees);
            results.equity = Some(equity(value, buyout_amount, purchase_option_fee, other_fees));
            results.net_proceeds_low = Some(range.low);
            results.net_proceeds_high = Some(range.high);
            results.vehicle_value_low = Some(range.value_low);
            results.vehicle_value_high = Some(range.value_high);
        }

        debug!(
            buyout = %buyout_amount,
            tax_rate = %tax_rate,
            remaining_lease = results.has_remaining_lease(),
            vehicle_value = results.has_vehicle_value(),
            "calculated buyout results"
        );

        results
    }
}
