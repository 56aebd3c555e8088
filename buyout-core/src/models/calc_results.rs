use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived values for one set of [`CalcInputs`](crate::CalcInputs).
///
/// The first four fields are always computed. The optional groups are
/// `None` when their triggering inputs were absent or not positive, which
/// is different from a computed value of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcResults {
    /// Sales tax that would be paid when buying the vehicle outright.
    pub tax_savings: Decimal,

    /// Buyout plus tax plus all fees: the all-in cost of keeping the vehicle.
    pub total_buyout_cost: Decimal,

    /// Buyout plus fees, without tax. The lowest third-party offer at which
    /// selling matches keeping.
    pub break_even_offer: Decimal,

    /// Always equal to `total_buyout_cost`.
    pub keeping_cost_with_tax: Decimal,

    /// Remaining payments × monthly payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_lease_cost: Option<Decimal>,

    /// Remaining lease cost plus total buyout cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_if_keeping: Option<Decimal>,

    /// Vehicle value minus buyout and fees. Negative when underwater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_proceeds_low: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_proceeds_high: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_value_low: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_value_high: Option<Decimal>,
}

impl CalcResults {
    /// Whether the remaining-lease fields were computed.
    pub fn has_remaining_lease(&self) -> bool {
        self.remaining_lease_cost.is_some()
    }

    /// Whether the vehicle-value fields were computed.
    pub fn has_vehicle_value(&self) -> bool {
        self.equity.is_some()
    }

    /// The headline benefit of selling instead of keeping.
    ///
    /// Equity plus tax savings when a vehicle value was supplied, otherwise
    /// just the tax savings.
    pub fn total_benefit(&self) -> Decimal {
        match self.equity {
            Some(equity) => equity + self.tax_savings,
            None => self.tax_savings,
        }
    }
}
