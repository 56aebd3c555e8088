use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs for a single lease buyout calculation.
///
/// Every amount is in dollars. `tax_rate` is a fraction, so 13% is `0.13`.
/// The engine accepts any values here, including zero or negative amounts;
/// range checks such as "buyout must be positive" belong to the caller.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_core::CalcInputs;
///
/// let inputs = CalcInputs::new(dec!(20000), dec!(0.13))
///     .with_fees(dec!(300), dec!(150))
///     .with_vehicle_value(dec!(25000));
///
/// assert_eq!(inputs.purchase_option_fee, dec!(300));
/// assert_eq!(inputs.vehicle_value, Some(dec!(25000)));
/// assert_eq!(inputs.remaining_payments, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcInputs {
    /// Pre-tax price to purchase the vehicle at lease end (the residual).
    pub buyout_amount: Decimal,

    /// Combined sales tax rate for the lessee's region.
    pub tax_rate: Decimal,

    /// Fee the leasing company charges to exercise the purchase option.
    #[serde(default)]
    pub purchase_option_fee: Decimal,

    /// Any other fees (admin, inspection, documentation).
    #[serde(default)]
    pub other_fees: Decimal,

    /// Estimated market value of the vehicle.
    ///
    /// Equity and proceeds fields are only computed when this is present
    /// and positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_value: Option<Decimal>,

    /// Number of lease payments still owed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_payments: Option<u32>,

    /// Current monthly lease payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Decimal>,
}

impl CalcInputs {
    /// Creates inputs with zero fees and no optional values.
    pub fn new(
        buyout_amount: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            buyout_amount,
            tax_rate,
            purchase_option_fee: Decimal::ZERO,
            other_fees: Decimal::ZERO,
            vehicle_value: None,
            remaining_payments: None,
            monthly_payment: None,
        }
    }

    /// Sets the purchase option fee and other fees.
    pub fn with_fees(
        mut self,
        purchase_option_fee: Decimal,
        other_fees: Decimal,
    ) -> Self {
        self.purchase_option_fee = purchase_option_fee;
        self.other_fees = other_fees;
        self
    }

    /// Sets the estimated vehicle value.
    pub fn with_vehicle_value(
        mut self,
        vehicle_value: Decimal,
    ) -> Self {
        self.vehicle_value = Some(vehicle_value);
        self
    }

    /// Sets the remaining lease payment count and monthly amount.
    pub fn with_remaining_lease(
        mut self,
        remaining_payments: u32,
        monthly_payment: Decimal,
    ) -> Self {
        self.remaining_payments = Some(remaining_payments);
        self.monthly_payment = Some(monthly_payment);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_defaults_fees_to_zero() {
        let inputs = CalcInputs::new(dec!(20000), dec!(0.13));

        assert_eq!(inputs.purchase_option_fee, Decimal::ZERO);
        assert_eq!(inputs.other_fees, Decimal::ZERO);
        assert_eq!(inputs.vehicle_value, None);
        assert_eq!(inputs.monthly_payment, None);
    }

    #[test]
    fn deserialize_defaults_missing_fees() {
        let json = r#"{"buyout_amount":"20000","tax_rate":"0.13"}"#;

        let inputs: CalcInputs = serde_json::from_str(json).unwrap();

        assert_eq!(inputs, CalcInputs::new(dec!(20000), dec!(0.13)));
    }

    #[test]
    fn with_remaining_lease_sets_both_fields() {
        let inputs = CalcInputs::new(dec!(20000), dec!(0.13)).with_remaining_lease(6, dec!(450));

        assert_eq!(inputs.remaining_payments, Some(6));
        assert_eq!(inputs.monthly_payment, Some(dec!(450)));
    }
}
