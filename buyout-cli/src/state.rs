//! Calculator form state.
//!
//! Holds the values a user has entered so far and turns them into engine
//! inputs. Business rules that the engine deliberately does not enforce,
//! such as requiring a positive buyout, are checked here.

use buyout_core::currency::format_plain_amount;
use buyout_core::{CalcInputs, CalcResults, calculate};
use buyout_data::{DEFAULT_PROVINCE, ProvinceTable};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::analytics::{EventSink, EventType};

/// Largest magnitude accepted for any entered amount ($1,000,000,000,000,000).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Reasons the form cannot show results yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a buyout amount greater than $0 to see results")]
    BuyoutNotPositive,

    #[error("The {field} is too large to calculate")]
    AmountTooLarge { field: &'static str },
}

/// Values entered into the calculator form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    pub buyout_amount: Decimal,
    pub province_code: String,
    pub purchase_option_fee: Decimal,
    pub other_fees: Decimal,

    /// "I don't know my vehicle's value". While set, any entered value is
    /// ignored and cleared.
    pub vehicle_value_unknown: bool,
    pub vehicle_value: Option<Decimal>,

    pub advanced_open: bool,
    pub remaining_payments: u32,
    pub monthly_payment: Decimal,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            buyout_amount: Decimal::ZERO,
            province_code: DEFAULT_PROVINCE.to_string(),
            purchase_option_fee: Decimal::ZERO,
            other_fees: Decimal::ZERO,
            vehicle_value_unknown: true,
            vehicle_value: None,
            advanced_open: false,
            remaining_payments: 0,
            monthly_payment: Decimal::ZERO,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the rules that must hold before results are shown.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.buyout_amount <= Decimal::ZERO {
            return Err(ValidationError::BuyoutNotPositive);
        }

        let amounts = [
            ("buyout amount", Some(self.buyout_amount)),
            ("purchase option fee", Some(self.purchase_option_fee)),
            ("other fees", Some(self.other_fees)),
            ("vehicle value", self.vehicle_value.filter(|_| !self.vehicle_value_unknown)),
            ("monthly payment", Some(self.monthly_payment)),
        ];
        for (field, amount) in amounts {
            if amount.is_some_and(|a| a.abs() > MAX_AMOUNT) {
                return Err(ValidationError::AmountTooLarge { field });
            }
        }
        Ok(())
    }

    /// Engine inputs for the current form values.
    ///
    /// The vehicle value is passed only while the "unknown" toggle is off,
    /// and the remaining-lease pair only when both values are positive.
    pub fn to_inputs(
        &self,
        table: &ProvinceTable,
    ) -> CalcInputs {
        let mut inputs = CalcInputs::new(self.buyout_amount, table.tax_rate(&self.province_code))
            .with_fees(self.purchase_option_fee, self.other_fees);

        if !self.vehicle_value_unknown {
            inputs.vehicle_value = self.vehicle_value;
        }
        if self.remaining_payments > 0 && self.monthly_payment > Decimal::ZERO {
            inputs = inputs.with_remaining_lease(self.remaining_payments, self.monthly_payment);
        }

        inputs
    }

    /// Whether an estimated vehicle value is in use.
    pub fn has_vehicle_value(&self) -> bool {
        !self.vehicle_value_unknown && self.vehicle_value.is_some_and(|v| v > Decimal::ZERO)
    }
}

/// Form state paired with the event sink that observes it.
///
/// Each setter updates the state and reports the interaction. Call
/// [`CalculatorSession::refresh`] after a change to recompute results.
pub struct CalculatorSession<S: EventSink> {
    state: CalculatorState,
    table: ProvinceTable,
    sink: S,
    results_visible: bool,
}

impl<S: EventSink> CalculatorSession<S> {
    pub fn new(
        table: ProvinceTable,
        sink: S,
    ) -> Self {
        Self {
            state: CalculatorState::new(),
            table,
            sink,
            results_visible: false,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn table(&self) -> &ProvinceTable {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn set_buyout(
        &mut self,
        amount: Decimal,
    ) {
        self.sink.track(EventType::InputStarted, None);
        if amount > Decimal::ZERO {
            self.sink.track(
                EventType::BuyoutEntered,
                Some(json!({ "amount": format_plain_amount(amount) })),
            );
        }
        self.state.buyout_amount = amount;
    }

    pub fn set_province(
        &mut self,
        code: &str,
    ) {
        self.sink.track(EventType::InputStarted, None);
        let code = code.trim().to_ascii_uppercase();
        self.sink
            .track(EventType::ProvinceSelected, Some(json!({ "province": code })));
        self.state.province_code = code;
    }

    pub fn set_fees(
        &mut self,
        purchase_option_fee: Decimal,
        other_fees: Decimal,
    ) {
        self.sink.track(EventType::InputStarted, None);
        self.state.purchase_option_fee = purchase_option_fee;
        self.state.other_fees = other_fees;
    }

    /// Flips the "vehicle value unknown" toggle. Turning it on clears any
    /// entered value.
    pub fn set_vehicle_value_unknown(
        &mut self,
        unknown: bool,
    ) {
        if self.state.vehicle_value_unknown != unknown {
            self.sink
                .track(EventType::ValueToggleChanged, Some(json!({ "unknown": unknown })));
        }
        self.state.vehicle_value_unknown = unknown;
        if unknown {
            self.state.vehicle_value = None;
        }
    }

    pub fn set_vehicle_value(
        &mut self,
        value: Option<Decimal>,
    ) {
        self.sink.track(EventType::InputStarted, None);
        if let Some(amount) = value.filter(|v| *v > Decimal::ZERO) {
            self.sink.track(
                EventType::VehicleValueEntered,
                Some(json!({ "amount": format_plain_amount(amount) })),
            );
        }
        self.state.vehicle_value = value;
    }

    /// Opens or closes the advanced options.
    pub fn toggle_advanced(&mut self) {
        self.state.advanced_open = !self.state.advanced_open;
        let event = if self.state.advanced_open {
            EventType::AdvancedOpened
        } else {
            EventType::AdvancedClosed
        };
        self.sink.track(event, None);
    }

    pub fn set_remaining_lease(
        &mut self,
        remaining_payments: u32,
        monthly_payment: Decimal,
    ) {
        self.sink.track(EventType::InputStarted, None);
        self.state.remaining_payments = remaining_payments;
        self.state.monthly_payment = monthly_payment;
    }

    /// Recomputes the results.
    ///
    /// Reports `result_viewed` each time results go from hidden to visible.
    pub fn refresh(&mut self) -> Result<CalcResults, ValidationError> {
        match self.state.validate() {
            Ok(()) => {
                if !self.results_visible {
                    self.results_visible = true;
                    self.sink.track(EventType::ResultViewed, None);
                }
                Ok(calculate(&self.state.to_inputs(&self.table)))
            }
            Err(err) => {
                self.results_visible = false;
                Err(err)
            }
        }
    }

    /// Records a call-to-action click (`"primary"` or `"secondary"`).
    pub fn cta_clicked(
        &mut self,
        cta_type: &str,
    ) {
        self.sink
            .track(EventType::CtaClicked, Some(json!({ "ctaType": cta_type })));
    }

    /// Records that the summary text was copied out.
    pub fn summary_copied(&mut self) {
        self.sink.track(EventType::SummaryCopied, None);
        self.cta_clicked("secondary");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::analytics::InMemoryEventLog;

    fn session() -> CalculatorSession<InMemoryEventLog> {
        CalculatorSession::new(ProvinceTable::builtin(), InMemoryEventLog::new())
    }

    fn event_types(session: &CalculatorSession<InMemoryEventLog>) -> Vec<EventType> {
        session.sink().events().iter().map(|e| e.event_type).collect()
    }

    // =========================================================================
    // CalculatorState tests
    // =========================================================================

    #[test]
    fn default_state_is_ontario_with_unknown_value() {
        let state = CalculatorState::new();

        assert_eq!(state.province_code, "ON");
        assert!(state.vehicle_value_unknown);
        assert_eq!(state.buyout_amount, Decimal::ZERO);
    }

    #[test]
    fn validate_requires_positive_buyout() {
        let mut state = CalculatorState::new();

        assert_eq!(state.validate(), Err(ValidationError::BuyoutNotPositive));
        state.buyout_amount = dec!(-5);
        assert_eq!(state.validate(), Err(ValidationError::BuyoutNotPositive));
        state.buyout_amount = dec!(0.01);
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn validate_caps_every_amount() {
        let mut state = CalculatorState {
            buyout_amount: MAX_AMOUNT,
            ..Default::default()
        };
        assert_eq!(state.validate(), Ok(()));

        state.other_fees = dec!(-1000000000000001);
        assert_eq!(
            state.validate(),
            Err(ValidationError::AmountTooLarge { field: "other fees" })
        );

        state.other_fees = Decimal::ZERO;
        state.vehicle_value = Some(Decimal::MAX);
        assert_eq!(state.validate(), Ok(()));

        state.vehicle_value_unknown = false;
        assert_eq!(
            state.validate(),
            Err(ValidationError::AmountTooLarge { field: "vehicle value" })
        );
    }

    #[test]
    fn max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
    }

    #[test]
    fn to_inputs_uses_province_rate() {
        let table = ProvinceTable::builtin();
        let state = CalculatorState {
            buyout_amount: dec!(20000),
            province_code: "QC".to_string(),
            ..Default::default()
        };

        let inputs = state.to_inputs(&table);

        assert_eq!(inputs.tax_rate, dec!(0.14975));
    }

    #[test]
    fn to_inputs_ignores_vehicle_value_while_unknown() {
        let table = ProvinceTable::builtin();
        let mut state = CalculatorState {
            buyout_amount: dec!(20000),
            vehicle_value: Some(dec!(25000)),
            ..Default::default()
        };

        assert_eq!(state.to_inputs(&table).vehicle_value, None);
        assert!(!state.has_vehicle_value());

        state.vehicle_value_unknown = false;
        assert_eq!(state.to_inputs(&table).vehicle_value, Some(dec!(25000)));
        assert!(state.has_vehicle_value());
    }

    #[test]
    fn to_inputs_omits_remaining_lease_until_both_positive() {
        let table = ProvinceTable::builtin();
        let mut state = CalculatorState {
            buyout_amount: dec!(20000),
            remaining_payments: 6,
            ..Default::default()
        };

        assert_eq!(state.to_inputs(&table).remaining_payments, None);

        state.monthly_payment = dec!(450);
        let inputs = state.to_inputs(&table);
        assert_eq!(inputs.remaining_payments, Some(6));
        assert_eq!(inputs.monthly_payment, Some(dec!(450)));
    }

    // =========================================================================
    // CalculatorSession tests
    // =========================================================================

    #[test]
    fn buyout_entry_tracks_input_started_once() {
        let mut session = session();

        session.set_buyout(dec!(0));
        session.set_buyout(dec!(20000));

        assert_eq!(
            event_types(&session),
            vec![EventType::InputStarted, EventType::BuyoutEntered]
        );
    }

    #[test]
    fn refresh_reports_result_viewed_on_each_reveal() {
        let mut session = session();

        assert_eq!(session.refresh(), Err(ValidationError::BuyoutNotPositive));
        session.set_buyout(dec!(20000));
        session.refresh().unwrap();
        session.refresh().unwrap();
        session.set_buyout(dec!(0));
        assert!(session.refresh().is_err());
        session.set_buyout(dec!(18000));
        session.refresh().unwrap();

        assert_eq!(session.sink().counts().get(&EventType::ResultViewed), Some(&2));
    }

    #[test]
    fn province_selection_changes_rate() {
        let mut session = session();
        session.set_buyout(dec!(20000));
        session.set_province("ab");

        let results = session.refresh().unwrap();

        assert_eq!(session.state().province_code, "AB");
        assert_eq!(results.tax_savings, dec!(1000));
    }

    #[test]
    fn vehicle_value_flow() {
        let mut session = session();
        session.set_buyout(dec!(20000));
        session.set_fees(dec!(300), dec!(150));
        session.set_vehicle_value_unknown(false);
        session.set_vehicle_value(Some(dec!(25000)));

        let results = session.refresh().unwrap();

        assert_eq!(results.equity, Some(dec!(4550)));
        assert_eq!(results.total_benefit(), dec!(7150));
        let counts = session.sink().counts();
        assert_eq!(counts.get(&EventType::ValueToggleChanged), Some(&1));
        assert_eq!(counts.get(&EventType::VehicleValueEntered), Some(&1));
    }

    #[test]
    fn turning_unknown_back_on_clears_value() {
        let mut session = session();
        session.set_buyout(dec!(20000));
        session.set_vehicle_value_unknown(false);
        session.set_vehicle_value(Some(dec!(25000)));

        session.set_vehicle_value_unknown(true);

        assert_eq!(session.state().vehicle_value, None);
        assert_eq!(session.refresh().unwrap().equity, None);
    }

    #[test]
    fn toggle_advanced_alternates_events() {
        let mut session = session();

        session.toggle_advanced();
        session.toggle_advanced();

        assert_eq!(
            event_types(&session),
            vec![EventType::AdvancedOpened, EventType::AdvancedClosed]
        );
        assert!(!session.state().advanced_open);
    }

    #[test]
    fn remaining_lease_flow() {
        let mut session = session();
        session.set_buyout(dec!(20000));
        session.set_fees(dec!(300), dec!(150));
        session.set_remaining_lease(6, dec!(450));

        let results = session.refresh().unwrap();

        assert_eq!(results.remaining_lease_cost, Some(dec!(2700)));
        assert_eq!(results.total_cost_if_keeping, Some(dec!(25750)));
    }

    #[test]
    fn summary_copied_also_counts_secondary_cta() {
        let mut session = session();

        session.summary_copied();

        let events = session.sink().events();
        assert_eq!(events[0].event_type, EventType::SummaryCopied);
        assert_eq!(events[1].event_type, EventType::CtaClicked);
        assert_eq!(
            events[1].metadata,
            Some(serde_json::json!({ "ctaType": "secondary" }))
        );
    }
}
