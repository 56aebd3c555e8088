use std::path::Path;

use buyout_core::currency::{format_input_display, parse_count, parse_currency};
use buyout_data::{ProvinceRateLoaderError, ProvinceTable};
use chrono::Local;
use thiserror::Error;
use tracing::{debug, info};

use crate::analytics::EventSink;
use crate::report::{OutputFormat, Report};
use crate::state::{CalculatorSession, ValidationError};
use crate::summary::render_summary;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown province code '{0}' (run `lease-buyout provinces` for the list)")]
    UnknownProvince(String),

    #[error(transparent)]
    Rates(#[from] ProvinceRateLoaderError),

    #[error("cannot render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw text values for one calculation, as typed by the user.
///
/// Amounts go through the permissive currency parser, so `"$20,000"`,
/// `"20000"` and `"20,000.00"` are all accepted.
#[derive(Debug, Clone, Default)]
pub struct CalculateRequest {
    pub buyout: String,
    pub province: Option<String>,
    pub purchase_option_fee: Option<String>,
    pub other_fees: Option<String>,
    pub vehicle_value: Option<String>,
    pub remaining_payments: Option<String>,
    pub monthly_payment: Option<String>,
    pub show_cents: bool,
    pub format: OutputFormat,
    pub summary: bool,
}

impl CalculateRequest {
    fn has_advanced_options(&self) -> bool {
        self.purchase_option_fee.is_some()
            || self.other_fees.is_some()
            || self.remaining_payments.is_some()
            || self.monthly_payment.is_some()
    }
}

/// Loads the province table from `rates_file`, or the built-in table.
pub fn load_province_table(rates_file: Option<&Path>) -> Result<ProvinceTable, AppError> {
    match rates_file {
        Some(path) => {
            let table = ProvinceTable::from_file(path)?;
            info!(path = %path.display(), provinces = table.all().len(), "using custom rates");
            Ok(table)
        }
        None => Ok(ProvinceTable::builtin()),
    }
}

/// Feeds `request` through the session and renders the result.
pub fn run_calculate<S: EventSink>(
    session: &mut CalculatorSession<S>,
    request: &CalculateRequest,
) -> Result<String, AppError> {
    if let Some(code) = &request.province {
        if session.table().get(code).is_none() {
            return Err(AppError::UnknownProvince(code.clone()));
        }
        session.set_province(code);
    }

    let buyout = parse_currency(&request.buyout);
    debug!(text = %request.buyout, parsed = %format_input_display(buyout), "buyout entered");
    session.set_buyout(buyout);

    if request.has_advanced_options() {
        session.toggle_advanced();
        let parse_optional = |text: &Option<String>| {
            text.as_deref().map(parse_currency).unwrap_or_default()
        };
        session.set_fees(
            parse_optional(&request.purchase_option_fee),
            parse_optional(&request.other_fees),
        );
        session.set_remaining_lease(
            request
                .remaining_payments
                .as_deref()
                .map(parse_count)
                .unwrap_or(0),
            parse_optional(&request.monthly_payment),
        );
    }

    if let Some(value) = &request.vehicle_value {
        session.set_vehicle_value_unknown(false);
        session.set_vehicle_value(Some(parse_currency(value)));
    }

    let results = session.refresh()?;
    let state = session.state();
    let province = session
        .table()
        .get(&state.province_code)
        .cloned()
        .ok_or_else(|| AppError::UnknownProvince(state.province_code.clone()))?;
    let inputs = state.to_inputs(session.table());

    let mut output =
        Report::new(&province, &inputs, &results).render(request.format, request.show_cents)?;

    if request.summary {
        let summary = render_summary(&province, &results, &Local::now());
        output.push('\n');
        output.push_str(&summary);
        output.push('\n');
        session.summary_copied();
    }

    debug!(province = %province.code, "rendered results");
    Ok(output)
}

/// One line per province: code, name, and rate label.
pub fn render_province_list(table: &ProvinceTable) -> String {
    let width = table
        .all()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);

    table
        .all()
        .iter()
        .map(|p| {
            format!("{}  {:<width$}  {}\n", p.code, p.name, p.rate_label())
        })
        .collect()
}
