//! Result rendering for the terminal.

use buyout_core::{CalcInputs, CalcResults, format_currency};
use buyout_data::{ProvinceInfo, format_tax_rate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

/// Output format for calculation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything shown for one calculation.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub province: &'a ProvinceInfo,
    pub inputs: &'a CalcInputs,
    pub results: &'a CalcResults,
    pub total_benefit: Decimal,
}

impl<'a> Report<'a> {
    pub fn new(
        province: &'a ProvinceInfo,
        inputs: &'a CalcInputs,
        results: &'a CalcResults,
    ) -> Self {
        Self {
            province,
            inputs,
            results,
            total_benefit: results.total_benefit(),
        }
    }

    pub fn render(
        &self,
        format: OutputFormat,
        show_cents: bool,
    ) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text(show_cents)),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// The result panel as aligned label/value rows.
    pub fn render_text(
        &self,
        show_cents: bool,
    ) -> String {
        let money = |amount: Decimal| format_currency(amount, show_cents);
        let results = self.results;

        let headline = if results.has_vehicle_value() {
            "Estimated benefit of selling"
        } else {
            "Estimated tax savings"
        };

        let mut rows = vec![
            (
                format!("{} ({}):", self.province.tax_type, format_tax_rate(self.province.tax_rate)),
                money(results.tax_savings),
            ),
            ("Break-even offer:".to_string(), money(results.break_even_offer)),
            ("Total buyout cost:".to_string(), money(results.total_buyout_cost)),
        ];

        if let (Some(remaining), Some(total)) =
            (results.remaining_lease_cost, results.total_cost_if_keeping)
        {
            rows.push(("Remaining payments:".to_string(), money(remaining)));
            rows.push(("Total cost to keep:".to_string(), money(total)));
        }

        if let Some(equity) = results.equity {
            rows.push(("Estimated equity:".to_string(), money(equity)));
        }
        if let (Some(low), Some(high)) = (results.net_proceeds_low, results.net_proceeds_high) {
            rows.push((
                "Net proceeds range:".to_string(),
                format!("{} to {}", money(low), money(high)),
            ));
        }
        if results.has_vehicle_value() {
            rows.push(("Total benefit:".to_string(), money(self.total_benefit)));
        }

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let mut out = format!("{headline}: {}\n\n", money(self.total_benefit));
        for (label, value) in rows {
            out.push_str(&format!("{label:<width$}  {value}\n"));
        }
        out
    }
}
