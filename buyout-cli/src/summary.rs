//! Plain-text summary of a calculation, suitable for pasting elsewhere.

use std::fmt::Display;

use buyout_core::{CalcResults, format_currency};
use buyout_data::ProvinceInfo;
use chrono::{DateTime, TimeZone};

/// Renders the copyable summary for `results`.
///
/// Remaining-lease and vehicle-value lines are included only when those
/// results were computed.
pub fn render_summary<Tz>(
    province: &ProvinceInfo,
    results: &CalcResults,
    calculated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![
        "Lease Buyout Calculator Summary".to_string(),
        "================================".to_string(),
        format!("Province: {} ({})", province.name, province.rate_label()),
        String::new(),
        "Key Numbers:".to_string(),
        format!("- Tax Savings: {}", format_currency(results.tax_savings, false)),
        format!(
            "- Total Buyout Cost (if keeping): {}",
            format_currency(results.total_buyout_cost, false)
        ),
        format!(
            "- Break-even Offer: {}",
            format_currency(results.break_even_offer, false)
        ),
    ];

    if let (Some(remaining), Some(total)) =
        (results.remaining_lease_cost, results.total_cost_if_keeping)
    {
        lines.push(format!(
            "- Remaining Lease Payments: {}",
            format_currency(remaining, false)
        ));
        lines.push(format!(
            "- Total Cost to Keep Vehicle: {}",
            format_currency(total, false)
        ));
    }

    if let Some(equity) = results.equity {
        lines.push(format!("- Estimated Equity: {}", format_currency(equity, false)));
    }

    if let (Some(low), Some(high)) = (results.net_proceeds_low, results.net_proceeds_high) {
        lines.push(format!(
            "- Net Proceeds Range: {} to {}",
            format_currency(low, false),
            format_currency(high, false)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Calculated at: {}",
        calculated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    lines.join("\n")
}
