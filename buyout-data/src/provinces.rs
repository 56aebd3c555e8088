use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::loader::{ProvinceRateLoader, ProvinceRateLoaderError};

/// Province used when a requested code is not in the table.
pub const DEFAULT_PROVINCE: &str = "ON";

/// Rate used when neither the requested nor the default province is known.
const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// How a region's combined sales tax is made up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    /// Harmonized sales tax.
    #[serde(rename = "HST")]
    Hst,
    /// Federal GST plus provincial sales tax.
    #[serde(rename = "GST+PST")]
    GstPst,
    /// Federal GST only.
    #[serde(rename = "GST")]
    Gst,
    /// Federal GST plus Quebec sales tax.
    #[serde(rename = "GST+QST")]
    GstQst,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hst => "HST",
            Self::GstPst => "GST+PST",
            Self::Gst => "GST",
            Self::GstQst => "GST+QST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HST" => Some(Self::Hst),
            "GST+PST" => Some(Self::GstPst),
            "GST" => Some(Self::Gst),
            "GST+QST" => Some(Self::GstQst),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A province or territory and its combined sales tax rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceInfo {
    pub code: String,
    pub name: String,
    /// Combined rate as a decimal (0.13 for 13%).
    pub tax_rate: Decimal,
    pub tax_type: TaxType,
}

impl ProvinceInfo {
    fn new(
        code: &str,
        name: &str,
        tax_rate: Decimal,
        tax_type: TaxType,
    ) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            tax_rate,
            tax_type,
        }
    }

    /// Label such as `"13% HST"`.
    pub fn rate_label(&self) -> String {
        format!("{} {}", format_tax_rate(self.tax_rate), self.tax_type)
    }
}

/// Lookup table of regional tax rates, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceTable {
    provinces: Vec<ProvinceInfo>,
}

impl ProvinceTable {
    pub fn new(provinces: Vec<ProvinceInfo>) -> Self {
        Self { provinces }
    }

    /// Combined rates of the Canadian provinces and territories as of 2024.
    pub fn builtin() -> Self {
        let rate = |hundred_thousandths: i64| Decimal::new(hundred_thousandths, 5).normalize();

        Self::new(vec![
            // HST provinces
            ProvinceInfo::new("ON", "Ontario", rate(13_000), TaxType::Hst),
            ProvinceInfo::new("NB", "New Brunswick", rate(15_000), TaxType::Hst),
            ProvinceInfo::new("NS", "Nova Scotia", rate(15_000), TaxType::Hst),
            ProvinceInfo::new("NL", "Newfoundland and Labrador", rate(15_000), TaxType::Hst),
            ProvinceInfo::new("PE", "Prince Edward Island", rate(15_000), TaxType::Hst),
            // GST + PST provinces
            ProvinceInfo::new("BC", "British Columbia", rate(12_000), TaxType::GstPst),
            ProvinceInfo::new("MB", "Manitoba", rate(12_000), TaxType::GstPst),
            ProvinceInfo::new("SK", "Saskatchewan", rate(11_000), TaxType::GstPst),
            ProvinceInfo::new("QC", "Quebec", rate(14_975), TaxType::GstQst),
            // GST only
            ProvinceInfo::new("AB", "Alberta", rate(5_000), TaxType::Gst),
            ProvinceInfo::new("NT", "Northwest Territories", rate(5_000), TaxType::Gst),
            ProvinceInfo::new("NU", "Nunavut", rate(5_000), TaxType::Gst),
            ProvinceInfo::new("YT", "Yukon", rate(5_000), TaxType::Gst),
        ])
    }

    /// Loads a table from a CSV file (see [`ProvinceRateLoader`]).
    pub fn from_file(path: &Path) -> Result<Self, ProvinceRateLoaderError> {
        ProvinceRateLoader::load_from_file(path).map(Self::new)
    }

    /// Looks up a province by code, ignoring case and surrounding whitespace.
    pub fn get(
        &self,
        code: &str,
    ) -> Option<&ProvinceInfo> {
        let code = code.trim();
        self.provinces
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    pub fn all(&self) -> &[ProvinceInfo] {
        &self.provinces
    }

    /// Tax rate for `code`, falling back to [`DEFAULT_PROVINCE`] when the
    /// code is unknown.
    pub fn tax_rate(
        &self,
        code: &str,
    ) -> Decimal {
        if let Some(province) = self.get(code) {
            return province.tax_rate;
        }
        warn!(code, fallback = DEFAULT_PROVINCE, "unknown province code");
        self.get(DEFAULT_PROVINCE)
            .map(|p| p.tax_rate)
            .unwrap_or(DEFAULT_TAX_RATE)
    }
}

impl Default for ProvinceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Formats a rate as a percentage without trailing zeros.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use buyout_data::format_tax_rate;
///
/// assert_eq!(format_tax_rate(dec!(0.13)), "13%");
/// assert_eq!(format_tax_rate(dec!(0.14975)), "14.975%");
/// ```
pub fn format_tax_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
