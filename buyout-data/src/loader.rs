use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::provinces::{ProvinceInfo, TaxType};

/// Errors that can occur when loading province tax rates.
#[derive(Debug, Error)]
pub enum ProvinceRateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown tax type '{tax_type}' for province {code}")]
    UnknownTaxType { code: String, tax_type: String },

    #[error("Tax rate {rate} for province {code} must be between 0 and 1")]
    InvalidRate { code: String, rate: Decimal },

    #[error("Province code '{0}' appears more than once")]
    DuplicateCode(String),

    #[error("Province table is empty")]
    Empty,
}

impl From<csv::Error> for ProvinceRateLoaderError {
    fn from(err: csv::Error) -> Self {
        ProvinceRateLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a province rates CSV file.
///
/// - `code`: Two-letter province or territory code (e.g., ON)
/// - `name`: Display name
/// - `tax_rate`: Combined sales tax rate as a decimal (e.g., 0.13 for 13%)
/// - `tax_type`: One of `HST`, `GST+PST`, `GST`, `GST+QST`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProvinceRecord {
    pub code: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub tax_rate: Decimal,
    pub tax_type: String,
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

/// Loader for province tax rates from CSV.
pub struct ProvinceRateLoader;

impl ProvinceRateLoader {
    /// Parse province records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProvinceRecord>, ProvinceRateLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProvinceRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate parsed records and convert them to [`ProvinceInfo`].
    ///
    /// Codes are upper-cased. Fails on an unknown tax type, a rate outside
    /// `[0, 1]`, a repeated code, or an empty record set. Record order is
    /// preserved.
    pub fn validate(
        records: Vec<ProvinceRecord>
    ) -> Result<Vec<ProvinceInfo>, ProvinceRateLoaderError> {
        if records.is_empty() {
            return Err(ProvinceRateLoaderError::Empty);
        }

        let mut seen = HashSet::new();
        let mut provinces = Vec::with_capacity(records.len());

        for record in records {
            let code = record.code.to_ascii_uppercase();

            let tax_type = TaxType::parse(&record.tax_type).ok_or_else(|| {
                ProvinceRateLoaderError::UnknownTaxType {
                    code: code.clone(),
                    tax_type: record.tax_type.clone(),
                }
            })?;

            if record.tax_rate < Decimal::ZERO || record.tax_rate > Decimal::ONE {
                return Err(ProvinceRateLoaderError::InvalidRate {
                    code,
                    rate: record.tax_rate,
                });
            }

            if !seen.insert(code.clone()) {
                return Err(ProvinceRateLoaderError::DuplicateCode(code));
            }

            provinces.push(ProvinceInfo {
                code,
                name: record.name,
                tax_rate: record.tax_rate,
                tax_type,
            });
        }

        Ok(provinces)
    }

    /// Parse and validate a province rates CSV file.
    pub fn load_from_file(path: &Path) -> Result<Vec<ProvinceInfo>, ProvinceRateLoaderError> {
        let file = File::open(path).map_err(|source| ProvinceRateLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let provinces = Self::validate(Self::parse(file)?)?;
        debug!(path = %path.display(), count = provinces.len(), "loaded province rates");

        Ok(provinces)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"code,name,tax_rate,tax_type
ON,Ontario,0.13,HST
QC,Quebec,0.14975,GST+QST
AB,Alberta,0.05,GST
"#;

    #[test]
    fn test_parse_valid_csv() {
        let records = ProvinceRateLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1],
            ProvinceRecord {
                code: "QC".to_string(),
                name: "Quebec".to_string(),
                tax_rate: dec!(0.14975),
                tax_type: "GST+QST".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_trims_fields() {
        let csv = "code,name,tax_rate,tax_type\n on , Ontario , 0.13 , HST \n";

        let records = ProvinceRateLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(records[0].code, "on");
        assert_eq!(records[0].tax_rate, dec!(0.13));
    }

    #[test]
    fn test_parse_invalid_rate_is_csv_error() {
        let csv = "code,name,tax_rate,tax_type\nON,Ontario,thirteen,HST\n";

        let result = ProvinceRateLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ProvinceRateLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_missing_column_is_csv_error() {
        let csv = "code,name,tax_rate\nON,Ontario,0.13\n";

        let result = ProvinceRateLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ProvinceRateLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_validate_converts_records() {
        let records = ProvinceRateLoader::parse(TEST_CSV.as_bytes()).unwrap();

        let provinces = ProvinceRateLoader::validate(records).unwrap();

        assert_eq!(provinces.len(), 3);
        assert_eq!(provinces[0].code, "ON");
        assert_eq!(provinces[1].tax_type, TaxType::GstQst);
        assert_eq!(provinces[2].tax_rate, dec!(0.05));
    }

    #[test]
    fn test_validate_uppercases_codes() {
        let csv = "code,name,tax_rate,tax_type\nbc,British Columbia,0.12,GST+PST\n";
        let records = ProvinceRateLoader::parse(csv.as_bytes()).unwrap();

        let provinces = ProvinceRateLoader::validate(records).unwrap();

        assert_eq!(provinces[0].code, "BC");
    }

    #[test]
    fn test_validate_rejects_unknown_tax_type() {
        let csv = "code,name,tax_rate,tax_type\nON,Ontario,0.13,VAT\n";
        let records = ProvinceRateLoader::parse(csv.as_bytes()).unwrap();

        let err = ProvinceRateLoader::validate(records).unwrap_err();

        assert_eq!(err.to_string(), "Unknown tax type 'VAT' for province ON");
    }

    #[test]
    fn test_validate_rejects_rate_above_one() {
        let csv = "code,name,tax_rate,tax_type\nON,Ontario,13,HST\n";
        let records = ProvinceRateLoader::parse(csv.as_bytes()).unwrap();

        let result = ProvinceRateLoader::validate(records);

        assert!(matches!(
            result,
            Err(ProvinceRateLoaderError::InvalidRate { ref code, .. }) if code == "ON"
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_codes() {
        let csv = "code,name,tax_rate,tax_type\nON,Ontario,0.13,HST\non,Ontario,0.13,HST\n";
        let records = ProvinceRateLoader::parse(csv.as_bytes()).unwrap();

        let result = ProvinceRateLoader::validate(records);

        assert!(matches!(result, Err(ProvinceRateLoaderError::DuplicateCode(ref c)) if c == "ON"));
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let records = ProvinceRateLoader::parse("code,name,tax_rate,tax_type\n".as_bytes()).unwrap();

        let result = ProvinceRateLoader::validate(records);

        assert!(matches!(result, Err(ProvinceRateLoaderError::Empty)));
    }
}
