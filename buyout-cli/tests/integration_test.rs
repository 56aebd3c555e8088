//! Integration tests that drive the calculator from config and rate files.

use std::path::{Path, PathBuf};

use buyout_cli::analytics::{EventType, InMemoryEventLog};
use buyout_cli::app::{self, AppError, CalculateRequest};
use buyout_cli::config::CalculatorConfig;
use buyout_cli::state::CalculatorSession;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_config_selects_custom_rates() {
    let config = CalculatorConfig::load(&fixture("config.toml")).expect("fixture config loads");
    let rates = fixture(config.rates_file.as_deref().unwrap().to_str().unwrap());

    let table = app::load_province_table(Some(&rates)).unwrap();
    assert_eq!(table.all().len(), 2);
    assert_eq!(table.tax_rate("xa"), dec!(0.07));

    let mut session = CalculatorSession::new(table, InMemoryEventLog::new());
    let request = CalculateRequest {
        buyout: "$10,000".to_string(),
        province: config.province,
        show_cents: config.show_cents,
        ..Default::default()
    };

    let output = app::run_calculate(&mut session, &request).unwrap();

    assert!(output.starts_with("Estimated tax savings: $700.00\n"));
    assert!(output.contains("GST+PST (7%):"));
    assert!(output.contains("$10,700.00"));
}

#[test]
fn test_missing_rates_file_is_reported() {
    let result = app::load_province_table(Some(&fixture("no-such-rates.csv")));

    assert!(matches!(result, Err(AppError::Rates(_))));
}

#[test]
fn test_session_event_sequence() {
    let table = app::load_province_table(None).unwrap();
    let mut session = CalculatorSession::new(table, InMemoryEventLog::new());
    let request = CalculateRequest {
        province: Some("BC".to_string()),
        vehicle_value: Some("18000".to_string()),
        buyout: "15000".to_string(),
        ..Default::default()
    };

    app::run_calculate(&mut session, &request).unwrap();

    let types: Vec<_> = session
        .sink()
        .events()
        .iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(types.first(), Some(&EventType::InputStarted));
    assert_eq!(types.last(), Some(&EventType::ResultViewed));
    assert_eq!(
        types
            .iter()
            .filter(|t| **t == EventType::InputStarted)
            .count(),
        1
    );
}
