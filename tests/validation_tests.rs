//! Parameter and input validation tests
//!
//! A report is generated only when every input is valid; nothing is
//! rendered for a rejected run.

mod common;

use common::{named_csv, sap_csv};
use quote_forge::params::{parse_periods, parse_rate, RawParams};
use quote_forge::pipeline;
use quote_forge::schema::SchemaVariant;
use quote_forge::style::StyleConfig;
use quote_forge::types::ReportKind;
use quote_forge::QuoteError;

fn raw(title: &str, periods: &str, rate: &str) -> RawParams {
    RawParams {
        title: title.to_string(),
        filename: "bid".to_string(),
        periods: Some(periods.to_string()),
        rate: Some(rate.to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RATE AND PERIODS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rate_without_decimal_point_rejected() {
    assert!(parse_rate(Some("5")).is_err());
    assert!(parse_rate(Some("0")).is_err());
}

#[test]
fn test_rate_outside_unit_interval_rejected() {
    assert!(parse_rate(Some("1.5")).is_err());
    assert!(parse_rate(Some("1.0")).is_err());
    assert!(parse_rate(Some("0.0")).is_err());
    assert!(parse_rate(Some("-0.2")).is_err());
}

#[test]
fn test_rate_accepted() {
    assert_eq!(parse_rate(Some("0.04")).unwrap(), 0.04);
    assert_eq!(parse_rate(Some(" .5 ")).unwrap(), 0.5);
}

#[test]
fn test_periods() {
    assert_eq!(parse_periods(Some("0")).unwrap(), 0);
    assert_eq!(parse_periods(Some("12")).unwrap(), 12);
    assert!(parse_periods(Some("abc")).is_err());
    assert!(parse_periods(Some("2.5")).is_err());
    assert!(parse_periods(Some("-1")).is_err());
    assert!(parse_periods(None).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// COLLECTED ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_invalid_field_reported() {
    let errors = raw("", "abc", "5")
        .validate(ReportKind::Inflation)
        .unwrap_err();
    assert_eq!(errors.fields(), vec!["title", "periods", "rate"]);
}

#[test]
fn test_empty_title_withholds_standard_report() {
    let errors = raw("   ", "", "").validate(ReportKind::Standard).unwrap_err();
    assert_eq!(errors.fields(), vec!["title"]);
}

#[test]
fn test_standard_ignores_inflation_inputs() {
    let params = raw("Bid", "abc", "5").validate(ReportKind::Standard).unwrap();
    assert!(params.inflation.is_none());
}

#[test]
fn test_filename_with_path_rejected() {
    let mut params = raw("Bid", "1", "0.1");
    params.filename = "../out/bid".to_string();
    let errors = params.validate(ReportKind::Standard).unwrap_err();
    assert_eq!(errors.fields(), vec!["filename"]);
}

#[test]
fn test_bare_extension_filename_rejected() {
    let mut params = raw("Bid", "1", "0.1");
    params.filename = ".xlsx".to_string();
    let errors = params.validate(ReportKind::Standard).unwrap_err();
    assert_eq!(errors.fields(), vec!["filename"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// INPUT ERRORS ABORT THE RUN
// ═══════════════════════════════════════════════════════════════════════════

fn standard() -> quote_forge::params::ReportParams {
    raw("Bid", "", "").validate(ReportKind::Standard).unwrap()
}

#[test]
fn test_header_only_csv_rejected() {
    let csv = named_csv(&[]);
    let result = pipeline::generate(
        csv.as_bytes(),
        SchemaVariant::Named,
        standard(),
        StyleConfig::default(),
    );
    assert!(matches!(result, Err(QuoteError::Schema(_))));
}

#[test]
fn test_sap_zero_quantity_rejected() {
    let csv = sap_csv(&[(0.0, 10.0, 0.1)]);
    let result = pipeline::generate(
        csv.as_bytes(),
        SchemaVariant::Sap,
        standard(),
        StyleConfig::default(),
    );
    match result {
        Err(QuoteError::Parse { row, column, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "Qty");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_sap_blank_sold_to_still_renders() {
    let csv = sap_csv(&[(1.0, 10.0, 0.1), (2.0, 5.0, 0.2)]).replace(",1200,", ",,");
    let report = pipeline::generate(
        csv.as_bytes(),
        SchemaVariant::Sap,
        standard(),
        StyleConfig::default(),
    )
    .unwrap();
    assert_eq!(report.rows, 2);
}

#[test]
fn test_sap_blank_quantity_rejected() {
    let csv = "Status,Quote,Sold-to,Customer,Region,Description,Plant,Item,Material,Qty,Price,Currency,Estimated,Margin %\n\
               A,50001,1200,Acme,NA,Widget,P1,10,PN-1,,11.11,USD,10,10\n";
    let result = pipeline::generate(
        csv.as_bytes(),
        SchemaVariant::Sap,
        standard(),
        StyleConfig::default(),
    );
    assert!(matches!(result, Err(QuoteError::Parse { ref column, .. }) if column == "Qty"));
}

#[test]
fn test_named_csv_read_by_sap_schema_rejected() {
    let csv = named_csv(&[(1.0, 10.0, 0.1)]);
    let result = pipeline::generate(
        csv.as_bytes(),
        SchemaVariant::Sap,
        standard(),
        StyleConfig::default(),
    );
    assert!(matches!(result, Err(QuoteError::Schema(_))));
}

#[test]
fn test_bad_style_rejected_before_rendering() {
    assert!(matches!(
        StyleConfig::from_yaml_str("summary_fill: \"teal\"\n"),
        Err(QuoteError::Style(_))
    ));
    let style = StyleConfig {
        summary_fill: "teal".to_string(),
        ..StyleConfig::default()
    };
    let csv = named_csv(&[(1.0, 10.0, 0.1)]);
    let result = pipeline::generate(csv.as_bytes(), SchemaVariant::Named, standard(), style);
    assert!(matches!(result, Err(QuoteError::Style(_))));
}
