//! Report parameter validation
//!
//! Checks title, filename and the inflation inputs before anything is
//! generated. All problems are collected so the caller can report every
//! invalid field at once.

use crate::types::ReportKind;
use std::fmt;

/// Parameters as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    pub title: String,
    pub filename: String,
    pub periods: Option<String>,
    pub rate: Option<String>,
}

/// Compounding inputs for the inflation report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflation {
    pub periods: u32,
    pub rate: f64,
}

/// Validated parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    pub title: String,
    /// Always ends in `.xlsx`
    pub filename: String,
    pub report: ReportKind,
    /// Present exactly when `report` is `Inflation`
    pub inflation: Option<Inflation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub field: &'static str,
    pub message: String,
}

impl ParamError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every invalid field found in one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamErrors(pub Vec<ParamError>);

impl ParamErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ParamErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl RawParams {
    pub fn validate(&self, report: ReportKind) -> Result<ReportParams, ParamErrors> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(ParamError::new("title", "must not be empty"));
        }

        let filename = match validate_filename(&self.filename) {
            Ok(name) => name,
            Err(e) => {
                errors.push(e);
                String::new()
            }
        };

        let inflation = match report {
            ReportKind::Standard => None,
            ReportKind::Inflation => {
                let periods = parse_periods(self.periods.as_deref()).map_err(|e| errors.push(e));
                let rate = parse_rate(self.rate.as_deref()).map_err(|e| errors.push(e));
                match (periods, rate) {
                    (Ok(periods), Ok(rate)) => Some(Inflation { periods, rate }),
                    _ => None,
                }
            }
        };

        if !errors.is_empty() {
            return Err(ParamErrors(errors));
        }
        Ok(ReportParams {
            title: title.to_string(),
            filename,
            report,
            inflation,
        })
    }
}

fn validate_filename(raw: &str) -> Result<String, ParamError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ParamError::new("filename", "must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(ParamError::new(
            "filename",
            "must be a file name, not a path (use --dir for the output directory)",
        ));
    }
    if !name.to_ascii_lowercase().ends_with(".xlsx") {
        return Ok(format!("{}.xlsx", name));
    }
    let stem = &name[..name.len() - ".xlsx".len()];
    if stem.trim().is_empty() {
        return Err(ParamError::new("filename", "needs a name before .xlsx"));
    }
    Ok(name.to_string())
}

/// Whole number of compounding periods, zero allowed
pub fn parse_periods(raw: Option<&str>) -> Result<u32, ParamError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(ParamError::new("periods", "is required for the inflation report"));
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| ParamError::new("periods", format!("must be a whole number, got '{}'", raw)))?;
    u32::try_from(value)
        .map_err(|_| ParamError::new("periods", format!("must not be negative, got {}", value)))
}

/// Decimal rate strictly between 0 and 1, written with a decimal point
pub fn parse_rate(raw: Option<&str>) -> Result<f64, ParamError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(ParamError::new("rate", "is required for the inflation report"));
    }
    if !raw.contains('.') {
        return Err(ParamError::new(
            "rate",
            "must be a decimal (e.g. 0.04 for 4%), whole numbers are not allowed",
        ));
    }
    let value: f64 = raw.parse().map_err(|_| {
        ParamError::new(
            "rate",
            format!("must be a valid decimal number (e.g. 0.04 for 4%), got '{}'", raw),
        )
    })?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(ParamError::new("rate", "must be between 0 and 1 (exclusive)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, filename: &str, periods: Option<&str>, rate: Option<&str>) -> RawParams {
        RawParams {
            title: title.to_string(),
            filename: filename.to_string(),
            periods: periods.map(str::to_string),
            rate: rate.map(str::to_string),
        }
    }

    #[test]
    fn test_standard_ok_appends_extension() {
        let params = raw(" Q3 Bid ", "acme", None, None)
            .validate(ReportKind::Standard)
            .unwrap();
        assert_eq!(params.title, "Q3 Bid");
        assert_eq!(params.filename, "acme.xlsx");
        assert!(params.inflation.is_none());
    }

    #[test]
    fn test_existing_extension_kept() {
        let params = raw("t", "acme.XLSX", None, None)
            .validate(ReportKind::Standard)
            .unwrap();
        assert_eq!(params.filename, "acme.XLSX");
    }

    #[test]
    fn test_extension_without_stem_rejected() {
        for name in [".xlsx", " .XLSX", "  .xlsx"] {
            let errors = raw("t", name, None, None)
                .validate(ReportKind::Standard)
                .unwrap_err();
            assert_eq!(errors.fields(), vec!["filename"]);
        }
    }

    #[test]
    fn test_empty_title_and_filename_withheld() {
        let errors = raw("   ", "", None, None)
            .validate(ReportKind::Standard)
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["title", "filename"]);
    }

    #[test]
    fn test_path_in_filename_rejected() {
        let errors = raw("t", "../out", None, None)
            .validate(ReportKind::Standard)
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["filename"]);
    }

    #[test]
    fn test_inflation_ok() {
        let params = raw("t", "f", Some("3"), Some("0.04"))
            .validate(ReportKind::Inflation)
            .unwrap();
        assert_eq!(params.inflation, Some(Inflation { periods: 3, rate: 0.04 }));
    }

    #[test]
    fn test_rate_without_decimal_point_rejected() {
        let err = parse_rate(Some("5")).unwrap_err();
        assert!(err.message.contains("whole numbers are not allowed"));
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        for rate in ["1.5", "1.0", "0.0", "-0.5"] {
            let err = parse_rate(Some(rate)).unwrap_err();
            assert!(err.message.contains("between 0 and 1"), "{rate}");
        }
    }

    #[test]
    fn test_rate_garbage_rejected() {
        let err = parse_rate(Some("0.0.4")).unwrap_err();
        assert!(err.message.contains("valid decimal"));
    }

    #[test]
    fn test_periods_must_be_integer() {
        assert!(parse_periods(Some("abc")).is_err());
        assert!(parse_periods(Some("2.5")).is_err());
        assert!(parse_periods(Some("-1")).is_err());
        assert_eq!(parse_periods(Some(" 0 ")).unwrap(), 0);
        assert_eq!(parse_periods(Some("12")).unwrap(), 12);
    }

    #[test]
    fn test_inflation_reports_all_bad_fields() {
        let errors = raw("", "f", Some("abc"), Some("5"))
            .validate(ReportKind::Inflation)
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["title", "periods", "rate"]);
        assert!(errors.to_string().contains("periods: must be a whole number"));
    }

    #[test]
    fn test_inflation_requires_both_inputs() {
        let errors = raw("t", "f", None, None)
            .validate(ReportKind::Inflation)
            .unwrap_err();
        assert_eq!(errors.fields(), vec!["periods", "rate"]);
    }

    #[test]
    fn test_standard_ignores_inflation_inputs() {
        let params = raw("t", "f", Some("abc"), Some("5"))
            .validate(ReportKind::Standard)
            .unwrap();
        assert!(params.inflation.is_none());
    }
}
