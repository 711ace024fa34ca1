//! Quote Forge - quote-line CSV to Excel pricing workbook
//!
//! Normalizes a quote export (two supported schemas), plans the column
//! layout of a pricing report, emits cost/price/margin formulas that
//! reference each other by computed cell address, and renders a two-sheet
//! `.xlsx` workbook (pricing sheet + blank summary sheet).
//!
//! # Example
//!
//! ```no_run
//! use quote_forge::params::RawParams;
//! use quote_forge::pipeline::generate;
//! use quote_forge::schema::SchemaVariant;
//! use quote_forge::style::StyleConfig;
//! use quote_forge::types::ReportKind;
//!
//! let csv = std::fs::read("quotes.csv")?;
//! let raw = RawParams {
//!     title: "Acme renewal".to_string(),
//!     filename: "acme".to_string(),
//!     periods: Some("3".to_string()),
//!     rate: Some("0.04".to_string()),
//! };
//! let params = raw.validate(ReportKind::Inflation).expect("valid parameters");
//! let report = generate(&csv, SchemaVariant::Named, params, StyleConfig::default())?;
//! std::fs::write(&report.filename, &report.bytes)?;
//! # Ok::<(), quote_forge::error::QuoteError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod normalizer;
pub mod params;
pub mod pipeline;
pub mod schema;
pub mod style;
pub mod types;

// Re-export commonly used types
pub use error::{QuoteError, QuoteResult};
pub use schema::SchemaVariant;
pub use types::{Column, ColumnKind, ColumnValue, QuoteTable, ReportKind};
