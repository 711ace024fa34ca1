//! Cosmetic configuration for the generated workbook
//!
//! Every field is optional in the YAML file; missing fields fall back to the
//! house style (light blue band, tan summary header, `$#,##0.00` and `0%`).

use crate::error::{QuoteError, QuoteResult};
use rust_xlsxwriter::Color;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Fill for the title cell, parameter and aggregate cells
    pub band_fill: String,
    /// Fill for the first entry cell on the summary sheet
    pub summary_fill: String,
    pub currency_format: String,
    pub percent_format: String,
    pub hide_gridlines: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            band_fill: "#CCECFF".to_string(),
            summary_fill: "#DDD9C4".to_string(),
            currency_format: "$#,##0.00".to_string(),
            percent_format: "0%".to_string(),
            hide_gridlines: true,
        }
    }
}

impl StyleConfig {
    pub fn from_yaml_str(yaml: &str) -> QuoteResult<Self> {
        let style: StyleConfig = serde_yaml::from_str(yaml)?;
        style.band_color()?;
        style.summary_color()?;
        Ok(style)
    }

    pub fn load(path: &Path) -> QuoteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn band_color(&self) -> QuoteResult<Color> {
        parse_hex_color("band_fill", &self.band_fill)
    }

    pub fn summary_color(&self) -> QuoteResult<Color> {
        parse_hex_color("summary_fill", &self.summary_fill)
    }
}

/// Parse `#RRGGBB` into a worksheet color
fn parse_hex_color(field: &str, value: &str) -> QuoteResult<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(QuoteError::Style(format!(
            "{} must be #RRGGBB, got '{}'",
            field, value
        )));
    }
    u32::from_str_radix(hex, 16)
        .map(Color::RGB)
        .map_err(|_| QuoteError::Style(format!("{} must be #RRGGBB, got '{}'", field, value)))
}
