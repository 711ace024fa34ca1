//! Data normalizer: raw quote CSV → canonical [`QuoteTable`]
//!
//! Columns are located according to the selected [`SchemaSpec`], numeric
//! fields are cleaned and coerced, and the derived `Margin` (fraction) and
//! `Cost` (unit cost) columns are computed. Any malformed numeric cell fails
//! the whole run; only identifier columns may be blank.

use crate::error::{QuoteError, QuoteResult};
use crate::schema::{Coercion, CostRule, FieldRule, SchemaSpec, Source, COST, MARGIN, PRICE, QTY};
use crate::types::{Column, ColumnKind, ColumnValue, QuoteTable};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Read and normalize a CSV file
pub fn normalize_file(path: &Path, spec: &SchemaSpec) -> QuoteResult<QuoteTable> {
    let bytes = std::fs::read(path)?;
    normalize(&bytes, spec)
}

/// Normalize CSV bytes according to `spec`
pub fn normalize(input: &[u8], spec: &SchemaSpec) -> QuoteResult<QuoteTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let indices = resolve_fields(&headers, spec)?;
    debug!(variant = %spec.variant, columns = headers.len(), "resolved input columns");

    let cleaner = Cleaner::new()?;
    let mut raw: Vec<Column> = spec
        .fields
        .iter()
        .map(|f| {
            let values = match f.coercion {
                Coercion::Text => ColumnValue::Text(Vec::new()),
                Coercion::OptionalNumber => ColumnValue::Sparse(Vec::new()),
                _ => ColumnValue::Number(Vec::new()),
            };
            Column::new(f.name, f.kind, values)
        })
        .collect();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        for ((rule, &src), column) in spec.fields.iter().zip(&indices).zip(raw.iter_mut()) {
            let cell = record.get(src).unwrap_or("");
            match &mut column.values {
                ColumnValue::Text(v) => v.push(cell.to_string()),
                ColumnValue::Number(v) => v.push(cleaner.coerce(cell, rule, row_idx + 1)?),
                ColumnValue::Sparse(v) => {
                    v.push(cleaner.coerce_optional(cell, rule, row_idx + 1)?)
                }
            }
        }
    }

    let row_count = raw.first().map_or(0, |c| c.len());
    if row_count == 0 {
        return Err(QuoteError::Schema("input contains no data rows".to_string()));
    }

    let mut by_name: HashMap<&str, Column> =
        spec.fields.iter().map(|f| f.name).zip(raw).collect();

    let margin = derive_margin(&by_name, spec)?;
    let cost = derive_cost(&by_name, &margin, spec)?;
    by_name.insert(MARGIN, Column::number(MARGIN, ColumnKind::Percent, margin));
    by_name.insert(COST, Column::number(COST, ColumnKind::Currency, cost));

    let mut table = QuoteTable::new();
    for name in spec.canonical {
        let column = by_name
            .remove(name)
            .ok_or_else(|| QuoteError::Schema(format!("no rule produces column '{}'", name)))?;
        table.add_column(column);
    }
    table.validate_lengths().map_err(QuoteError::Schema)?;

    info!(variant = %spec.variant, rows = row_count, "normalized quote lines");
    Ok(table)
}

/// Map each field rule to a raw column index
fn resolve_fields(headers: &[String], spec: &SchemaSpec) -> QuoteResult<Vec<usize>> {
    let min = spec.min_columns();
    if headers.len() < min {
        return Err(QuoteError::Schema(format!(
            "{} input needs at least {} columns, found {}",
            spec.variant,
            min,
            headers.len()
        )));
    }

    let mut missing = Vec::new();
    let indices: Vec<usize> = spec
        .fields
        .iter()
        .map(|f| match f.source {
            Source::Position(p) => p,
            Source::Header(name) => headers.iter().position(|h| h == name).unwrap_or_else(|| {
                missing.push(name);
                usize::MAX
            }),
        })
        .collect();

    if !missing.is_empty() {
        return Err(QuoteError::Schema(format!(
            "{} input is missing columns: {}",
            spec.variant,
            missing.join(", ")
        )));
    }
    Ok(indices)
}

fn numbers<'a>(by_name: &'a HashMap<&str, Column>, name: &str) -> QuoteResult<&'a [f64]> {
    match by_name.get(name).map(|c| &c.values) {
        Some(ColumnValue::Number(v)) => Ok(v),
        _ => Err(QuoteError::Schema(format!("numeric column '{}' not read", name))),
    }
}

/// Margin as a fraction of the percentage column
fn derive_margin(by_name: &HashMap<&str, Column>, spec: &SchemaSpec) -> QuoteResult<Vec<f64>> {
    Ok(numbers(by_name, spec.margin_percent)?
        .iter()
        .map(|m| m / 100.0)
        .collect())
}

fn derive_cost(
    by_name: &HashMap<&str, Column>,
    margin: &[f64],
    spec: &SchemaSpec,
) -> QuoteResult<Vec<f64>> {
    match spec.cost_rule {
        CostRule::PerUnit { estimated } => {
            let qty = numbers(by_name, QTY)?;
            numbers(by_name, estimated)?
                .iter()
                .zip(qty)
                .enumerate()
                .map(|(i, (est, q))| {
                    if *q == 0.0 {
                        Err(QuoteError::Parse {
                            row: i + 1,
                            column: QTY.to_string(),
                            value: "0".to_string(),
                        })
                    } else {
                        Ok(est / q)
                    }
                })
                .collect()
        }
        CostRule::FromMargin => Ok(numbers(by_name, PRICE)?
            .iter()
            .zip(margin)
            .map(|(p, m)| p * (1.0 - m))
            .collect()),
    }
}

/// Strips currency symbols and thousands separators before parsing
struct Cleaner {
    money: Regex,
    thousands: Regex,
}

impl Cleaner {
    fn new() -> QuoteResult<Self> {
        let money = Regex::new(r"[$,]")
            .map_err(|e| QuoteError::Schema(format!("Regex error: {}", e)))?;
        let thousands =
            Regex::new(",").map_err(|e| QuoteError::Schema(format!("Regex error: {}", e)))?;
        Ok(Self { money, thousands })
    }

    fn coerce(&self, raw: &str, rule: &FieldRule, row: usize) -> QuoteResult<f64> {
        let cleaned = match rule.coercion {
            Coercion::Money => self.money.replace_all(raw, ""),
            Coercion::Count => self.thousands.replace_all(raw, ""),
            Coercion::Number | Coercion::OptionalNumber | Coercion::Text => raw.into(),
        };
        cleaned
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| QuoteError::Parse {
                row,
                column: rule.name.to_string(),
                value: raw.to_string(),
            })
    }

    /// Like [`Cleaner::coerce`], but a blank cell is `None`
    fn coerce_optional(&self, raw: &str, rule: &FieldRule, row: usize) -> QuoteResult<Option<f64>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        self.coerce(raw, rule, row).map(Some)
    }
}
