//! One report generation, end to end
//!
//! CSV bytes → normalized table → layout → formulas → workbook bytes. The run
//! is all-or-nothing: any error aborts before bytes are returned.

use crate::error::QuoteResult;
use crate::excel::ExcelExporter;
use crate::normalizer;
use crate::params::ReportParams;
use crate::schema::SchemaVariant;
use crate::style::StyleConfig;
use tracing::info;

/// A rendered report
#[derive(Debug)]
pub struct Report {
    pub filename: String,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

/// Normalize `csv` with the given schema and render the requested report
pub fn generate(
    csv: &[u8],
    variant: SchemaVariant,
    params: ReportParams,
    style: StyleConfig,
) -> QuoteResult<Report> {
    let spec = variant.spec();
    let table = normalizer::normalize(csv, spec)?;
    let rows = table.row_count();
    let filename = params.filename.clone();

    let exporter = ExcelExporter::new(table, spec, params, style)?;
    let bytes = exporter.to_bytes()?;
    info!(%variant, rows, file = %filename, "generated report");

    Ok(Report {
        filename,
        rows,
        bytes,
    })
}
