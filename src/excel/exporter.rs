//! Workbook renderer
//!
//! Writes the pricing sheet (title, data table, derived headers, per-row
//! formulas, parameter and aggregate band) and the blank summary sheet. No
//! values are computed here; all formulas come from [`FormulaEmitter`].

use super::column::CellRef;
use super::formulas::FormulaEmitter;
use super::layout::ColumnLayout;
use crate::error::{QuoteError, QuoteResult};
use crate::params::ReportParams;
use crate::schema::SchemaSpec;
use crate::style::StyleConfig;
use crate::types::{ColumnKind, ColumnValue, QuoteTable, ReportKind};
use rust_xlsxwriter::{Format, FormatBorder, Formula, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{debug, info};

const SUMMARY_SHEET: &str = "summary";

fn export_err(action: &'static str) -> impl Fn(XlsxError) -> QuoteError {
    move |e| QuoteError::Export(format!("Failed to {}: {}", action, e))
}

/// Cell formats shared by both sheets
struct Formats {
    /// Bold, band fill, thin border: title and band labels
    band_label: Format,
    band_value: Format,
    band_currency: Format,
    band_percent: Format,
    header: Format,
    currency: Format,
    percent: Format,
    summary_label: Format,
    summary_first: Format,
}

impl Formats {
    fn new(style: &StyleConfig) -> QuoteResult<Self> {
        let band = style.band_color()?;
        let band_value = Format::new()
            .set_background_color(band)
            .set_border(FormatBorder::Thin);
        Ok(Self {
            band_label: band_value.clone().set_bold(),
            band_currency: band_value.clone().set_num_format(&style.currency_format),
            band_percent: band_value.clone().set_num_format(&style.percent_format),
            band_value,
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
            currency: Format::new().set_num_format(&style.currency_format),
            percent: Format::new().set_num_format(&style.percent_format),
            summary_label: Format::new().set_border(FormatBorder::Medium),
            summary_first: Format::new()
                .set_bold()
                .set_background_color(style.summary_color()?)
                .set_border(FormatBorder::Medium),
        })
    }

    /// Number format for a data or formula cell, `None` for plain cells
    fn for_kind(&self, kind: ColumnKind) -> Option<&Format> {
        match kind {
            ColumnKind::Currency => Some(&self.currency),
            ColumnKind::Percent => Some(&self.percent),
            ColumnKind::Text | ColumnKind::Number => None,
        }
    }

    fn band_for_kind(&self, kind: ColumnKind) -> &Format {
        match kind {
            ColumnKind::Percent => &self.band_percent,
            _ => &self.band_currency,
        }
    }
}

/// Renders one pricing report
pub struct ExcelExporter {
    table: QuoteTable,
    spec: &'static SchemaSpec,
    params: ReportParams,
    style: StyleConfig,
    layout: ColumnLayout,
}

impl ExcelExporter {
    /// Plan the layout for `table`; fails before anything is written
    pub fn new(
        table: QuoteTable,
        spec: &'static SchemaSpec,
        params: ReportParams,
        style: StyleConfig,
    ) -> QuoteResult<Self> {
        if params.report == ReportKind::Inflation && params.inflation.is_none() {
            return Err(QuoteError::Validation {
                field: "inflation".to_string(),
                message: "periods and rate are required for the inflation report".to_string(),
            });
        }
        let layout = ColumnLayout::plan(&table, spec.shape(params.report))?;
        Ok(Self {
            table,
            spec,
            params,
            style,
            layout,
        })
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Render the workbook fully in memory
    pub fn to_bytes(&self) -> QuoteResult<Vec<u8>> {
        let mut workbook = self.build()?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(export_err("serialize workbook"))?;
        info!(bytes = bytes.len(), report = %self.params.report, "rendered workbook");
        Ok(bytes)
    }

    /// Render and save to `output_path`
    pub fn export(&self, output_path: &Path) -> QuoteResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn build(&self) -> QuoteResult<Workbook> {
        let formats = Formats::new(&self.style)?;
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(self.spec.data_sheet)
            .map_err(export_err("set worksheet name"))?;
        self.write_pricing_sheet(worksheet, &formats)?;

        let summary = workbook.add_worksheet();
        summary
            .set_name(SUMMARY_SHEET)
            .map_err(export_err("set worksheet name"))?;
        self.write_summary_sheet(summary, &formats)?;

        Ok(workbook)
    }

    fn write_pricing_sheet(&self, worksheet: &mut Worksheet, formats: &Formats) -> QuoteResult<()> {
        if self.style.hide_gridlines {
            worksheet.set_screen_gridlines(false);
        }

        worksheet
            .write_string_with_format(0, 0, &self.params.title, &formats.band_label)
            .map_err(export_err("write title"))?;

        self.write_table(worksheet, formats)?;
        self.write_formulas(worksheet, formats)?;
        self.write_band(worksheet, formats)?;
        Ok(())
    }

    /// Headers for every placed column, then source values
    fn write_table(&self, worksheet: &mut Worksheet, formats: &Formats) -> QuoteResult<()> {
        let header_row = self.layout.header_row;
        for column in &self.layout.columns {
            worksheet
                .write_string_with_format(header_row, column.col, &column.name, &formats.header)
                .map_err(export_err("write header"))?;
        }

        for (column, placed) in self.table.columns.iter().zip(self.layout.source_columns()) {
            for (i, row) in self.layout.data_rows().enumerate() {
                self.write_cell_value(worksheet, row, placed.col, &column.values, i, column.kind, formats)?;
            }
        }
        debug!(rows = self.layout.row_count, "wrote source table");
        Ok(())
    }

    /// Write a single cell value based on column type
    #[allow(clippy::too_many_arguments)]
    fn write_cell_value(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        values: &ColumnValue,
        index: usize,
        kind: ColumnKind,
        formats: &Formats,
    ) -> QuoteResult<()> {
        let number = match values {
            ColumnValue::Number(nums) => nums.get(index).copied(),
            // Blank identifiers leave the cell empty
            ColumnValue::Sparse(nums) => nums.get(index).copied().flatten(),
            ColumnValue::Text(texts) => {
                if let Some(value) = texts.get(index) {
                    worksheet
                        .write_string(row, col, value)
                        .map_err(export_err("write text"))?;
                }
                None
            }
        };
        if let Some(value) = number {
            match formats.for_kind(kind) {
                Some(format) => worksheet.write_number_with_format(row, col, value, format),
                None => worksheet.write_number(row, col, value),
            }
            .map_err(export_err("write number"))?;
        }
        Ok(())
    }

    fn write_formulas(&self, worksheet: &mut Worksheet, formats: &Formats) -> QuoteResult<()> {
        let emitter = FormulaEmitter::new(&self.layout)?;
        for cell in emitter.all_rows()? {
            write_formula(worksheet, cell.cell, &cell.formula, formats.for_kind(cell.kind))?;
        }
        Ok(())
    }

    /// Parameter cells (inflation only) and labelled aggregates
    fn write_band(&self, worksheet: &mut Worksheet, formats: &Formats) -> QuoteResult<()> {
        if let (Some(cells), Some(inflation)) = (self.layout.params, self.params.inflation) {
            write_label(worksheet, cells.periods_label, "Inflation Periods", formats)?;
            worksheet
                .write_number_with_format(
                    cells.periods.row,
                    cells.periods.col,
                    f64::from(inflation.periods),
                    &formats.band_value,
                )
                .map_err(export_err("write periods"))?;
            write_label(worksheet, cells.rate_label, "Rate", formats)?;
            worksheet
                .write_number_with_format(
                    cells.rate.row,
                    cells.rate.col,
                    inflation.rate,
                    &formats.band_percent,
                )
                .map_err(export_err("write rate"))?;
        }

        let emitter = FormulaEmitter::new(&self.layout)?;
        for aggregate in emitter.aggregates()? {
            write_label(worksheet, aggregate.label_cell, aggregate.label, formats)?;
            write_formula(
                worksheet,
                aggregate.cell,
                &aggregate.formula,
                Some(formats.band_for_kind(aggregate.kind)),
            )?;
        }
        Ok(())
    }

    /// Labels in column A, entry cells in column B
    fn write_summary_sheet(&self, worksheet: &mut Worksheet, formats: &Formats) -> QuoteResult<()> {
        for (i, label) in self.spec.summary_labels.iter().enumerate() {
            let row = i as u32;
            worksheet
                .write_string_with_format(row, 0, *label, &formats.summary_label)
                .map_err(export_err("write summary label"))?;
            let entry = if row == 0 {
                &formats.summary_first
            } else {
                &formats.summary_label
            };
            worksheet
                .write_blank(row, 1, entry)
                .map_err(export_err("write summary cell"))?;
        }
        Ok(())
    }
}

fn write_label(
    worksheet: &mut Worksheet,
    cell: CellRef,
    label: &str,
    formats: &Formats,
) -> QuoteResult<()> {
    worksheet
        .write_string_with_format(cell.row, cell.col, label, &formats.band_label)
        .map_err(export_err("write label"))?;
    Ok(())
}

fn write_formula(
    worksheet: &mut Worksheet,
    cell: CellRef,
    formula: &str,
    format: Option<&Format>,
) -> QuoteResult<()> {
    let formula = Formula::new(formula);
    match format {
        Some(format) => worksheet.write_formula_with_format(cell.row, cell.col, formula, format),
        None => worksheet.write_formula(cell.row, cell.col, formula),
    }
    .map_err(export_err("write formula"))?;
    Ok(())
}
