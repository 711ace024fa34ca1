use crate::error::{QuoteError, QuoteResult};
use crate::excel::{column_index_to_letter, ExcelExporter, FormulaEmitter};
use crate::normalizer;
use crate::params::{ParamErrors, RawParams, ReportParams};
use crate::pipeline;
use crate::schema::SchemaVariant;
use crate::style::StyleConfig;
use crate::types::{QuoteTable, ReportKind};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments of the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: PathBuf,
    pub title: String,
    pub output: String,
    pub dir: PathBuf,
    pub schema: SchemaVariant,
    pub report: ReportKind,
    pub periods: Option<String>,
    pub rate: Option<String>,
    pub style: Option<PathBuf>,
    pub verbose: bool,
}

/// Turn collected parameter problems into one error, printing each
fn reject(errors: ParamErrors) -> QuoteError {
    eprintln!("{}", "❌ Report not generated:".bold().red());
    for e in &errors.0 {
        eprintln!("   {} {}", e.field.bright_red().bold(), e.message);
    }
    QuoteError::Validation {
        field: errors.fields().join(", "),
        message: "see messages above".to_string(),
    }
}

fn load_style(style: Option<&Path>) -> QuoteResult<StyleConfig> {
    match style {
        Some(path) => StyleConfig::load(path),
        None => Ok(StyleConfig::default()),
    }
}

/// Execute the generate command
pub fn generate(args: GenerateArgs) -> QuoteResult<PathBuf> {
    println!("{}", "🔥 Quote Forge - Pricing Workbook".bold().green());
    println!("   Input:  {}", args.input.display());
    println!("   Schema: {}   Report: {}\n", args.schema, args.report);

    let raw = RawParams {
        title: args.title.clone(),
        filename: args.output.clone(),
        periods: args.periods.clone(),
        rate: args.rate.clone(),
    };
    let params = raw.validate(args.report).map_err(reject)?;
    if args.report == ReportKind::Standard && (args.periods.is_some() || args.rate.is_some()) {
        println!(
            "{}",
            "⚠️  --periods/--rate are ignored for the standard report".yellow()
        );
    }

    let style = load_style(args.style.as_deref())?;
    let csv = fs::read(&args.input)?;

    if args.verbose {
        println!("{}", "📖 Normalizing quote lines...".cyan());
    }
    let report = pipeline::generate(&csv, args.schema, params, style)?;

    let path = args.dir.join(&report.filename);
    fs::write(&path, &report.bytes)?;

    println!("{}", "✅ Workbook written".bold().green());
    println!("   Rows:  {}", report.rows);
    println!("   Excel: {}\n", path.display());
    Ok(path)
}

/// Execute the preview command
pub fn preview(input: PathBuf, schema: SchemaVariant, rows: usize) -> QuoteResult<()> {
    let table = normalizer::normalize_file(&input, schema.spec())?;

    println!("{}", "🔍 Quote Forge - Data Preview".bold().green());
    println!("   File: {}", input.display());
    println!(
        "   {} rows, {} columns\n",
        table.row_count(),
        table.columns.len()
    );
    print!("{}", render_preview(&table, rows));
    Ok(())
}

/// Aligned text table of the first `rows` rows
fn render_preview(table: &QuoteTable, rows: usize) -> String {
    let shown = rows.min(table.row_count());
    let widths: Vec<usize> = table
        .columns
        .iter()
        .map(|c| {
            (0..shown)
                .map(|i| c.values.display_at(i).chars().count())
                .chain(std::iter::once(c.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c.name, w = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');
    for i in 0..shown {
        let line: Vec<String> = table
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.values.display_at(i), w = *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Execute the layout command: show where every column and formula goes
pub fn layout(input: PathBuf, schema: SchemaVariant, report: ReportKind) -> QuoteResult<()> {
    let spec = schema.spec();
    let table = normalizer::normalize_file(&input, spec)?;
    let params = ReportParams {
        title: String::new(),
        filename: String::new(),
        report,
        inflation: match report {
            ReportKind::Standard => None,
            // Placeholder values; only addresses are printed
            ReportKind::Inflation => Some(crate::params::Inflation {
                periods: 0,
                rate: 0.0,
            }),
        },
    };
    let exporter = ExcelExporter::new(table, spec, params, StyleConfig::default())?;
    print!("{}", render_layout(&exporter)?);
    Ok(())
}

fn render_layout(exporter: &ExcelExporter) -> QuoteResult<String> {
    let layout = exporter.layout();
    let emitter = FormulaEmitter::new(layout)?;
    let mut out = String::new();

    out.push_str(&format!(
        "Sheet layout ({} report, header on row {}, data rows {}-{})\n",
        layout.report,
        layout.header_row + 1,
        layout.first_data_row() + 1,
        layout.last_data_row() + 1
    ));
    for column in &layout.columns {
        let origin = if column.derived.is_some() { "formula" } else { "source" };
        out.push_str(&format!(
            "  {:<4} {:<22} {}\n",
            column_index_to_letter(column.col),
            column.name,
            origin
        ));
    }

    if let Some(params) = layout.params {
        out.push_str(&format!(
            "Inflation periods: {}   Rate: {}\n",
            params.periods, params.rate
        ));
    }

    out.push_str(&format!("First row formulas (row {}):\n", layout.first_data_row() + 1));
    for cell in emitter.row_formulas(layout.first_data_row())? {
        out.push_str(&format!("  {:<6} {}\n", cell.cell.to_string(), cell.formula));
    }

    out.push_str("Aggregates:\n");
    for aggregate in emitter.aggregates()? {
        out.push_str(&format!(
            "  {:<6} {:<18} {}\n",
            aggregate.cell.to_string(),
            aggregate.label,
            aggregate.formula
        ));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
