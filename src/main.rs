use clap::{Parser, Subcommand};
use quote_forge::cli::{self, GenerateArgs};
use quote_forge::schema::SchemaVariant;
use quote_forge::types::ReportKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quote-forge")]
#[command(about = "Quote-line CSV to Excel pricing workbook")]
#[command(long_about = "Quote Forge - pricing workbooks from quote exports

Reads a quote-line CSV (SAP positional export or named-header export),
cleans the currency and percent columns, and writes an .xlsx workbook
whose cost, price and margin columns are live Excel formulas.

REPORTS:
  standard   - Total Cost / Total Price per line, Ext Cost, Ext Price, GM
  inflation  - compounded future cost/price columns driven by the
               Periods and Rate cells in the title band (the SAP
               schema also keeps the Total columns and Today's GM)

COMMANDS:
  generate   - Write the workbook
  preview    - Show the normalized table
  layout     - Show where every column and formula lands

EXAMPLES:
  quote-forge generate quotes.csv -t \"Acme renewal\" -o acme
  quote-forge generate sap.csv -s sap -r inflation --periods 3 --rate 0.04 -t Q3 -o q3
  quote-forge layout quotes.csv -r inflation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate a pricing workbook.

The workbook has a pricing sheet (title, parameters, aggregates, header,
data rows and formula columns) and a blank summary sheet.

Nothing is written unless the whole run succeeds: invalid parameters,
a schema mismatch or an unreadable number all abort before the file
is created. Every invalid parameter is reported at once.

STYLE:
  --style points at a YAML file overriding fills, number formats and
  gridlines, for example:

    band_fill: \"#CCECFF\"
    summary_fill: \"#DDD9C4\"
    currency_format: \"$#,##0.00\"
    percent_format: \"0%\"
    hide_gridlines: true")]
    /// Generate the pricing workbook
    Generate {
        /// Quote-line CSV file
        input: PathBuf,

        /// Title written at the top of the pricing sheet
        #[arg(short, long)]
        title: String,

        /// Output file name (.xlsx is appended when missing)
        #[arg(short, long)]
        output: String,

        /// Directory the workbook is written to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Input schema
        #[arg(short, long, value_enum, env = "QUOTE_FORGE_SCHEMA", default_value = "named")]
        schema: SchemaVariant,

        /// Report kind
        #[arg(short, long, value_enum, default_value = "standard")]
        report: ReportKind,

        /// Compounding periods (inflation report)
        #[arg(long)]
        periods: Option<String>,

        /// Per-period rate as a decimal, e.g. 0.04 (inflation report)
        #[arg(long)]
        rate: Option<String>,

        /// YAML style overrides
        #[arg(long, env = "QUOTE_FORGE_STYLE")]
        style: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the normalized quote table
    Preview {
        /// Quote-line CSV file
        input: PathBuf,

        /// Input schema
        #[arg(short, long, value_enum, env = "QUOTE_FORGE_SCHEMA", default_value = "named")]
        schema: SchemaVariant,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 10)]
        rows: usize,
    },

    /// Show column letters, first-row formulas and aggregate cells
    Layout {
        /// Quote-line CSV file
        input: PathBuf,

        /// Input schema
        #[arg(short, long, value_enum, env = "QUOTE_FORGE_SCHEMA", default_value = "named")]
        schema: SchemaVariant,

        /// Report kind
        #[arg(short, long, value_enum, default_value = "standard")]
        report: ReportKind,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "quote_forge=debug" } else { "quote_forge=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            title,
            output,
            dir,
            schema,
            report,
            periods,
            rate,
            style,
            verbose,
        } => {
            init_tracing(verbose);
            cli::generate(GenerateArgs {
                input,
                title,
                output,
                dir,
                schema,
                report,
                periods,
                rate,
                style,
                verbose,
            })?;
        }

        Commands::Preview {
            input,
            schema,
            rows,
        } => {
            init_tracing(false);
            cli::preview(input, schema, rows)?;
        }

        Commands::Layout {
            input,
            schema,
            report,
        } => {
            init_tracing(false);
            cli::layout(input, schema, report)?;
        }
    }
    Ok(())
}
