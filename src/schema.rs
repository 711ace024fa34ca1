//! Input schema descriptors
//!
//! The two supported CSV exports differ only in how columns are located and
//! cleaned. Everything downstream (layout, formulas, rendering) is driven by
//! the [`SchemaSpec`] returned here, so the two pipelines share one code path.

use crate::excel::layout::{Aggregate, Derived, ReportShape};
use crate::types::{ColumnKind, ReportKind};
use std::fmt;

/// Canonical column names shared by both schemas
pub const QTY: &str = "Qty";
pub const PRICE: &str = "Price";
pub const COST: &str = "Cost";
pub const MARGIN: &str = "Margin";
pub const EXTENSION: &str = "Extension";

/// Which CSV export the input comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaVariant {
    /// ERP quote export, columns located by position
    Sap,
    /// Quote tracker export, columns located by header name
    Named,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Sap => write!(f, "sap"),
            SchemaVariant::Named => write!(f, "named"),
        }
    }
}

/// Where a raw field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Zero-based position in the raw record
    Position(usize),
    /// Exact header name
    Header(&'static str),
}

/// How raw text becomes a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Number,
    /// Strip `$` and `,` before parsing
    Money,
    /// Strip `,` before parsing
    Count,
    /// Plain number for identifiers; a blank cell stays blank
    OptionalNumber,
}

/// One raw field read from the CSV
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub source: Source,
    pub coercion: Coercion,
    pub kind: ColumnKind,
}

const fn field(
    name: &'static str,
    source: Source,
    coercion: Coercion,
    kind: ColumnKind,
) -> FieldRule {
    FieldRule {
        name,
        source,
        coercion,
        kind,
    }
}

/// How the unit Cost column is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostRule {
    /// `estimated_total / qty`
    PerUnit { estimated: &'static str },
    /// `price * (1 - margin)`
    FromMargin,
}

/// Everything the pipeline needs to know about an input schema
#[derive(Debug)]
pub struct SchemaSpec {
    pub variant: SchemaVariant,
    /// Raw fields to read, in reading order
    pub fields: &'static [FieldRule],
    /// Raw field holding the margin as a percentage (0-100)
    pub margin_percent: &'static str,
    pub cost_rule: CostRule,
    /// Final column order of the normalized table
    pub canonical: &'static [&'static str],
    /// Whether `Extension` is a source column to be rewritten as `Price * Qty`
    pub has_extension: bool,
    pub data_sheet: &'static str,
    pub summary_labels: &'static [&'static str],
    pub standard: ReportShape,
    pub inflation: ReportShape,
}

impl SchemaSpec {
    pub fn shape(&self, report: ReportKind) -> &ReportShape {
        match report {
            ReportKind::Standard => &self.standard,
            ReportKind::Inflation => &self.inflation,
        }
    }

    /// Minimum raw column count implied by positional fields
    pub fn min_columns(&self) -> usize {
        self.fields
            .iter()
            .filter_map(|f| match f.source {
                Source::Position(p) => Some(p + 1),
                Source::Header(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

const STANDARD: ReportShape = ReportShape {
    report: ReportKind::Standard,
    derived: &[Derived::TotalCost, Derived::TotalPrice],
    aggregates: &[
        (Aggregate::ExtCost, "Ext Cost"),
        (Aggregate::ExtPrice, "Ext Price"),
        (Aggregate::Gm, "GM"),
    ],
};

// Keeps the Total columns so today's extended cost can be subtotalled
const SAP_INFLATION: ReportShape = ReportShape {
    report: ReportKind::Inflation,
    derived: &[
        Derived::TotalCost,
        Derived::TotalPrice,
        Derived::FutureCost,
        Derived::FuturePrice,
        Derived::CostExt,
        Derived::PriceExt,
        Derived::TodaysMargin,
    ],
    aggregates: &[
        (Aggregate::TodaysCostExt, "Today's Cost Ext"),
        (Aggregate::ExtCost, "Future Cost Ext"),
        (Aggregate::ExtPrice, "Future Price Ext"),
        (Aggregate::Gm, "GM"),
        (Aggregate::TodaysGm, "Today's GM"),
    ],
};

const NAMED_INFLATION: ReportShape = ReportShape {
    report: ReportKind::Inflation,
    derived: &[
        Derived::FutureCost,
        Derived::FuturePrice,
        Derived::CostExt,
        Derived::PriceExt,
        Derived::TodaysMargin,
    ],
    aggregates: &[
        (Aggregate::ExtCost, "Ext Cost"),
        (Aggregate::ExtPrice, "Ext Price"),
        (Aggregate::Gm, "GM"),
    ],
};

// Raw positions 0, 4, 6 and 11 of the ERP export are unused.
static SAP_FIELDS: [FieldRule; 10] = [
    field("Quote", Source::Position(1), Coercion::OptionalNumber, ColumnKind::Number),
    field("Sold-to", Source::Position(2), Coercion::OptionalNumber, ColumnKind::Number),
    field("Customer", Source::Position(3), Coercion::Text, ColumnKind::Text),
    field("Material Description", Source::Position(5), Coercion::Text, ColumnKind::Text),
    field("Item", Source::Position(7), Coercion::OptionalNumber, ColumnKind::Number),
    field("Part Number", Source::Position(8), Coercion::Text, ColumnKind::Text),
    field(QTY, Source::Position(9), Coercion::Number, ColumnKind::Number),
    field(PRICE, Source::Position(10), Coercion::Number, ColumnKind::Currency),
    field("Estimated", Source::Position(12), Coercion::Number, ColumnKind::Currency),
    field("Margin %", Source::Position(13), Coercion::Number, ColumnKind::Number),
];

static NAMED_FIELDS: [FieldRule; 11] = [
    field("Quote#", Source::Header("Quote#"), Coercion::Text, ColumnKind::Text),
    field("QuoteDate", Source::Header("QuoteDate"), Coercion::Text, ColumnKind::Text),
    field("Customer", Source::Header("Customer"), Coercion::Text, ColumnKind::Text),
    field("PartNumber", Source::Header("PartNumber"), Coercion::Text, ColumnKind::Text),
    field(QTY, Source::Header("Qty"), Coercion::Count, ColumnKind::Number),
    field(PRICE, Source::Header("Price"), Coercion::Money, ColumnKind::Currency),
    field(EXTENSION, Source::Header("Extension"), Coercion::Money, ColumnKind::Currency),
    field("Margin%", Source::Header("Margin%"), Coercion::Number, ColumnKind::Number),
    field("MatlCode", Source::Header("MatlCode"), Coercion::Text, ColumnKind::Text),
    field("V", Source::Header("V"), Coercion::Text, ColumnKind::Text),
    field("LTA Flag", Source::Header("LTA Flag"), Coercion::Text, ColumnKind::Text),
];

static SAP_SPEC: SchemaSpec = SchemaSpec {
    variant: SchemaVariant::Sap,
    fields: &SAP_FIELDS,
    margin_percent: "Margin %",
    cost_rule: CostRule::PerUnit {
        estimated: "Estimated",
    },
    canonical: &[
        "Quote",
        "Sold-to",
        "Customer",
        "Material Description",
        "Item",
        "Part Number",
        QTY,
        PRICE,
        COST,
        MARGIN,
    ],
    has_extension: false,
    data_sheet: "pricing",
    summary_labels: &[
        "Customer Name",
        "Item Types",
        "Bid Type: (AdHoc / LTA/ Renewal)",
        "Total Lines (Individual P/Ns)",
        "Value",
        "Gross Margin",
        "Price Protection",
        "Quote IDs",
    ],
    standard: STANDARD,
    inflation: SAP_INFLATION,
};

static NAMED_SPEC: SchemaSpec = SchemaSpec {
    variant: SchemaVariant::Named,
    fields: &NAMED_FIELDS,
    margin_percent: "Margin%",
    cost_rule: CostRule::FromMargin,
    canonical: &[
        "Quote#",
        "QuoteDate",
        "Customer",
        "PartNumber",
        QTY,
        PRICE,
        EXTENSION,
        "MatlCode",
        "V",
        "LTA Flag",
        MARGIN,
        COST,
    ],
    has_extension: true,
    data_sheet: "Sheet1",
    summary_labels: &[
        "Customer Name",
        "Item Types",
        "Bid Type: (AdHoc / LTA/ Renewal)",
        "Existing or New business",
        "Total Lines (Individual P/Ns)",
        "Value",
        "Gross Margin",
        "Price Protection",
        "Quote IDs",
    ],
    standard: STANDARD,
    inflation: NAMED_INFLATION,
};

impl SchemaVariant {
    pub fn spec(self) -> &'static SchemaSpec {
        match self {
            SchemaVariant::Sap => &SAP_SPEC,
            SchemaVariant::Named => &NAMED_SPEC,
        }
    }
}
