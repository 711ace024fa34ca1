//! Layout planner: where every source, derived and summary cell goes
//!
//! Source columns keep their table order starting at the origin column.
//! Derived columns follow immediately in the sequence the schema gives for the
//! report; later derived formulas reference earlier ones, so the sequence must
//! not be reordered. The title band above the table (sheet rows 1 and 2) holds the
//! inflation parameter cells and the aggregate cells, placed one blank column
//! to the right of the last derived column.

use super::column::{column_index_to_letter, CellRef};
use crate::error::{QuoteError, QuoteResult};
use crate::schema::{COST, EXTENSION, MARGIN, PRICE, QTY};
use crate::types::{ColumnKind, QuoteTable, ReportKind};
use std::collections::HashSet;
use tracing::debug;

/// Header row of the data table (sheet row 4)
pub const START_ROW: u32 = 3;
pub const START_COL: u16 = 0;

/// Last usable worksheet column (XFD)
const MAX_COL: u16 = 16_383;

/// A formula column appended after the source data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derived {
    TotalCost,
    TotalPrice,
    FutureCost,
    FuturePrice,
    CostExt,
    PriceExt,
    TodaysMargin,
}

impl Derived {
    pub fn header(self) -> &'static str {
        match self {
            Derived::TotalCost => "Total Cost",
            Derived::TotalPrice => "Total Price",
            Derived::FutureCost => "Future Cost",
            Derived::FuturePrice => "Future Price",
            Derived::CostExt => "Cost Ext",
            Derived::PriceExt => "Price Ext",
            Derived::TodaysMargin => "Today's Margin",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Derived::TodaysMargin => ColumnKind::Percent,
            _ => ColumnKind::Currency,
        }
    }
}

/// A single-cell summary written in the title band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Subtotal of today's extended cost (inflation report only)
    TodaysCostExt,
    ExtCost,
    ExtPrice,
    /// Gross margin of the extended totals
    Gm,
    /// Margin of future price against today's cost (inflation report only)
    TodaysGm,
}

impl Aggregate {
    /// Derived column a subtotal aggregate sums, `None` for ratios
    pub fn summed_column(self, report: ReportKind) -> Option<Derived> {
        match (self, report) {
            (Aggregate::TodaysCostExt, _) => Some(Derived::TotalCost),
            (Aggregate::ExtCost, ReportKind::Standard) => Some(Derived::TotalCost),
            (Aggregate::ExtCost, ReportKind::Inflation) => Some(Derived::CostExt),
            (Aggregate::ExtPrice, ReportKind::Standard) => Some(Derived::TotalPrice),
            (Aggregate::ExtPrice, ReportKind::Inflation) => Some(Derived::PriceExt),
            (Aggregate::Gm, _) | (Aggregate::TodaysGm, _) => None,
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Aggregate::Gm | Aggregate::TodaysGm => ColumnKind::Percent,
            _ => ColumnKind::Currency,
        }
    }
}

/// Derived columns and labelled aggregates of one report for one schema
#[derive(Debug)]
pub struct ReportShape {
    pub report: ReportKind,
    /// Placement order; later formulas reference earlier columns
    pub derived: &'static [Derived],
    pub aggregates: &'static [(Aggregate, &'static str)],
}

/// One placed column
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutColumn {
    pub name: String,
    pub col: u16,
    pub kind: ColumnKind,
    pub derived: Option<Derived>,
}

/// Cells holding the inflation period count and rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamCells {
    pub periods_label: CellRef,
    pub periods: CellRef,
    pub rate_label: CellRef,
    pub rate: CellRef,
}

/// A placed aggregate: label above, formula below
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSlot {
    pub aggregate: Aggregate,
    pub title: &'static str,
    pub label: CellRef,
    pub value: CellRef,
}

/// Column positions for one report
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    pub report: ReportKind,
    pub header_row: u32,
    pub start_col: u16,
    pub row_count: u32,
    pub columns: Vec<LayoutColumn>,
    pub params: Option<ParamCells>,
    pub aggregates: Vec<AggregateSlot>,
    pub has_extension: bool,
}

impl ColumnLayout {
    /// Plan a layout at the default origin (sheet row 4, column A)
    pub fn plan(table: &QuoteTable, shape: &ReportShape) -> QuoteResult<Self> {
        Self::plan_at(table, shape, CellRef::new(START_ROW, START_COL))
    }

    /// Plan a layout with the table header at `origin`
    pub fn plan_at(table: &QuoteTable, shape: &ReportShape, origin: CellRef) -> QuoteResult<Self> {
        let report = shape.report;
        // Title band occupies sheet rows 1-2
        if origin.row < 2 {
            return Err(QuoteError::Export(format!(
                "table header row {} overlaps the title band",
                origin.row + 1
            )));
        }

        let row_count = table.row_count();
        if row_count == 0 {
            return Err(QuoteError::Schema("input contains no data rows".to_string()));
        }
        let row_count = u32::try_from(row_count)
            .map_err(|_| QuoteError::Export(format!("{} rows exceed the sheet", row_count)))?;

        let mut seen = HashSet::new();
        for name in table.column_names() {
            if !seen.insert(name) {
                return Err(QuoteError::Schema(format!("duplicate column '{}'", name)));
            }
        }
        for required in [QTY, PRICE, COST, MARGIN] {
            if !seen.contains(required) {
                return Err(QuoteError::Schema(format!("missing column '{}'", required)));
            }
        }

        let mut columns = Vec::new();
        let mut next = usize::from(origin.col);
        for column in &table.columns {
            columns.push(LayoutColumn {
                name: column.name.clone(),
                col: checked_col(next)?,
                kind: column.kind,
                derived: None,
            });
            next += 1;
        }
        for derived in shape.derived {
            columns.push(LayoutColumn {
                name: derived.header().to_string(),
                col: checked_col(next)?,
                kind: derived.kind(),
                derived: Some(*derived),
            });
            next += 1;
        }

        // One blank gap column before the band
        let mut band = next + 1;
        let params = match report {
            ReportKind::Standard => None,
            ReportKind::Inflation => {
                let label_col = checked_col(band)?;
                let value_col = checked_col(band + 1)?;
                band += 3;
                Some(ParamCells {
                    periods_label: CellRef::new(0, label_col),
                    periods: CellRef::new(0, value_col),
                    rate_label: CellRef::new(1, label_col),
                    rate: CellRef::new(1, value_col),
                })
            }
        };

        let mut aggregates = Vec::new();
        for (i, &(aggregate, title)) in shape.aggregates.iter().enumerate() {
            if let Some(summed) = aggregate.summed_column(report) {
                if !shape.derived.contains(&summed) {
                    return Err(QuoteError::Export(format!(
                        "'{}' sums '{}', which this report does not place",
                        title,
                        summed.header()
                    )));
                }
            }
            let col = checked_col(band + i)?;
            aggregates.push(AggregateSlot {
                aggregate,
                title,
                label: CellRef::new(0, col),
                value: CellRef::new(1, col),
            });
        }

        let layout = Self {
            report,
            header_row: origin.row,
            start_col: origin.col,
            row_count,
            columns,
            params,
            aggregates,
            has_extension: seen.contains(EXTENSION),
        };
        debug!(
            report = %report,
            last_column = %column_index_to_letter(layout.last_col()),
            "planned column layout"
        );
        Ok(layout)
    }

    /// Column index of a source or derived column by name
    pub fn col(&self, name: &str) -> Option<u16> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.col)
    }

    pub fn derived_col(&self, derived: Derived) -> Option<u16> {
        self.columns
            .iter()
            .find(|c| c.derived == Some(derived))
            .map(|c| c.col)
    }

    pub fn first_data_row(&self) -> u32 {
        self.header_row + 1
    }

    pub fn last_data_row(&self) -> u32 {
        self.header_row + self.row_count
    }

    /// Zero-based sheet rows holding data
    pub fn data_rows(&self) -> std::ops::RangeInclusive<u32> {
        self.first_data_row()..=self.last_data_row()
    }

    pub fn last_col(&self) -> u16 {
        self.columns.last().map_or(self.start_col, |c| c.col)
    }

    pub fn slot(&self, aggregate: Aggregate) -> Option<&AggregateSlot> {
        self.aggregates.iter().find(|s| s.aggregate == aggregate)
    }

    pub fn source_columns(&self) -> impl Iterator<Item = &LayoutColumn> {
        self.columns.iter().filter(|c| c.derived.is_none())
    }

    pub fn derived_columns(&self) -> impl Iterator<Item = &LayoutColumn> {
        self.columns.iter().filter(|c| c.derived.is_some())
    }
}

fn checked_col(index: usize) -> QuoteResult<u16> {
    u16::try_from(index)
        .ok()
        .filter(|c| *c <= MAX_COL)
        .ok_or_else(|| QuoteError::Export(format!("column {} exceeds the sheet width", index + 1)))
}
