//! Formula emitter
//!
//! Produces the per-row pricing formulas and the title-band aggregates from a
//! [`ColumnLayout`]. Every address is computed from the layout; nothing is
//! hard-coded to a particular column letter.

use super::column::{Anchor, CellRef};
use super::layout::{Aggregate, AggregateSlot, ColumnLayout, Derived};
use crate::error::{QuoteError, QuoteResult};
use crate::schema::{COST, EXTENSION, MARGIN, PRICE, QTY};
use crate::types::ColumnKind;

/// Excel SUBTOTAL function number for SUM
const SUBTOTAL_SUM: u8 = 9;

/// A formula destined for one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellFormula {
    pub cell: CellRef,
    pub formula: String,
    pub kind: ColumnKind,
}

/// A labelled aggregate formula
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFormula {
    pub label: &'static str,
    pub label_cell: CellRef,
    pub cell: CellRef,
    pub formula: String,
    pub kind: ColumnKind,
}

/// Resolved column indices the formulas reference
#[derive(Debug, Clone, Copy)]
struct Cols {
    qty: u16,
    price: u16,
    cost: u16,
    margin: u16,
    extension: Option<u16>,
}

/// Emits formulas for a planned layout
pub struct FormulaEmitter<'a> {
    layout: &'a ColumnLayout,
    cols: Cols,
}

impl<'a> FormulaEmitter<'a> {
    pub fn new(layout: &'a ColumnLayout) -> QuoteResult<Self> {
        let find = |name: &str| {
            layout
                .col(name)
                .ok_or_else(|| QuoteError::Schema(format!("layout has no '{}' column", name)))
        };
        let cols = Cols {
            qty: find(QTY)?,
            price: find(PRICE)?,
            cost: find(COST)?,
            margin: find(MARGIN)?,
            extension: if layout.has_extension {
                Some(find(EXTENSION)?)
            } else {
                None
            },
        };
        Ok(Self { layout, cols })
    }

    /// `$X{row}` for a column on a sheet row
    fn at(&self, col: u16, row: u32) -> String {
        CellRef::new(row, col).a1(Anchor::Column)
    }

    fn derived(&self, derived: Derived) -> QuoteResult<u16> {
        self.layout.derived_col(derived).ok_or_else(|| {
            QuoteError::Export(format!("'{}' is not part of this report", derived.header()))
        })
    }

    /// `(1+rate)^periods` against the absolute parameter cells
    fn growth(&self) -> QuoteResult<String> {
        let params = self.layout.params.ok_or_else(|| {
            QuoteError::Export("inflation parameters are not placed in this layout".to_string())
        })?;
        Ok(format!(
            "(1+{})^{}",
            params.rate.a1(Anchor::Absolute),
            params.periods.a1(Anchor::Absolute)
        ))
    }

    /// Formulas for one zero-based sheet row, in left-to-right dependency order
    pub fn row_formulas(&self, row: u32) -> QuoteResult<Vec<CellFormula>> {
        let c = self.cols;
        let qty = self.at(c.qty, row);
        let price = self.at(c.price, row);
        let cost = self.at(c.cost, row);
        let margin = self.at(c.margin, row);

        let mut out = vec![CellFormula {
            cell: CellRef::new(row, c.price),
            formula: format!("={}/(1-{})", cost, margin),
            kind: ColumnKind::Currency,
        }];
        if let Some(ext) = c.extension {
            out.push(CellFormula {
                cell: CellRef::new(row, ext),
                formula: format!("={}*{}", price, qty),
                kind: ColumnKind::Currency,
            });
        }

        let sequence: Vec<Derived> = self
            .layout
            .derived_columns()
            .filter_map(|column| column.derived)
            .collect();
        for derived in sequence {
            let formula = match derived {
                Derived::TotalCost => format!("={}*{}", cost, qty),
                Derived::TotalPrice => format!("={}*{}", price, qty),
                Derived::FutureCost => format!("={}*{}", cost, self.growth()?),
                Derived::FuturePrice => format!("={}*{}", price, self.growth()?),
                Derived::CostExt => {
                    format!("={}*{}", self.at(self.derived(Derived::FutureCost)?, row), qty)
                }
                Derived::PriceExt => {
                    format!("={}*{}", self.at(self.derived(Derived::FuturePrice)?, row), qty)
                }
                Derived::TodaysMargin => {
                    let future_price = self.at(self.derived(Derived::FuturePrice)?, row);
                    format!("=({}-{})/{}", future_price, cost, future_price)
                }
            };
            out.push(CellFormula {
                cell: CellRef::new(row, self.derived(derived)?),
                formula,
                kind: derived.kind(),
            });
        }
        Ok(out)
    }

    /// Formulas for every data row
    pub fn all_rows(&self) -> QuoteResult<Vec<CellFormula>> {
        let mut out = Vec::new();
        for row in self.layout.data_rows() {
            out.extend(self.row_formulas(row)?);
        }
        Ok(out)
    }

    /// Title-band aggregates
    pub fn aggregates(&self) -> QuoteResult<Vec<AggregateFormula>> {
        let report = self.layout.report;
        self.layout
            .aggregates
            .iter()
            .map(|slot| -> QuoteResult<AggregateFormula> {
                let formula = match slot.aggregate.summed_column(report) {
                    Some(derived) => self.subtotal(self.derived(derived)?),
                    None => self.ratio(slot)?,
                };
                Ok(AggregateFormula {
                    label: slot.title,
                    label_cell: slot.label,
                    cell: slot.value,
                    formula,
                    kind: slot.aggregate.kind(),
                })
            })
            .collect()
    }

    fn subtotal(&self, col: u16) -> String {
        let first = CellRef::new(self.layout.first_data_row(), col);
        let last = CellRef::new(self.layout.last_data_row(), col);
        format!(
            "=SUBTOTAL({},{}:{})",
            SUBTOTAL_SUM,
            first.a1(Anchor::Absolute),
            last.a1(Anchor::Absolute)
        )
    }

    /// `(price - cost) / price` over two aggregate cells
    fn ratio(&self, slot: &AggregateSlot) -> QuoteResult<String> {
        let cost_of = match slot.aggregate {
            Aggregate::TodaysGm => Aggregate::TodaysCostExt,
            _ => Aggregate::ExtCost,
        };
        let cell = |aggregate: Aggregate| {
            self.layout
                .slot(aggregate)
                .map(|s| s.value.a1(Anchor::Relative))
                .ok_or_else(|| {
                    QuoteError::Export(format!("{:?} is not placed in this layout", aggregate))
                })
        };
        let price = cell(Aggregate::ExtPrice)?;
        let cost = cell(cost_of)?;
        Ok(format!("=({}-{})/{}", price, cost, price))
    }
}
