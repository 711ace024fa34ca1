//! Excel report generation
//!
//! - `column`: column letters and cell references
//! - `layout`: where source, derived and summary cells go
//! - `formulas`: per-row and aggregate formula strings
//! - `exporter`: writes the two-sheet workbook

pub mod column;
pub mod exporter;
pub mod formulas;
pub mod layout;

pub use column::{column_index_to_letter, Anchor, CellRef};
pub use exporter::ExcelExporter;
pub use formulas::{AggregateFormula, CellFormula, FormulaEmitter};
pub use layout::{
    Aggregate, ColumnLayout, Derived, LayoutColumn, ParamCells, ReportShape, START_COL, START_ROW,
};
