use std::fmt;

//==============================================================================
// Report Variant
//==============================================================================

/// Which pricing report to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    /// Cost, price, extended totals and margin
    Standard,
    /// Standard report plus compounded future pricing
    Inflation,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Standard => write!(f, "standard"),
            ReportKind::Inflation => write!(f, "inflation"),
        }
    }
}

//==============================================================================
// Canonical Table Model
//==============================================================================

/// How a column is displayed in the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    /// `$#,##0.00`
    Currency,
    /// `0%`, values stored as fractions
    Percent,
}

/// Column value types (homogeneous arrays)
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Number(Vec<f64>),
    /// Numbers where a blank input cell stays blank
    Sparse(Vec<Option<f64>>),
    Text(Vec<String>),
}

impl ColumnValue {
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Number(v) => v.len(),
            ColumnValue::Sparse(v) => v.len(),
            ColumnValue::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render one cell for terminal output
    pub fn display_at(&self, index: usize) -> String {
        match self {
            ColumnValue::Number(v) => v.get(index).map(|n| format_number(*n)).unwrap_or_default(),
            ColumnValue::Sparse(v) => v
                .get(index)
                .copied()
                .flatten()
                .map(format_number)
                .unwrap_or_default(),
            ColumnValue::Text(v) => v.get(index).cloned().unwrap_or_default(),
        }
    }
}

/// A named, typed column of the normalized table
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: ColumnValue,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: ColumnValue) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnKind::Text, ColumnValue::Text(values))
    }

    pub fn number(name: impl Into<String>, kind: ColumnKind, values: Vec<f64>) -> Self {
        Self::new(name, kind, ColumnValue::Number(values))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalized quote lines, columns kept in sheet order
#[derive(Debug, Clone, Default)]
pub struct QuoteTable {
    pub columns: Vec<Column>,
}

impl QuoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Number of data rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric values of a column, `None` if missing or textual
    pub fn numbers(&self, name: &str) -> Option<&[f64]> {
        match self.get(name).map(|c| &c.values) {
            Some(ColumnValue::Number(v)) => Some(v),
            _ => None,
        }
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> Result<(), String> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                ));
            }
        }
        Ok(())
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
