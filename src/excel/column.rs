//! Column lettering and cell references

use std::fmt;

/// Convert a zero-based column index to an Excel column letter
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
/// - 701 → ZZ
pub fn column_index_to_letter(index: u16) -> String {
    let mut result = String::new();
    let mut idx = index as usize;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Anchoring of a rendered cell reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `A5`
    Relative,
    /// `$A5`, used for per-row formulas
    Column,
    /// `$A$5`, used for the global periods/rate cells and subtotal ranges
    Absolute,
}

/// A zero-based (row, column) position on a worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Render in A1 notation with the given anchoring
    pub fn a1(&self, anchor: Anchor) -> String {
        let letter = column_index_to_letter(self.col);
        let row = self.row + 1;
        match anchor {
            Anchor::Relative => format!("{}{}", letter, row),
            Anchor::Column => format!("${}{}", letter, row),
            Anchor::Absolute => format!("${}${}", letter, row),
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1(Anchor::Relative))
    }
}
