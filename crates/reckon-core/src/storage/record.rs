use reckon_engine::engine::{CellRef, FormulaError};
use serde::{Deserialize, Serialize};

use crate::document::{Cell, DEFAULT_COLOR};

/// One saved cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// One-based row number.
    pub row: usize,
    /// Column letters ("A", "AB", ...).
    pub column: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_color")]
    pub color: u32,
}

fn default_color() -> u32 {
    DEFAULT_COLOR
}

impl CellRecord {
    pub fn from_cell(cell_ref: CellRef, cell: &Cell) -> Self {
        CellRecord {
            row: cell_ref.row + 1,
            column: CellRef::col_to_letters(cell_ref.col),
            text: cell.text.clone(),
            value: cell.value.clone(),
            color: cell.color,
        }
    }

    /// The cell this record belongs to.
    pub fn cell_ref(&self) -> Result<CellRef, FormulaError> {
        let invalid = || FormulaError::InvalidCellReference(format!("{}{}", self.column, self.row));
        let col = CellRef::letters_to_col(&self.column).ok_or_else(invalid)?;
        let row = self.row.checked_sub(1).ok_or_else(invalid)?;
        Ok(CellRef::new(col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_addresses() {
        let mut cell = Cell::new();
        cell.text = "=A1".to_string();
        let record = CellRecord::from_cell(CellRef::new(27, 9), &cell);
        assert_eq!(record.column, "AB");
        assert_eq!(record.row, 10);
        assert_eq!(record.cell_ref().unwrap(), CellRef::new(27, 9));
    }

    #[test]
    fn test_invalid_record_address() {
        let record = CellRecord {
            row: 0,
            column: "A".to_string(),
            text: String::new(),
            value: String::new(),
            color: DEFAULT_COLOR,
        };
        assert_eq!(
            record.cell_ref(),
            Err(FormulaError::InvalidCellReference("A0".to_string()))
        );
    }
}
