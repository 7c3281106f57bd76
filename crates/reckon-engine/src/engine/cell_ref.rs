//! A1-style cell names.
//!
//! Column letters are bijective base 26 (`A` is the first column, `Z` the
//! 26th, `AA` the 27th); the row is one-based. Both are stored zero-based.
//!
//! ```
//! use reckon_engine::engine::CellRef;
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!((cell.col, cell.row), (1, 2));
//! assert_eq!(cell.to_string(), "B3");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FormulaError;

/// Zero-based grid coordinates of one cell.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Decode a name such as `b3` or `AA10`; `None` for anything else.
    pub fn parse_a1(name: &str) -> Option<CellRef> {
        let split = name.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = name.split_at(split);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let col = Self::letters_to_col(letters)?;
        let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef { row, col })
    }

    /// `A` -> 0, `Z` -> 25, `AA` -> 26. Case-insensitive.
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() {
            return None;
        }
        let one_based = letters.bytes().try_fold(0usize, |acc, b| {
            if !b.is_ascii_alphabetic() {
                return None;
            }
            let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })?;
        Some(one_based - 1)
    }

    /// Inverse of [`CellRef::letters_to_col`].
    pub fn col_to_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut rest = Some(col);
        while let Some(n) = rest {
            letters.push(b'A' + (n % 26) as u8);
            rest = (n / 26).checked_sub(1);
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

impl FromStr for CellRef {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| FormulaError::InvalidCellReference(s.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::col_to_letters(self.col), self.row + 1)
    }
}
