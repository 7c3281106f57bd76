//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - Raw text, computed value, background color and evaluation state
//! - [`CellState`] - Where a cell is in its evaluation lifecycle
//! - [`CellError`] - Which error marker a cell is showing

/// Packed RGB background color every cell starts with (opaque white).
pub const DEFAULT_COLOR: u32 = 16_777_215;

/// Leading character that marks formula text.
pub const FORMULA_MARKER: char = '=';

/// Evaluation lifecycle of a cell.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CellState {
    /// Text committed, not evaluated yet.
    #[default]
    Idle,
    Evaluating,
    Settled,
    Errored,
}

/// Kind of error a cell is showing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellError {
    SelfReference,
    CircularReference,
    Formula,
}

impl CellError {
    /// Value stored in a cell that ended in this error.
    pub fn marker(&self) -> &'static str {
        match self {
            CellError::SelfReference => "#SELF!",
            CellError::CircularReference => "#CYCLE!",
            CellError::Formula => "#ERR!",
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub value: String,
    pub color: u32,
    pub error: Option<CellError>,
    pub state: CellState,
}

impl Cell {
    pub fn new() -> Cell {
        Cell {
            text: String::new(),
            value: String::new(),
            color: DEFAULT_COLOR,
            error: None,
            state: CellState::Idle,
        }
    }

    /// The formula body (text after `=`), if this is a formula cell.
    pub fn formula(&self) -> Option<&str> {
        self.text.strip_prefix(FORMULA_MARKER)
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }

    /// Whether the cell differs from a freshly created one in anything that is saved.
    pub fn is_modified(&self) -> bool {
        !self.text.is_empty() || self.color != DEFAULT_COLOR
    }

    pub(crate) fn settle(&mut self, value: String) {
        self.value = value;
        self.error = None;
        self.state = CellState::Settled;
    }

    pub(crate) fn fail(&mut self, error: CellError) {
        self.value = error.marker().to_string();
        self.error = Some(error);
        self.state = CellState::Errored;
    }

    pub(crate) fn clear(&mut self) {
        *self = Cell::new();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_detection() {
        let mut cell = Cell::new();
        assert!(!cell.is_formula());
        cell.text = "=A1+1".to_string();
        assert_eq!(cell.formula(), Some("A1+1"));
        cell.text = " =A1".to_string();
        assert!(!cell.is_formula());
    }

    #[test]
    fn test_modified_tracks_text_and_color() {
        let mut cell = Cell::new();
        assert!(!cell.is_modified());
        cell.color = 0xFF0000;
        assert!(cell.is_modified());
        cell.color = DEFAULT_COLOR;
        cell.text = "x".to_string();
        assert!(cell.is_modified());
    }

    #[test]
    fn test_fail_stores_marker() {
        let mut cell = Cell::new();
        cell.fail(CellError::CircularReference);
        assert_eq!(cell.value, "#CYCLE!");
        assert_eq!(cell.state, CellState::Errored);
        cell.settle("4".to_string());
        assert_eq!(cell.error, None);
        assert_eq!(cell.state, CellState::Settled);
    }
}
