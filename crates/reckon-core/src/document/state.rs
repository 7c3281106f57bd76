use reckon_engine::engine::{CellRef, FormulaError, OperatorRegistry};
use std::collections::HashSet;
use std::path::PathBuf;

use super::cell::Cell;
use super::graph::DependencyGraph;
use super::guard::EvalGuard;
use super::history::HistoryEntry;
use crate::error::{Result, SheetError};

/// Maximum number of undo entries to keep
pub(crate) const MAX_UNDO_STACK: usize = 100;

/// Largest grid `Spreadsheet::new` will allocate, in cells.
pub const MAX_CELLS: usize = 1_000_000;

/// UI-agnostic spreadsheet: a fixed-size grid of cells plus the state needed
/// to keep formula values consistent.
pub struct Spreadsheet {
    rows: usize,
    cols: usize,
    /// Row-major cell storage, created once when the grid is sized
    pub(crate) cells: Vec<Cell>,
    /// Operators formulas may use
    pub(crate) operators: OperatorRegistry,
    /// Referenced cell -> dependents (and the reverse)
    pub(crate) graph: DependencyGraph,
    /// Cells currently mid-evaluation
    pub(crate) guard: EvalGuard,
    /// Cells whose value or color changed since the last `take_changes`
    pub(crate) changes: Vec<CellRef>,
    announced: HashSet<CellRef>,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last save/load
    pub modified: bool,
    /// Undo stack
    pub(crate) undo_stack: Vec<HistoryEntry>,
    /// Redo stack
    pub(crate) redo_stack: Vec<HistoryEntry>,
}

impl Spreadsheet {
    /// Create a sheet with `rows` x `cols` empty cells.
    ///
    /// Fails with `GridTooLarge` above [`MAX_CELLS`] cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let size = rows
            .checked_mul(cols)
            .filter(|size| *size <= MAX_CELLS)
            .ok_or(SheetError::GridTooLarge { rows, cols })?;
        Ok(Spreadsheet {
            rows,
            cols,
            cells: vec![Cell::new(); size],
            operators: OperatorRegistry::arithmetic(),
            graph: DependencyGraph::new(),
            guard: EvalGuard::new(),
            changes: Vec::new(),
            announced: HashSet::new(),
            file_path: None,
            modified: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        })
    }

    /// (rows, columns)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    pub(crate) fn index(&self, cell_ref: &CellRef) -> Result<usize> {
        if !self.contains(cell_ref) {
            return Err(SheetError::Formula {
                cell: *cell_ref,
                source: FormulaError::InvalidCellReference(cell_ref.to_string()),
            });
        }
        Ok(cell_ref.row * self.cols + cell_ref.col)
    }

    pub fn cell(&self, cell_ref: &CellRef) -> Result<&Cell> {
        let idx = self.index(cell_ref)?;
        Ok(&self.cells[idx])
    }

    pub(crate) fn cell_mut(&mut self, cell_ref: &CellRef) -> Result<&mut Cell> {
        let idx = self.index(cell_ref)?;
        Ok(&mut self.cells[idx])
    }

    /// Raw text of a cell.
    pub fn text(&self, cell_ref: &CellRef) -> Result<&str> {
        Ok(&self.cell(cell_ref)?.text)
    }

    /// Computed value (or error marker) of a cell.
    pub fn value(&self, cell_ref: &CellRef) -> Result<&str> {
        Ok(&self.cell(cell_ref)?.value)
    }

    pub fn color(&self, cell_ref: &CellRef) -> Result<u32> {
        Ok(self.cell(cell_ref)?.color)
    }

    /// Cells with non-empty text or a non-default color, row-major.
    pub fn modified_cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_modified())
            .map(|(idx, cell)| (CellRef::new(idx % self.cols, idx / self.cols), cell))
    }

    /// Queue a change notification for `cell_ref` unless one is pending.
    pub(crate) fn announce(&mut self, cell_ref: CellRef) {
        if self.announced.insert(cell_ref) {
            self.changes.push(cell_ref);
        }
    }

    /// Drain pending change notifications in first-change order.
    pub fn take_changes(&mut self) -> Vec<CellRef> {
        self.announced.clear();
        std::mem::take(&mut self.changes)
    }

    /// Whether `cell_ref` is currently being evaluated.
    pub fn is_evaluating(&self, cell_ref: &CellRef) -> bool {
        self.guard.is_evaluating(cell_ref)
    }

    /// Clear text, value and color of every cell and drop all dependency,
    /// guard and history state.
    pub fn reset(&mut self) {
        for idx in 0..self.cells.len() {
            if self.cells[idx] != Cell::new() {
                self.cells[idx].clear();
                let cell_ref = CellRef::new(idx % self.cols, idx / self.cols);
                self.announce(cell_ref);
            }
        }
        self.graph.clear();
        self.guard = EvalGuard::new();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.modified = false;
    }
}
