//! Undo/redo history.
//!
//! Entries only record raw text and colors. Undoing or redoing replays them
//! through the normal commit path, so values are recalculated the same way
//! as for a user edit.

use log::debug;
use reckon_engine::engine::CellRef;

use super::Spreadsheet;
use super::state::MAX_UNDO_STACK;
use crate::error::{Result, SheetError};

/// A reversible change to one cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    Text {
        cell: CellRef,
        old: String,
        new: String,
    },
    Color {
        cell: CellRef,
        old: u32,
        new: u32,
    },
}

impl Edit {
    pub fn cell(&self) -> CellRef {
        match self {
            Edit::Text { cell, .. } | Edit::Color { cell, .. } => *cell,
        }
    }

    pub(crate) fn apply_new(&self, sheet: &mut Spreadsheet) -> Result<()> {
        match self {
            Edit::Text { cell, new, .. } => sheet.commit_text(*cell, new),
            Edit::Color { cell, new, .. } => sheet.commit_color(*cell, *new),
        }
    }

    pub(crate) fn apply_old(&self, sheet: &mut Spreadsheet) -> Result<()> {
        match self {
            Edit::Text { cell, old, .. } => sheet.commit_text(*cell, old),
            Edit::Color { cell, old, .. } => sheet.commit_color(*cell, *old),
        }
    }
}

/// Represents an undo entry (single edit or a batch applied together)
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryEntry {
    Single(Edit),
    Batch(Vec<Edit>),
}

impl HistoryEntry {
    fn edits(&self) -> &[Edit] {
        match self {
            HistoryEntry::Single(edit) => std::slice::from_ref(edit),
            HistoryEntry::Batch(edits) => edits,
        }
    }
}

impl Spreadsheet {
    pub(crate) fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }

    /// Apply every edit, returning the first recalculation error.
    pub(crate) fn apply_edits<'a, I>(
        &mut self,
        edits: I,
        apply: fn(&Edit, &mut Spreadsheet) -> Result<()>,
    ) -> Result<()>
    where
        I: Iterator<Item = &'a Edit>,
    {
        let mut first_error = None;
        for edit in edits {
            if let Err(err) = apply(edit, self) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Undo the last edit.
    ///
    /// The previous state is restored even if recalculating it reports an
    /// error; that error is returned afterwards.
    pub fn undo(&mut self) -> Result<()> {
        let entry = self.undo_stack.pop().ok_or(SheetError::NothingToUndo)?;
        debug!("undo {} edit(s)", entry.edits().len());
        let result = self.apply_edits(entry.edits().iter().rev(), Edit::apply_old);
        self.redo_stack.push(entry);
        self.modified = true;
        result
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) -> Result<()> {
        let entry = self.redo_stack.pop().ok_or(SheetError::NothingToRedo)?;
        debug!("redo {} edit(s)", entry.edits().len());
        let result = self.apply_edits(entry.edits().iter(), Edit::apply_new);
        self.undo_stack.push(entry);
        self.modified = true;
        result
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
