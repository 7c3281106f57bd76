//! Evaluation guard set.
//!
//! Holds the cells that are currently mid-evaluation. Membership is tied to a
//! [`GuardScope`] and released when the scope is dropped, so an early return
//! or a `?` never leaves a stale entry behind.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use reckon_engine::engine::CellRef;

#[derive(Debug, Default)]
pub struct EvalGuard {
    active: Rc<RefCell<HashSet<CellRef>>>,
}

impl EvalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `cell` as evaluating. Returns `None` if it already is.
    pub fn enter(&self, cell: CellRef) -> Option<GuardScope> {
        if !self.active.borrow_mut().insert(cell) {
            return None;
        }
        Some(GuardScope {
            active: Rc::clone(&self.active),
            cells: vec![cell],
        })
    }

    pub fn is_evaluating(&self, cell: &CellRef) -> bool {
        self.active.borrow().contains(cell)
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }
}

/// Guard membership for one or more cells; released on drop.
#[derive(Debug)]
pub struct GuardScope {
    active: Rc<RefCell<HashSet<CellRef>>>,
    cells: Vec<CellRef>,
}

impl GuardScope {
    /// Add `cell` to this scope. Returns `false` if it is already evaluating.
    pub fn extend(&mut self, cell: CellRef) -> bool {
        if !self.active.borrow_mut().insert(cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    pub fn cells(&self) -> &[CellRef] {
        &self.cells
    }
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        let mut active = self.active.borrow_mut();
        for cell in &self.cells {
            active.remove(cell);
        }
    }
}
