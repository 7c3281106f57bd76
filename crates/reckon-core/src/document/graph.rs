//! Dependency graph between cells.
//!
//! Tracks both directions so a cell's edges can be replaced when its formula
//! changes:
//! - dependents: referenced cell -> cells whose formulas reference it
//! - precedents: formula cell -> cells it references
//!
//! Both lists keep insertion order and never hold duplicates.

use std::collections::HashMap;

use reckon_engine::engine::CellRef;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependents: HashMap<CellRef, Vec<CellRef>>,
    precedents: HashMap<CellRef, Vec<CellRef>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` references `referenced`.
    pub fn add_dependency(&mut self, referenced: CellRef, dependent: CellRef) {
        let dependents = self.dependents.entry(referenced).or_default();
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
        let precedents = self.precedents.entry(dependent).or_default();
        if !precedents.contains(&referenced) {
            precedents.push(referenced);
        }
    }

    /// Replace everything `cell` references with `refs`.
    ///
    /// `cell` is removed from the dependents of cells it no longer references.
    pub fn set_references(&mut self, cell: CellRef, refs: &[CellRef]) {
        if let Some(old) = self.precedents.remove(&cell) {
            for referenced in old.iter().filter(|r| !refs.contains(r)) {
                if let Some(dependents) = self.dependents.get_mut(referenced) {
                    dependents.retain(|d| *d != cell);
                    if dependents.is_empty() {
                        self.dependents.remove(referenced);
                    }
                }
            }
        }
        for referenced in refs {
            self.add_dependency(*referenced, cell);
        }
    }

    /// Cells whose formulas reference `cell`, in registration order.
    pub fn dependents_of(&self, cell: &CellRef) -> &[CellRef] {
        self.dependents.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells referenced by `cell`'s formula.
    pub fn precedents_of(&self, cell: &CellRef) -> &[CellRef] {
        self.precedents.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.dependents.clear();
        self.precedents.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty() && self.precedents.is_empty()
    }
}
