use log::{debug, trace, warn};
use reckon_engine::engine::{CellRef, ExpressionTree, FormulaError, extract_dependencies, format_number};

use super::Spreadsheet;
use super::cascade;
use super::cell::CellState;
use super::history::{Edit, HistoryEntry};
use crate::error::{Result, SheetError};

impl Spreadsheet {
    /// Commit raw text to a cell and recalculate everything that depends on it.
    ///
    /// The text is stored even when evaluation fails; the cell then shows an
    /// error marker and the error is returned.
    pub fn set_text(&mut self, cell_ref: CellRef, text: &str) -> Result<()> {
        let old = self.cell(&cell_ref)?.text.clone();
        if old != text {
            self.push_undo(HistoryEntry::Single(Edit::Text {
                cell: cell_ref,
                old,
                new: text.to_string(),
            }));
            self.modified = true;
        }
        self.commit_text(cell_ref, text)
    }

    /// Set a cell's background color.
    pub fn set_color(&mut self, cell_ref: CellRef, color: u32) -> Result<()> {
        let old = self.color(&cell_ref)?;
        if old == color {
            return Ok(());
        }
        self.push_undo(HistoryEntry::Single(Edit::Color {
            cell: cell_ref,
            old,
            new: color,
        }));
        self.modified = true;
        self.commit_color(cell_ref, color)
    }

    /// Clear a cell's text and color as a single undoable edit.
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> Result<()> {
        let cell = self.cell(&cell_ref)?;
        let mut edits = Vec::new();
        if cell.color != super::DEFAULT_COLOR {
            edits.push(Edit::Color {
                cell: cell_ref,
                old: cell.color,
                new: super::DEFAULT_COLOR,
            });
        }
        if !cell.text.is_empty() {
            edits.push(Edit::Text {
                cell: cell_ref,
                old: cell.text.clone(),
                new: String::new(),
            });
        }
        if edits.is_empty() {
            return Ok(());
        }
        self.push_undo(HistoryEntry::Batch(edits.clone()));
        self.modified = true;
        self.apply_edits(edits.iter(), Edit::apply_new)
    }

    /// Write text and rebuild the cell's references without touching history.
    pub(crate) fn commit_text(&mut self, cell_ref: CellRef, text: &str) -> Result<()> {
        let cell = self.cell_mut(&cell_ref)?;
        cell.text = text.to_string();
        cell.state = CellState::Idle;
        let refs = cell.formula().map(extract_dependencies).unwrap_or_default();

        debug!("commit {cell_ref}: {text:?} ({} references)", refs.len());
        self.graph.set_references(cell_ref, &refs);
        self.recalculate(cell_ref)
    }

    pub(crate) fn commit_color(&mut self, cell_ref: CellRef, color: u32) -> Result<()> {
        self.cell_mut(&cell_ref)?.color = color;
        self.announce(cell_ref);
        Ok(())
    }

    /// Re-evaluate `cell_ref` and, transitively, every cell that depends on it.
    ///
    /// Every reached cell is evaluated once, after the cells it depends on
    /// within the cascade. A failing cell keeps its error marker and the
    /// cascade carries on; the first error is returned.
    pub fn recalculate(&mut self, cell_ref: CellRef) -> Result<()> {
        self.index(&cell_ref)?;
        let Some(mut scope) = self.guard.enter(cell_ref) else {
            return Err(SheetError::CircularReference { cell: cell_ref });
        };

        let cascade = cascade::plan(&self.graph, cell_ref, &mut scope);
        debug!(
            "cascade from {cell_ref}: {}",
            cascade
                .order
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        let mut first_error = None;
        for cell in cascade.order {
            let on_cycle = cascade.cyclic.contains(&cell);
            if let Err(err) = self.evaluate_cell(cell, on_cycle) {
                warn!("{err}");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Evaluate a single cell and store its value or error marker.
    fn evaluate_cell(&mut self, cell_ref: CellRef, on_cycle: bool) -> Result<()> {
        let cell = self.cell_mut(&cell_ref)?;
        cell.state = CellState::Evaluating;
        let before = cell.value.clone();

        let outcome = self.compute(cell_ref, on_cycle);

        let cell = self.cell_mut(&cell_ref)?;
        match &outcome {
            Ok(value) => cell.settle(value.clone()),
            Err(err) => cell.fail(err.cell_error()),
        }
        trace!("evaluated {cell_ref} = {:?}", cell.value);
        if cell.value != before {
            self.announce(cell_ref);
        }
        outcome.map(|_| ())
    }

    fn compute(&self, cell_ref: CellRef, on_cycle: bool) -> Result<String> {
        let cell = self.cell(&cell_ref)?;
        let Some(body) = cell.formula() else {
            return Ok(cell.text.clone());
        };

        let refs = self.graph.precedents_of(&cell_ref);
        if refs.contains(&cell_ref) {
            return Err(SheetError::SelfReference { cell: cell_ref });
        }
        if on_cycle {
            return Err(SheetError::CircularReference { cell: cell_ref });
        }

        let formula_error = |source: FormulaError| SheetError::Formula {
            cell: cell_ref,
            source,
        };
        let mut tree = ExpressionTree::parse_with(body, &self.operators).map_err(formula_error)?;

        // Names that are not cells stay unbound and fail in evaluate().
        let bound: Vec<(String, CellRef)> = tree
            .variables()
            .iter()
            .filter_map(|name| Some((name.clone(), CellRef::parse_a1(name)?)))
            .collect();
        for (name, reference) in bound {
            let referenced = self.cell(&reference).map_err(|_| {
                formula_error(FormulaError::InvalidCellReference(reference.to_string()))
            })?;
            // A blank referenced cell makes the whole formula 0.
            if referenced.text.is_empty() {
                return Ok("0".to_string());
            }
            let value = referenced.value.trim().parse::<f64>().map_err(|_| {
                SheetError::NonNumericReference {
                    cell: cell_ref,
                    reference,
                    value: referenced.value.clone(),
                }
            })?;
            tree.set_variable(&name, value).map_err(formula_error)?;
        }

        let result = tree.evaluate().map_err(formula_error)?;
        Ok(format_number(result))
    }
}
