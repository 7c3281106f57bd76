use log::{debug, info, warn};
use reckon_engine::engine::{CellRef, extract_dependencies, find_cycle};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::Spreadsheet;
use crate::error::{Result, SheetError};
use crate::storage::{CellRecord, parse_sheet, write_sheet};

impl Spreadsheet {
    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.save_file_as(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<()> {
        write_sheet(path, self)?;
        info!("saved {}", path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Load from file, replacing the whole grid.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let records = parse_sheet(path)?;
        self.load_records(records)?;
        info!("loaded {}", path.display());
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Replace the grid with `records`.
    ///
    /// The records are loaded into a fresh grid of the same size, which takes
    /// this sheet's place only when the whole load succeeds. On error the
    /// sheet is left as it was.
    pub fn load_records(&mut self, records: Vec<CellRecord>) -> Result<()> {
        let (rows, cols) = self.dimensions();
        let mut loaded = Spreadsheet::new(rows, cols)?;
        loaded.operators = self.operators.clone();
        loaded.fill(records)?;

        let mut changes = self.take_changes();
        changes.extend(loaded.take_changes());
        for (idx, (old, new)) in self.cells.iter().zip(&loaded.cells).enumerate() {
            if old != new {
                changes.push(CellRef::new(idx % cols, idx / cols));
            }
        }
        loaded.file_path = self.file_path.take();
        *self = loaded;
        for cell_ref in changes {
            self.announce(cell_ref);
        }
        Ok(())
    }

    /// Commit `records` into an empty grid.
    ///
    /// Records are committed in passes. A record waits while any cell its
    /// formula references is still waiting to be loaded. If a pass makes no
    /// progress the remaining records form a cycle and the load fails.
    fn fill(&mut self, records: Vec<CellRecord>) -> Result<()> {
        let mut pending = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            let cell_ref = record.cell_ref().map_err(|e| SheetError::Parse {
                line: idx + 1,
                message: e.to_string(),
            })?;
            self.index(&cell_ref)?;
            let refs = record
                .text
                .strip_prefix(super::FORMULA_MARKER)
                .map(extract_dependencies)
                .unwrap_or_default();
            pending.push((cell_ref, record, refs));
        }
        let mut waiting: HashSet<CellRef> = pending.iter().map(|(cell_ref, ..)| *cell_ref).collect();

        let mut pass = 0;
        while !pending.is_empty() {
            pass += 1;
            let before = pending.len();

            let mut deferred = Vec::new();
            for (cell_ref, record, refs) in pending {
                if refs.iter().any(|dep| *dep != cell_ref && waiting.contains(dep)) {
                    deferred.push((cell_ref, record, refs));
                    continue;
                }
                self.commit_loaded(cell_ref, &record);
                waiting.remove(&cell_ref);
            }

            debug!(
                "load pass {pass}: {} loaded, {} deferred",
                before - deferred.len(),
                deferred.len()
            );
            if deferred.len() == before {
                let blocked_by: HashMap<CellRef, Vec<CellRef>> = deferred
                    .iter()
                    .map(|(cell_ref, _, refs)| {
                        let blockers = refs
                            .iter()
                            .copied()
                            .filter(|dep| dep != cell_ref && waiting.contains(dep))
                            .collect();
                        (*cell_ref, blockers)
                    })
                    .collect();
                if let Some(path) = stalled_cycle(&blocked_by) {
                    warn!(
                        "load stalled on {}",
                        path.iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" -> ")
                    );
                }
                let cells: Vec<CellRef> = deferred.iter().map(|(cell_ref, ..)| *cell_ref).collect();
                return Err(SheetError::CircularDependency { cells });
            }
            pending = deferred;
        }
        Ok(())
    }

    fn commit_loaded(&mut self, cell_ref: CellRef, record: &CellRecord) {
        // The record was bounds-checked up front, so only evaluation can fail.
        if let Err(err) = self.commit_color(cell_ref, record.color) {
            warn!("{err}");
        }
        if let Err(err) = self.commit_text(cell_ref, &record.text) {
            warn!("loaded {cell_ref} with error: {err}");
        }
    }
}

/// One cycle among stalled records, as a path back to its first cell.
///
/// Every stalled record waits on another stalled record, so following the
/// first blocker from any of them must revisit a cell, and that cell lies on
/// a cycle.
fn stalled_cycle(blocked_by: &HashMap<CellRef, Vec<CellRef>>) -> Option<Vec<CellRef>> {
    let mut seen = HashSet::new();
    let mut current = *blocked_by.keys().next()?;
    while seen.insert(current) {
        current = *blocked_by.get(&current)?.first()?;
    }
    find_cycle(current, |cell| blocked_by.get(cell).cloned().unwrap_or_default())
}
