//! Spreadsheet state and recalculation (UI-agnostic).

mod cascade;
mod cell;
mod graph;
mod guard;
mod history;
mod io;
mod recalc;
mod state;

pub use cell::{Cell, CellError, CellState, DEFAULT_COLOR, FORMULA_MARKER};
pub use graph::DependencyGraph;
pub use guard::{EvalGuard, GuardScope};
pub use history::{Edit, HistoryEntry};
pub use state::{MAX_CELLS, Spreadsheet};
