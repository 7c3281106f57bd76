//! reckon-core - UI-agnostic spreadsheet model: cells, dependency tracking,
//! recalculation, history and storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Cell, CellError, CellState, DEFAULT_COLOR, MAX_CELLS, Spreadsheet};
pub use error::{Result, SheetError};

pub use reckon_engine::engine::CellRef;
