//! Error types for Reckon core.

use thiserror::Error;

use reckon_engine::engine::{CellRef, FormulaError};

use crate::document::CellError;

/// Errors that can occur while editing, recalculating, saving or loading a sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Error in {cell}: {source}")]
    Formula {
        cell: CellRef,
        #[source]
        source: FormulaError,
    },

    #[error("{cell} refers to itself")]
    SelfReference { cell: CellRef },

    #[error("{cell} is part of a circular reference")]
    CircularReference { cell: CellRef },

    #[error("Error in {cell}: {reference} holds non-numeric value {value:?}")]
    NonNumericReference {
        cell: CellRef,
        reference: CellRef,
        value: String,
    },

    #[error("Circular dependency detected while loading: {}", join_cells(.cells))]
    CircularDependency { cells: Vec<CellRef> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid record at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Grid of {rows} x {cols} cells is too large")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("No file path set")]
    NoFilePath,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

impl SheetError {
    /// The cell this error is about, when there is one.
    pub fn cell(&self) -> Option<CellRef> {
        match self {
            SheetError::Formula { cell, .. }
            | SheetError::SelfReference { cell }
            | SheetError::CircularReference { cell }
            | SheetError::NonNumericReference { cell, .. } => Some(*cell),
            _ => None,
        }
    }

    /// Kind of error marker a cell shows for this error.
    pub fn cell_error(&self) -> CellError {
        match self {
            SheetError::SelfReference { .. } => CellError::SelfReference,
            SheetError::CircularReference { .. } => CellError::CircularReference,
            _ => CellError::Formula,
        }
    }
}

fn join_cells(cells: &[CellRef]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, SheetError>;
