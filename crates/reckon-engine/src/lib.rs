//! reckon_engine - Formula parsing and evaluation for spreadsheet cells.

pub mod engine;
