//! Parser for the sheet file format

use crate::error::{Result, SheetError};
use std::fs;
use std::path::Path;

use super::CellRecord;

/// Parse a sheet file into its cell records
pub fn parse_sheet(path: &Path) -> Result<Vec<CellRecord>> {
    let content = fs::read_to_string(path)?;
    parse_sheet_content(&content)
}

/// Parse sheet content from a string
pub fn parse_sheet_content(content: &str) -> Result<Vec<CellRecord>> {
    let mut records = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: CellRecord = serde_json::from_str(line).map_err(|source| SheetError::Json {
            line: line_num + 1,
            source,
        })?;
        record.cell_ref().map_err(|e| SheetError::Parse {
            line: line_num + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}
