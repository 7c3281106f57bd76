//! Writer for the sheet file format

use crate::document::Spreadsheet;
use crate::error::{Result, SheetError};
use std::fs;
use std::path::Path;

use super::CellRecord;

/// Write every modified cell of a sheet to a file
pub fn write_sheet(path: &Path, sheet: &Spreadsheet) -> Result<()> {
    let content = write_sheet_content(sheet)?;
    fs::write(path, content)?;
    Ok(())
}

/// Write every modified cell of a sheet to a string, row-major
pub fn write_sheet_content(sheet: &Spreadsheet) -> Result<String> {
    let mut lines = vec!["# Reckon Spreadsheet".to_string()];

    for (idx, (cell_ref, cell)) in sheet.modified_cells().enumerate() {
        let record = CellRecord::from_cell(cell_ref, cell);
        let line = serde_json::to_string(&record).map_err(|source| SheetError::Json {
            line: idx + 2,
            source,
        })?;
        lines.push(line);
    }

    Ok(lines.join("\n") + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_engine::engine::CellRef;

    #[test]
    fn test_write_skips_untouched_cells() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_text(CellRef::new(1, 0), "42").unwrap();
        sheet.set_color(CellRef::new(0, 2), 0x123456).unwrap();
        let content = write_sheet_content(&sheet).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(r#""column":"B""#));
        assert!(lines[1].contains(r#""value":"42""#));
        assert!(lines[2].contains(r#""row":3"#));
        assert!(lines[2].contains(&0x123456u32.to_string()));
    }

    #[test]
    fn test_sorted_output() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_text(CellRef::new(1, 1), "3").unwrap(); // B2
        sheet.set_text(CellRef::new(0, 0), "1").unwrap(); // A1
        sheet.set_text(CellRef::new(1, 0), "2").unwrap(); // B1
        let content = write_sheet_content(&sheet).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // After header, should be A1, B1, B2
        assert!(lines[1].contains(r#""text":"1""#));
        assert!(lines[2].contains(r#""text":"2""#));
        assert!(lines[3].contains(r#""text":"3""#));
    }
}
