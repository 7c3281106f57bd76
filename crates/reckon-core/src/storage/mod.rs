//! Storage for the sheet file format (one JSON record per modified cell)

mod parser;
mod record;
mod writer;

pub use parser::{parse_sheet, parse_sheet_content};
pub use record::CellRecord;
pub use writer::{write_sheet, write_sheet_content};
