//! Finds the cells a formula reads.
//!
//! A reference is any whole word of letters followed by digits (`A1`, `b12`)
//! that decodes to a cell. `A10` never matches inside `A1` and vice versa.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Extract all cell references from a formula body, deduplicated, in order of
/// first appearance.
pub fn extract_dependencies(formula: &str) -> Vec<CellRef> {
    let mut deps = Vec::new();

    for caps in cell_ref_re().captures_iter(formula) {
        if let Some(cell_ref) = CellRef::parse_a1(&caps[0])
            && !deps.contains(&cell_ref)
        {
            deps.push(cell_ref);
        }
    }

    deps
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z]+[0-9]+\b").expect("reference regex must compile")
    })
}
