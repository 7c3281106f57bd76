//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't sit on a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! This module walks a cell's precedents depth first, with an explicit
//! stack, looking for a path leading back to the starting cell.

use std::collections::HashSet;
use std::vec;

use super::CellRef;

/// Find a cycle passing through `start`.
///
/// `precedents` returns the cells a given cell references. Returns the path
/// `start -> ... -> start` when one exists. Cycles that are reachable from
/// `start` but never return to it are not reported. Each reachable cell is
/// expanded at most once.
pub fn find_cycle<F>(start: CellRef, precedents: F) -> Option<Vec<CellRef>>
where
    F: Fn(&CellRef) -> Vec<CellRef>,
{
    let mut visited = HashSet::from([start]);
    let mut stack: Vec<(CellRef, vec::IntoIter<CellRef>)> =
        vec![(start, precedents(&start).into_iter())];

    while let Some((_, pending)) = stack.last_mut() {
        let Some(dep) = pending.next() else {
            stack.pop();
            continue;
        };
        if dep == start {
            let mut path: Vec<CellRef> = stack.iter().map(|(cell, _)| *cell).collect();
            path.push(start);
            return Some(path);
        }
        if visited.insert(dep) {
            stack.push((dep, precedents(&dep).into_iter()));
        }
    }

    None
}
