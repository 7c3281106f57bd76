//! Recalculation order for one committed cell.
//!
//! The cells reached from the committed cell through its dependents are
//! walked once, depth first, with an explicit stack. Strongly connected
//! components are collected on the way (Tarjan): a component with more than
//! one cell is a reference cycle, and the components come out in reverse
//! topological order. Stack depth and running time are linear in the number
//! of reached cells and edges.

use std::collections::{HashMap, HashSet};

use reckon_engine::engine::CellRef;

use super::graph::DependencyGraph;
use super::guard::GuardScope;

/// Cells to evaluate for one commit.
#[derive(Debug)]
pub(crate) struct Cascade {
    /// The committed cell first, then every reached dependent after the cells
    /// it reads.
    pub order: Vec<CellRef>,
    /// Reached cells that sit on a reference cycle (self-loops excluded).
    pub cyclic: HashSet<CellRef>,
}

#[derive(Clone, Copy)]
struct Visit {
    index: usize,
    low: usize,
}

#[derive(Default)]
struct Components {
    visits: HashMap<CellRef, Visit>,
    stack: Vec<CellRef>,
    on_stack: HashSet<CellRef>,
}

impl Components {
    fn discover(&mut self, cell: CellRef) {
        let index = self.visits.len();
        self.visits.insert(cell, Visit { index, low: index });
        self.stack.push(cell);
        self.on_stack.insert(cell);
    }

    fn lower(&mut self, cell: CellRef, low: usize) {
        if let Some(visit) = self.visits.get_mut(&cell) {
            visit.low = visit.low.min(low);
        }
    }

    /// Pop the component rooted at `cell` off the stack.
    fn take(&mut self, cell: CellRef) -> Vec<CellRef> {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.remove(&member);
            component.push(member);
            if member == cell {
                break;
            }
        }
        component
    }
}

/// Plan the cascade from `root`, adding every reached cell to `scope`.
///
/// Siblings are walked last-registered first so independent dependents come
/// out in registration order. Cells another scope already holds are skipped.
pub(crate) fn plan(graph: &DependencyGraph, root: CellRef, scope: &mut GuardScope) -> Cascade {
    let mut components = Components::default();
    let mut finished: Vec<CellRef> = Vec::new();
    let mut cyclic = HashSet::new();

    components.discover(root);
    let mut walk: Vec<(CellRef, usize)> = vec![(root, 0)];

    while let Some(&(cell, seen)) = walk.last() {
        let dependents = graph.dependents_of(&cell);
        if seen < dependents.len() {
            let dep = dependents[dependents.len() - 1 - seen];
            if let Some(top) = walk.last_mut() {
                top.1 += 1;
            }
            if dep == cell {
                // Self-references are reported on their own.
                continue;
            }
            match components.visits.get(&dep).copied() {
                Some(visit) => {
                    if components.on_stack.contains(&dep) {
                        components.lower(cell, visit.index);
                    }
                }
                None => {
                    if scope.extend(dep) {
                        components.discover(dep);
                        walk.push((dep, 0));
                    }
                }
            }
            continue;
        }

        walk.pop();
        let Some(visit) = components.visits.get(&cell).copied() else {
            continue;
        };
        if let Some(&(parent, _)) = walk.last() {
            components.lower(parent, visit.low);
        }
        if visit.low == visit.index {
            let component = components.take(cell);
            if component.len() > 1 {
                cyclic.extend(component.iter().copied());
            }
            finished.extend(component);
        }
    }

    finished.reverse();
    Cascade {
        order: finished,
        cyclic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EvalGuard;
    use pretty_assertions::assert_eq;

    fn cell(name: &str) -> CellRef {
        name.parse().unwrap()
    }

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (formula_cell, refs) in edges {
            let refs: Vec<CellRef> = refs.iter().map(|r| cell(r)).collect();
            graph.set_references(cell(formula_cell), &refs);
        }
        graph
    }

    fn plan_from(graph: &DependencyGraph, root: &str) -> Cascade {
        let guard = EvalGuard::new();
        let mut scope = guard.enter(cell(root)).unwrap();
        plan(graph, cell(root), &mut scope)
    }

    #[test]
    fn test_order_puts_precedents_first() {
        // C1 reads A1 and B1, B1 reads A1; C1 registered on A1 first.
        let graph = graph(&[("C1", &["A1", "B1"]), ("B1", &["A1"])]);
        let cascade = plan_from(&graph, "A1");
        assert_eq!(cascade.order, vec![cell("A1"), cell("B1"), cell("C1")]);
        assert!(cascade.cyclic.is_empty());
    }

    #[test]
    fn test_independent_dependents_keep_registration_order() {
        let graph = graph(&[("B1", &["A1"]), ("C1", &["A1"]), ("D1", &["A1"])]);
        let cascade = plan_from(&graph, "A1");
        assert_eq!(
            cascade.order,
            vec![cell("A1"), cell("B1"), cell("C1"), cell("D1")]
        );
    }

    #[test]
    fn test_cycle_members_are_flagged_but_not_downstream_cells() {
        // X1 <-> Y1 through Z1, and W1 reads the cycle.
        let graph = graph(&[
            ("Y1", &["X1", "Z1"]),
            ("X1", &["Y1"]),
            ("Z1", &["X1"]),
            ("W1", &["Y1"]),
        ]);
        let cascade = plan_from(&graph, "X1");
        let expected: HashSet<CellRef> = [cell("X1"), cell("Y1"), cell("Z1")].into();
        assert_eq!(cascade.cyclic, expected);
        assert_eq!(cascade.order.len(), 4);
        assert_eq!(cascade.order.last(), Some(&cell("W1")));
    }

    #[test]
    fn test_self_loop_is_not_a_cycle() {
        let graph = graph(&[("A1", &["A1"])]);
        let cascade = plan_from(&graph, "A1");
        assert_eq!(cascade.order, vec![cell("A1")]);
        assert!(cascade.cyclic.is_empty());
    }

    #[test]
    fn test_long_chain_is_planned_iteratively() {
        let mut graph = DependencyGraph::new();
        for row in 1..100_000 {
            graph.set_references(CellRef::new(0, row), &[CellRef::new(0, row - 1)]);
        }
        let cascade = plan_from(&graph, "A1");
        assert_eq!(cascade.order.len(), 100_000);
        assert_eq!(cascade.order.last(), Some(&CellRef::new(0, 99_999)));
        assert!(cascade.cyclic.is_empty());
    }
}
