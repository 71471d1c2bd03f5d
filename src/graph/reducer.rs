use crate::graph::cycle_detection::cancel_cycles;
use crate::graph::obligation_graph::ObligationGraph;
use rust_decimal::Decimal;
use serde::Serialize;

/// What a reduction did to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReductionSummary {
    pub cycles_cancelled: usize,
    pub chains_collapsed: usize,
    /// Full scans of the graph by the chain collapse, the last one finding
    /// nothing.
    pub scans: usize,
}

/// Shrinks an obligation graph without changing anyone's net balance.
///
/// Runs an optional cycle-cancellation pre-pass and then, unless disabled,
/// collapses two-hop chains (A owes B, B owes C) into direct obligations
/// (A owes C) until none is left. The scan order is the graph's participant order,
/// so the result is reproducible, though other orders could produce a
/// different graph with the same balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphReducer {
    cancel_cycles: bool,
    collapse_chains: bool,
}

impl GraphReducer {
    pub fn new() -> Self {
        Self {
            cancel_cycles: true,
            collapse_chains: true,
        }
    }

    /// Enable or disable the cycle-cancellation pre-pass.
    pub fn with_cycle_cancellation(mut self, enabled: bool) -> Self {
        self.cancel_cycles = enabled;
        self
    }

    /// Enable or disable chain collapse.
    pub fn with_chain_collapse(mut self, enabled: bool) -> Self {
        self.collapse_chains = enabled;
        self
    }

    /// Reduce a copy of `graph`.
    pub fn reduce(&self, graph: &ObligationGraph) -> ObligationGraph {
        let mut reduced = graph.clone();
        self.reduce_in_place(&mut reduced);
        reduced
    }

    pub fn reduce_in_place(&self, graph: &mut ObligationGraph) -> ReductionSummary {
        let cycles_cancelled = if self.cancel_cycles {
            cancel_cycles(graph).len()
        } else {
            0
        };
        let (chains_collapsed, scans) = if self.collapse_chains {
            collapse_chains(graph)
        } else {
            (0, 0)
        };

        let summary = ReductionSummary {
            cycles_cancelled,
            chains_collapsed,
            scans,
        };
        log::debug!(
            "reduced graph: {} cycles cancelled, {} chains collapsed, {} edges left",
            summary.cycles_cancelled,
            summary.chains_collapsed,
            graph.edge_count()
        );
        summary
    }
}

impl Default for GraphReducer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce `graph` with the default reducer (cycle pre-pass enabled).
///
/// # Examples
///
/// ```
/// use split_settle::core::obligation::Obligation;
/// use split_settle::core::participant::ParticipantId;
/// use split_settle::graph::obligation_graph::ObligationGraph;
/// use split_settle::graph::reducer::reduce;
/// use rust_decimal_macros::dec;
///
/// let [a, b, c] = ["a", "b", "c"].map(ParticipantId::new);
/// let mut graph = ObligationGraph::new(vec![a.clone(), b.clone(), c.clone()]);
/// graph.add_obligation(&Obligation::new(a.clone(), b.clone(), dec!(10)));
/// graph.add_obligation(&Obligation::new(b.clone(), c.clone(), dec!(10)));
///
/// let reduced = reduce(&graph);
/// assert_eq!(reduced.amount(&a, &c), dec!(10));
/// assert_eq!(reduced.amount(&a, &b), dec!(0));
/// assert_eq!(reduced.amount(&b, &c), dec!(0));
/// ```
pub fn reduce(graph: &ObligationGraph) -> ObligationGraph {
    GraphReducer::default().reduce(graph)
}

/// Collapse two-hop chains until none is left. Returns the number of
/// collapses and the number of scans.
///
/// Each step takes the first triple (p1, p2, p3) in participant order with
/// positive p1→p2 and p2→p3, moves `m = min(p1→p2, p2→p3)` onto p1→p3 and
/// takes it off both original edges. When p3 is p1 the two reverse edges
/// are netted against each other instead. Every step removes at least one
/// cent of total edge weight, so the loop ends.
pub fn collapse_chains(graph: &mut ObligationGraph) -> (usize, usize) {
    let mut collapsed = 0;
    let mut scans = 0;
    loop {
        scans += 1;
        match find_chain(graph) {
            Some((p1, p2, p3)) => {
                collapse(graph, p1, p2, p3);
                collapsed += 1;
            }
            None => break,
        }
    }
    (collapsed, scans)
}

fn find_chain(graph: &ObligationGraph) -> Option<(usize, usize, usize)> {
    let n = graph.len();
    for p1 in 0..n {
        for p2 in 0..n {
            if p2 == p1 || graph.weight(p1, p2) <= Decimal::ZERO {
                continue;
            }
            for p3 in 0..n {
                if p3 != p2 && graph.weight(p2, p3) > Decimal::ZERO {
                    return Some((p1, p2, p3));
                }
            }
        }
    }
    None
}

fn collapse(graph: &mut ObligationGraph, p1: usize, p2: usize, p3: usize) {
    let first = graph.weight(p1, p2);
    let second = graph.weight(p2, p3);
    let moved = first.min(second);

    graph.set_weight(p1, p2, first - moved);
    graph.set_weight(p2, p3, second - moved);
    if p3 != p1 {
        graph.add_weight(p1, p3, moved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::obligation::Obligation;
    use crate::core::participant::ParticipantId;
    use rust_decimal_macros::dec;

    fn graph_of(names: &[&str], edges: &[(&str, &str, Decimal)]) -> ObligationGraph {
        let mut graph = ObligationGraph::new(names.iter().map(|n| ParticipantId::new(*n)).collect());
        for (d, c, amount) in edges {
            graph.add_obligation(&Obligation::new(
                ParticipantId::new(*d),
                ParticipantId::new(*c),
                *amount,
            ));
        }
        graph
    }

    fn pid(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    #[test]
    fn test_transitive_collapse() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B", dec!(10)), ("B", "C", dec!(10))]);
        let reduced = reduce(&graph);
        assert_eq!(reduced.amount(&pid("A"), &pid("C")), dec!(10));
        assert_eq!(reduced.amount(&pid("A"), &pid("B")), Decimal::ZERO);
        assert_eq!(reduced.amount(&pid("B"), &pid("C")), Decimal::ZERO);
    }

    #[test]
    fn test_uneven_chain_keeps_remainder() {
        // A owes B 15, B owes C 10: A pays C 10 directly, A still owes B 5
        let graph = graph_of(&["A", "B", "C"], &[("A", "B", dec!(15)), ("B", "C", dec!(10))]);
        let reduced = reduce(&graph);
        assert_eq!(reduced.amount(&pid("A"), &pid("C")), dec!(10));
        assert_eq!(reduced.amount(&pid("A"), &pid("B")), dec!(5));
        assert_eq!(reduced.amount(&pid("B"), &pid("C")), Decimal::ZERO);
    }

    #[test]
    fn test_long_chain() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", dec!(20)),
                ("B", "C", dec!(20)),
                ("C", "D", dec!(20)),
            ],
        );
        let reduced = reduce(&graph);
        assert_eq!(reduced.amount(&pid("A"), &pid("D")), dec!(20));
        assert_eq!(reduced.edge_count(), 1);
    }

    #[test]
    fn test_reduction_preserves_balances() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", dec!(12.50)),
                ("B", "C", dec!(7.25)),
                ("C", "D", dec!(30)),
                ("D", "A", dec!(4)),
                ("B", "D", dec!(9.99)),
            ],
        );
        let reduced = reduce(&graph);
        assert_eq!(reduced.balances(), graph.balances());
        assert!(!reduced.has_chain());
    }

    #[test]
    fn test_cycles_without_pre_pass() {
        let mut graph = graph_of(
            &["A", "B", "C"],
            &[
                ("A", "B", dec!(10)),
                ("B", "C", dec!(10)),
                ("C", "A", dec!(10)),
            ],
        );
        let summary = GraphReducer::new()
            .with_cycle_cancellation(false)
            .reduce_in_place(&mut graph);
        assert_eq!(summary.cycles_cancelled, 0);
        assert!(summary.chains_collapsed > 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_cycles_cancelled_without_chain_collapse() {
        // a three-way cycle of 5 on top of a chain A -> B -> C
        let mut graph = graph_of(
            &["A", "B", "C"],
            &[
                ("A", "B", dec!(15)),
                ("B", "C", dec!(5)),
                ("C", "A", dec!(5)),
            ],
        );
        let before = graph.balances();
        let summary = GraphReducer::new()
            .with_chain_collapse(false)
            .reduce_in_place(&mut graph);

        assert_eq!(summary.cycles_cancelled, 1);
        assert_eq!(summary.chains_collapsed, 0);
        assert_eq!(summary.scans, 0);
        assert_eq!(graph.amount(&pid("A"), &pid("B")), dec!(10));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.balances(), before);
    }

    #[test]
    fn test_everything_disabled_leaves_graph_alone() {
        let mut graph = graph_of(&["A", "B", "C"], &[("A", "B", dec!(10)), ("B", "C", dec!(10))]);
        let original = graph.clone();
        let summary = GraphReducer::new()
            .with_cycle_cancellation(false)
            .with_chain_collapse(false)
            .reduce_in_place(&mut graph);
        assert_eq!(summary, ReductionSummary::default());
        assert_eq!(graph, original);
    }

    #[test]
    fn test_summary_counts_cycles() {
        let mut graph = graph_of(&["A", "B"], &[("A", "B", dec!(10)), ("B", "A", dec!(4))]);
        let summary = GraphReducer::default().reduce_in_place(&mut graph);
        assert_eq!(summary.cycles_cancelled, 1);
        assert_eq!(summary.chains_collapsed, 0);
        assert_eq!(summary.scans, 1);
        assert_eq!(graph.amount(&pid("A"), &pid("B")), dec!(6));
    }
}
