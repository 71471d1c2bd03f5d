use crate::core::participant::ParticipantId;
use crate::graph::obligation_graph::ObligationGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rust_decimal::Decimal;
use serde::Serialize;

/// A circular flow of obligations: every participant owes the next one,
/// and the last owes the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObligationCycle {
    /// Participants in cycle order.
    pub participants: Vec<ParticipantId>,
    /// The smallest edge on the cycle; the amount that can be cancelled.
    pub bottleneck: Decimal,
}

impl ObligationCycle {
    /// The number of participants (and edges) in this cycle.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Gross obligation removed by cancelling this cycle.
    pub fn cancelled_total(&self) -> Decimal {
        self.bottleneck * Decimal::from(self.participants.len())
    }
}

/// Find one cycle among the positive edges, if any.
///
/// Strongly connected components are computed with Tarjan's algorithm;
/// the non-trivial component holding the earliest participant is searched
/// depth-first from that participant, neighbours in participant order.
/// The choice is deterministic for a given participant order.
pub fn find_cycle(graph: &ObligationGraph) -> Option<ObligationCycle> {
    let path = find_cycle_indices(graph)?;
    Some(to_cycle(graph, &path))
}

/// Cancel cycles until the positive edges form a DAG.
///
/// Each round subtracts the bottleneck from every edge of one cycle, which
/// leaves every participant's net balance untouched and zeroes at least
/// one edge. Two-party cycles (A owes B, B owes A) are cancelled the same
/// way, so no reverse pair survives.
pub fn cancel_cycles(graph: &mut ObligationGraph) -> Vec<ObligationCycle> {
    let mut cancelled = Vec::new();
    while let Some(path) = find_cycle_indices(graph) {
        let cycle = to_cycle(graph, &path);
        for (from, to) in cycle_edges(&path) {
            let remaining = graph.weight(from, to) - cycle.bottleneck;
            graph.set_weight(from, to, remaining);
        }
        log::debug!(
            "cancelled cycle of {} participants at {}",
            cycle.len(),
            cycle.bottleneck
        );
        cancelled.push(cycle);
    }
    cancelled
}

fn find_cycle_indices(graph: &ObligationGraph) -> Option<Vec<usize>> {
    let n = graph.len();
    let mut g: DiGraph<usize, ()> = DiGraph::with_capacity(n, graph.edge_count());
    let nodes: Vec<NodeIndex> = (0..n).map(|i| g.add_node(i)).collect();
    for d in 0..n {
        for c in 0..n {
            if graph.weight(d, c) > Decimal::ZERO {
                g.add_edge(nodes[d], nodes[c], ());
            }
        }
    }

    let component: Vec<usize> = tarjan_scc(&g)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| scc.into_iter().map(|node| g[node]).collect::<Vec<usize>>())
        .min_by_key(|members| members.iter().copied().min().unwrap_or(usize::MAX))?;

    let start = component.iter().copied().min()?;
    let mut in_component = vec![false; n];
    for &member in &component {
        in_component[member] = true;
    }

    let mut visited = vec![false; n];
    let mut path = Vec::new();
    if dfs_to_start(graph, start, start, &in_component, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn dfs_to_start(
    graph: &ObligationGraph,
    current: usize,
    start: usize,
    in_component: &[bool],
    visited: &mut [bool],
    path: &mut Vec<usize>,
) -> bool {
    visited[current] = true;
    path.push(current);

    for next in 0..graph.len() {
        if !in_component[next] || graph.weight(current, next) <= Decimal::ZERO {
            continue;
        }
        if next == start {
            return true;
        }
        if !visited[next] && dfs_to_start(graph, next, start, in_component, visited, path) {
            return true;
        }
    }

    path.pop();
    false
}

fn cycle_edges(path: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..path.len()).map(move |i| (path[i], path[(i + 1) % path.len()]))
}

fn to_cycle(graph: &ObligationGraph, path: &[usize]) -> ObligationCycle {
    let bottleneck = cycle_edges(path)
        .map(|(from, to)| graph.weight(from, to))
        .min()
        .unwrap_or(Decimal::ZERO);
    ObligationCycle {
        participants: path
            .iter()
            .map(|&i| graph.participants()[i].clone())
            .collect(),
        bottleneck,
    }
}
