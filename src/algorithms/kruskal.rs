//! Minimum spanning tree by Kruskal's algorithm.
//!
//! Works directly on the weight matrix: every nonzero cell is a candidate
//! edge, an edge matched by an equal-weight edge in the other direction is
//! treated as one undirected edge, and candidates are tried cheapest first.

use crate::graph::Graph;
use serde::Serialize;

/// Candidate edge for the spanning tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// Index of the source vertex
    pub from: usize,
    /// Index of the target vertex
    pub to: usize,
    pub weight: f64,
    /// False once the reverse direction was found with the same weight
    pub directed: bool,
}

/// Candidate edges in the order Kruskal tries them.
///
/// Nonzero cells are enumerated row by row and stably sorted by weight, so
/// equal weights keep row-major order. When the reverse of an edge is
/// already a candidate with exactly the same weight, that candidate is
/// turned into an undirected edge instead of adding a second one.
pub fn candidate_edges(graph: &Graph) -> Vec<Edge> {
    let n = graph.len();
    let mut cells: Vec<(usize, usize, f64)> = Vec::new();
    for from in 0..n {
        for to in 0..n {
            let weight = graph.weight_at(from, to);
            if weight != 0.0 {
                cells.push((from, to, weight));
            }
        }
    }

    // sort_by is stable
    cells.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut edges: Vec<Edge> = Vec::with_capacity(cells.len());
    for (from, to, weight) in cells {
        let reverse = edges
            .iter_mut()
            .find(|e| e.directed && e.from == to && e.to == from && e.weight == weight);

        match reverse {
            Some(edge) => edge.directed = false,
            None => edges.push(Edge {
                from,
                to,
                weight,
                directed: true,
            }),
        }
    }

    edges
}

/// Build a minimum spanning tree of `graph`.
///
/// The result has the same vertices in the same order. Candidates are added
/// one at a time; an edge that closes a cycle is taken out again, and the
/// search stops as soon as the tree is connected. A disconnected input
/// yields a spanning forest.
#[tracing::instrument(skip(graph), fields(vertices = graph.len()))]
pub fn kruskal(graph: &Graph) -> Graph {
    let mut tree = graph.without_edges();

    for edge in candidate_edges(graph) {
        tree.set_weight(edge.from, edge.to, edge.weight, edge.directed);

        if tree.has_cycles() {
            tracing::trace!(
                from = %graph.vertex_at(edge.from),
                to = %graph.vertex_at(edge.to),
                weight = edge.weight,
                "rejected edge closing a cycle"
            );
            tree.set_weight(edge.from, edge.to, 0.0, edge.directed);
        } else {
            tracing::trace!(
                from = %graph.vertex_at(edge.from),
                to = %graph.vertex_at(edge.to),
                weight = edge.weight,
                directed = edge.directed,
                "added edge"
            );
        }

        if tree.is_connected() {
            break;
        }
    }

    tracing::debug!(
        total_weight = tree.total_weight(),
        connected = tree.is_connected(),
        "spanning tree built"
    );
    tree
}
