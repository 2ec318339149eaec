//! Single-source shortest path by Dijkstra's algorithm.
//!
//! Runs in two phases. The labelling phase finalizes every vertex with its
//! shortest distance from the start. The reconstruction phase walks back
//! from the end, each step choosing a predecessor whose final distance plus
//! the connecting edge equals the current vertex's final distance.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::vertex::Vertex;
use serde::Serialize;

/// Configuration for path reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct DijkstraConfig {
    /// Decimal places distances are rounded to before being compared while
    /// walking back from the end vertex.
    pub decimal_places: i32,
}

impl Default for DijkstraConfig {
    fn default() -> Self {
        Self { decimal_places: 5 }
    }
}

/// Shortest path with its total distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    /// Vertices from start to end
    pub path: Vec<Vertex>,
    pub distance: f64,
}

/// Working state of one vertex during a run.
#[derive(Debug, Clone)]
struct DijkstraVertex {
    working_distance: f64,
    final_distance: Option<f64>,
}

impl DijkstraVertex {
    fn unvisited() -> Self {
        Self {
            working_distance: f64::INFINITY,
            final_distance: None,
        }
    }

    fn visited(&self) -> bool {
        self.final_distance.is_some()
    }

    /// Final distance, infinity until visited.
    fn distance(&self) -> f64 {
        self.final_distance.unwrap_or(f64::INFINITY)
    }
}

/// Shortest path from `start` to `end` as a list of vertices.
pub fn dijkstra(graph: &Graph, start: &Vertex, end: &Vertex) -> Result<Vec<Vertex>> {
    shortest_path(graph, start, end).map(|result| result.path)
}

/// [`dijkstra`] with explicit configuration.
pub fn dijkstra_with_config(
    graph: &Graph,
    start: &Vertex,
    end: &Vertex,
    config: &DijkstraConfig,
) -> Result<Vec<Vertex>> {
    shortest_path_with_config(graph, start, end, config).map(|result| result.path)
}

/// Shortest path and its distance with default configuration.
pub fn shortest_path(graph: &Graph, start: &Vertex, end: &Vertex) -> Result<ShortestPath> {
    shortest_path_with_config(graph, start, end, &DijkstraConfig::default())
}

/// Shortest path and its distance.
///
/// # Errors
/// - [`GraphError::VertexMissing`] if `start` or `end` is not in the graph.
/// - [`GraphError::NoPathExists`] if `end` cannot be reached from `start`,
///   or no predecessor matches while walking back (possible with negative
///   weights, which this algorithm does not support).
///
/// When several unvisited vertices share the smallest working distance, the
/// one added to the graph first is finalized first.
#[tracing::instrument(skip_all, fields(start = %start, end = %end, vertices = graph.len()))]
pub fn shortest_path_with_config(
    graph: &Graph,
    start: &Vertex,
    end: &Vertex,
    config: &DijkstraConfig,
) -> Result<ShortestPath> {
    let start_idx = graph
        .index_of(start)
        .ok_or_else(|| GraphError::VertexMissing(start.clone()))?;
    let end_idx = graph
        .index_of(end)
        .ok_or_else(|| GraphError::VertexMissing(end.clone()))?;

    if start_idx == end_idx {
        return Ok(ShortestPath {
            path: vec![start.clone()],
            distance: 0.0,
        });
    }

    let states = label(graph, start_idx);

    let distance = states[end_idx].distance();
    if distance.is_infinite() {
        tracing::debug!("end vertex is unreachable");
        return Err(GraphError::NoPathExists {
            start: start.clone(),
            end: end.clone(),
        });
    }

    let indices = walk_back(graph, &states, start_idx, end_idx, config).ok_or_else(|| {
        GraphError::NoPathExists {
            start: start.clone(),
            end: end.clone(),
        }
    })?;

    let path: Vec<Vertex> = indices
        .into_iter()
        .map(|i| graph.vertex_at(i).clone())
        .collect();
    tracing::debug!(distance, hops = path.len() - 1, "shortest path found");

    Ok(ShortestPath { path, distance })
}

/// Labelling phase: finalize every vertex, unreachable ones at infinity.
fn label(graph: &Graph, start: usize) -> Vec<DijkstraVertex> {
    label_in_order(graph, start).0
}

/// Labelling phase, also returning the indices in the order they were
/// finalized.
fn label_in_order(graph: &Graph, start: usize) -> (Vec<DijkstraVertex>, Vec<usize>) {
    let n = graph.len();
    let mut states = vec![DijkstraVertex::unvisited(); n];
    states[start].working_distance = 0.0;
    states[start].final_distance = Some(0.0);
    let mut order = Vec::with_capacity(n);
    order.push(start);

    let mut current = start;
    for _ in 1..n {
        let base = states[current].distance();

        let neighbors: Vec<usize> = graph
            .neighbor_indices(current, |w| states[w].visited())
            .filter(|&w| !states[w].visited())
            .collect();
        for w in neighbors {
            let candidate = base + graph.weight_at(current, w);
            if candidate < states[w].working_distance {
                states[w].working_distance = candidate;
            }
        }

        // Only a strictly smaller distance displaces a lower index
        let mut next: Option<usize> = None;
        for (i, state) in states.iter().enumerate() {
            if state.visited() {
                continue;
            }
            match next {
                Some(best) if states[best].working_distance <= state.working_distance => {}
                _ => next = Some(i),
            }
        }

        let Some(next) = next else { break };
        states[next].final_distance = Some(states[next].working_distance);
        tracing::trace!(
            vertex = %graph.vertex_at(next),
            distance = states[next].working_distance,
            "finalized"
        );
        order.push(next);
        current = next;
    }

    (states, order)
}

/// Reconstruction phase: indices from start to end, or `None` when some
/// step has no matching predecessor.
fn walk_back(
    graph: &Graph,
    states: &[DijkstraVertex],
    start: usize,
    end: usize,
    config: &DijkstraConfig,
) -> Option<Vec<usize>> {
    let n = graph.len();
    let mut on_path = vec![false; n];
    on_path[end] = true;
    let mut reversed = vec![end];

    // Start first so a direct edge wins a tie
    let order: Vec<usize> = std::iter::once(start)
        .chain((0..n).filter(|&i| i != start))
        .collect();

    let mut current = end;
    while current != start {
        let target = states[current].distance();
        let predecessor = order.iter().copied().find(|&p| {
            let weight = graph.weight_at(p, current);
            !on_path[p]
                && weight != 0.0
                && round_to(target - weight, config.decimal_places)
                    == round_to(states[p].distance(), config.decimal_places)
        });

        match predecessor {
            Some(p) => {
                on_path[p] = true;
                reversed.push(p);
                current = p;
            }
            None => {
                tracing::warn!(
                    at = %graph.vertex_at(current),
                    "no predecessor matches the final distance"
                );
                return None;
            }
        }
    }

    reversed.reverse();
    Some(reversed)
}

fn round_to(value: f64, decimal_places: i32) -> f64 {
    let factor = 10f64.powi(decimal_places);
    (value * factor).round() / factor
}
