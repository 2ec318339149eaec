//! Weighted graph stored as a dense adjacency matrix.

use crate::error::{GraphError, Result};
use crate::vertex::Vertex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

/// Weighted graph over named vertices.
///
/// `matrix[i][j]` is the weight of the edge from `vertices[i]` to
/// `vertices[j]`, with `0` meaning "no edge". An undirected edge is a pair of
/// equal cells; directed edges may differ in each direction. Self-loops are
/// allowed. Parallel edges of the same direction are not.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// Vertices in the order they were added
    vertices: Vec<Vertex>,

    /// Reverse lookup: vertex -> row/column in the matrix
    index: HashMap<Vertex, usize>,

    /// Square weight matrix, always `vertices.len()` on each side
    matrix: Vec<Vec<f64>>,
}

/// Serializable graph snapshot for import/export.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<Vertex>,
    pub matrix: Vec<Vec<f64>>,
}

#[wasm_bindgen]
impl Graph {
    /// Create an empty graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Graph {
        Graph {
            vertices: Vec::new(),
            index: HashMap::new(),
            matrix: Vec::new(),
        }
    }

    /// Number of vertices.
    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of nonzero matrix cells (an undirected edge counts twice).
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.matrix
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&w| w != 0.0)
            .count()
    }

    /// Check if every vertex can be reached from at least one vertex.
    ///
    /// Graphs with zero or one vertex are trivially connected.
    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        let n = self.len();
        if n <= 1 {
            return true;
        }
        (0..n).any(|start| self.reaches_all_from(start))
    }

    /// Check if the graph has cycles.
    ///
    /// Any self-loop is a cycle. Otherwise a depth-first walk is started
    /// from each vertex, never stepping straight back to the vertex it just
    /// left (unless the two directions carry different weights); reaching a
    /// vertex already on the walk is a cycle.
    ///
    /// The walk enumerates every path rather than marking vertices visited,
    /// so on directed acyclic graphs with many converging branches (chains
    /// of diamonds) it takes time exponential in the number of branches.
    /// [`kruskal`](crate::algorithms::kruskal::kruskal) calls this after
    /// every edge it adds and inherits the cost on such inputs.
    #[wasm_bindgen(js_name = hasCycles)]
    pub fn has_cycles(&self) -> bool {
        let n = self.len();
        if (0..n).any(|i| self.matrix[i][i] != 0.0) {
            return true;
        }
        (0..n).any(|start| self.walk_revisits(start))
    }

    /// Check if the graph is a tree (has no cycles).
    #[wasm_bindgen(js_name = isTree)]
    pub fn is_tree(&self) -> bool {
        !self.has_cycles()
    }

    /// Number of vertices whose row holds an odd number of edges.
    #[wasm_bindgen(js_name = numberOfOddNodes)]
    pub fn number_of_odd_nodes(&self) -> usize {
        self.matrix
            .iter()
            .filter(|row| row.iter().filter(|&&w| w != 0.0).count() % 2 == 1)
            .count()
    }

    /// Eulerian: no vertex has odd degree.
    #[wasm_bindgen(js_name = isEulerian)]
    pub fn is_eulerian(&self) -> bool {
        self.number_of_odd_nodes() == 0
    }

    /// Semi-Eulerian: exactly two vertices have odd degree.
    #[wasm_bindgen(js_name = isSemiEulerian)]
    pub fn is_semi_eulerian(&self) -> bool {
        self.number_of_odd_nodes() == 2
    }

    /// Sum of every matrix cell, so undirected edges count once per direction.
    #[wasm_bindgen(js_name = totalWeight)]
    pub fn total_weight(&self) -> f64 {
        self.matrix.iter().flat_map(|row| row.iter()).sum()
    }

    /// Add a vertex by name.
    #[wasm_bindgen(js_name = addVertex)]
    pub fn add_vertex_by_name(&mut self, name: &str) -> std::result::Result<(), JsError> {
        Ok(self.add_vertex(Vertex::new(name))?)
    }

    /// Add vertices from a JS array of names, stopping at the first duplicate.
    /// Names before the duplicate stay added.
    #[wasm_bindgen(js_name = addVertices)]
    pub fn add_vertices_by_name(&mut self, names: JsValue) -> std::result::Result<(), JsError> {
        let names: Vec<String> = serde_wasm_bindgen::from_value(names)?;
        Ok(self.add_vertices(names.into_iter().map(Vertex::new))?)
    }

    /// Add (or overwrite) an edge between two named vertices.
    /// `weight` defaults to 1 and `directed` to false when omitted.
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge_by_name(
        &mut self,
        from: &str,
        to: &str,
        weight: Option<f64>,
        directed: Option<bool>,
    ) -> std::result::Result<(), JsError> {
        Ok(self.add_edge(
            &Vertex::new(from),
            &Vertex::new(to),
            weight.unwrap_or(1.0),
            directed.unwrap_or(false),
        )?)
    }

    /// Remove the edge between two named vertices.
    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge_by_name(
        &mut self,
        from: &str,
        to: &str,
        directed: bool,
    ) -> std::result::Result<(), JsError> {
        Ok(self.remove_edge(&Vertex::new(from), &Vertex::new(to), directed)?)
    }

    /// Vertex names in insertion order.
    #[wasm_bindgen(js_name = vertexNames)]
    pub fn vertex_names(&self) -> js_sys::Array {
        self.vertices
            .iter()
            .map(|v| JsValue::from_str(v.name()))
            .collect()
    }

    /// Names of the vertices connected to `name`, skipping those in `avoid`
    /// (a JS array of names) unless their edge back has a different weight.
    #[wasm_bindgen(js_name = neighbors)]
    pub fn neighbors_by_name(
        &self,
        name: &str,
        avoid: JsValue,
    ) -> std::result::Result<JsValue, JsError> {
        let avoid: Vec<Vertex> = serde_wasm_bindgen::from_value(avoid)?;
        let found = self.neighbors(&Vertex::new(name), &avoid)?;
        Ok(serde_wasm_bindgen::to_value(&found)?)
    }

    /// Weighted adjacency row of a named vertex.
    #[wasm_bindgen(js_name = row)]
    pub fn row_by_name(&self, name: &str) -> std::result::Result<Vec<f64>, JsError> {
        Ok(self.row(&Vertex::new(name))?.to_vec())
    }

    /// Total weight of a path given as a JS array of names.
    #[wasm_bindgen(js_name = weightOfPath)]
    pub fn weight_of_path_by_name(&self, names: JsValue) -> std::result::Result<f64, JsError> {
        let path: Vec<Vertex> = serde_wasm_bindgen::from_value(names)?;
        Ok(self.weight_of_path(&path)?)
    }

    /// Minimum spanning tree (or forest) by Kruskal's algorithm.
    #[wasm_bindgen(js_name = kruskal)]
    pub fn minimum_spanning_tree(&self) -> Graph {
        use crate::algorithms::kruskal::kruskal;
        kruskal(self)
    }

    /// Shortest path by Dijkstra's algorithm.
    /// Returns JSON: { path: string[], distance: number }
    #[wasm_bindgen(js_name = dijkstra)]
    pub fn shortest_path_by_name(
        &self,
        start: &str,
        end: &str,
    ) -> std::result::Result<JsValue, JsError> {
        use crate::algorithms::dijkstra::shortest_path;
        let result = shortest_path(self, &Vertex::new(start), &Vertex::new(end))?;
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// Export graph as JSON snapshot.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }

    /// Import graph from JSON snapshot.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> std::result::Result<Graph, JsError> {
        Ok(json.parse::<Graph>()?)
    }

    /// Printable distance matrix, with `-` for missing edges.
    #[wasm_bindgen(js_name = toString)]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Graph {
    /// Create an empty graph with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Graph {
        Graph {
            vertices: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            matrix: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild a graph from a snapshot, checking that the matrix is square
    /// and sized to the vertex list and that no name repeats.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Graph> {
        let expected = snapshot.vertices.len();
        if snapshot.matrix.len() != expected {
            return Err(GraphError::MalformedMatrix {
                expected,
                found: snapshot.matrix.len(),
            });
        }
        if let Some(row) = snapshot.matrix.iter().find(|row| row.len() != expected) {
            return Err(GraphError::MalformedMatrix {
                expected,
                found: row.len(),
            });
        }

        let mut graph = Graph::with_capacity(expected);
        graph.add_vertices(snapshot.vertices)?;
        graph.matrix = snapshot.matrix;
        Ok(graph)
    }

    /// Snapshot of the vertex order and matrix.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self.vertices.clone(),
            matrix: self.matrix.clone(),
        }
    }

    /// The vertices, in the order they were added.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The raw weight matrix, rows in vertex order.
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    pub fn contains(&self, vertex: &Vertex) -> bool {
        self.index.contains_key(vertex)
    }

    /// Position of a vertex in the vertex list and matrix.
    pub fn index_of(&self, vertex: &Vertex) -> Option<usize> {
        self.index.get(vertex).copied()
    }

    /// Add a vertex, growing the matrix by a zero row and column.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<()> {
        if self.index.contains_key(&vertex) {
            return Err(GraphError::VertexAlreadyAdded(vertex));
        }

        let idx = self.vertices.len();
        for row in &mut self.matrix {
            row.push(0.0);
        }
        self.matrix.push(vec![0.0; idx + 1]);
        self.index.insert(vertex.clone(), idx);
        self.vertices.push(vertex);
        Ok(())
    }

    /// Add vertices in order.
    ///
    /// Stops at the first vertex that is already present and returns
    /// [`GraphError::VertexAlreadyAdded`]. Vertices added before it are kept.
    pub fn add_vertices<I>(&mut self, vertices: I) -> Result<()>
    where
        I: IntoIterator<Item = Vertex>,
    {
        for vertex in vertices {
            self.add_vertex(vertex)?;
        }
        Ok(())
    }

    /// Add an edge from `v` to `u`, overwriting any weight already there.
    ///
    /// Undirected edges also set the `u -> v` cell. Both endpoints are
    /// checked before anything is written. NaN and infinite weights are
    /// rejected with [`GraphError::InvalidWeight`].
    pub fn add_edge(&mut self, v: &Vertex, u: &Vertex, weight: f64, directed: bool) -> Result<()> {
        let vi = self.locate(v)?;
        let ui = self.locate(u)?;
        if !weight.is_finite() {
            return Err(GraphError::InvalidWeight(weight));
        }
        self.set_weight(vi, ui, weight, directed);
        Ok(())
    }

    /// Add an undirected edge of weight 1.
    pub fn add_unit_edge(&mut self, v: &Vertex, u: &Vertex) -> Result<()> {
        self.add_edge(v, u, 1.0, false)
    }

    /// Remove the edge from `v` to `u` (both directions unless `directed`).
    pub fn remove_edge(&mut self, v: &Vertex, u: &Vertex, directed: bool) -> Result<()> {
        self.add_edge(v, u, 0.0, directed)
    }

    /// Vertices connected to `vertex`, ignoring those in `avoid`.
    ///
    /// A vertex in `avoid` is still returned when the edge back from it has
    /// a different weight than the edge to it: two differently weighted
    /// directed edges are separate edges, so walking back is allowed.
    pub fn neighbors(&self, vertex: &Vertex, avoid: &[Vertex]) -> Result<Vec<Vertex>> {
        let vi = self.locate(vertex)?;
        Ok(self
            .neighbor_indices(vi, |w| avoid.contains(&self.vertices[w]))
            .map(|w| self.vertices[w].clone())
            .collect())
    }

    /// Weighted adjacency row of a vertex.
    pub fn row(&self, vertex: &Vertex) -> Result<&[f64]> {
        let vi = self.locate(vertex)?;
        Ok(&self.matrix[vi])
    }

    /// Weight of the edge from `v` to `u` (0 when there is none).
    pub fn weight(&self, v: &Vertex, u: &Vertex) -> Result<f64> {
        let vi = self.locate(v)?;
        let ui = self.locate(u)?;
        Ok(self.matrix[vi][ui])
    }

    /// Total weight of walking `path` in order.
    ///
    /// Every vertex is checked for membership first. A step with no edge
    /// fails with [`GraphError::EdgeMissing`]. Paths of zero or one vertex
    /// weigh 0.
    pub fn weight_of_path(&self, path: &[Vertex]) -> Result<f64> {
        let indices = path
            .iter()
            .map(|v| self.locate(v))
            .collect::<Result<Vec<_>>>()?;

        let mut total = 0.0;
        for step in indices.windows(2) {
            let edge = self.matrix[step[0]][step[1]];
            if edge == 0.0 {
                return Err(GraphError::EdgeMissing {
                    from: self.vertices[step[0]].clone(),
                    to: self.vertices[step[1]].clone(),
                });
            }
            total += edge;
        }
        Ok(total)
    }
}

// Internal methods (index based, used by the algorithms)
impl Graph {
    fn locate(&self, vertex: &Vertex) -> Result<usize> {
        self.index_of(vertex)
            .ok_or_else(|| GraphError::VertexMissing(vertex.clone()))
    }

    /// Get vertex count (internal).
    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn vertex_at(&self, idx: usize) -> &Vertex {
        &self.vertices[idx]
    }

    pub(crate) fn weight_at(&self, from: usize, to: usize) -> f64 {
        self.matrix[from][to]
    }

    pub(crate) fn set_weight(&mut self, from: usize, to: usize, weight: f64, directed: bool) {
        self.matrix[from][to] = weight;
        if !directed {
            self.matrix[to][from] = weight;
        }
    }

    /// Same vertices, no edges.
    pub(crate) fn without_edges(&self) -> Graph {
        let n = self.len();
        Graph {
            vertices: self.vertices.clone(),
            index: self.index.clone(),
            matrix: vec![vec![0.0; n]; n],
        }
    }

    /// Indices connected to `vertex`, in vertex order, skipping those for
    /// which `avoid` holds unless the two directions differ in weight.
    pub(crate) fn neighbor_indices<'a, F>(
        &'a self,
        vertex: usize,
        avoid: F,
    ) -> impl Iterator<Item = usize> + 'a
    where
        F: Fn(usize) -> bool + 'a,
    {
        self.matrix[vertex]
            .iter()
            .enumerate()
            .filter(move |&(w, &weight)| {
                weight != 0.0 && (!avoid(w) || self.matrix[w][vertex] != weight)
            })
            .map(|(w, _)| w)
    }

    /// Depth-first reachability from `start` with an explicit stack.
    fn reaches_all_from(&self, start: usize) -> bool {
        let n = self.len();
        let mut visited = vec![false; n];
        let mut seen = 0;
        let mut stack = vec![start];

        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            seen += 1;
            if seen == n {
                return true;
            }
            stack.extend(self.neighbor_indices(v, |w| visited[w]));
        }

        false
    }

    /// Walk every path from `start`, avoiding only the vertex just left.
    /// Returns true as soon as a walk steps onto a vertex already on it.
    fn walk_revisits(&self, start: usize) -> bool {
        let mut on_path = vec![false; self.len()];
        let mut path: Vec<usize> = Vec::new();
        // (vertex, depth of the walk when it is entered)
        let mut stack = vec![(start, 0usize)];

        while let Some((v, depth)) = stack.pop() {
            while path.len() > depth {
                if let Some(left) = path.pop() {
                    on_path[left] = false;
                }
            }
            if on_path[v] {
                return true;
            }

            let previous = path.last().copied();
            path.push(v);
            on_path[v] = true;
            stack.extend(
                self.neighbor_indices(v, |w| Some(w) == previous)
                    .map(|w| (w, depth + 1)),
            );
        }

        false
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.matrix.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for (j, &weight) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str("\t")?;
                }
                if weight == 0.0 {
                    f.write_str("-")?;
                } else {
                    write!(f, "{}", weight)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Graph {
    type Err = GraphError;

    fn from_str(json: &str) -> Result<Graph> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        Graph::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::create_vertices;

    fn graph_of(names: &str) -> (Graph, Vec<Vertex>) {
        let vs = create_vertices(names);
        let mut g = Graph::new();
        g.add_vertices(vs.clone()).unwrap();
        (g, vs)
    }

    fn assert_square(g: &Graph) {
        assert_eq!(g.matrix().len(), g.vertex_count());
        for row in g.matrix() {
            assert_eq!(row.len(), g.vertex_count());
        }
    }

    #[test]
    fn test_new_graph() {
        let g = Graph::new();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_connected());
        assert!(!g.has_cycles());
        assert!(g.is_tree());
        assert_eq!(g.total_weight(), 0.0);
        assert_eq!(g.to_string(), "");
    }

    #[test]
    fn test_add_vertex_grows_matrix() {
        let mut g = Graph::new();
        for (n, v) in create_vertices("A B C D E").into_iter().enumerate() {
            g.add_vertex(v.clone()).unwrap();
            assert!(g.contains(&v));
            assert_eq!(g.index_of(&v), Some(n));
            assert_square(&g);
        }
        assert_eq!(g.vertex_count(), 5);
    }

    #[test]
    fn test_vertex_already_added() {
        let (mut g, vs) = graph_of("A B C");
        let err = g.add_vertex(Vertex::new("A")).unwrap_err();
        assert!(matches!(err, GraphError::VertexAlreadyAdded(v) if v == vs[0]));
        assert_eq!(g.vertex_count(), 3);
        assert_square(&g);
    }

    #[test]
    fn test_add_vertices_keeps_vertices_before_duplicate() {
        let (mut g, _) = graph_of("A B");
        let err = g
            .add_vertices(create_vertices("C D A E"))
            .unwrap_err();
        assert!(matches!(err, GraphError::VertexAlreadyAdded(_)));

        let names: Vec<&str> = g.vertices().iter().map(Vertex::name).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert_square(&g);
    }

    #[test]
    fn test_add_edge_vertex_missing() {
        let vs = create_vertices("A B");
        let mut g = Graph::new();
        assert!(matches!(
            g.add_unit_edge(&vs[0], &vs[1]),
            Err(GraphError::VertexMissing(v)) if v == vs[0]
        ));

        g.add_vertex(vs[0].clone()).unwrap();
        assert!(matches!(
            g.add_unit_edge(&vs[0], &vs[1]),
            Err(GraphError::VertexMissing(v)) if v == vs[1]
        ));
        assert_eq!(g.edge_count(), 0);

        g.add_vertex(vs[1].clone()).unwrap();
        g.add_unit_edge(&vs[0], &vs[1]).unwrap();
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let (mut g, vs) = graph_of("A B");
        g.add_edge(&vs[0], &vs[1], 4.0, false).unwrap();
        for weight in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                g.add_edge(&vs[0], &vs[1], weight, true),
                Err(GraphError::InvalidWeight(_))
            ));
        }
        assert_eq!(g.weight(&vs[0], &vs[1]).unwrap(), 4.0);
        assert_eq!(g.weight(&vs[1], &vs[0]).unwrap(), 4.0);
    }

    #[test]
    fn test_directed_and_remove_edge() {
        let (mut g, vs) = graph_of("A B");
        let (a, b) = (&vs[0], &vs[1]);

        g.add_edge(a, b, 3.0, true).unwrap();
        assert_eq!(g.weight(a, b).unwrap(), 3.0);
        assert_eq!(g.weight(b, a).unwrap(), 0.0);

        g.add_edge(b, a, 5.0, true).unwrap();
        assert_eq!(g.weight(a, b).unwrap(), 3.0);
        assert_eq!(g.weight(b, a).unwrap(), 5.0);

        g.remove_edge(a, b, true).unwrap();
        assert_eq!(g.weight(a, b).unwrap(), 0.0);
        assert_eq!(g.weight(b, a).unwrap(), 5.0);

        g.add_edge(a, b, 2.0, false).unwrap();
        g.remove_edge(b, a, false).unwrap();
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_matrix_rendering() {
        let (mut g, vs) = graph_of("A B C D E");
        let (a, b, c, d, e) = (&vs[0], &vs[1], &vs[2], &vs[3], &vs[4]);

        g.add_edge(a, b, 3.0, true).unwrap();
        g.add_edge(a, e, 4.0, true).unwrap();
        g.add_edge(b, a, 2.0, true).unwrap();
        g.add_edge(b, c, 9.0, false).unwrap();
        g.add_edge(b, e, 12.0, false).unwrap();
        g.add_edge(c, d, 4.0, true).unwrap();
        g.add_edge(d, a, 7.0, true).unwrap();
        g.add_edge(e, e, 6.0, false).unwrap();

        assert_eq!(
            g.to_string(),
            "-\t3\t-\t-\t4\n2\t-\t9\t-\t12\n-\t9\t-\t4\t-\n7\t-\t-\t-\t-\n-\t12\t-\t-\t6"
        );
        assert_eq!(g.render(), g.to_string());
    }

    #[test]
    fn test_fractional_and_negative_rendering() {
        let (mut g, vs) = graph_of("A B");
        g.add_edge(&vs[0], &vs[1], 2.5, true).unwrap();
        g.add_edge(&vs[1], &vs[0], -4.0, true).unwrap();
        assert_eq!(g.to_string(), "-\t2.5\n-4\t-");
    }

    #[test]
    fn test_neighbors() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);
        g.add_edge(a, b, 1.0, false).unwrap();
        g.add_edge(a, c, 2.0, true).unwrap();
        g.add_edge(d, a, 2.0, true).unwrap();

        assert_eq!(g.neighbors(a, &[]).unwrap(), vec![b.clone(), c.clone()]);
        assert_eq!(g.neighbors(a, &[b.clone()]).unwrap(), vec![c.clone()]);
        assert!(g.neighbors(c, &[]).unwrap().is_empty());
        assert_eq!(g.neighbors(d, &[]).unwrap(), vec![a.clone()]);
        // A -> C has no edge back, so the weights differ and C stays
        assert_eq!(g.neighbors(a, &[c.clone()]).unwrap(), vec![b.clone(), c.clone()]);

        let missing = Vertex::new("Z");
        assert!(matches!(
            g.neighbors(&missing, &[]),
            Err(GraphError::VertexMissing(_))
        ));
    }

    #[test]
    fn test_neighbors_asymmetric_weights() {
        let (mut g, vs) = graph_of("A B");
        let (a, b) = (&vs[0], &vs[1]);
        g.add_edge(a, b, 3.0, true).unwrap();
        g.add_edge(b, a, 5.0, true).unwrap();

        assert_eq!(g.neighbors(b, &[a.clone()]).unwrap(), vec![a.clone()]);

        g.add_edge(b, a, 3.0, true).unwrap();
        assert!(g.neighbors(b, &[a.clone()]).unwrap().is_empty());
    }

    #[test]
    fn test_row_lookup() {
        let (mut g, vs) = graph_of("A B C");
        g.add_edge(&vs[0], &vs[2], 7.0, false).unwrap();
        assert_eq!(g.row(&vs[0]).unwrap(), &[0.0, 0.0, 7.0]);
        assert_eq!(g.row(&vs[2]).unwrap(), &[7.0, 0.0, 0.0]);
        assert!(matches!(
            g.row(&Vertex::new("Q")),
            Err(GraphError::VertexMissing(_))
        ));
    }

    #[test]
    fn test_is_connected() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);

        assert!(!g.is_connected());
        g.add_unit_edge(a, b).unwrap();
        assert!(!g.is_connected());
        g.add_unit_edge(c, d).unwrap();
        assert!(!g.is_connected());
        g.add_unit_edge(b, c).unwrap();
        assert!(g.is_connected());
    }

    #[test]
    fn test_is_connected_single_vertex() {
        let (g, _) = graph_of("A");
        assert!(g.is_connected());
    }

    #[test]
    fn test_is_connected_star() {
        let (mut g, vs) = graph_of("hub l1 l2 l3");
        for leaf in &vs[1..] {
            g.add_unit_edge(&vs[0], leaf).unwrap();
        }
        assert!(g.is_connected());
    }

    #[test]
    fn test_is_connected_follows_direction() {
        let (mut g, vs) = graph_of("A B C");
        g.add_edge(&vs[1], &vs[0], 1.0, true).unwrap();
        g.add_edge(&vs[1], &vs[2], 1.0, true).unwrap();
        // Everything is reachable from B only
        assert!(g.is_connected());

        g.remove_edge(&vs[1], &vs[2], true).unwrap();
        g.add_edge(&vs[2], &vs[1], 1.0, true).unwrap();
        // C -> B -> A
        assert!(g.is_connected());

        g.remove_edge(&vs[1], &vs[0], true).unwrap();
        g.add_edge(&vs[0], &vs[1], 1.0, true).unwrap();
        // A -> B <- C: no vertex reaches both others
        assert!(!g.is_connected());
    }

    #[test]
    fn test_has_cycles() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);

        assert!(!g.has_cycles());
        g.add_unit_edge(a, b).unwrap();
        assert!(!g.has_cycles());
        g.add_unit_edge(c, d).unwrap();
        assert!(!g.has_cycles());
        g.add_unit_edge(b, c).unwrap();
        assert!(!g.has_cycles());
        assert!(g.is_tree());

        g.add_unit_edge(a, d).unwrap();
        assert!(g.has_cycles());
        assert!(!g.is_tree());
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let (mut g, vs) = graph_of("A B");
        g.add_unit_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[1], &vs[1], 0.5, false).unwrap();
        assert!(g.has_cycles());
    }

    #[test]
    fn test_directed_cycle() {
        let (mut g, vs) = graph_of("A B C");
        g.add_edge(&vs[0], &vs[1], 1.0, true).unwrap();
        g.add_edge(&vs[1], &vs[2], 1.0, true).unwrap();
        assert!(!g.has_cycles());
        g.add_edge(&vs[2], &vs[0], 1.0, true).unwrap();
        assert!(g.has_cycles());
    }

    #[test]
    fn test_directed_diamond_is_not_a_cycle() {
        let (mut g, vs) = graph_of("A B C D");
        g.add_edge(&vs[0], &vs[1], 1.0, true).unwrap();
        g.add_edge(&vs[0], &vs[2], 1.0, true).unwrap();
        g.add_edge(&vs[1], &vs[3], 1.0, true).unwrap();
        g.add_edge(&vs[2], &vs[3], 1.0, true).unwrap();
        assert!(!g.has_cycles());
    }

    #[test]
    fn test_asymmetric_pair_is_cycle() {
        let (mut g, vs) = graph_of("A B");
        g.add_edge(&vs[0], &vs[1], 3.0, true).unwrap();
        g.add_edge(&vs[1], &vs[0], 5.0, true).unwrap();
        assert!(g.has_cycles());

        // Equal weights both ways is just an undirected edge
        g.add_edge(&vs[1], &vs[0], 3.0, true).unwrap();
        assert!(!g.has_cycles());
    }

    #[test]
    fn test_is_eulerian() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);

        g.add_unit_edge(a, b).unwrap();
        g.add_unit_edge(b, c).unwrap();
        g.add_unit_edge(c, d).unwrap();
        assert!(!g.is_eulerian());

        g.add_unit_edge(a, d).unwrap();
        assert!(g.is_eulerian());

        g.add_unit_edge(b, d).unwrap();
        assert!(!g.is_eulerian());
    }

    #[test]
    fn test_is_semi_eulerian() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);

        g.add_unit_edge(a, b).unwrap();
        g.add_unit_edge(b, c).unwrap();
        g.add_unit_edge(c, d).unwrap();
        assert!(g.is_semi_eulerian());

        g.add_unit_edge(a, d).unwrap();
        assert!(!g.is_semi_eulerian());

        g.add_unit_edge(b, d).unwrap();
        assert!(g.is_semi_eulerian());

        g.add_unit_edge(a, c).unwrap();
        assert!(!g.is_semi_eulerian());
    }

    #[test]
    fn test_self_loop_counts_once_for_parity() {
        let (mut g, vs) = graph_of("A");
        g.add_edge(&vs[0], &vs[0], 1.0, false).unwrap();
        assert_eq!(g.number_of_odd_nodes(), 1);
    }

    #[test]
    fn test_odd_nodes_even_for_every_undirected_graph() {
        // All 64 simple undirected graphs on four vertices
        let (base, vs) = graph_of("A B C D");
        let pairs: Vec<(usize, usize)> = (0..4)
            .flat_map(|i| ((i + 1)..4).map(move |j| (i, j)))
            .collect();

        for mask in 0u32..(1 << pairs.len()) {
            let mut g = base.clone();
            for (bit, &(i, j)) in pairs.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    g.add_unit_edge(&vs[i], &vs[j]).unwrap();
                }
            }
            assert_eq!(g.number_of_odd_nodes() % 2, 0, "mask {mask:#b}");
            assert_eq!(g.is_tree(), !g.has_cycles());
        }
    }

    #[test]
    fn test_total_weight_counts_both_directions() {
        let (mut g, vs) = graph_of("A B C");
        g.add_edge(&vs[0], &vs[1], 3.0, false).unwrap();
        g.add_edge(&vs[1], &vs[2], 1.5, true).unwrap();
        assert_eq!(g.total_weight(), 7.5);
    }

    #[test]
    fn test_weight_of_path() {
        let (mut g, vs) = graph_of("A B C D");
        let (a, b, c, d) = (&vs[0], &vs[1], &vs[2], &vs[3]);
        g.add_edge(a, b, 3.0, false).unwrap();
        g.add_edge(b, c, 5.0, true).unwrap();

        assert_eq!(g.weight_of_path(&[]).unwrap(), 0.0);
        assert_eq!(g.weight_of_path(&[a.clone()]).unwrap(), 0.0);
        assert_eq!(
            g.weight_of_path(&[a.clone(), b.clone(), c.clone()]).unwrap(),
            8.0
        );

        let err = g.weight_of_path(&[c.clone(), b.clone()]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::EdgeMissing { ref from, ref to } if from == c && to == b
        ));

        // Membership is checked before any step
        let err = g
            .weight_of_path(&[c.clone(), d.clone(), Vertex::new("Z")])
            .unwrap_err();
        assert!(matches!(err, GraphError::VertexMissing(v) if v.name() == "Z"));
    }

    #[test]
    fn test_json_roundtrip() {
        let (mut g, vs) = graph_of("A B C D");
        g.add_edge(&vs[0], &vs[1], 3.0, false).unwrap();
        g.add_edge(&vs[1], &vs[2], 2.5, true).unwrap();
        g.add_edge(&vs[2], &vs[0], 1.0, true).unwrap();

        let json = g.to_json();
        let g2: Graph = json.parse().unwrap();

        assert_eq!(g2, g);
        assert_eq!(g2.vertices(), g.vertices());
        assert_eq!(g2.is_connected(), g.is_connected());
        assert_eq!(g2.has_cycles(), g.has_cycles());
        assert_eq!(g2.total_weight(), g.total_weight());
        assert_eq!(g2.index_of(&vs[3]), Some(3));
    }

    #[test]
    fn test_json_roundtrip_after_rejected_infinite_weight() {
        let (mut g, vs) = graph_of("A B");
        assert!(g.add_edge(&vs[0], &vs[1], f64::INFINITY, false).is_err());
        g.add_edge(&vs[0], &vs[1], f64::MAX, false).unwrap();

        let json = g.to_json();
        assert!(!json.contains("null"));
        let g2: Graph = json.parse().unwrap();
        assert_eq!(g2, g);
        assert_eq!(g2.weight(&vs[1], &vs[0]).unwrap(), f64::MAX);
    }

    #[test]
    fn test_from_json_ok() {
        let g = Graph::from_json(r#"{"vertices":["a","b"],"matrix":[[0,1],[1,0]]}"#).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert!(g.is_connected());
    }

    #[test]
    fn test_snapshot_rejects_bad_matrix() {
        let err = r#"{"vertices":["a","b"],"matrix":[[0,1]]}"#
            .parse::<Graph>()
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedMatrix { expected: 2, found: 1 }
        ));

        let err = r#"{"vertices":["a","b"],"matrix":[[0,1],[1]]}"#
            .parse::<Graph>()
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::MalformedMatrix { expected: 2, found: 1 }
        ));

        let err = r#"{"vertices":["a","a"],"matrix":[[0,0],[0,0]]}"#
            .parse::<Graph>()
            .unwrap_err();
        assert!(matches!(err, GraphError::VertexAlreadyAdded(_)));

        let err = "{".parse::<Graph>().unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }
}
