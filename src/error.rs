//! Error types for graph construction, queries and algorithms.

use crate::vertex::Vertex;
use thiserror::Error;

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by [`Graph`](crate::Graph) and the algorithms.
///
/// Every error is local to the call that produced it. Edge mutations are
/// rejected before anything is written, so a failed call leaves the graph
/// untouched.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{0} has already been added")]
    VertexAlreadyAdded(Vertex),

    #[error("{0} has not been added to the graph")]
    VertexMissing(Vertex),

    #[error("this path doesn't exist, there is no edge between {from} and {to}")]
    EdgeMissing { from: Vertex, to: Vertex },

    #[error("no path exists from {start} to {end}")]
    NoPathExists { start: Vertex, end: Vertex },

    #[error("edge weight must be a finite number, got {0}")]
    InvalidWeight(f64),

    #[error("matrix must be {expected}x{expected} to match the vertex list, found {found} rows or columns")]
    MalformedMatrix { expected: usize, found: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
