//! Weighted graphs with minimum spanning trees and shortest paths.
//!
//! A [`Graph`] is a dense adjacency matrix over named [`Vertex`] values.
//! Build one with [`Graph::add_vertex`] and [`Graph::add_edge`], query its
//! structure, then run [`kruskal`](algorithms::kruskal::kruskal) or
//! [`dijkstra`](algorithms::dijkstra::dijkstra) on it. The same type is
//! exported to JavaScript through `wasm-bindgen`, with vertices addressed by
//! name.

use wasm_bindgen::prelude::*;

pub mod algorithms;
mod error;
mod graph;
mod vertex;

pub use algorithms::dijkstra::{dijkstra, shortest_path, DijkstraConfig, ShortestPath};
pub use algorithms::kruskal::{kruskal, Edge};
pub use error::{GraphError, Result};
pub use graph::{Graph, GraphSnapshot};
pub use vertex::{create_vertices, Vertex};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
