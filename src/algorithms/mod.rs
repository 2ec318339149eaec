//! Graph algorithm implementations.
//!
//! Both algorithms borrow the graph read-only.

pub mod dijkstra;
pub mod kruskal;
