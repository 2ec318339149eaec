//! Named vertex identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A vertex, holding only a name.
///
/// Equality and hashing are by name, so two separately built vertices with
/// the same name are the same vertex to every graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vertex {
    name: String,
}

impl Vertex {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex \"{}\"", self.name)
    }
}

impl From<&str> for Vertex {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Vertex {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Build one vertex per space-separated name.
///
/// Only the space character separates names; tabs and newlines stay part of
/// a name. Empty pieces (repeated spaces) are skipped.
pub fn create_vertices(names: &str) -> Vec<Vertex> {
    names
        .split(' ')
        .filter(|name| !name.is_empty())
        .map(Vertex::new)
        .collect()
}
