// src/graph/model.rs
//! The file-level dependency graph container.
//!
//! Requests that would break the graph's shape (self-loops, duplicate pairs,
//! unknown endpoints) are ignored, never reported.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Directed graph over file paths with deduplicated edges and O(1) degree lookups.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    vertices: HashSet<PathBuf>,
    edges: Vec<(PathBuf, PathBuf)>,
    forward: HashMap<PathBuf, HashSet<PathBuf>>,
    reverse: HashMap<PathBuf, HashSet<PathBuf>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex. Adding a known vertex is a no-op.
    pub fn add_vertex(&mut self, id: impl Into<PathBuf>) {
        let id = id.into();
        self.forward.entry(id.clone()).or_default();
        self.reverse.entry(id.clone()).or_default();
        self.vertices.insert(id);
    }

    /// Adds `source -> target`. Returns whether the graph changed.
    pub fn add_edge(&mut self, source: &Path, target: &Path) -> bool {
        if source == target || !self.contains(source) || !self.contains(target) {
            return false;
        }
        let Some(out) = self.forward.get_mut(source) else {
            return false;
        };
        if !out.insert(target.to_path_buf()) {
            return false;
        }
        self.reverse
            .entry(target.to_path_buf())
            .or_default()
            .insert(source.to_path_buf());
        self.edges.push((source.to_path_buf(), target.to_path_buf()));
        true
    }

    #[must_use]
    pub fn contains(&self, id: &Path) -> bool {
        self.vertices.contains(id)
    }

    #[must_use]
    pub fn has_edge(&self, source: &Path, target: &Path) -> bool {
        self.forward.get(source).is_some_and(|out| out.contains(target))
    }

    #[must_use]
    pub fn out_degree(&self, id: &Path) -> usize {
        self.forward.get(id).map_or(0, HashSet::len)
    }

    #[must_use]
    pub fn in_degree(&self, id: &Path) -> usize {
        self.reverse.get(id).map_or(0, HashSet::len)
    }

    /// Out-neighbors of `id` (files it depends on), unordered.
    pub fn successors(&self, id: &Path) -> impl Iterator<Item = &PathBuf> {
        self.forward.get(id).into_iter().flatten()
    }

    /// In-neighbors of `id` (files depending on it), unordered.
    pub fn predecessors(&self, id: &Path) -> impl Iterator<Item = &PathBuf> {
        self.reverse.get(id).into_iter().flatten()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &PathBuf> {
        self.vertices.iter()
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[(PathBuf, PathBuf)] {
        &self.edges
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
