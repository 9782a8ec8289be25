// src/graph/rank/graph.rs
//! The scored dependency graph and query interface.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::graph::model::DependencyGraph;
use crate::graph::rank::queries::{self, Hotspot};

/// A finished file graph together with its relevance scores.
///
/// Built once per run; neither the graph nor the scores change afterwards.
#[derive(Debug, Clone)]
pub struct RepoGraph {
    pub(crate) graph: DependencyGraph,
    pub(crate) ranks: HashMap<PathBuf, f64>,
}

impl RepoGraph {
    #[must_use]
    pub fn new(graph: DependencyGraph, ranks: HashMap<PathBuf, f64>) -> Self {
        Self { graph, ranks }
    }

    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    #[must_use]
    pub fn ranks(&self) -> &HashMap<PathBuf, f64> {
        &self.ranks
    }

    /// Score of `path`, or 0 for files outside the graph.
    #[must_use]
    pub fn score(&self, path: &Path) -> f64 {
        self.ranks.get(path).copied().unwrap_or(0.0)
    }

    /// Returns all files ranked by importance.
    #[must_use]
    pub fn ranked_files(&self) -> Vec<Hotspot> {
        queries::get_ranked_files(&self.ranks)
    }

    /// Returns at most `limit` files, highest score first.
    #[must_use]
    pub fn top_hotspots(&self, limit: usize) -> Vec<Hotspot> {
        queries::get_top_hotspots(self, limit)
    }

    /// Returns files directly connected to the anchor.
    #[must_use]
    pub fn neighbors(&self, anchor: &Path) -> Vec<PathBuf> {
        queries::get_neighbors(&self.graph, anchor)
    }

    /// Returns files that this file depends on.
    #[must_use]
    pub fn dependencies(&self, anchor: &Path) -> Vec<PathBuf> {
        queries::get_dependencies(&self.graph, anchor)
    }

    /// Returns files that depend on this file.
    #[must_use]
    pub fn dependents(&self, anchor: &Path) -> Vec<PathBuf> {
        queries::get_dependents(&self.graph, anchor)
    }

    /// Returns true if this file is a hub.
    #[must_use]
    pub fn is_hub(&self, anchor: &Path, threshold: usize) -> bool {
        self.graph.in_degree(anchor) >= threshold
    }
}
