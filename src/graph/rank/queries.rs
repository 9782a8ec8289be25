// src/graph/rank/queries.rs
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::graph::model::DependencyGraph;
use crate::graph::rank::graph::RepoGraph;

/// A file and its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub path: PathBuf,
    pub score: f64,
}

/// Orders by score descending, then path ascending.
#[must_use]
pub fn by_score_desc(a: (&Path, f64), b: (&Path, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(b.0))
}

#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn get_ranked_files(ranks: &HashMap<PathBuf, f64>) -> Vec<Hotspot> {
    let mut ranked: Vec<Hotspot> = ranks
        .iter()
        .map(|(p, r)| Hotspot { path: p.clone(), score: *r })
        .collect();
    ranked.sort_by(|a, b| by_score_desc((&a.path, a.score), (&b.path, b.score)));
    ranked
}

#[must_use]
pub fn get_top_hotspots(graph: &RepoGraph, limit: usize) -> Vec<Hotspot> {
    if limit == 0 {
        return Vec::new();
    }
    let mut ranked = get_ranked_files(&graph.ranks);
    ranked.truncate(limit);
    ranked
}

#[must_use]
pub fn get_dependencies(graph: &DependencyGraph, anchor: &Path) -> Vec<PathBuf> {
    sorted(graph.successors(anchor))
}

#[must_use]
pub fn get_dependents(graph: &DependencyGraph, anchor: &Path) -> Vec<PathBuf> {
    sorted(graph.predecessors(anchor))
}

#[must_use]
pub fn get_neighbors(graph: &DependencyGraph, anchor: &Path) -> Vec<PathBuf> {
    let mut result = sorted(graph.successors(anchor).chain(graph.predecessors(anchor)));
    result.dedup();
    result
}

fn sorted<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = paths.cloned().collect();
    out.sort();
    out
}
