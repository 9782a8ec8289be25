// src/graph/rank/pagerank.rs
//! `PageRank` algorithm implementation for file ranking.
//!
//! Runs a fixed number of power iterations with no convergence check. In the
//! default mode the mass held by a vertex without outgoing edges is not spread
//! over the graph, so scores need not sum to 1.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::model::DependencyGraph;

pub const DAMPING: f64 = 0.85;
pub const ITERATIONS: usize = 100;

/// What happens to the score held by vertices with no outgoing edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    /// Dangling mass is not redistributed; totals may fall below 1.
    #[default]
    Drop,
    /// Dangling mass is spread evenly over every vertex (textbook `PageRank`).
    Redistribute,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankSettings {
    pub damping: f64,
    pub iterations: usize,
    pub dangling: DanglingPolicy,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            iterations: ITERATIONS,
            dangling: DanglingPolicy::Drop,
        }
    }
}

/// Computes `PageRank` scores for every vertex of `graph`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute(graph: &DependencyGraph, settings: &PageRankSettings) -> HashMap<PathBuf, f64> {
    if graph.is_empty() {
        return HashMap::new();
    }

    let n = graph.vertex_count() as f64;
    let mut ranks = initialize_ranks(graph, n);

    for _ in 0..settings.iterations {
        ranks = iterate_once(&ranks, graph, settings, n);
    }

    ranks
}

fn initialize_ranks(graph: &DependencyGraph, n: f64) -> HashMap<PathBuf, f64> {
    graph.vertices().map(|v| (v.clone(), 1.0 / n)).collect()
}

#[allow(clippy::cast_precision_loss)]
fn iterate_once(
    ranks: &HashMap<PathBuf, f64>,
    graph: &DependencyGraph,
    settings: &PageRankSettings,
    n: f64,
) -> HashMap<PathBuf, f64> {
    let base = (1.0 - settings.damping) / n + dangling_share(ranks, graph, settings, n);
    let mut next: HashMap<PathBuf, f64> = graph.vertices().map(|v| (v.clone(), base)).collect();

    for (vertex, rank) in ranks {
        let out = graph.out_degree(vertex);
        if out == 0 {
            continue;
        }
        let share = settings.damping * rank / out as f64;
        for neighbor in graph.successors(vertex) {
            if let Some(score) = next.get_mut(neighbor) {
                *score += share;
            }
        }
    }

    next
}

fn dangling_share(
    ranks: &HashMap<PathBuf, f64>,
    graph: &DependencyGraph,
    settings: &PageRankSettings,
    n: f64,
) -> f64 {
    match settings.dangling {
        DanglingPolicy::Drop => 0.0,
        DanglingPolicy::Redistribute => {
            let mass: f64 = ranks
                .iter()
                .filter(|(v, _)| graph.out_degree(v) == 0)
                .map(|(_, r)| r)
                .sum();
            settings.damping * mass / n
        }
    }
}
