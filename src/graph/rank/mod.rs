// src/graph/rank/mod.rs
pub mod graph;
pub mod pagerank;
pub mod queries;

pub use graph::RepoGraph;
pub use pagerank::{DanglingPolicy, PageRankSettings};
pub use queries::Hotspot;

use tracing::debug;

use crate::graph::builder;
use crate::graph::ContentSource;
use crate::parse::ParsedFile;

/// Orchestrates graph construction and ranking.
pub struct GraphEngine;

impl GraphEngine {
    /// Builds the file graph from parsed files, then scores it.
    #[must_use]
    pub fn build(
        files: &[ParsedFile],
        source: &impl ContentSource,
        settings: &PageRankSettings,
    ) -> RepoGraph {
        let graph = builder::build_file_graph(files, source);
        debug!(
            "File graph: {} nodes, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        let ranks = pagerank::compute(&graph, settings);
        RepoGraph::new(graph, ranks)
    }
}
