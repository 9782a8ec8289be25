// src/graph/mod.rs
//! Dependency graph construction, scoring and subgraph extraction.

pub mod builder;
pub mod decls;
pub mod matching;
pub mod model;
pub mod rank;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use decls::{build_decl_graph, DeclGraph, DeclLink, DeclNode};
pub use model::DependencyGraph;
pub use rank::{GraphEngine, Hotspot, RepoGraph};

/// Supplies raw file content to the reference signals.
///
/// Implementations never fail: content that cannot be read is returned as an
/// empty string, which simply produces no edges.
pub trait ContentSource {
    fn content(&self, path: &Path) -> String;
}

impl ContentSource for HashMap<PathBuf, String> {
    fn content(&self, path: &Path) -> String {
        self.get(path).cloned().unwrap_or_default()
    }
}
