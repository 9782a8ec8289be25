// src/graph/builder.rs
//! File-level edge inference: import resolution plus cross-file type references.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use super::matching::references;
use super::model::DependencyGraph;
use super::ContentSource;
use crate::parse::ParsedFile;

/// Names shorter than this are too generic to count as a reference.
pub const MIN_TYPE_NAME_LEN: usize = 3;
/// Upper bound on reference candidates scanned per component.
pub const MAX_TYPE_CANDIDATES: usize = 500;
/// Component used for files that arrive without one.
pub const ROOT_COMPONENT: &str = "__root__";

/// Builds the whole-codebase file graph.
///
/// Every file becomes a vertex; an edge exists when any signal finds one.
#[must_use]
pub fn build_file_graph(files: &[ParsedFile], source: &impl ContentSource) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let mut ordered: Vec<&ParsedFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    for file in &ordered {
        graph.add_vertex(file.path.clone());
    }

    add_import_edges(&mut graph, &ordered);
    for (component, members) in group_by_component(&ordered) {
        let before = graph.edge_count();
        add_type_reference_edges(&mut graph, &members, source);
        debug!(
            "{component}: {} type-reference edges",
            graph.edge_count() - before
        );
    }

    graph
}

/// Lookup from bare file name, file stem and package name to a file.
///
/// When several files share a key the first one in path order wins.
#[must_use]
pub fn name_index<'a>(files: &[&'a ParsedFile]) -> HashMap<String, &'a Path> {
    let mut index: HashMap<String, &Path> = HashMap::new();
    for &file in files {
        index.entry(file.file_stem()).or_insert(&file.path);
        index.entry(file.file_name()).or_insert(&file.path);
        if let Some(pkg) = file.package.as_ref().filter(|p| !p.is_empty()) {
            index.entry(pkg.clone()).or_insert(&file.path);
        }
    }
    index
}

fn add_import_edges(graph: &mut DependencyGraph, files: &[&ParsedFile]) {
    let index = name_index(files);
    for file in files {
        for import in &file.imports {
            let base = import.rsplit('/').next().unwrap_or(import);
            if let Some(target) = index.get(base) {
                graph.add_edge(&file.path, target);
            }
        }
    }
}

fn group_by_component<'a>(files: &[&'a ParsedFile]) -> BTreeMap<&'a str, Vec<&'a ParsedFile>> {
    let mut groups: BTreeMap<&str, Vec<&ParsedFile>> = BTreeMap::new();
    for &file in files {
        let key = if file.component.is_empty() { ROOT_COMPONENT } else { file.component.as_str() };
        groups.entry(key).or_default().push(file);
    }
    groups
}

/// Declared type names and their files, as scanned for by the reference signal.
#[must_use]
pub fn type_candidates<'a>(files: &[&'a ParsedFile]) -> Vec<(&'a str, &'a Path)> {
    files
        .iter()
        .flat_map(|&f| {
            f.declarations
                .iter()
                .filter(|d| d.kind.is_reference_target() && d.name.len() >= MIN_TYPE_NAME_LEN)
                .map(move |d| (d.name.as_str(), f.path.as_path()))
        })
        .take(MAX_TYPE_CANDIDATES)
        .collect()
}

fn add_type_reference_edges(
    graph: &mut DependencyGraph,
    files: &[&ParsedFile],
    source: &impl ContentSource,
) {
    let candidates = type_candidates(files);
    if candidates.is_empty() {
        return;
    }
    for file in files {
        let content = source.content(&file.path);
        if content.is_empty() {
            continue;
        }
        for (name, owner) in &candidates {
            if *owner == file.path || graph.has_edge(&file.path, owner) {
                continue;
            }
            if references(&content, name) {
                graph.add_edge(&file.path, owner);
            }
        }
    }
}
