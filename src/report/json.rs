// src/report/json.rs
//! The `report.json` document handed to renderers.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::architecture::ArchitectureGraph;
use super::summary::{ComponentSummary, Totals};
use crate::error::{Result, ServiceMapError};
use crate::git::AuthorStats;
use crate::graph::{DeclGraph, DeclLink, RepoGraph};

pub const REPORT_FILE: &str = "report.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotEntry {
    pub path: String,
    pub file: String,
    pub component: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSection {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub project: String,
    pub branch: Option<String>,
    pub root_subdirs: Vec<String>,
    pub services_root: Option<String>,
    pub totals: Totals,
    pub graph: GraphSection,
    pub hotspots: Vec<HotspotEntry>,
    pub components: Vec<ComponentSummary>,
    pub technologies: Vec<String>,
    pub docker_services: Vec<String>,
    pub architecture: ArchitectureGraph,
    pub authors: BTreeMap<String, AuthorStats>,
}

/// Renders `path` relative to `root` with forward slashes.
#[must_use]
pub fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Rewrites a `path::name` declaration id so its path is relative to `root`.
fn relative_decl_id(root: &Path, id: &str) -> String {
    match id.rsplit_once("::") {
        Some((path, name)) => format!("{}::{name}", relative(root, Path::new(path))),
        None => id.to_string(),
    }
}

fn relativize_decl_graph(root: &Path, graph: &mut DeclGraph) {
    for node in &mut graph.nodes {
        node.id = relative_decl_id(root, &node.id);
    }
    for DeclLink { source, target } in &mut graph.links {
        *source = relative_decl_id(root, source);
        *target = relative_decl_id(root, target);
    }
}

fn relativize_component(root: &Path, mut component: ComponentSummary) -> ComponentSummary {
    relativize_decl_graph(root, &mut component.decl_graph);
    if let Some(span) = &mut component.longest_function {
        span.path = PathBuf::from(relative(root, &span.path));
    }
    component
}

/// Everything the report needs, gathered by the analysis pipeline.
pub struct ReportInput<'a> {
    pub root: &'a Path,
    pub branch: Option<String>,
    pub root_subdirs: Vec<String>,
    pub services_root: Option<String>,
    pub totals: Totals,
    pub graph: &'a RepoGraph,
    pub components: Vec<ComponentSummary>,
    pub technologies: Vec<String>,
    pub docker_services: Vec<String>,
    pub architecture: ArchitectureGraph,
    pub authors: HashMap<String, AuthorStats>,
    /// Component of each file, for labelling hotspots.
    pub file_components: HashMap<PathBuf, String>,
    pub hotspot_count: usize,
}

impl AnalysisReport {
    #[must_use]
    pub fn build(input: ReportInput<'_>) -> Self {
        let root = input.root;
        let file_graph = input.graph.graph();

        let edges = file_graph
            .edges()
            .iter()
            .map(|(from, to)| EdgeEntry {
                from: relative(root, from),
                to: relative(root, to),
            })
            .collect();

        let hotspots = input
            .graph
            .top_hotspots(input.hotspot_count)
            .into_iter()
            .map(|h| HotspotEntry {
                path: relative(root, &h.path),
                file: h
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                component: input.file_components.get(&h.path).cloned().unwrap_or_default(),
                score: h.score,
            })
            .collect();

        Self {
            project: root
                .file_name()
                .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned()),
            branch: input.branch,
            root_subdirs: input.root_subdirs,
            services_root: input.services_root,
            totals: input.totals,
            graph: GraphSection {
                vertex_count: file_graph.vertex_count(),
                edge_count: file_graph.edge_count(),
                edges,
            },
            hotspots,
            components: input
                .components
                .into_iter()
                .map(|c| relativize_component(root, c))
                .collect(),
            technologies: input.technologies,
            docker_services: input.docker_services,
            architecture: input.architecture,
            authors: input.authors.into_iter().collect(),
        }
    }

    /// Writes the report as pretty JSON into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns error if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| ServiceMapError::io(e, dir))?;
        let path = dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| ServiceMapError::io(e, &path))?;
        Ok(path)
    }
}
