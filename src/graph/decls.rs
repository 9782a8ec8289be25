// src/graph/decls.rs
//! Per-component declaration subgraphs.
//!
//! Nodes are type-like declarations and functions; edges come from four
//! signals (cross-file references, co-location, schema linkage, calls) that
//! collapse on the `(source, target)` pair. The result is capped so a
//! renderer can draw it as-is.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::matching::references;
use super::ContentSource;
use crate::parse::{DeclKind, ParsedFile};

pub const MAX_NODES: usize = 80;
pub const MIN_NODE_NAME_LEN: usize = 3;
/// Names shorter than this never produce a reference edge.
pub const MIN_REFERENCE_NAME_LEN: usize = 5;
pub const COLOCATION_MIN: usize = 2;
pub const COLOCATION_MAX: usize = 20;
pub const MAX_OUT_EDGES: usize = 5;
/// Floor applied to node scores so zero-score files still render.
pub const MIN_NODE_SCORE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclNode {
    pub id: String,
    pub label: String,
    pub sublabel: String,
    pub kind: DeclKind,
    pub score: f64,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeclLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclGraph {
    pub nodes: Vec<DeclNode>,
    pub links: Vec<DeclLink>,
}

impl DeclGraph {
    /// Edge budget for a graph with `node_count` nodes.
    #[must_use]
    pub fn max_edges(node_count: usize) -> usize {
        (node_count * 3).max(10)
    }
}

#[must_use]
pub fn node_id(file: &Path, name: &str) -> String {
    format!("{}::{name}", file.display())
}

struct Candidate<'a> {
    id: String,
    name: &'a str,
    file: &'a Path,
    file_name: String,
    kind: DeclKind,
    score: f64,
}

/// Builds the declaration subgraph for one component.
///
/// `scores` holds file-level relevance; files missing from it score 0.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_decl_graph(
    component: &str,
    files: &[&ParsedFile],
    scores: &HashMap<PathBuf, f64>,
    source: &impl ContentSource,
) -> DeclGraph {
    let candidates = collect_candidates(files, scores);
    if candidates.is_empty() {
        return DeclGraph::default();
    }

    let contents = read_contents(&candidates, source);
    let mut edges = EdgeSet::default();
    link_cross_file_references(&candidates, &contents, &mut edges);
    link_colocated(&candidates, &mut edges);
    link_schema(&candidates, &contents, &mut edges);
    link_calls(&candidates, &contents, &mut edges);

    let links = edges.capped(&candidates);
    let nodes = candidates
        .into_iter()
        .map(|c| DeclNode {
            id: c.id,
            label: c.name.to_string(),
            sublabel: c.file_name,
            kind: c.kind,
            score: c.score,
            group: component.to_string(),
        })
        .collect();

    DeclGraph { nodes, links }
}

fn collect_candidates<'a>(
    files: &[&'a ParsedFile],
    scores: &HashMap<PathBuf, f64>,
) -> Vec<Candidate<'a>> {
    let mut ordered: Vec<&ParsedFile> = files.to_vec();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut seen: HashSet<(&Path, &str)> = HashSet::new();
    let mut out = Vec::new();
    for file in ordered {
        let score = scores.get(&file.path).copied().unwrap_or(0.0).max(MIN_NODE_SCORE);
        let declared = file
            .declarations
            .iter()
            .filter(|d| d.kind.is_type_like() || d.kind == DeclKind::Function)
            .filter(|d| d.name.len() >= MIN_NODE_NAME_LEN)
            .map(|d| (d.name.as_str(), d.kind));
        // Long functions normally repeat a declaration; the seen-set keeps one node.
        let long = file
            .long_functions
            .iter()
            .map(|f| (f.name.as_str(), DeclKind::Function));

        for (name, kind) in declared.chain(long) {
            if name.is_empty() || !seen.insert((file.path.as_path(), name)) {
                continue;
            }
            out.push(Candidate {
                id: node_id(&file.path, name),
                name,
                file: file.path.as_path(),
                file_name: file.file_name(),
                kind,
                score,
            });
        }
    }

    if out.len() > MAX_NODES {
        out.sort_by(|a, b| by_score_then_id(a.score, &a.id, b.score, &b.id));
        out.truncate(MAX_NODES);
    }
    out
}

fn by_score_then_id(a_score: f64, a_id: &str, b_score: f64, b_id: &str) -> Ordering {
    b_score
        .partial_cmp(&a_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_id.cmp(b_id))
}

fn read_contents<'a>(
    candidates: &[Candidate<'a>],
    source: &impl ContentSource,
) -> HashMap<&'a Path, String> {
    let mut contents = HashMap::new();
    for c in candidates {
        contents.entry(c.file).or_insert_with(|| source.content(c.file));
    }
    contents
}

fn file_groups(candidates: &[Candidate<'_>]) -> BTreeMap<PathBuf, Vec<usize>> {
    let mut groups: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (idx, c) in candidates.iter().enumerate() {
        groups.entry(c.file.to_path_buf()).or_default().push(idx);
    }
    groups
}

/// Any declaration in a file links to every other-file declaration whose name appears there.
fn link_cross_file_references(
    candidates: &[Candidate<'_>],
    contents: &HashMap<&Path, String>,
    edges: &mut EdgeSet,
) {
    for (file, members) in file_groups(candidates) {
        let Some(content) = contents.get(file.as_path()).filter(|c| !c.is_empty()) else {
            continue;
        };
        for (t, target) in candidates.iter().enumerate() {
            if target.file == file || target.name.len() < MIN_REFERENCE_NAME_LEN {
                continue;
            }
            if !references(content, target.name) {
                continue;
            }
            for &s in &members {
                if candidates[s].name != target.name {
                    edges.add(s, t);
                }
            }
        }
    }
}

/// Declarations sharing a moderately sized file are linked both ways.
fn link_colocated(candidates: &[Candidate<'_>], edges: &mut EdgeSet) {
    for members in file_groups(candidates).values() {
        if !(COLOCATION_MIN..=COLOCATION_MAX).contains(&members.len()) {
            continue;
        }
        for &s in members {
            for &t in members {
                if s != t && candidates[s].name != candidates[t].name {
                    edges.add(s, t);
                }
            }
        }
    }
}

/// Services link to the messages and rpcs named in their file.
fn link_schema(
    candidates: &[Candidate<'_>],
    contents: &HashMap<&Path, String>,
    edges: &mut EdgeSet,
) {
    for (s, service) in candidates.iter().enumerate() {
        if service.kind != DeclKind::Service {
            continue;
        }
        let Some(content) = contents.get(service.file).filter(|c| !c.is_empty()) else {
            continue;
        };
        for (t, target) in candidates.iter().enumerate() {
            let schema_kind = matches!(target.kind, DeclKind::Message | DeclKind::Rpc);
            if schema_kind
                && target.name.len() >= MIN_REFERENCE_NAME_LEN
                && references(content, target.name)
            {
                edges.add(s, t);
            }
        }
    }
}

/// A function links to other-file functions named in its own file.
fn link_calls(
    candidates: &[Candidate<'_>],
    contents: &HashMap<&Path, String>,
    edges: &mut EdgeSet,
) {
    for (s, caller) in candidates.iter().enumerate() {
        if caller.kind != DeclKind::Function {
            continue;
        }
        let Some(content) = contents.get(caller.file).filter(|c| !c.is_empty()) else {
            continue;
        };
        for (t, callee) in candidates.iter().enumerate() {
            if callee.kind != DeclKind::Function
                || callee.file == caller.file
                || callee.name == caller.name
                || callee.name.len() < MIN_REFERENCE_NAME_LEN
            {
                continue;
            }
            if references(content, callee.name) {
                edges.add(s, t);
            }
        }
    }
}

/// Deduplicated candidate edges, keyed by node index.
#[derive(Default)]
struct EdgeSet {
    seen: HashSet<(usize, usize)>,
    outgoing: BTreeMap<usize, Vec<usize>>,
}

impl EdgeSet {
    fn add(&mut self, source: usize, target: usize) {
        if source != target && self.seen.insert((source, target)) {
            self.outgoing.entry(source).or_default().push(target);
        }
    }

    /// Keeps the best-scored targets per source, then applies the global budget.
    fn capped(mut self, candidates: &[Candidate<'_>]) -> Vec<DeclLink> {
        let budget = DeclGraph::max_edges(candidates.len());
        let mut links = Vec::new();
        for (source, targets) in &mut self.outgoing {
            targets.sort_by(|&a, &b| {
                let (a, b) = (&candidates[a], &candidates[b]);
                by_score_then_id(a.score, &a.id, b.score, &b.id)
            });
            for &target in targets.iter().take(MAX_OUT_EDGES) {
                links.push(DeclLink {
                    source: candidates[*source].id.clone(),
                    target: candidates[target].id.clone(),
                });
            }
        }
        links.truncate(budget);
        links
    }
}
