// src/report/summary.rs
//! Repository totals and per-component summaries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::{build_decl_graph, ContentSource, DeclGraph, RepoGraph};
use crate::parse::{DeclKind, FileKind, FunctionSpan, ParsedFile};

/// Declaration counts keyed by kind.
pub type DeclCounts = BTreeMap<DeclKind, usize>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub go_files: usize,
    pub proto_files: usize,
    pub lines: usize,
    pub todos: usize,
    pub fixmes: usize,
    pub declarations: DeclCounts,
}

impl Totals {
    #[must_use]
    pub fn from_files<'a>(files: impl IntoIterator<Item = &'a ParsedFile>) -> Self {
        let mut totals = Self::default();
        for file in files {
            totals.files += 1;
            match file.kind {
                FileKind::Go => totals.go_files += 1,
                FileKind::Proto => totals.proto_files += 1,
            }
            totals.lines += file.line_count;
            totals.todos += file.todo_count;
            totals.fixmes += file.fixme_count;
            for decl in &file.declarations {
                *totals.declarations.entry(decl.kind).or_default() += 1;
            }
        }
        totals
    }

    #[must_use]
    pub fn count(&self, kind: DeclKind) -> usize {
        self.declarations.get(&kind).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub name: String,
    pub totals: Totals,
    pub longest_function: Option<FunctionSpan>,
    pub decl_graph: DeclGraph,
}

/// Summarizes every component, in name order.
#[must_use]
pub fn summarize_components(
    files: &[ParsedFile],
    graph: &RepoGraph,
    source: &impl ContentSource,
) -> Vec<ComponentSummary> {
    let mut groups: BTreeMap<&str, Vec<&ParsedFile>> = BTreeMap::new();
    for file in files {
        groups.entry(file.component.as_str()).or_default().push(file);
    }

    groups
        .into_iter()
        .map(|(name, members)| summarize(name, &members, graph, source))
        .collect()
}

fn summarize(
    name: &str,
    files: &[&ParsedFile],
    graph: &RepoGraph,
    source: &impl ContentSource,
) -> ComponentSummary {
    let longest_function = files
        .iter()
        .filter_map(|f| f.longest_function.as_ref())
        .max_by(|a, b| a.line_count.cmp(&b.line_count).then_with(|| b.path.cmp(&a.path)))
        .cloned();

    ComponentSummary {
        name: name.to_string(),
        totals: Totals::from_files(files.iter().copied()),
        longest_function,
        decl_graph: build_decl_graph(name, files, graph.ranks(), source),
    }
}
