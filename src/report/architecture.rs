// src/report/architecture.rs
//! Component-to-technology graph, in the same node/link shape as the
//! declaration subgraphs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::summary::ComponentSummary;
use crate::graph::DeclLink;
use crate::parse::ParsedFile;
use crate::tech::{self, HOST_LANGUAGE};

/// Score given to every technology node.
pub const TECH_NODE_SCORE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchKind {
    Component,
    Technology,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchNode {
    pub id: String,
    pub label: String,
    pub sublabel: String,
    pub kind: ArchKind,
    pub score: f64,
    pub group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchitectureGraph {
    pub nodes: Vec<ArchNode>,
    pub links: Vec<DeclLink>,
}

#[must_use]
pub fn component_id(name: &str) -> String {
    format!("component:{name}")
}

#[must_use]
pub fn tech_id(name: &str) -> String {
    format!("tech:{name}")
}

/// `1234567` as `1,234,567`.
#[must_use]
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Links each component to the technologies its own files use.
///
/// Only technologies in `technologies` get a node, and the host language is
/// left out since every component uses it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_architecture(
    components: &[ComponentSummary],
    files: &[ParsedFile],
    technologies: &[String],
) -> ArchitectureGraph {
    let known: BTreeSet<&str> = technologies
        .iter()
        .map(String::as_str)
        .filter(|t| *t != HOST_LANGUAGE)
        .collect();

    let mut by_component: BTreeMap<&str, Vec<&ParsedFile>> = BTreeMap::new();
    for file in files {
        by_component.entry(file.component.as_str()).or_default().push(file);
    }

    let mut graph = ArchitectureGraph::default();
    let mut used: BTreeSet<String> = BTreeSet::new();
    for component in components {
        graph.nodes.push(ArchNode {
            id: component_id(&component.name),
            label: component.name.clone(),
            sublabel: format!("{} loc", thousands(component.totals.lines)),
            kind: ArchKind::Component,
            score: component.totals.lines as f64 / 1000.0,
            group: "component".to_string(),
        });

        let members = by_component
            .get(component.name.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for t in tech::file_technologies(members.iter().copied()) {
            if !known.contains(t.as_str()) {
                continue;
            }
            graph.links.push(DeclLink {
                source: component_id(&component.name),
                target: tech_id(&t),
            });
            used.insert(t);
        }
    }

    for t in used {
        graph.nodes.push(ArchNode {
            id: tech_id(&t),
            label: t,
            sublabel: "technology".to_string(),
            kind: ArchKind::Technology,
            score: TECH_NODE_SCORE,
            group: "tech".to_string(),
        });
    }
    graph
}
