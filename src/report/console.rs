// src/report/console.rs
use colored::Colorize;

use super::json::{AnalysisReport, HotspotEntry};
use crate::parse::DeclKind;

/// Tree-drawing prefix for row `idx` of `len`.
fn branch(idx: usize, len: usize) -> &'static str {
    if idx + 1 == len {
        "│  └─"
    } else {
        "│  ├─"
    }
}

/// Renders the hot-zone tree shown after an analysis.
#[must_use]
pub fn format_codebase_map(hotspots: &[HotspotEntry]) -> Vec<String> {
    if hotspots.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![
        "Your Codebase Map".to_string(),
        format!("├─ Hot Zones (Top {}):", hotspots.len()),
    ];
    for (idx, h) in hotspots.iter().enumerate() {
        lines.push(format!("{} {} ({:.4})", branch(idx, hotspots.len()), h.file, h.score));
    }
    lines
}

/// Prints the codebase map, limited to the first `limit` hotspots.
pub fn print_codebase_map(report: &AnalysisReport, limit: usize) {
    let shown = &report.hotspots[..limit.min(report.hotspots.len())];
    let lines = format_codebase_map(shown);
    let Some((title, rest)) = lines.split_first() else {
        return;
    };
    println!();
    println!("{}", title.bold());
    for line in rest {
        println!("{}", line.yellow());
    }
}

/// Prints the headline counts for a finished run.
pub fn print_summary(report: &AnalysisReport) {
    let t = &report.totals;
    println!();
    println!("{}", "Summary".bold());
    println!(
        "  {} files ({} go, {} proto), {} lines",
        t.files.to_string().cyan(),
        t.go_files,
        t.proto_files,
        t.lines
    );
    println!(
        "  {} structs, {} interfaces, {} functions, {} messages, {} services",
        t.count(DeclKind::Struct),
        t.count(DeclKind::Interface),
        t.count(DeclKind::Function),
        t.count(DeclKind::Message),
        t.count(DeclKind::Service),
    );
    println!(
        "  {} components, graph {} nodes / {} edges",
        report.components.len(),
        report.graph.vertex_count,
        report.graph.edge_count
    );
    if !report.technologies.is_empty() {
        println!("  tech: {}", report.technologies.join(", ").dimmed());
    }
    if t.todos + t.fixmes > 0 {
        println!(
            "  {}",
            format!("{} TODO, {} FIXME", t.todos, t.fixmes).dimmed()
        );
    }
}
