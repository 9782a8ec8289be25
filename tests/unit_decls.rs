// tests/unit_decls.rs
//! Declaration subgraph signals and caps.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use servicemap_core::graph::decls::{node_id, MAX_NODES, MAX_OUT_EDGES};
use servicemap_core::graph::{build_decl_graph, DeclGraph};
use servicemap_core::parse::{DeclKind, Declaration, FileKind, ParsedFile};

fn file(path: &str, decls: &[(&str, DeclKind)]) -> ParsedFile {
    let kind = FileKind::from_path(Path::new(path)).unwrap_or(FileKind::Go);
    let mut f = ParsedFile::new(path, "billing", kind);
    f.declarations = decls.iter().map(|(n, k)| Declaration::new(*n, *k)).collect();
    f
}

fn contents(entries: &[(&str, &str)]) -> HashMap<PathBuf, String> {
    entries
        .iter()
        .map(|(p, c)| (PathBuf::from(p), (*c).to_string()))
        .collect()
}

fn edge_set(graph: &DeclGraph) -> HashSet<(String, String)> {
    graph
        .links
        .iter()
        .map(|l| (l.source.clone(), l.target.clone()))
        .collect()
}

#[test]
fn three_colocated_declarations_link_pairwise() {
    let f = file(
        "billing/invoice.go",
        &[
            ("Invoice", DeclKind::Struct),
            ("LineItem", DeclKind::Struct),
            ("Total", DeclKind::Function),
        ],
    );
    let graph = build_decl_graph("billing", &[&f], &HashMap::new(), &contents(&[]));
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.links.len(), 6);
    assert_eq!(edge_set(&graph).len(), 6);
}

#[test]
fn single_declaration_has_no_colocation_edges() {
    let f = file("billing/one.go", &[("Invoice", DeclKind::Struct)]);
    let graph = build_decl_graph("billing", &[&f], &HashMap::new(), &contents(&[]));
    assert!(graph.links.is_empty());
}

#[test]
fn crowded_files_skip_colocation() {
    let decls: Vec<(String, DeclKind)> =
        (0..21).map(|i| (format!("Handler{i:02}"), DeclKind::Function)).collect();
    let refs: Vec<(&str, DeclKind)> = decls.iter().map(|(n, k)| (n.as_str(), *k)).collect();
    let f = file("billing/handlers.go", &refs);
    let graph = build_decl_graph("billing", &[&f], &HashMap::new(), &contents(&[]));
    assert_eq!(graph.nodes.len(), 21);
    assert!(graph.links.is_empty());
}

#[test]
fn cross_file_reference_links_every_declaration_in_the_file() {
    let store = file(
        "billing/store.go",
        &[("Store", DeclKind::Struct), ("SaveAll", DeclKind::Function)],
    );
    let model = file("billing/model.go", &[("Invoice", DeclKind::Struct)]);
    let source = contents(&[
        ("billing/store.go", "func (s *Store) SaveAll(items []Invoice) {}"),
        ("billing/model.go", "type Invoice struct{}"),
    ]);
    let graph = build_decl_graph("billing", &[&store, &model], &HashMap::new(), &source);
    let edges = edge_set(&graph);
    let invoice = node_id(&model.path, "Invoice");
    assert!(edges.contains(&(node_id(&store.path, "Store"), invoice.clone())));
    assert!(edges.contains(&(node_id(&store.path, "SaveAll"), invoice.clone())));
    assert!(!edges.iter().any(|(s, _)| *s == invoice));
}

#[test]
fn short_names_never_produce_reference_edges() {
    let a = file("billing/a.go", &[("Runner", DeclKind::Struct)]);
    let b = file("billing/b.go", &[("Job", DeclKind::Struct)]);
    let source = contents(&[("billing/a.go", "var j Job")]);
    let graph = build_decl_graph("billing", &[&a, &b], &HashMap::new(), &source);
    assert!(graph.links.is_empty());
}

#[test]
fn services_link_to_schema_declarations() {
    let proto = file(
        "billing/api.proto",
        &[
            ("BillingService", DeclKind::Service),
            ("ChargeRequest", DeclKind::Message),
            ("ChargeReply", DeclKind::Message),
        ],
    );
    let rpc = file("billing/rpc.proto", &[("Charge", DeclKind::Rpc)]);
    let source = contents(&[(
        "billing/api.proto",
        "service BillingService { rpc Charge(ChargeRequest) returns (ChargeReply); }",
    )]);
    let graph = build_decl_graph("billing", &[&proto, &rpc], &HashMap::new(), &source);
    let edges = edge_set(&graph);
    let service = node_id(&proto.path, "BillingService");
    assert!(edges.contains(&(service.clone(), node_id(&proto.path, "ChargeRequest"))));
    assert!(edges.contains(&(service, node_id(&proto.path, "ChargeReply"))));
    // Rpc declarations are never nodes on their own.
    assert!(graph.nodes.iter().all(|n| n.kind != DeclKind::Rpc));
}

#[test]
fn functions_link_to_called_functions_in_other_files() {
    let caller = file("billing/handler.go", &[("HandleCharge", DeclKind::Function)]);
    let callee = file("billing/ledger.go", &[("RecordEntry", DeclKind::Function)]);
    let source = contents(&[
        ("billing/handler.go", "func HandleCharge() { RecordEntry() }"),
        ("billing/ledger.go", "func RecordEntry() {}"),
    ]);
    let graph = build_decl_graph("billing", &[&caller, &callee], &HashMap::new(), &source);
    assert_eq!(
        edge_set(&graph),
        HashSet::from([(
            node_id(&caller.path, "HandleCharge"),
            node_id(&callee.path, "RecordEntry")
        )])
    );
}

#[test]
fn node_and_edge_caps_hold_on_large_components() {
    let mut files = Vec::new();
    let mut scores = HashMap::new();
    for i in 0..30_u32 {
        let path = format!("billing/f{i:02}.go");
        let decls: Vec<String> = (0..4).map(|j| format!("Entity{i:02}x{j}")).collect();
        let refs: Vec<(&str, DeclKind)> =
            decls.iter().map(|n| (n.as_str(), DeclKind::Struct)).collect();
        scores.insert(PathBuf::from(&path), f64::from(i) / 100.0);
        files.push(file(&path, &refs));
    }
    let refs: Vec<&ParsedFile> = files.iter().collect();
    let graph = build_decl_graph("billing", &refs, &scores, &contents(&[]));

    assert_eq!(graph.nodes.len(), MAX_NODES);
    assert!(graph.links.len() <= DeclGraph::max_edges(graph.nodes.len()));
    // Highest-scored files survive the node cap.
    assert!(graph.nodes.iter().any(|n| n.sublabel == "f29.go"));
    assert!(graph.nodes.iter().all(|n| n.sublabel != "f00.go"));

    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut out_degree: HashMap<&str, usize> = HashMap::new();
    for link in &graph.links {
        assert_ne!(link.source, link.target);
        assert!(ids.contains(link.source.as_str()));
        assert!(ids.contains(link.target.as_str()));
        *out_degree.entry(link.source.as_str()).or_default() += 1;
    }
    assert!(out_degree.values().all(|d| *d <= MAX_OUT_EDGES));
}

#[test]
fn output_is_deterministic() {
    let a = file(
        "billing/a.go",
        &[("Invoice", DeclKind::Struct), ("Payment", DeclKind::Struct)],
    );
    let b = file("billing/b.go", &[("Refund", DeclKind::Struct)]);
    let source = contents(&[("billing/b.go", "Invoice Payment")]);
    let first = build_decl_graph("billing", &[&a, &b], &HashMap::new(), &source);
    let second = build_decl_graph("billing", &[&b, &a], &HashMap::new(), &source);
    assert_eq!(first, second);
}

#[test]
fn out_edges_keep_the_best_scored_targets() {
    let caller = file("billing/caller.go", &[("Dispatch", DeclKind::Function)]);
    let names: Vec<String> = (1..=7).map(|i| format!("Step{i:02}")).collect();
    let callees: Vec<ParsedFile> = names
        .iter()
        .enumerate()
        .map(|(i, n)| file(&format!("billing/s{:02}.go", i + 1), &[(n.as_str(), DeclKind::Function)]))
        .collect();

    let mut scores = HashMap::from([(caller.path.clone(), 0.5)]);
    for (i, f) in (1..=7_u32).zip(&callees) {
        scores.insert(f.path.clone(), f64::from(i) / 100.0);
    }
    let body = names.iter().map(|n| format!("{n}()")).collect::<Vec<_>>().join("; ");
    let caller_src = format!("func Dispatch() {{ {body} }}");
    let source = contents(&[("billing/caller.go", caller_src.as_str())]);

    let mut refs: Vec<&ParsedFile> = vec![&caller];
    refs.extend(callees.iter());
    let graph = build_decl_graph("billing", &refs, &scores, &source);

    let dispatch = node_id(&caller.path, "Dispatch");
    let targets: Vec<&str> = graph
        .links
        .iter()
        .filter(|l| l.source == dispatch)
        .map(|l| l.target.as_str())
        .collect();
    let expected: Vec<String> = (3..=7)
        .rev()
        .map(|i| node_id(Path::new(&format!("billing/s{i:02}.go")), &format!("Step{i:02}")))
        .collect();
    assert_eq!(targets.len(), MAX_OUT_EDGES);
    assert_eq!(targets, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn global_budget_truncates_to_an_exact_prefix() {
    let files: Vec<ParsedFile> = (0..4)
        .map(|i| {
            let names: Vec<String> = (0..5).map(|j| format!("Ledger{i}x{j}")).collect();
            let decls: Vec<(&str, DeclKind)> =
                names.iter().map(|n| (n.as_str(), DeclKind::Struct)).collect();
            file(&format!("billing/l{i}.go"), &decls)
        })
        .collect();
    let refs: Vec<&ParsedFile> = files.iter().collect();
    let graph = build_decl_graph("billing", &refs, &HashMap::new(), &contents(&[]));

    // 4 files x 20 co-location links = 80 candidates, budget is 3 x 20.
    assert_eq!(graph.nodes.len(), 20);
    assert_eq!(DeclGraph::max_edges(20), 60);
    assert_eq!(graph.links.len(), 60);
    assert!(graph.links.iter().all(|l| !l.source.starts_with("billing/l3.go")));
    assert!(graph.links.iter().any(|l| l.source.starts_with("billing/l2.go")));

    let reversed: Vec<&ParsedFile> = files.iter().rev().collect();
    let again = build_decl_graph("billing", &reversed, &HashMap::new(), &contents(&[]));
    assert_eq!(graph, again);
}
