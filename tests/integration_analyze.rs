// tests/integration_analyze.rs
//! End-to-end runs over a small multi-service tree.

use std::fs;
use std::path::Path;
use std::process::Command;

use servicemap_core::config::Config;
use servicemap_core::discovery;
use servicemap_core::engine::Engine;
use servicemap_core::error::ServiceMapError;
use servicemap_core::exit::ServiceMapExit;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Two services under `services/`, each a Go module, plus a shared proto and
/// a compose file.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "services/orders/go.mod", "module github.com/acme/orders\n");
    write(
        root,
        "services/orders/internal/store/store.go",
        "package store\n\nimport \"github.com/jackc/pgx/v5\"\n\n// OrderStore persists orders.\ntype OrderStore struct {\n\tdb string\n}\n\nfunc (s *OrderStore) Save() error {\n\treturn nil\n}\n",
    );
    write(
        root,
        "services/orders/internal/handler/handler.go",
        "package handler\n\nimport (\n\t\"github.com/acme/orders/internal/store\"\n)\n\n// TODO: validate input\nfunc HandleCreate(s *store.OrderStore) error {\n\treturn s.Save()\n}\n",
    );
    write(
        root,
        "services/orders/cmd/main.go",
        "package main\n\nimport \"github.com/acme/orders/internal/handler\"\n\nfunc main() {\n\thandler.HandleCreate(nil)\n}\n",
    );
    write(root, "services/billing/go.mod", "module github.com/acme/billing\n");
    write(
        root,
        "services/billing/api/billing.proto",
        "syntax = \"proto3\";\npackage billing;\n\nservice BillingService {\n  rpc Charge(ChargeRequest) returns (ChargeReply);\n}\n\nmessage ChargeRequest {}\nmessage ChargeReply {}\n",
    );
    write(root, "services/billing/node_modules/junk.go", "package junk\n");
    write(
        root,
        "docker-compose.yml",
        "services:\n  orders:\n    build: ./services/orders\n  db:\n    image: postgres:16\n",
    );
    write(root, "README.md", "# platform\n");
    dir
}

fn offline_config(out: &Path) -> Config {
    let mut config = Config::default();
    config.git.enabled = false;
    config.report.output_dir = out.to_path_buf();
    config
}

#[test]
fn discovery_groups_files_by_service() {
    let dir = workspace();
    let scan = discovery::scan(dir.path(), &Config::default().scan).unwrap();
    let names: Vec<&str> = scan.components.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["billing", "orders"]);
    assert_eq!(scan.files.len(), 4, "excluded dirs must be pruned");
    assert_eq!(scan.services_root.as_deref(), Some("services"));
    assert_eq!(scan.root_subdirs, vec!["services"]);
}

#[test]
fn engine_builds_graph_and_report() {
    let dir = workspace();
    let out = dir.path().join("out");
    let analysis = Engine::new(offline_config(&out)).run(dir.path()).unwrap();

    let report = &analysis.report;
    assert_eq!(report.totals.files, 4);
    assert_eq!(report.totals.proto_files, 1);
    assert_eq!(report.totals.todos, 1);
    assert!(report.branch.is_none());
    assert_eq!(report.graph.vertex_count, 4);
    assert!(report
        .graph
        .edges
        .iter()
        .any(|e| e.from.ends_with("handler.go") && e.to.ends_with("store.go")));
    assert!(report.hotspots.len() <= Config::default().report.hotspot_count);
    assert!(report.hotspots.windows(2).all(|w| w[0].score >= w[1].score));

    let orders = report
        .components
        .iter()
        .find(|c| c.name == "orders")
        .unwrap();
    assert!(orders.decl_graph.nodes.iter().any(|n| n.label == "OrderStore"));
    assert!(orders.decl_graph.nodes.iter().all(|n| n.group == "orders"));
    assert!(orders
        .decl_graph
        .nodes
        .iter()
        .any(|n| n.id == "services/orders/internal/store/store.go::OrderStore"));
    let root = dir.path().display().to_string();
    assert!(report
        .components
        .iter()
        .flat_map(|c| c.decl_graph.links.iter())
        .all(|l| !l.source.starts_with(&root) && !l.target.starts_with(&root)));

    let path = report.write_to(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["totals"]["files"], 4);
    assert!(value["components"].as_array().is_some_and(|c| c.len() == 2));
}

#[test]
fn compose_and_imports_feed_the_architecture_graph() {
    let dir = workspace();
    let out = dir.path().join("out");
    let report = Engine::new(offline_config(&out)).run(dir.path()).unwrap().report;

    assert_eq!(report.docker_services, vec!["db", "orders"]);
    for tech in ["Go", "PostgreSQL", "Protocol Buffers", "gRPC"] {
        assert!(report.technologies.iter().any(|t| t == tech), "missing {tech}");
    }

    let arch = &report.architecture;
    assert!(arch.nodes.iter().any(|n| n.id == "tech:PostgreSQL"));
    assert!(arch.nodes.iter().all(|n| n.id != "tech:Go"));
    let has_link = |source: &str, target: &str| {
        arch.links.iter().any(|l| l.source == source && l.target == target)
    };
    assert!(has_link("component:orders", "tech:PostgreSQL"));
    assert!(has_link("component:billing", "tech:gRPC"));
    assert!(!has_link("component:billing", "tech:PostgreSQL"));
}

#[test]
fn empty_tree_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.txt", "nothing to see");
    let err = Engine::new(offline_config(dir.path())).run(dir.path()).unwrap_err();
    assert!(matches!(err, ServiceMapError::NoSourceFiles(_)));
    assert!(err.is_invalid_input());
}

#[test]
fn file_limit_is_enforced() {
    let dir = workspace();
    let mut config = offline_config(dir.path());
    config.scan.max_files = 2;
    let err = Engine::new(config).run(dir.path()).unwrap_err();
    assert!(matches!(err, ServiceMapError::TooManyFiles { found: 4, limit: 2 }));
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Engine::new(offline_config(dir.path()))
        .run(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, ServiceMapError::Io { .. }));
}

#[test]
fn cli_writes_report_json() {
    let dir = workspace();
    let out = dir.path().join("report-out");
    let output = Command::new(env!("CARGO_BIN_EXE_servicemap"))
        .arg("analyze")
        .arg(dir.path())
        .arg("--no-git")
        .arg("--output")
        .arg(&out)
        .current_dir(dir.path())
        .output()
        .expect("failed to execute servicemap");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Your Codebase Map"));
    assert!(out.join("report.json").exists());
}

#[test]
fn cli_reports_invalid_input_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_servicemap"))
        .args(["analyze", ".", "--no-git"])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute servicemap");
    assert_eq!(output.status.code(), Some(ServiceMapExit::InvalidInput.code()));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_servicemap"))
            .arg("init")
            .current_dir(dir.path())
            .output()
            .expect("failed to execute servicemap")
    };
    assert!(run().status.success());
    assert!(dir.path().join("servicemap.toml").exists());
    assert!(!run().status.success());
}
