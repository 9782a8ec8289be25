// src/parse/proto.rs
//! Line-oriented Protocol Buffers extractor.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{DeclKind, Declaration, FileKind, ParsedFile};

static IMPORT: LazyLock<Regex> = LazyLock::new(|| compile(r#"^import\s+(?:public\s+|weak\s+)?"([^"]+)""#));
static PACKAGE: LazyLock<Regex> = LazyLock::new(|| compile(r"^package\s+(\S+)\s*;"));
static DECLS: LazyLock<[(Regex, DeclKind); 4]> = LazyLock::new(|| {
    [
        (compile(r"^message\s+(\w+)"), DeclKind::Message),
        (compile(r"^service\s+(\w+)"), DeclKind::Service),
        (compile(r"^rpc\s+(\w+)"), DeclKind::Rpc),
        (compile(r"^enum\s+(\w+)"), DeclKind::Enum),
    ]
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid proto pattern {pattern}: {e}"))
}

#[must_use]
pub fn parse(path: &Path, component: &str, content: &str) -> ParsedFile {
    let mut file = ParsedFile::new(path, component, FileKind::Proto);

    for (idx, line) in content.lines().enumerate() {
        file.line_count = idx + 1;
        let trimmed = line.trim();

        if let Some(c) = PACKAGE.captures(trimmed) {
            file.package = Some(c[1].to_string());
        }
        if let Some(c) = IMPORT.captures(trimmed) {
            file.imports.push(c[1].to_string());
        }
        for (re, kind) in DECLS.iter() {
            if let Some(c) = re.captures(trimmed) {
                file.declarations.push(Declaration::new(&c[1], *kind));
            }
        }

        if trimmed.contains("// TODO") {
            file.todo_count += 1;
        }
        if trimmed.contains("// FIXME") {
            file.fixme_count += 1;
        }
    }

    file
}
