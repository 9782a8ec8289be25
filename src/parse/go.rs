// src/parse/go.rs
//! Line-oriented Go extractor.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{DeclKind, Declaration, FileKind, FunctionSpan, ParsedFile, LONG_FUNCTION_LINES};

static IMPORT_SINGLE: LazyLock<Regex> = LazyLock::new(|| compile(r#"^import\s+(?:[\w.]+\s+)?"([^"]+)""#));
static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r#"^(?:[\w.]+\s+)?"([^"]+)""#));
static TYPE_DECL: LazyLock<Regex> = LazyLock::new(|| compile(r"^type\s+(\w+)(?:\[[^\]]*\])?\s+(struct|interface)\b"));
static TYPE_ALIAS: LazyLock<Regex> = LazyLock::new(|| compile(r"^type\s+(\w+)\s*=?\s*[\w*\[\]]"));
static FUNC_DECL: LazyLock<Regex> = LazyLock::new(|| compile(r"^func\s+(?:\([^)]*\)\s*)?(\w+)\s*[\[(]"));
static CONST_DECL: LazyLock<Regex> = LazyLock::new(|| compile(r"^const\s+(\w+)\b"));
static VAR_DECL: LazyLock<Regex> = LazyLock::new(|| compile(r"^var\s+(\w+)\b"));
static DOC_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"^//\s?(.*)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid Go pattern {pattern}: {e}"))
}

struct OpenFunction {
    name: String,
    start: usize,
    depth: i64,
}

/// Extracts package, imports, declarations and size metrics from Go source.
#[must_use]
pub fn parse(path: &Path, component: &str, content: &str) -> ParsedFile {
    let mut file = ParsedFile::new(path, component, FileKind::Go);
    let mut doc_lines: Vec<String> = Vec::new();
    let mut in_import_block = false;
    let mut open: Option<OpenFunction> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        file.line_count = line_no;
        let trimmed = line.trim();

        if file.package.is_none() {
            if let Some(pkg) = trimmed.strip_prefix("package ") {
                file.package = Some(pkg.trim().to_string());
            }
        }

        if trimmed.starts_with("import (") {
            in_import_block = true;
            continue;
        }
        if in_import_block {
            if trimmed == ")" {
                in_import_block = false;
            } else if let Some(c) = IMPORT_LINE.captures(trimmed) {
                file.imports.push(c[1].to_string());
            }
            continue;
        }
        if let Some(c) = IMPORT_SINGLE.captures(trimmed) {
            file.imports.push(c[1].to_string());
            continue;
        }

        if let Some(c) = TYPE_DECL.captures(trimmed) {
            let kind = if &c[2] == "interface" { DeclKind::Interface } else { DeclKind::Struct };
            file.declarations.push(Declaration::new(&c[1], kind));
            if file.description.is_none() && !doc_lines.is_empty() {
                file.description = Some(doc_lines.join(" "));
            }
            doc_lines.clear();
        } else if let Some(c) = TYPE_ALIAS.captures(trimmed) {
            file.declarations.push(Declaration::new(&c[1], DeclKind::Type));
        } else if let Some(c) = CONST_DECL.captures(trimmed) {
            file.declarations.push(Declaration::new(&c[1], DeclKind::Const));
        } else if let Some(c) = VAR_DECL.captures(trimmed) {
            file.declarations.push(Declaration::new(&c[1], DeclKind::Var));
        }

        if let Some(c) = FUNC_DECL.captures(trimmed) {
            file.declarations.push(Declaration::new(&c[1], DeclKind::Function));
            if open.is_none() {
                open = Some(OpenFunction { name: c[1].to_string(), start: line_no, depth: 0 });
            }
        }

        if let Some(func) = open.as_mut() {
            func.depth += brace_delta(trimmed);
            if func.depth <= 0 && trimmed.contains('}') {
                let span = FunctionSpan {
                    name: std::mem::take(&mut func.name),
                    line_count: line_no - func.start + 1,
                    path: path.to_path_buf(),
                };
                record_function(&mut file, span);
                open = None;
            }
        }

        if let Some(c) = DOC_COMMENT.captures(trimmed) {
            doc_lines.push(c[1].to_string());
        } else if !trimmed.is_empty() {
            doc_lines.clear();
        }

        if trimmed.contains("// TODO") || trimmed.contains("//TODO") {
            file.todo_count += 1;
        }
        if trimmed.contains("// FIXME") || trimmed.contains("//FIXME") {
            file.fixme_count += 1;
        }
    }

    file
}

#[allow(clippy::cast_possible_wrap)]
fn brace_delta(line: &str) -> i64 {
    line.matches('{').count() as i64 - line.matches('}').count() as i64
}

fn record_function(file: &mut ParsedFile, span: FunctionSpan) {
    let longer = file
        .longest_function
        .as_ref()
        .map_or(true, |best| span.line_count > best.line_count);
    if span.line_count >= LONG_FUNCTION_LINES {
        file.long_functions.push(span.clone());
    }
    if longer {
        file.longest_function = Some(span);
    }
}
