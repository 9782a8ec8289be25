// src/parse/mod.rs
//! Parsed-file records and the line-oriented extractors that produce them.

pub mod go;
pub mod pool;
pub mod proto;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceMapError};
use crate::graph::ContentSource;

/// Upper bound on bytes read from a single file during reference scanning.
pub const MAX_CONTENT_BYTES: u64 = 512 * 1024;

/// Functions at least this long are tracked as long functions.
pub const LONG_FUNCTION_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Struct,
    Interface,
    Function,
    Type,
    Const,
    Var,
    Message,
    Service,
    Rpc,
    Enum,
}

impl DeclKind {
    /// Kinds that name a type-like entity (nodes in declaration subgraphs).
    #[must_use]
    pub fn is_type_like(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Interface | Self::Message | Self::Service | Self::Enum
        )
    }

    /// Kinds whose names are searched for in other files of the same component.
    #[must_use]
    pub fn is_reference_target(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Interface | Self::Message | Self::Service
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Type => "type",
            Self::Const => "const",
            Self::Var => "var",
            Self::Message => "message",
            Self::Service => "service",
            Self::Rpc => "rpc",
            Self::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
}

impl Declaration {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self { name: name.into(), kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Go,
    Proto,
}

impl FileKind {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "go" => Some(Self::Go),
            "proto" => Some(Self::Proto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpan {
    pub name: String,
    pub line_count: usize,
    pub path: PathBuf,
}

/// Version-control history attached to a file after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitMetadata {
    pub last_modified: i64,
    pub first_commit: i64,
    pub change_frequency: usize,
    pub top_authors: Vec<String>,
    pub recent_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub component: String,
    pub kind: FileKind,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub declarations: Vec<Declaration>,
    pub line_count: usize,
    pub todo_count: usize,
    pub fixme_count: usize,
    pub description: Option<String>,
    pub longest_function: Option<FunctionSpan>,
    pub long_functions: Vec<FunctionSpan>,
    #[serde(default)]
    pub git: GitMetadata,
}

impl ParsedFile {
    /// Empty record for `path`; extractors fill it in.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, component: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            kind,
            package: None,
            imports: Vec::new(),
            declarations: Vec::new(),
            line_count: 0,
            todo_count: 0,
            fixme_count: 0,
            description: None,
            longest_function: None,
            long_functions: Vec::new(),
            git: GitMetadata::default(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parses `path` with the extractor matching its extension.
///
/// Returns `Ok(None)` for unsupported extensions.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn parse_file(path: &Path, component: &str) -> Result<Option<ParsedFile>> {
    let Some(kind) = FileKind::from_path(path) else {
        return Ok(None);
    };
    let bytes = std::fs::read(path).map_err(|e| ServiceMapError::io(e, path))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(Some(parse_source(path, component, kind, &content)))
}

#[must_use]
pub fn parse_source(path: &Path, component: &str, kind: FileKind, content: &str) -> ParsedFile {
    match kind {
        FileKind::Go => go::parse(path, component, content),
        FileKind::Proto => proto::parse(path, component, content),
    }
}

/// Reads at most [`MAX_CONTENT_BYTES`] of `path` as lossy UTF-8.
///
/// # Errors
/// Returns error if the file cannot be opened or read.
pub fn read_capped(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ServiceMapError::io(e, path))?;
    let mut buf = Vec::new();
    file.take(MAX_CONTENT_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServiceMapError::io(e, path))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads file content from disk; unreadable files are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl ContentSource for DiskSource {
    fn content(&self, path: &Path) -> String {
        read_capped(path).unwrap_or_else(|e| {
            tracing::debug!("Skipping unreadable {}: {e}", path.display());
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_capped_truncates() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("big.go");
        let size = usize::try_from(MAX_CONTENT_BYTES).unwrap_or(usize::MAX) + 100;
        std::fs::write(&path, "a".repeat(size))?;
        let content = read_capped(&path)?;
        assert_eq!(content.len() as u64, MAX_CONTENT_BYTES);
        Ok(())
    }

    #[test]
    fn disk_source_absorbs_missing_files() {
        assert!(DiskSource.content(Path::new("/definitely/not/here.go")).is_empty());
    }

    #[test]
    fn unsupported_extension_is_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello")?;
        assert!(parse_file(&path, "svc")?.is_none());
        Ok(())
    }

    #[test]
    fn stem_and_name() {
        let f = ParsedFile::new("svc/internal/store.go", "svc", FileKind::Go);
        assert_eq!(f.file_name(), "store.go");
        assert_eq!(f.file_stem(), "store");
    }
}
