// src/git.rs
//! Commit history collected by shelling out to `git`.
//!
//! Every command failure degrades to empty data: a tree without history is
//! still analyzable.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use crate::parse::{GitMetadata, ParsedFile};

const COMMIT_MARKER: &str = "__COMMIT__";
const RECENT_MESSAGES: usize = 5;
const TOP_AUTHORS: usize = 3;

/// Repository-wide statistics for one author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub total_commits: usize,
    pub first_commit: i64,
    pub last_commit: i64,
    pub files_modified: usize,
    pub component_counts: BTreeMap<String, usize>,
}

/// History of a single path within one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHistory {
    pub change_count: usize,
    pub first_commit: i64,
    pub last_commit: i64,
    pub author_counts: HashMap<String, usize>,
    pub messages: Vec<String>,
}

impl FileHistory {
    fn record(&mut self, author: &str, timestamp: i64, message: &str) {
        self.change_count += 1;
        self.last_commit = self.last_commit.max(timestamp);
        if self.first_commit == 0 || (timestamp > 0 && timestamp < self.first_commit) {
            self.first_commit = timestamp;
        }
        *self.author_counts.entry(author.to_string()).or_default() += 1;
        if self.messages.len() < RECENT_MESSAGES {
            self.messages.push(message.to_string());
        }
    }

    /// Most frequent authors, ties broken by name.
    #[must_use]
    pub fn top_authors(&self, limit: usize) -> Vec<String> {
        let mut counts: Vec<(&String, &usize)> = self.author_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        counts.into_iter().take(limit).map(|(name, _)| name.clone()).collect()
    }

    fn to_metadata(&self) -> GitMetadata {
        GitMetadata {
            last_modified: self.last_commit,
            first_commit: self.first_commit,
            change_frequency: self.change_count,
            top_authors: self.top_authors(TOP_AUTHORS),
            recent_messages: self.messages.clone(),
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().ok()?;
    if !output.status.success() {
        debug!(
            "git {} failed in {}: {}",
            args.join(" "),
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Name of the checked-out branch, if `repo` is a git repository.
#[must_use]
pub fn current_branch(repo: &Path) -> Option<String> {
    run_git(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
        .map(|out| out.trim().to_string())
        .filter(|b| !b.is_empty())
}

/// Parses `git log --pretty=format:%an%x09%at` output into author stats.
pub fn parse_author_log(log: &str, stats: &mut HashMap<String, AuthorStats>) {
    for line in log.lines() {
        let Some((author, ts)) = line.split_once('\t') else {
            continue;
        };
        let timestamp = ts.trim().parse::<i64>().unwrap_or(0);
        if timestamp <= 0 {
            continue;
        }
        let entry = stats.entry(author.to_string()).or_default();
        entry.total_commits += 1;
        if entry.first_commit == 0 || timestamp < entry.first_commit {
            entry.first_commit = timestamp;
        }
        entry.last_commit = entry.last_commit.max(timestamp);
    }
}

/// Parses batched `git log --name-only` output into per-path history.
///
/// Each commit block is author, timestamp, subject, then the touched paths.
#[must_use]
pub fn parse_name_only_log(log: &str) -> HashMap<String, FileHistory> {
    let mut stats: HashMap<String, FileHistory> = HashMap::new();
    for block in log.split(&format!("{COMMIT_MARKER}\n")) {
        let mut lines = block.lines();
        let (Some(author), Some(ts), Some(message)) = (lines.next(), lines.next(), lines.next())
        else {
            continue;
        };
        let timestamp = ts.trim().parse::<i64>().unwrap_or(0);
        for path in lines.map(str::trim).filter(|l| !l.is_empty()) {
            stats.entry(path.to_string()).or_default().record(author, timestamp, message);
        }
    }
    stats
}

/// Collects author stats across all repositories.
#[must_use]
pub fn author_stats(repos: &[PathBuf], commit_limit: usize) -> HashMap<String, AuthorStats> {
    let limit = format!("-{commit_limit}");
    let mut stats = HashMap::new();
    for repo in repos {
        if let Some(log) = run_git(repo, &["log", &limit, "--pretty=format:%an%x09%at"]) {
            parse_author_log(&log, &mut stats);
        }
    }
    stats
}

fn file_history(repo: &Path, commit_limit: usize) -> HashMap<String, FileHistory> {
    let limit = format!("-{commit_limit}");
    let format = format!("--pretty=format:{COMMIT_MARKER}%n%an%n%at%n%s");
    run_git(repo, &["log", &limit, &format, "--name-only"])
        .map(|log| parse_name_only_log(&log))
        .unwrap_or_default()
}

/// Attaches history to `files` and credits their top authors in `authors`.
///
/// Files whose path is absent from every repository's log are left untouched.
pub fn enrich(
    repos: &[PathBuf],
    commit_limit: usize,
    files: &mut [ParsedFile],
    authors: &mut HashMap<String, AuthorStats>,
) {
    let mut merged: HashMap<PathBuf, FileHistory> = HashMap::new();
    for repo in repos {
        for (rel, history) in file_history(repo, commit_limit) {
            merged.insert(repo.join(rel), history);
        }
    }
    info!(
        "Batch git log parsed ({} file entries from {} repos)",
        merged.len(),
        repos.len()
    );
    apply_history(&merged, files, authors);
}

/// Copies merged history onto matching files.
#[allow(clippy::implicit_hasher)]
pub fn apply_history(
    history: &HashMap<PathBuf, FileHistory>,
    files: &mut [ParsedFile],
    authors: &mut HashMap<String, AuthorStats>,
) {
    for file in files.iter_mut() {
        let Some(entry) = history.get(&file.path) else {
            continue;
        };
        file.git = entry.to_metadata();
        for author in &file.git.top_authors {
            if let Some(stats) = authors.get_mut(author) {
                stats.files_modified += 1;
                *stats.component_counts.entry(file.component.clone()).or_default() += 1;
            }
        }
    }
}
