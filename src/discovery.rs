// src/discovery.rs
//! Walks a tree of repositories, collecting source files and grouping them
//! into components (one per discovered service).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{Result, ServiceMapError};
use crate::parse::pool::ParseJob;

/// Component for files sitting directly in the scanned root.
pub const ROOT_COMPONENT: &str = "root";

/// Directory names that typically hold several services.
const CONTAINER_DIRS: &[&str] = &[
    "src", "services", "service", "apps", "microservices", "svc", "cmd", "modules",
    "components", "backend", "packages", "projects", "server", "servers",
];

/// Files whose presence marks a directory as a service.
const SERVICE_MARKERS: &[&str] = &[
    "Dockerfile", "go.mod", "main.go", "package.json", "requirements.txt", "setup.py",
    "pyproject.toml", "pom.xml", "build.gradle", "build.gradle.kts", "Cargo.toml",
    "composer.json", "Gemfile", "mix.exs", "CMakeLists.txt", "Makefile", "Program.cs", ".git",
];

/// Markers that make a first-level directory its own repository.
const REPO_MARKERS: &[&str] = &[".git", "go.mod", "Dockerfile", "Makefile", "docker-compose.yml"];

const KNOWN_CONTAINERS: &[&str] = &["services", "service", "apps", "microservices", "svc"];
const LAYOUT_DIRS: &[&str] = &["proto", "api", "pkg"];

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Every matching source file, sorted.
    pub files: Vec<PathBuf>,
    /// Component name to its files.
    pub components: BTreeMap<String, Vec<PathBuf>>,
    /// Sorted first-level directory names.
    pub root_subdirs: Vec<String>,
    /// Directories that contain a `.git` entry.
    pub git_repos: Vec<PathBuf>,
    /// Dominant parent of the service directories (e.g. `services`), if any.
    pub services_root: Option<String>,
}

impl ScanResult {
    /// One parse job per file, tagged with its component.
    #[must_use]
    pub fn jobs(&self) -> Vec<ParseJob> {
        self.components
            .iter()
            .flat_map(|(component, files)| {
                files.iter().map(move |path| ParseJob {
                    path: path.clone(),
                    component: component.clone(),
                })
            })
            .collect()
    }
}

/// Runs the discovery pipeline under `root`.
///
/// # Errors
/// Returns error if `root` does not exist or is not a directory.
pub fn scan(root: &Path, config: &ScanConfig) -> Result<ScanResult> {
    let root = root.canonicalize().map_err(|e| ServiceMapError::io(e, root))?;
    if !root.is_dir() {
        return Err(ServiceMapError::NotADirectory(root));
    }

    let excluded: HashSet<&str> = config.exclude_dirs.iter().map(String::as_str).collect();
    let extensions: HashSet<String> =
        config.extensions.iter().map(|e| e.trim_start_matches('.').to_ascii_lowercase()).collect();

    let service_dirs = discover_service_dirs(&root, &excluded);
    let mut result = ScanResult {
        services_root: detect_services_root(&root, &service_dirs),
        git_repos: find_git_repos(&root, &service_dirs, &excluded),
        root_subdirs: list_subdirs(&root, &excluded)
            .iter()
            .filter_map(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect(),
        root: root.clone(),
        ..ScanResult::default()
    };

    let (files, error_count) = walk_sources(&root, &excluded, &extensions);
    if error_count > 0 {
        debug!("Encountered {error_count} errors during file walk");
    }
    for path in files {
        let component = detect_component(&root, &path, &service_dirs);
        result.components.entry(component).or_default().push(path.clone());
        result.files.push(path);
    }
    result.files.sort();
    for files in result.components.values_mut() {
        files.sort();
    }

    Ok(result)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn should_prune(entry: &DirEntry, excluded: &HashSet<&str>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    is_hidden(&name) || excluded.contains(&*name)
}

fn walk_sources(
    root: &Path,
    excluded: &HashSet<&str>,
    extensions: &HashSet<String>,
) -> (Vec<PathBuf>, usize) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !should_prune(e, excluded));

    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) if entry.file_type().is_file() => {
                let matches = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase()));
                if matches {
                    paths.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(_) => errors += 1,
        }
    }
    (paths, errors)
}

/// Sorted, visible, non-excluded child directories of `dir`.
fn list_subdirs(dir: &Path, excluded: &HashSet<&str>) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            !is_hidden(&name) && !excluded.contains(name.as_str())
        })
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_container(path: &Path) -> bool {
    CONTAINER_DIRS.contains(&dir_name(path).to_ascii_lowercase().as_str())
}

/// A directory is a service if it holds a build/deploy marker or a repository.
#[must_use]
pub fn is_service_dir(dir: &Path) -> bool {
    if SERVICE_MARKERS.iter().any(|m| dir.join(m).exists()) {
        return true;
    }
    fs::read_dir(dir).is_ok_and(|entries| {
        entries
            .filter_map(std::result::Result::ok)
            .any(|e| e.file_name().to_string_lossy().ends_with(".csproj"))
    })
}

/// Finds service directories up to three levels below `root`.
fn discover_service_dirs(root: &Path, excluded: &HashSet<&str>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for level1 in list_subdirs(root, excluded) {
        if is_service_dir(&level1) {
            dirs.push(level1);
            continue;
        }
        let children = list_subdirs(&level1, excluded);
        if is_container(&level1) {
            dirs.extend(children.into_iter().filter(|d| is_service_dir(d)));
            continue;
        }
        for level2 in children.iter().filter(|d| is_container(d)) {
            dirs.extend(
                list_subdirs(level2, excluded)
                    .into_iter()
                    .filter(|d| is_service_dir(d)),
            );
        }
    }
    dirs
}

fn detect_services_root(root: &Path, service_dirs: &[PathBuf]) -> Option<String> {
    let mut parents: HashMap<String, usize> = HashMap::new();
    for dir in service_dirs {
        let Ok(rel) = dir.strip_prefix(root) else {
            continue;
        };
        let parts: Vec<_> = rel.components().collect();
        if parts.len() >= 2 {
            let first = parts[0].as_os_str().to_string_lossy().into_owned();
            *parents.entry(first).or_default() += 1;
        }
    }
    parents
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(name, _)| name)
}

fn find_git_repos(root: &Path, service_dirs: &[PathBuf], excluded: &HashSet<&str>) -> Vec<PathBuf> {
    let mut repos = Vec::new();
    if root.join(".git").exists() {
        repos.push(root.to_path_buf());
    }
    let candidates = list_subdirs(root, excluded).into_iter().chain(service_dirs.iter().cloned());
    for dir in candidates {
        if dir.join(".git").exists() && !repos.contains(&dir) {
            repos.push(dir);
        }
    }
    repos
}

/// Infers the component a file belongs to from its location.
#[must_use]
pub fn detect_component(root: &Path, file: &Path, service_dirs: &[PathBuf]) -> String {
    if let Some(dir) = service_dirs.iter().find(|d| file.starts_with(d)) {
        return dir_name(dir);
    }

    let Ok(rel) = file.strip_prefix(root) else {
        return ROOT_COMPONENT.to_string();
    };
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let Some((_, dirs)) = parts.split_last() else {
        return ROOT_COMPONENT.to_string();
    };
    let Some(first) = dirs.first() else {
        return ROOT_COMPONENT.to_string();
    };

    if REPO_MARKERS.iter().any(|m| root.join(first).join(m).exists()) {
        return first.clone();
    }

    let after = |names: &[&str]| -> Option<String> {
        dirs.windows(2)
            .find(|w| names.contains(&w[0].as_str()))
            .map(|w| w[1].clone())
    };
    after(&["cmd"])
        .or_else(|| after(KNOWN_CONTAINERS))
        .or_else(|| after(LAYOUT_DIRS))
        .or_else(|| after(&["internal"]))
        .unwrap_or_else(|| first.clone())
}
