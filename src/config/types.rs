use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::graph::rank::pagerank::{DanglingPolicy, PageRankSettings};

/// Top-level `servicemap.toml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub rank: RankConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs(),
            extensions: default_extensions(),
            max_files: default_max_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseConfig {
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Worker count; 0 picks `min(available cpus, 8)`.
    #[serde(default)]
    pub workers: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { parallel: true, workers: 0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self { enabled: true, commit_limit: default_commit_limit() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub dangling: DanglingPolicy,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
            dangling: DanglingPolicy::default(),
        }
    }
}

impl RankConfig {
    /// True when `damping` is a finite value in `[0, 1]`.
    #[must_use]
    pub fn damping_is_valid(&self) -> bool {
        self.damping.is_finite() && (0.0..=1.0).contains(&self.damping)
    }

    /// Resets an unusable damping factor to the default.
    pub fn sanitize(&mut self) {
        if !self.damping_is_valid() {
            warn!(
                "rank.damping = {} is outside [0, 1], using {}",
                self.damping,
                default_damping()
            );
            self.damping = default_damping();
        }
    }

    #[must_use]
    pub fn settings(&self) -> PageRankSettings {
        let mut rank = self.clone();
        rank.sanitize();
        PageRankSettings {
            damping: rank.damping,
            iterations: self.iterations,
            dangling: self.dangling,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_hotspot_count")]
    pub hotspot_count: usize,
    #[serde(default = "default_console_hotspots")]
    pub console_hotspots: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            hotspot_count: default_hotspot_count(),
            console_hotspots: default_console_hotspots(),
            output_dir: default_output_dir(),
        }
    }
}

const fn default_true() -> bool { true }
const fn default_max_files() -> usize { 50_000 }
const fn default_commit_limit() -> usize { 1000 }
const fn default_damping() -> f64 { 0.85 }
const fn default_iterations() -> usize { 100 }
const fn default_hotspot_count() -> usize { 15 }
const fn default_console_hotspots() -> usize { 5 }

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

fn default_extensions() -> Vec<String> {
    vec!["go".into(), "proto".into()]
}

fn default_exclude_dirs() -> Vec<String> {
    [
        ".git", ".build", "node_modules", "vendor", "dist", "build", ".idea", ".vscode",
        "__pycache__", ".cache", "DerivedData", "Pods", "target",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}
