// src/engine.rs
//! End-to-end analysis: discover, parse, enrich, rank, detect technologies, summarize.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::discovery::{self, ScanResult};
use crate::error::{Result, ServiceMapError};
use crate::git;
use crate::graph::{GraphEngine, RepoGraph};
use crate::parse::pool::parse_all;
use crate::parse::{DiskSource, ParsedFile};
use crate::report::{build_architecture, summarize_components, AnalysisReport, ReportInput, Totals};
use crate::tech;

/// A finished analysis run.
#[derive(Debug)]
pub struct Analysis {
    pub scan: ScanResult,
    pub files: Vec<ParsedFile>,
    pub graph: RepoGraph,
    pub report: AnalysisReport,
}

/// Runs the full pipeline on the tree at `root`.
pub struct Engine {
    config: Config,
}

impl Engine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes `root`, returning the ranked graph and the report document.
    ///
    /// # Errors
    /// Returns error if `root` is not a directory, holds no source files, or
    /// holds more files than `scan.max_files`.
    pub fn run(&self, root: &Path) -> Result<Analysis> {
        info!("Scanning repositories under {}", root.display());
        let scan = discovery::scan(root, &self.config.scan)?;
        self.check_file_count(&scan)?;
        info!(
            "Found {} files across {} components",
            scan.files.len(),
            scan.components.len()
        );
        if !scan.git_repos.is_empty() {
            info!("Git repos found: {}", scan.git_repos.len());
        }

        let mut files = parse_all(&scan.jobs(), &self.config.parse);
        info!("Parsed {} files", files.len());

        let (branch, authors) = self.collect_history(&scan, &mut files);

        info!("Building dependency graph");
        let graph = GraphEngine::build(&files, &DiskSource, &self.config.rank.settings());
        info!(
            "Graph: {} nodes, {} edges",
            graph.graph().vertex_count(),
            graph.graph().edge_count()
        );

        let detected = tech::scan_tree(&scan.root);
        let technologies = tech::technology_list(&detected, &files);
        info!(
            "Technologies detected: {} ({} compose services)",
            technologies.len(),
            detected.docker_services.len()
        );

        let components = summarize_components(&files, &graph, &DiskSource);
        let architecture = build_architecture(&components, &files, &technologies);

        let report = AnalysisReport::build(ReportInput {
            root: &scan.root,
            branch,
            root_subdirs: scan.root_subdirs.clone(),
            services_root: scan.services_root.clone(),
            totals: Totals::from_files(&files),
            graph: &graph,
            components,
            technologies,
            docker_services: detected.docker_services,
            architecture,
            authors,
            file_components: files
                .iter()
                .map(|f| (f.path.clone(), f.component.clone()))
                .collect(),
            hotspot_count: self.config.report.hotspot_count,
        });

        Ok(Analysis { scan, files, graph, report })
    }

    fn check_file_count(&self, scan: &ScanResult) -> Result<()> {
        if scan.files.is_empty() {
            return Err(ServiceMapError::NoSourceFiles(scan.root.clone()));
        }
        let limit = self.config.scan.max_files;
        if scan.files.len() > limit {
            return Err(ServiceMapError::TooManyFiles {
                found: scan.files.len(),
                limit,
            });
        }
        Ok(())
    }

    fn collect_history(
        &self,
        scan: &ScanResult,
        files: &mut [ParsedFile],
    ) -> (Option<String>, HashMap<String, git::AuthorStats>) {
        if !self.config.git.enabled {
            return (None, HashMap::new());
        }
        if scan.git_repos.is_empty() {
            info!("No .git directories found, skipping history");
            return (None, HashMap::new());
        }

        info!("Analyzing git history");
        let limit = self.config.git.commit_limit;
        let mut authors = git::author_stats(&scan.git_repos, limit);
        git::enrich(&scan.git_repos, limit, files, &mut authors);
        let branch = git::current_branch(&scan.root)
            .or_else(|| scan.git_repos.iter().find_map(|r| git::current_branch(r)));
        (branch, authors)
    }
}
