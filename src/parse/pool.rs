// src/parse/pool.rs
//! Fixed-size worker pool that turns discovered files into parsed records.
//!
//! The pool lives entirely upstream of the graph: the graph only ever sees
//! the finished, path-sorted record list.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::{parse_file, ParsedFile};
use crate::config::ParseConfig;

const MAX_WORKERS: usize = 8;

/// One file to parse and the component it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJob {
    pub path: PathBuf,
    pub component: String,
}

/// Parses every job, in parallel when enabled, and returns records sorted by path.
///
/// Files that fail to read or have no extractor are dropped.
#[must_use]
pub fn parse_all(jobs: &[ParseJob], config: &ParseConfig) -> Vec<ParsedFile> {
    let mut parsed = if config.parallel {
        parse_parallel(jobs, worker_count(config.workers))
    } else {
        jobs.iter().filter_map(parse_job).collect()
    };
    parsed.sort_by(|a, b| a.path.cmp(&b.path));
    parsed
}

fn parse_parallel(jobs: &[ParseJob], workers: usize) -> Vec<ParsedFile> {
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => {
            debug!("Parsing {} files on {workers} workers", jobs.len());
            // collect() returns only after every worker has drained its share.
            pool.install(|| jobs.par_iter().filter_map(parse_job).collect())
        }
        Err(e) => {
            warn!("Worker pool unavailable ({e}), parsing sequentially");
            jobs.iter().filter_map(parse_job).collect()
        }
    }
}

fn parse_job(job: &ParseJob) -> Option<ParsedFile> {
    match parse_file(&job.path, &job.component) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Failed to parse {}: {e}", job.path.display());
            None
        }
    }
}

#[must_use]
pub fn worker_count(configured: usize) -> usize {
    if configured > 0 {
        return configured;
    }
    std::thread::available_parallelism()
        .map_or(1, std::num::NonZeroUsize::get)
        .min(MAX_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_jobs(dir: &std::path::Path) -> std::io::Result<Vec<ParseJob>> {
        let mut jobs = Vec::new();
        for i in 0..12 {
            let path = dir.join(format!("f{i:02}.go"));
            std::fs::write(&path, format!("package p\nfunc Handler{i}() {{}}\n"))?;
            jobs.push(ParseJob { path, component: "svc".into() });
        }
        jobs.push(ParseJob { path: dir.join("missing.go"), component: "svc".into() });
        jobs.push(ParseJob { path: dir.join("README.md"), component: "svc".into() });
        Ok(jobs)
    }

    #[test]
    fn parallel_and_sequential_agree() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let jobs = write_jobs(dir.path())?;

        let par = parse_all(&jobs, &ParseConfig { parallel: true, workers: 3 });
        let seq = parse_all(&jobs, &ParseConfig { parallel: false, workers: 0 });

        assert_eq!(par.len(), 12);
        assert_eq!(par, seq);
        assert!(par.windows(2).all(|w| w[0].path < w[1].path));
        Ok(())
    }

    #[test]
    fn worker_count_is_bounded() {
        assert!(worker_count(0) >= 1);
        assert!(worker_count(0) <= MAX_WORKERS);
        assert_eq!(worker_count(3), 3);
    }
}
