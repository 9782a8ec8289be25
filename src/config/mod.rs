// src/config/mod.rs
pub mod types;

pub use self::types::{Config, GitConfig, ParseConfig, RankConfig, ReportConfig, ScanConfig};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, ServiceMapError};

pub const DEFAULT_CONFIG_FILE: &str = "servicemap.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` (or `servicemap.toml` in the working directory).
    ///
    /// A missing or malformed file yields defaults; the latter is logged.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        let Ok(content) = fs::read_to_string(&path) else {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        };
        match Self::parse_toml(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse {}, using defaults: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parses a TOML document; absent keys take their defaults.
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML for this schema.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.rank.sanitize();
        Ok(config)
    }

    /// Writes the default config to `path`, refusing to overwrite.
    ///
    /// # Errors
    /// Returns error if the file exists or cannot be written.
    pub fn create_default(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ServiceMapError::Config(format!(
                "config already exists at {}",
                path.display()
            )));
        }
        Self::default().save(path)
    }

    /// Serializes this config to `path`.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ServiceMapError::io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::rank::pagerank::DanglingPolicy;

    #[test]
    fn empty_document_is_default() -> Result<()> {
        assert_eq!(Config::parse_toml("")?, Config::default());
        Ok(())
    }

    #[test]
    fn partial_sections_keep_defaults() -> Result<()> {
        let config = Config::parse_toml(
            "[rank]\ndangling = \"redistribute\"\n[report]\nhotspot_count = 3\n",
        )?;
        assert_eq!(config.rank.dangling, DanglingPolicy::Redistribute);
        assert_eq!(config.rank.iterations, 100);
        assert_eq!(config.report.hotspot_count, 3);
        assert_eq!(config.scan.extensions, vec!["go", "proto"]);
        Ok(())
    }

    #[test]
    fn create_default_refuses_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        Config::create_default(&path)?;
        assert!(Config::create_default(&path).is_err());
        assert_eq!(Config::load(Some(&path)), Config::default());
        Ok(())
    }

    #[test]
    fn out_of_range_damping_falls_back() -> Result<()> {
        for bad in ["1.5", "-0.2", "nan", "inf"] {
            let config = Config::parse_toml(&format!("[rank]\ndamping = {bad}\n"))?;
            assert!((config.rank.damping - 0.85).abs() < f64::EPSILON, "{bad}");
        }
        let edge = Config::parse_toml("[rank]\ndamping = 1.0\n")?;
        assert!((edge.rank.damping - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn settings_never_carry_invalid_damping() {
        use crate::graph::rank::pagerank;
        use crate::graph::DependencyGraph;

        let rank = RankConfig { damping: 1.5, ..RankConfig::default() };
        let mut g = DependencyGraph::new();
        for v in ["a.go", "b.go", "c.go"] {
            g.add_vertex(v);
        }
        g.add_edge(Path::new("a.go"), Path::new("b.go"));
        let ranks = pagerank::compute(&g, &rank.settings());
        assert!(ranks.values().all(|r| *r >= 0.0), "{ranks:?}");
    }

    #[test]
    fn malformed_file_falls_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[scan\nmax_files = ")?;
        assert_eq!(Config::load(Some(&path)), Config::default());
        Ok(())
    }
}
