// src/cli/handlers.rs
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::args::AnalyzeArgs;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::engine::Engine;
use crate::exit::ServiceMapExit;
use crate::report::console;

/// Folds command-line flags over the loaded config.
#[must_use]
pub fn apply_overrides(mut config: Config, args: &AnalyzeArgs) -> Config {
    if args.no_git {
        config.git.enabled = false;
    }
    if let Some(dir) = &args.output {
        config.report.output_dir.clone_from(dir);
    }
    if let Some(top) = args.top {
        config.report.console_hotspots = top;
    }
    config
}

/// Handles the analyze command.
///
/// # Errors
/// Returns error if the tree cannot be analyzed or the report cannot be written.
pub fn handle_analyze(args: &AnalyzeArgs) -> Result<ServiceMapExit> {
    let started = Instant::now();
    let config = apply_overrides(Config::load(args.config.as_deref()), args);

    println!(
        "{} {}",
        "Starting analysis for:".bold(),
        args.path.display()
    );
    let engine = Engine::new(config);
    let analysis = engine
        .run(&args.path)
        .with_context(|| format!("Analysis of {} failed", args.path.display()))?;

    let report_config = &engine.config().report;
    console::print_codebase_map(&analysis.report, report_config.console_hotspots);
    console::print_summary(&analysis.report);

    let out = analysis
        .report
        .write_to(&report_config.output_dir)
        .context("Report generation failed")?;
    let shown = out.canonicalize().unwrap_or(out);
    println!();
    println!("{} {}", "Report:".green().bold(), shown.display());
    println!(
        "{}",
        format!("Complete in {:.2}s", started.elapsed().as_secs_f64()).dimmed()
    );
    Ok(ServiceMapExit::Success)
}

/// Handles the init command.
///
/// # Errors
/// Returns error if the config file already exists or cannot be written.
pub fn handle_init() -> Result<ServiceMapExit> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    Config::create_default(path)?;
    println!("{} {}", "Created".green().bold(), path.display());
    println!();
    println!("Next steps:");
    println!("   1. Edit {DEFAULT_CONFIG_FILE} to customize settings");
    println!("   2. Run: servicemap analyze /path/to/backend-repos");
    Ok(ServiceMapExit::Success)
}
