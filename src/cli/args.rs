// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "servicemap",
    version,
    about = "Maps Go and protobuf backends: dependency graph, hotspots, component views"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a tree of repositories and write report.json
    Analyze(AnalyzeArgs),
    /// Write a default servicemap.toml in the current directory
    Init,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Root of the tree to analyze
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,
    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
    /// Directory for report.json (overrides `report.output_dir`)
    #[arg(long, short, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// Number of hot zones printed to the console
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
    /// Config file (defaults to ./servicemap.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Skip git history
    #[arg(long)]
    pub no_git: bool,
}
