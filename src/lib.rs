// src/lib.rs
pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod exit;
pub mod git;
pub mod graph;
pub mod parse;
pub mod report;
pub mod tech;
