// src/report/mod.rs
//! Report assembly: totals, component summaries, the JSON document and the
//! console map.

pub mod architecture;
pub mod console;
pub mod json;
pub mod summary;

pub use architecture::{build_architecture, ArchitectureGraph};
pub use json::{AnalysisReport, ReportInput, REPORT_FILE};
pub use summary::{summarize_components, ComponentSummary, Totals};
