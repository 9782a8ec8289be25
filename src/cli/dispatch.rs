//! Command dispatch logic extracted from binary to reduce main function size.

use super::{
    args::Commands,
    handlers::{handle_analyze, handle_init},
};
use crate::exit::ServiceMapExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<ServiceMapExit> {
    match command {
        Commands::Analyze(args) => handle_analyze(&args),
        Commands::Init => handle_init(),
    }
}
