use clap::Parser;
use colored::Colorize;
use servicemap_core::cli::{self, Cli, Commands};
use servicemap_core::exit::ServiceMapExit;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "servicemap_core=debug" } else { "servicemap_core=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ServiceMapExit {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Some(Commands::Analyze(args)) if args.verbose);
    init_logging(verbose);

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(ServiceMapExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            ServiceMapExit::from_error(&e)
        }
    }
}
