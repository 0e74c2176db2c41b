mod agents;
mod cli;
mod config;
mod error;
mod logger;
mod manifest;
mod plugin;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use logger::{ConsoleLogger, Logger};
use std::path::Path;
use std::process;
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new(cli.verbose));
    let project_path = Path::new(&cli.path);
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Verify => workflow::execute_verify(project_path, config_path, logger),
        Commands::Prepare { release_version } => {
            workflow::execute_prepare(project_path, config_path, &release_version, logger)
        }
        Commands::Versions => workflow::execute_versions(project_path, config_path, logger),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
