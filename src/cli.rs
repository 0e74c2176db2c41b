use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "relbump",
    about = "Release version updater - bring yarn, npm and maven manifests to a new version",
    version,
    author
)]
pub struct Cli {
    /// Working directory of the release (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: String,

    /// Configuration file (defaults to relbump.toml, relbump.json or .relbumprc.json)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that every configured package can be updated in this environment
    Verify,

    /// Validate the configuration, then set the release version on every package
    Prepare {
        /// Version to write into every manifest (e.g. 1.4.0)
        #[arg(value_name = "VERSION")]
        release_version: String,
    },

    /// Show the version currently recorded in each package's manifest
    Versions,
}
