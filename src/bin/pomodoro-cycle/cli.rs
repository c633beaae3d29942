use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Arguments {
    /// Path to a custom configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Path to the journal of cycles and sessions, overriding the
    /// configuration
    #[arg(short, long)]
    pub journal: Option<PathBuf>,
    /// Lowest level of log messages written to stderr
    #[arg(short, long, default_value_t = Level::WARN)]
    pub verbosity: Level,
}
