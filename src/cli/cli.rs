use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Commands to run non-interactively, separated by ';'
    #[clap(long, short)]
    pub command: Option<String>,

    /// A YAML image describing the initial tree
    #[clap(long, short)]
    pub image: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
