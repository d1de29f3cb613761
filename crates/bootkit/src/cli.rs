use std::path::PathBuf;

use bootkit_core::ConfigFormat;
use clap::{Parser, Subcommand};

/// Bootkit: dependency-ordered component bootstrapper (demo)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Print "pong" and exit, for smoke testing
    #[arg(long)]
    pub ping: bool,

    /// Settings file (.json, .yaml/.yml or .toml) with one section per
    /// component. Repeatable; sections in later files replace earlier ones
    #[arg(long, short, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Override one settings key after the files are merged. Repeatable
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Keep the started components running this long before stopping them
    #[arg(long, value_name = "MILLIS", default_value_t = 0)]
    pub run_for: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered components and their dependencies
    List {},
    /// Install the named components (all when none are given), start them,
    /// then stop and uninstall them
    Install {
        /// Component names
        names: Vec<String>,
    },
    /// Print the effective settings after merging files and overrides
    Config {
        /// Output format: json, yaml or toml
        #[arg(long, short, default_value = "json", value_parser = parse_format)]
        format: ConfigFormat,
    },
}

fn parse_format(raw: &str) -> Result<ConfigFormat, String> {
    ConfigFormat::from_extension(raw).ok_or_else(|| format!("unsupported format '{}'", raw))
}
