//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for blueprint
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about = "Guided architecture-decision interview that writes your design document")]
#[command(long_about = r#"
Blueprint interviews you about a software project and writes a design
document from your answers.

The interview runs in phases:
1. Intent: you describe the project, blueprint extracts name, scope, goals
2. Planning: a question set is generated across fixed architecture categories
3. Interview: questions are asked one at a time; answers map automatically
4. Confirmation: review and correct answers, then ask to generate
5. Synthesis: the design document is written

Configuration files are loaded from (in priority order):
1. --config <path>            Explicit config file
2. ./blueprint.toml           Project-level config
3. ~/.config/blueprint/config.toml   Global config

Example:
  blueprint "I want a realtime chat app for small teams"
  blueprint --model gpt-4o --config ./my-blueprint.toml
"#)]
pub struct Cli {
    /// Opening message describing the project (otherwise asked interactively)
    pub opening: Option<String>,

    /// Override the configured oracle model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
