//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{events::EventsCommands, init::InitArgs, races::RacesCommands};

#[derive(Parser)]
#[command(name = "trackside")]
#[command(author, version, about = "Race and sports event listings")]
#[command(long_about = "Read-only listings of races and sports events from an embedded SQLite database, with filtering and allow-listed ordering.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// SQLite database file (default: from config, then ./trackside.db)
    #[arg(long, short = 'd', global = true, env = "TRACKSIDE_DATABASE")]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the races and events tables if they are missing
    Init(InitArgs),

    /// Race listings
    #[command(subcommand)]
    Races(RacesCommands),

    /// Sports event listings
    #[command(subcommand)]
    Events(EventsCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for list, yaml for get)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
