//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// Scout - creator discovery and recommendation engine
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/scout/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search creators with a free-text query
    Search(commands::search::SearchArgs),

    /// Search, then rank results with the recommendation rubric
    Recommend(commands::recommend::RecommendArgs),

    /// Find creators similar to an existing one
    Similar(commands::similar::SimilarArgs),

    /// Suggest query completions for a partial input
    Suggest(commands::suggest::SuggestArgs),

    /// Import creator records from a JSON file
    Import(commands::import::ImportArgs),

    /// Re-embed all stored creators into the vector index
    Index,

    /// Print the recognized niches, tiers and platforms
    Taxonomy,
}
