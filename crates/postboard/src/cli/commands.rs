//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Add command arguments.
///
/// Each field maps onto one input of the post form. Missing fields are
/// reported by the form, not by argument parsing.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Post title
    #[arg(short, long, default_value = "")]
    pub title: String,

    /// Post description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Post content
    #[arg(short = 'b', long, default_value = "")]
    pub content: String,

    /// Image file to inline into the post
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Print the stored post as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Print full image data URLs instead of a summary
    #[arg(long)]
    pub show_images: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
