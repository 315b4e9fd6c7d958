//! Command-line interface for postboard.
//!
//! This module provides the CLI structure for the `postboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, ListCommand, OutputFormat, StatusCommand};

/// postboard - Write posts with inlined images, kept on this machine
#[derive(Debug, Parser)]
#[command(name = "postboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new post
    Add(AddCommand),

    /// Show all posts
    List(ListCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "postboard");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["postboard", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["postboard", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["postboard", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["postboard", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_verbose_help_matches_levels() {
        let cmd = Cli::command();
        let verbose = cmd
            .get_arguments()
            .find(|a| a.get_id() == "verbose")
            .unwrap();
        let help = verbose.get_help().unwrap().to_string();
        assert!(help.contains("-v for info"));
        assert_eq!(Verbosity::Verbose.level(), tracing::Level::INFO);
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "postboard", "add", "--title", "A", "--description", "B", "--content", "C", "--image",
            "pixel.png",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.title, "A");
        assert_eq!(add.description, "B");
        assert_eq!(add.content, "C");
        assert_eq!(add.image, Some(PathBuf::from("pixel.png")));
    }

    #[test]
    fn test_parse_add_defaults_to_empty_fields() {
        let cli = parse(&["postboard", "add"]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert!(add.title.is_empty());
        assert!(add.image.is_none());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["postboard", "list", "--format", "json", "--show-images"]);
        let Command::List(list) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(list.format, OutputFormat::Json);
        assert!(list.show_images);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["postboard", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["postboard", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
