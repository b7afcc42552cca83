//! CLI module for deepscribe
//!
//! Provides command-line interface parsing and handling for the deepscribe binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod progress;
pub mod report;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// deepscribe - multi-agent deep research
///
/// Researches a topic on the web, scores the cited sources, rewrites the
/// report around the credible ones and proposes follow-up questions.
#[derive(Parser, Debug)]
#[command(
    name = "deepscribe",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "deepscribe - multi-agent deep research reports",
    long_about = "Runs four cooperating LLM agents over a topic: a synthesizer backed by a\n\
                  deep-research crawler, a source credibility evaluator, an editor and a\n\
                  follow-up question generator.",
    after_help = "EXAMPLES:\n    \
                  deepscribe init                               # Write deepscribe.toml\n    \
                  deepscribe research \"quantum error correction\"\n    \
                  deepscribe research \"CRISPR\" --no-save        # Print only\n    \
                  deepscribe --config my.toml agents            # List the agents"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "deepscribe.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic and produce a report
    Research {
        /// Topic to research
        topic: String,

        /// Write the report here instead of <topic>_research.md
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort the whole run after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Print the report without writing a file
        #[arg(long, conflicts_with = "output")]
        no_save: bool,
    },

    /// Write a default deepscribe.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure
        #[arg(long, value_enum, default_value_t = InitProvider::Openai)]
        provider: InitProvider,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// List the pipeline agents and their tools
    Agents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitProvider {
    Openai,
    Ollama,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_research_command() {
        let cli = Cli::try_parse_from([
            "deepscribe",
            "research",
            "fusion energy",
            "--timeout",
            "600",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("deepscribe.toml"));
        assert_eq!(cli.log_format, LogFormat::Text);
        match cli.command {
            Commands::Research {
                topic,
                output,
                timeout,
                no_save,
            } => {
                assert_eq!(topic, "fusion energy");
                assert_eq!(output, None);
                assert_eq!(timeout, Some(600));
                assert!(!no_save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deepscribe",
            "agents",
            "--config",
            "other.toml",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Agents));
    }

    #[test]
    fn test_no_save_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "deepscribe",
            "research",
            "topic",
            "--no-save",
            "--output",
            "x.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_defaults() {
        let cli = Cli::try_parse_from(["deepscribe", "init"]).unwrap();
        match cli.command {
            Commands::Init {
                path,
                force,
                provider,
            } => {
                assert_eq!(path, PathBuf::from("."));
                assert!(!force);
                assert_eq!(provider, InitProvider::Openai);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
