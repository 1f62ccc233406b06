//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Running `basecamp` with no
//! subcommand is equivalent to `basecamp run`: invoking the tool is the
//! whole interface, same as the launcher script it replaces.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Basecamp - Environment bootstrap and launch supervisor.
#[derive(Debug, Parser)]
#[command(name = "basecamp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to manifest file (overrides default .basecamp/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output (streams installer output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap the environment and launch the application (default)
    Run(RunArgs),

    /// Check the runtime and show the install plan without side effects
    Check(CheckArgs),

    /// Write the built-in manifest to .basecamp/config.yml
    Init(InitArgs),

    /// Show the resolved manifest
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the dependency install sequence
    #[arg(long)]
    pub skip_install: bool,

    /// Bootstrap only; do not launch the application
    #[arg(long)]
    pub no_launch: bool,

    /// Do not wait for acknowledgment before exiting
    #[arg(long)]
    pub no_pause: bool,

    /// Substitute the package index for every install
    #[arg(long, value_name = "URL", env = "BASECAMP_INDEX_URL")]
    pub index_url: Option<String>,

    /// Stop at the first failed install instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// No prompts, no pause
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing manifest
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_has_no_subcommand() {
        let cli = Cli::parse_from(["basecamp"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "basecamp",
            "run",
            "--dry-run",
            "--fail-fast",
            "--index-url",
            "http://localhost:8080/simple",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.dry_run);
                assert!(args.fail_fast);
                assert_eq!(
                    args.index_url.as_deref(),
                    Some("http://localhost:8080/simple")
                );
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["basecamp", "check", "--verbose"]);
        assert!(cli.verbose);
    }
}
