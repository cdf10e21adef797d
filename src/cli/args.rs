//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::config::{Config, ConfigBuilder};
use crate::error::ConfigError;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::LevelFilter;
use std::path::PathBuf;

/// Alert de-duplication and escalation for process monitors
///
/// Decides which resource alerts reach you: first detections and
/// escalations go out at once, repeats wait out a per-severity cooldown.
#[derive(Parser, Debug)]
#[command(name = "healwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HEALWATCH_CONFIG")]
    pub config: Option<String>,

    /// Override the fallback cooldown (minutes)
    #[arg(long, global = true, value_name = "MINUTES")]
    pub cooldown: Option<u64>,

    /// Override the retention window (hours)
    #[arg(long, global = true, value_name = "HOURS")]
    pub retention: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let no_color = match &self.command {
            Commands::Watch(args) => args.no_color,
            _ => false,
        };

        ConfigBuilder::new()
            .with_file(self.config.as_deref())?
            .with_verbose(self.verbose.then_some(true))
            .with_default_cooldown(self.cooldown)
            .with_retention(self.retention)
            .with_color(no_color.then_some(false))
            .build()
    }

    /// Default log level; `RUST_LOG` still takes precedence
    pub fn log_level(&self, config: Option<&Config>) -> LevelFilter {
        let verbose = self.verbose || config.is_some_and(|c| c.general.verbose);
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a reading against its threshold
    Classify {
        /// Current reading
        value: f64,

        /// Alerting threshold (must be greater than 0)
        threshold: f64,
    },

    /// Replay recorded observations through the policy
    Replay(ReplayArgs),

    /// Read live observations and dispatch alerts
    Watch(WatchArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command runs against the loaded configuration
    ///
    /// `config init` writes a fresh file, so it must not fail on a missing one.
    pub fn needs_config(&self) -> bool {
        match self {
            Self::Classify { .. } | Self::Completions { .. } => false,
            Self::Config(args) => !matches!(args.command, ConfigCommands::Init { .. }),
            Self::Replay(_) | Self::Watch(_) => true,
        }
    }
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// JSON-lines file of timestamped observations
    pub file: PathBuf,

    /// Only print notifications, not suppressed or ignored readings
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Read observations from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print alerts to stdout instead of stderr
    #[arg(long)]
    pub stdout: bool,

    /// Disable colored alerts
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Destination (defaults to the per-user config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Check,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
