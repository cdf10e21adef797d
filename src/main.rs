//! healwatch - alert de-duplication and escalation for process monitors
//!
//! A command-line tool that decides which resource alerts are sent, based on
//! severity escalation and per-severity cooldowns.

use clap::Parser;
use healwatch::cli::args::{generate_completions, Cli, Commands};
use healwatch::commands::{run_classify, run_config, run_replay, run_watch};
use healwatch::config::Config;
use healwatch::error::{AppError, ConfigError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The log filter depends on the configuration, so load it before logging starts
    let loaded = cli.command.needs_config().then(|| cli.load_config());

    // Initialize logging
    let level = cli.log_level(loaded.as_ref().and_then(|r| r.as_ref().ok()));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();

    // Run the appropriate command
    let result = match loaded {
        Some(Ok(config)) => {
            log::debug!("Effective configuration: {:?}", config);
            run(&cli, &config)
        }
        Some(Err(e)) => Err(e.into()),
        None => run(&cli, &Config::default()),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::Classify { value, threshold } => run_classify(*value, *threshold, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }

        Commands::Config(args) => run_config(&args.command, config, cli.config.as_deref(), cli.format),

        Commands::Replay(args) => run_replay(args, config, cli.format),

        Commands::Watch(args) => run_watch(args, config, cli.format),
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Create a configuration with 'healwatch config init'");
            eprintln!("      or point HEALWATCH_CONFIG at an existing file.");
        }
        AppError::Config(ConfigError::TomlError(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'healwatch config check' to validate the file.");
        }
        AppError::Domain(_) => {
            eprintln!();
            eprintln!("Hint: Observations are JSON objects with process_key, resource_type,");
            eprintln!("      value and an optional threshold (> 0).");
        }
        _ => {}
    }
}
