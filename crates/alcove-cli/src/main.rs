//! Alcove CLI
//!
//! Command-line interface for Alcove - encrypted notes in plain directories.

use std::env;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alcove_core::{AlcoveError, Config, Notebook};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "alcove")]
#[command(about = "Alcove - Encrypted notes in plain directories")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Notebook password (falls back to $ALCOVE_PASSWORD, then a prompt)
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Use a specific config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries in a directory (default when no command given)
    #[command(alias = "list")]
    Ls {
        /// Directory path relative to the notebook root
        path: Option<String>,
    },
    /// Print the whole note tree
    Tree,
    /// Decrypt a note and print it
    #[command(alias = "cat")]
    Show {
        /// Note path relative to the notebook root
        path: String,
    },
    /// Open a note in $EDITOR and save the result
    Edit {
        /// Note path relative to the notebook root
        path: String,
    },
    /// Replace a note's text with stdin
    Write {
        /// Note path relative to the notebook root
        path: String,
    },
    /// Create an empty note
    New {
        /// Note path relative to the notebook root
        path: String,
    },
    /// Create a directory
    Mkdir {
        /// Directory path relative to the notebook root
        path: String,
    },
    /// Delete a note or directory (directories recursively)
    #[command(alias = "delete")]
    Rm {
        /// Path relative to the notebook root
        path: String,
    },
    /// Show notebook status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        if let Some(hint) = err
            .downcast_ref::<AlcoveError>()
            .and_then(AlcoveError::recovery_suggestion)
        {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a password or an open notebook
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    // Only commands that touch note bodies need the real password;
    // everything else works on names and layout alone.
    let needs_password = matches!(
        &cli.command,
        Some(Commands::Show { .. }) | Some(Commands::Edit { .. }) | Some(Commands::Write { .. })
    );
    let password = if needs_password {
        resolve_password(&cli, &output)?
    } else {
        String::new()
    };

    let mut notebook = Notebook::open_with_config(config, &password)?;

    match cli.command.unwrap_or(Commands::Ls { path: None }) {
        Commands::Ls { path } => commands::browse::ls(&mut notebook, path.as_deref(), &output),
        Commands::Tree => commands::browse::tree(&mut notebook, &output),
        Commands::Show { path } => commands::note::show(&mut notebook, &path, &output),
        Commands::Edit { path } => commands::note::edit(&mut notebook, &path, &output),
        Commands::Write { path } => commands::note::write(&mut notebook, &path, &output),
        Commands::New { path } => commands::entry::new(&mut notebook, &path, &output),
        Commands::Mkdir { path } => commands::entry::mkdir(&mut notebook, &path, &output),
        Commands::Rm { path } => commands::entry::rm(&mut notebook, &path, &output),
        Commands::Status => commands::status::show(&mut notebook, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Pick the notebook password: --password, then $ALCOVE_PASSWORD, then a prompt
fn resolve_password(cli: &Cli, output: &Output) -> Result<String> {
    if let Some(password) = &cli.password {
        return Ok(password.clone());
    }

    if let Ok(password) = env::var("ALCOVE_PASSWORD") {
        if !password.is_empty() {
            return Ok(password);
        }
    }

    if !output.should_prompt() {
        bail!("No password given. Pass --password or set $ALCOVE_PASSWORD.");
    }

    Password::new()
        .with_prompt("Notebook password")
        .interact()
        .context("Failed to read password")
}

/// Initialize logging
///
/// Only initializes if ALCOVE_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = env::var("ALCOVE_LOG") else {
        return;
    };

    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("alcove_core={},alcove_cli={}", log_level, log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("logging initialized to {:?}", log_path);
}
