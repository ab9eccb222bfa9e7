//! The `alcove config` subcommands: inspect and edit the file that
//! [`Config`] loads at startup. These run without a password and never
//! open the notebook.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use alcove_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys `config set` accepts
const KEYS: &str = "data_dir, log_file";

/// Print the effective configuration and the file it came from
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let source = effective_path(config_path);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": source,
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                })
            );
        }
        OutputFormat::Quiet => println!("{}", config.data_dir.display()),
        OutputFormat::Human => {
            println!("Settings from {}:", source.display());
            println!("  data_dir = {}", config.data_dir.display());
            match &config.log_file {
                Some(path) => println!("  log_file = {}", path.display()),
                None => println!("  log_file = (unset, falls back to data_dir/debug.log)"),
            }
        }
    }

    Ok(())
}

/// Change one key and write the file back
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => match optional_path(&value) {
            Some(dir) => config.data_dir = dir,
            None => bail!("data_dir cannot be cleared; give it a directory path"),
        },
        "log_file" => config.log_file = optional_path(&value),
        _ => bail!("'{}' is not a configuration key (valid keys: {})", key, KEYS),
    }

    config
        .save_to_path(&effective_path(config_path))
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// An empty value or the literal `none` clears a path setting
fn optional_path(value: &str) -> Option<PathBuf> {
    match value {
        "" | "none" => None,
        path => Some(PathBuf::from(path)),
    }
}

fn effective_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}
