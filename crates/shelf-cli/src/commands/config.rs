//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use shelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Keys accepted by `shelf config set`
pub const CONFIG_KEYS: &[&str] = &["data_dir", "log_file"];

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "library_path": config.library_path(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:     {}", config.data_dir.display());
            println!(
                "  log_file:     {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Library file: {}", config.library_path().display());
            println!("Config file:  {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` pair to a configuration
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.trim().is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::with_data_dir("/data/shelf");

        apply(&mut config, "data_dir", "/books").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/books"));

        apply(&mut config, "log_file", "/tmp/shelf.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/shelf.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::with_data_dir("/data/shelf");

        let err = apply(&mut config, "sync_url", "x").unwrap_err();
        assert!(err.to_string().contains("Valid keys: data_dir, log_file"));

        assert!(apply(&mut config, "data_dir", "  ").is_err());
        assert_eq!(config.data_dir, PathBuf::from("/data/shelf"));
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("books");

        Config::with_data_dir(temp_dir.path())
            .save_to_path(&config_path)
            .unwrap();

        set(
            "log_file".to_string(),
            data_dir.join("shelf.log").display().to_string(),
            Some(&config_path),
            &Output::new(OutputFormat::Quiet),
        )
        .unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("shelf.log"));
    }
}
