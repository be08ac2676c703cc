//! Logging setup
//!
//! Logging is off unless SHELF_LOG is set to a level (e.g. `debug`).
//! Subcommands log to stderr. The TUI owns the terminal, so it logs to a
//! file instead: `config.log_file`, or `{data_dir}/debug.log`.

use std::fs::File;

use shelf_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "SHELF_LOG";

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Initialize logging if SHELF_LOG is set
pub fn init(config: &Config, target: LogTarget) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let env_filter = filter_for(&log_level);

    match target {
        LogTarget::Stderr => {
            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let log_path = config.log_path();
            let log_file = match File::create(&log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("TUI logging initialized to {:?}", log_path);
        }
    }
}

/// Build the filter directive for both workspace crates
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(directive(level))
}

fn directive(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("shelf_core={},shelf_cli={}", level, level)
}
