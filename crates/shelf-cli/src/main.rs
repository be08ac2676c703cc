//! shelf CLI
//!
//! Command-line interface for shelf - a personal book catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use shelf_core::{Config, Genre, ImportMode};

mod commands;
mod logging;
mod output;
mod prompt;
mod tui;

use commands::book::{parse_genre, parse_year, NewBook};
use logging::LogTarget;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "shelf - Personal library catalog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides SHELF_CONFIG and the default location)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add a new book (prompts for any field not given)
    Add {
        /// Book title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Author name
        #[arg(short, long)]
        author: Option<String>,
        /// Publication year (1800 to the current year)
        #[arg(short, long, value_parser = parse_year)]
        year: Option<i32>,
        /// Genre: Fiction, Non-Fiction, Science Fiction, Mystery, Romance, Other
        #[arg(short, long, value_parser = parse_genre)]
        genre: Option<Genre>,
        /// Mark the book as read
        #[arg(short, long)]
        read: bool,
    },
    /// Remove every book with the given title
    #[command(alias = "rm")]
    Remove {
        /// Exact title of the book(s) to remove
        title: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search by title, author or genre
    Search {
        /// Search term (case-insensitive)
        term: String,
    },
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Show library statistics
    Stats,
    /// Export the library as pretty-printed JSON
    Export {
        /// Destination file ("-" for stdout)
        #[arg(short, long, default_value = "library.json")]
        output: PathBuf,
    },
    /// Import books from a JSON file
    Import {
        /// JSON file to import
        path: PathBuf,
        /// Replace the library or merge into it
        #[arg(short, long, default_value_t = ImportMode::Merge)]
        mode: ImportMode,
    },
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

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_cli_override(config_path)?;

    // TUI is the default when no command is given
    let Some(command) = cli.command else {
        logging::init(&config, LogTarget::File);
        return tui::run(config);
    };

    if matches!(command, Commands::Tui) {
        logging::init(&config, LogTarget::File);
        return tui::run(config);
    }

    logging::init(&config, LogTarget::Stderr);
    let mut store = commands::open_store(config)?;

    match command {
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Add {
            title,
            author,
            year,
            genre,
            read,
        } => {
            let new_book = NewBook {
                title,
                author,
                year,
                genre,
                read,
            };
            commands::book::add(&mut store, new_book, &output)
        }
        Commands::Remove { title, yes } => commands::book::remove(&mut store, title, yes, &output),
        Commands::Search { term } => commands::book::search(&store, term, &output),
        Commands::List => commands::book::list(&store, &output),
        Commands::Stats => commands::stats::show(&store, &output),
        Commands::Export { output: path } => commands::transfer::export(&store, path, &output),
        Commands::Import { path, mode } => {
            commands::transfer::import(&mut store, path, mode, &output)
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_flags() {
        let cli = Cli::try_parse_from([
            "shelf",
            "add",
            "--title",
            "Dune",
            "--author",
            "Frank Herbert",
            "--year",
            "1965",
            "--genre",
            "science-fiction",
            "--read",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Add {
                title,
                author,
                year,
                genre,
                read,
            }) => {
                assert_eq!(title.as_deref(), Some("Dune"));
                assert_eq!(author.as_deref(), Some("Frank Herbert"));
                assert_eq!(year, Some(1965));
                assert_eq!(genre, Some(Genre::ScienceFiction));
                assert!(read);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_add_rejects_out_of_range_year() {
        assert!(Cli::try_parse_from(["shelf", "add", "--year", "1799"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "add", "--year", "3000"]).is_err());
    }

    #[test]
    fn test_parse_add_rejects_unknown_genre() {
        assert!(Cli::try_parse_from(["shelf", "add", "--genre", "Poetry"]).is_err());
    }

    #[test]
    fn test_parse_import_mode() {
        let cli = Cli::try_parse_from(["shelf", "import", "books.json", "--mode", "replace"]).unwrap();
        match cli.command {
            Some(Commands::Import { path, mode }) => {
                assert_eq!(path, PathBuf::from("books.json"));
                assert_eq!(mode, ImportMode::Replace);
            }
            _ => panic!("expected import command"),
        }

        let cli = Cli::try_parse_from(["shelf", "import", "books.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Import {
                mode: ImportMode::Merge,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_aliases_and_default() {
        let cli = Cli::try_parse_from(["shelf", "rm", "Dune", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Remove { yes: true, .. })));

        let cli = Cli::try_parse_from(["shelf", "ls"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));

        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
    }
}
