//! Interactive prompts
//!
//! Line-based prompts used by `shelf add` when fields are not given as flags,
//! and the confirmation asked before removing books.

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};

/// Whether stdin is attached to a terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let input = read_line(&mut io::stdin().lock())?;
    Ok(is_yes(&input))
}

/// Prompt for a required value, re-asking until `parse` accepts it
pub fn prompt_until<T, E, F>(prompt: &str, mut parse: F) -> Result<T>
where
    F: FnMut(&str) -> std::result::Result<T, E>,
    E: std::fmt::Display,
{
    if !is_interactive() {
        bail!("Missing value for {}. Pass it as a flag when not running interactively.", prompt);
    }

    let stdin = io::stdin();
    loop {
        print!("{}: ", prompt);
        io::stdout().flush()?;

        let input = read_line(&mut stdin.lock())?;
        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("  {}", e),
        }
    }
}

/// Read one trimmed line from a reader
fn read_line(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        bail!("Input closed");
    }
    Ok(input.trim().to_string())
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

/// Parse a required, non-empty text field
pub fn non_empty(field: &'static str) -> impl FnMut(&str) -> std::result::Result<String, String> {
    move |input: &str| {
        let value = input.trim();
        if value.is_empty() {
            Err(format!("{} cannot be empty", field))
        } else {
            Ok(value.to_string())
        }
    }
}
