//! Interactive prompts used by commands when an argument is omitted.

use anyhow::{bail, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Reads one line from the terminal. Ctrl+C or Ctrl+D cancels.
pub(crate) fn ask(label: &str) -> Result<String> {
    let mut rl = DefaultEditor::new()?;
    match rl.readline(&format!("{} ", label.cyan())) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => bail!("Cancelled"),
        Err(e) => Err(e.into()),
    }
}

/// Shows `items` as a numbered list and returns the index the user picks.
pub(crate) fn select(label: &str, items: &[String]) -> Result<usize> {
    if items.is_empty() {
        bail!("Nothing to select from");
    }
    println!("{}", label.bold());
    for (i, item) in items.iter().enumerate() {
        println!("  {} {}", format!("{:>2})", i + 1).dimmed(), item);
    }

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} ", format!("Select [1-{}]:", items.len()).cyan());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => match parse_choice(&line, items.len()) {
                Some(idx) => return Ok(idx),
                None => println!("{} enter a number between 1 and {}", "?".yellow(), items.len()),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => bail!("Selection cancelled"),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Turns a 1-based answer into a 0-based index, if it is in range.
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice(" 3 ", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
    }
}
