use anyhow::Result;
use std::io::{stdin, stdout, BufRead, Write};

/// Source of free-text operator answers
pub trait Prompter {
    /// Show `message` and return the line typed in reply, without its line terminator.
    fn line(&mut self, message: &str) -> Result<String>;
}

/// Reads answers from the process's stdin.
///
/// Only the trailing newline is removed; surrounding whitespace is kept so
/// callers can compare answers exactly.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn line(&mut self, message: &str) -> Result<String> {
        print!("{message}");
        stdout().flush()?;
        let mut input = String::new();
        stdin().lock().read_line(&mut input)?;
        Ok(strip_line_ending(input))
    }
}

pub(crate) fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
