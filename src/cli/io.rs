//! Interactive stdin helpers for the provisioning surface
//!
//! Passwords are read from stdin, never taken on the command line where
//! they would land in shell history and the process table.

use std::io::{self, BufRead, Write};

use super::errors::{CliError, CliResult};

/// Prompt until a non-empty line arrives; EOF is an error
pub fn prompt_nonempty(prompt: &str) -> CliResult<String> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{} ", prompt);
        io::stdout().flush()?;

        line.clear();
        let read = stdin.lock().read_line(&mut line)?;
        if read == 0 {
            return Err(CliError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )));
        }

        let value = line.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }
}

/// Prompt for a yes/no answer
pub fn confirm(prompt: &str) -> CliResult<bool> {
    loop {
        let answer = prompt_nonempty(prompt)?;
        match answer.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}
