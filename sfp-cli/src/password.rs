//! Password input: interactive prompt (no echo) or one line from stdin.

use std::io::{self, BufRead};

use anyhow::{bail, ensure, Context, Result};
use zeroize::Zeroizing;

/// Read the password for one operation.
///
/// With `from_stdin`, the first line of standard input is used. Otherwise
/// the user is prompted on the terminal, twice when `confirm` is set.
///
/// # Errors
///
/// Fails if input cannot be read, the confirmation differs, or the password
/// is empty.
pub fn obtain(from_stdin: bool, confirm: bool) -> Result<Zeroizing<String>> {
    let password = if from_stdin {
        read_line(io::stdin().lock())?
    } else {
        let first = prompt("Password: ")?;
        if confirm {
            let second = prompt("Confirm password: ")?;
            if *first != *second {
                bail!("passwords do not match");
            }
        }
        first
    };

    ensure!(!password.is_empty(), "password must not be empty");
    Ok(password)
}

fn prompt(label: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(label)
        .map(Zeroizing::new)
        .context("failed to read password from terminal")
}

/// First line of `reader` without its line terminator.
pub fn read_line(mut reader: impl BufRead) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(line)
}
