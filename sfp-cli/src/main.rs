//! `sfp` — encrypt and decrypt files and folders with a password.
//!
//! Usage:
//!   sfp encrypt <PATH>   - seal a file, or every file under a folder
//!   sfp decrypt <PATH>   - open a `.encrypted` file, or every one under a folder
//!   sfp config           - show the effective settings

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

mod config;
mod logging;
mod password;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sfp_crypto_core::{disable_core_dumps, Pbkdf2Params};
use sfp_files::{BatchReport, FileCipher};

use crate::config::Settings;

/// Password-based file and folder encryption.
#[derive(Parser, Debug)]
#[command(name = "sfp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: <config dir>/sfp/settings.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a file, or every file under a directory
    Encrypt {
        #[command(flatten)]
        target: Target,

        /// PBKDF2 iterations for the new containers
        #[arg(long, value_name = "N")]
        iterations: Option<u32>,
    },

    /// Decrypt a `.encrypted` file, or every one under a directory
    Decrypt {
        #[command(flatten)]
        target: Target,

        /// PBKDF2 iterations the containers were sealed with
        #[arg(long, value_name = "N")]
        iterations: Option<u32>,
    },

    /// Print the effective settings as JSON
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
struct Target {
    /// File or directory to process
    path: PathBuf,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    password_stdin: bool,
}

#[derive(Clone, Copy)]
enum Op {
    Encrypt,
    Decrypt,
}

impl Op {
    const fn verb(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypted",
            Self::Decrypt => "decrypted",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings_path = cli.config.clone().or_else(Settings::default_path);
    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    let level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let _log_guard = match logging::init(level, settings.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = disable_core_dumps() {
        tracing::warn!("Could not disable core dumps: {e}");
    }

    match run(cli.command, &settings, settings_path.as_deref()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Execute one command. `Ok(false)` means some files in a batch failed.
fn run(command: Command, settings: &Settings, settings_path: Option<&Path>) -> Result<bool> {
    match command {
        Command::Encrypt { target, iterations } => {
            let params = effective_params(iterations, settings)?;
            process(&target, FileCipher::new(params), Op::Encrypt)
        }
        Command::Decrypt { target, iterations } => {
            let params = effective_params(iterations, settings)?;
            process(&target, FileCipher::new(params), Op::Decrypt)
        }
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(settings)?);
            if save {
                let path = settings_path
                    .context("no config directory on this platform; pass --config")?;
                settings
                    .save(path)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                eprintln!("saved {}", path.display());
            }
            Ok(true)
        }
    }
}

/// `--iterations` if given, else the configured count.
fn effective_params(iterations: Option<u32>, settings: &Settings) -> Result<Pbkdf2Params> {
    let params = match iterations {
        Some(iterations) => Pbkdf2Params { iterations },
        None => settings.params(),
    };
    params.validate()?;
    Ok(params)
}

fn process(target: &Target, cipher: FileCipher, op: Op) -> Result<bool> {
    let path = target.path.as_path();
    let is_dir = path.is_dir();
    if !is_dir && !path.is_file() {
        anyhow::bail!("{} does not exist or is not a file or directory", path.display());
    }

    let password = password::obtain(target.password_stdin, matches!(op, Op::Encrypt))?;
    let password = password.as_bytes();

    if is_dir {
        let report = match op {
            Op::Encrypt => cipher.encrypt_tree(path, password)?,
            Op::Decrypt => cipher.decrypt_tree(path, password)?,
        };
        print_report(&report, op);
        Ok(report.is_complete())
    } else {
        let result = match op {
            Op::Encrypt => cipher.encrypt_file(path, password),
            Op::Decrypt => cipher.decrypt_file(path, password),
        }
        .with_context(|| format!("{} failed", path.display()))?;
        println!("{}", result.display());
        Ok(true)
    }
}

fn print_report(report: &BatchReport, op: Op) {
    for result in &report.succeeded {
        println!("{}", result.display());
    }
    for failure in &report.failed {
        eprintln!("failed: {}: {}", failure.path.display(), failure.error);
    }
    for failure in &report.walk_errors {
        eprintln!("unreadable: {}: {}", failure.path.display(), failure.error);
    }
    eprintln!(
        "{} {}/{} files",
        op.verb(),
        report.succeeded.len(),
        report.candidates()
    );
}
