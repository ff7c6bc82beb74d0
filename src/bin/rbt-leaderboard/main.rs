//! Interactive leaderboard shell.
//!
//! Reads `<name> <score>` lines from stdin and reports each player's rank.
//! Settings come from the `RBT_LEADERBOARD_*` environment variables; logs go
//! to stderr.

// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod command;
mod config;
mod error;
mod shell;

use std::io;
use std::process::ExitCode;

use log::{debug, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::shell::Shell;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("rbt-leaderboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ShellError> {
    let config = ShellConfig::from_env()?;
    TermLogger::init(config.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    debug!("starting with {config:?}");

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(stdin.lock(), stdout.lock(), config).run()
}
