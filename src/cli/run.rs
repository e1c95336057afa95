//! Dispatches to the appropriate command handler based on the parsed arguments.
//!
//! # Returns
//! - `Ok(ExitStatus)`: `Success`, or `Failure` when diagnostics were reported
//! - `Err` if the command fails (e.g., invalid config, missing entry root)

use std::path::Path;

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, init::init},
    exit_status::ExitStatus,
};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Init) => init(Path::new(".")),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
