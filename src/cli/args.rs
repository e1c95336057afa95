//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Collect translation keys, write the mapping file(s) and,
//!   when mangling, the rewritten sources
//! - `init`: Initialize transkey configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project directory; the config file is searched from here upwards
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Name of the translation function (overrides config file)
    #[arg(long)]
    pub function_name: Option<String>,

    /// Replace keys with short generated values and rewrite call sites
    #[arg(long)]
    pub mangle: bool,

    /// Merge into existing mapping files instead of overwriting them
    #[arg(long)]
    pub merge: bool,

    /// Mapping file to write, `[name]` expands to the entry name (overrides config file)
    /// Can be specified multiple times: --output all.json --output "[name].json"
    #[arg(long)]
    pub output: Vec<String>,

    /// Directory for rewritten module sources (overrides config file)
    #[arg(long)]
    pub out_dir: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys from the module graph
    Extract(ExtractCommand),
    /// Initialize a new .transkeyrc.json configuration file
    Init,
}
