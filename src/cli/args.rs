//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Run the rule catalog against an extracted package directory
//! - `init`: Initialize a tdqa configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::report::ReportFormat;

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

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Extracted package directory to check
    #[arg(default_value = ".")]
    pub package_dir: PathBuf,

    /// Rule catalog file (overrides config file)
    #[arg(long, env = "TDQA_RULES")]
    pub rules: Option<PathBuf>,

    /// Report output file (overrides config file)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format (overrides config file)
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Reserved keywords file (overrides config file)
    #[arg(long)]
    pub keywords: Option<PathBuf>,

    /// Print findings to the console only, without writing a report file
    #[arg(long)]
    pub no_report: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run quality checks against an extracted Teradata package
    Check(CheckCommand),
    /// Initialize a new .tdqarc.json configuration file
    Init,
}
