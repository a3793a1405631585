use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{check::check, init::init},
    exit_status::ExitStatus,
};

/// Dispatch to the handler of the parsed subcommand.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Init) => init(),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}
