//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, CheckCommand, Command};
pub use exit_status::ExitStatus;
pub use report::{FAILURE_MARK, SUCCESS_MARK, report_to};

use crate::logging::init_tracing;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    init_tracing(args.verbose());

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
