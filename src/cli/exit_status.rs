use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Checks ran and no artifact has a failure
/// - `Failure` (1): At least one artifact has a failure (build-blocking)
/// - `Error` (2): The run could not complete (bad config, broken catalog, unwritable report)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Checks ran and no artifact has a failure.
    Success,
    /// At least one artifact has a failure.
    Failure,
    /// The run could not complete.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
