use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): extraction finished without diagnostics
/// - `Failure` (1): extraction finished but reported invalid calls or unparsable modules
/// - `Error` (2): the build could not run (bad config, missing entry root, write failure)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
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
