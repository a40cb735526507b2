use std::io;

use resolver::ResolveError;
use rules::TableError;
use thiserror::Error;

use crate::base::BaseError;

/// Exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: i32 = 1;
/// Exit code for a resolution that hit its pass limit.
pub const EXIT_NON_CONVERGENCE: i32 = 2;
/// Exit code for failures writing the result.
pub const EXIT_OUTPUT: i32 = 3;

/// Failure of a `flag-resolve` invocation after argument parsing.
#[derive(Debug, Error)]
pub enum CliError {
    /// The base set could not be collected.
    #[error(transparent)]
    Base(#[from] BaseError),
    /// The built-in rule table failed validation.
    #[error("invalid rule table: {0}")]
    Table(#[from] TableError),
    /// Resolution rejected the base set or did not converge.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Base(_) | Self::Table(_) => EXIT_USAGE,
            Self::Resolve(error) if error.is_caller_error() => EXIT_USAGE,
            Self::Resolve(_) => EXIT_NON_CONVERGENCE,
            Self::Output(_) => EXIT_OUTPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let unknown = CliError::from(ResolveError::UnknownFlag {
            name: "X".to_owned(),
        });
        let stuck = CliError::from(ResolveError::NonConvergence {
            passes: 3,
            limit: 3,
        });
        let output = CliError::from(io::Error::from(io::ErrorKind::BrokenPipe));

        assert_eq!(unknown.exit_code(), EXIT_USAGE);
        assert_eq!(stuck.exit_code(), EXIT_NON_CONVERGENCE);
        assert_eq!(output.exit_code(), EXIT_OUTPUT);
    }

    #[test]
    fn table_errors_are_labelled() {
        let error = CliError::from(TableError::DuplicateFlag {
            name: "A".to_owned(),
        });
        assert_eq!(
            error.to_string(),
            "invalid rule table: flag 'A' is declared more than once"
        );
        assert_eq!(error.exit_code(), EXIT_USAGE);
    }
}
