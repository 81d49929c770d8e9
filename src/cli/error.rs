//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ErrorKind;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(d) => match d.kind() {
                        ErrorKind::NotFound | ErrorKind::ParentNotFound => {
                            crate::exitcode::NOINPUT
                        }
                        _ => crate::exitcode::DATAERR,
                    },
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Snapshot { .. } => crate::exitcode::DATAERR,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::StatePoisoned => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, DomainError};

    #[test]
    fn given_domain_errors_when_mapping_exit_code_then_not_found_is_noinput() {
        let missing = CliError::from(ApplicationError::from(DomainError::NotFound(CategoryId(9))));
        let cycle = CliError::from(ApplicationError::from(DomainError::CycleDetected {
            node: CategoryId(1),
            target: CategoryId(2),
        }));

        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(cycle.exit_code(), crate::exitcode::DATAERR);
    }
}
