//! CLI error type and exit codes.

use std::fmt;

use overviewer::config::ConfigError;
use overviewer::pipeline::{ErrorKind, PipelineError};

/// Exit code for failures that are not misuse of options.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for invalid or missing options.
pub const EXIT_USAGE: i32 = 2;

/// Errors that end the CLI.
#[derive(Debug)]
pub enum CliError {
    /// The settings file could not be loaded.
    Settings(ConfigError),
    /// No world was given; carries the listing of detected saves.
    NoWorldGiven { listing: String },
    /// The run failed.
    Pipeline(PipelineError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Settings(_) => EXIT_USAGE,
            CliError::NoWorldGiven { .. } => EXIT_FAILURE,
            CliError::Pipeline(e) => match e {
                PipelineError::InvalidWorld(_) | PipelineError::WorldMissing(_) => EXIT_FAILURE,
                e if e.kind() == ErrorKind::UserInput => EXIT_USAGE,
                _ => EXIT_FAILURE,
            },
        }
    }

    /// Whether usage text should accompany the message.
    pub fn shows_usage(&self) -> bool {
        match self {
            CliError::Settings(_) | CliError::NoWorldGiven { .. } => true,
            CliError::Pipeline(e) => e.kind() == ErrorKind::UserInput,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Settings(e) => write!(f, "Settings error: {}", e),
            CliError::NoWorldGiven { .. } => write!(f, "{}", PipelineError::NoWorldGiven),
            CliError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Settings(e) => Some(e),
            CliError::NoWorldGiven { .. } => None,
            CliError::Pipeline(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Settings(e)
    }
}
