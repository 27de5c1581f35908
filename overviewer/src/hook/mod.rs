//! Web assets hook invocation.
//!
//! The hook is a user program run after the web assets have been written and
//! before tile rendering starts. It receives the absolute tile destination
//! directory as its only argument. The call is synchronous and has no
//! timeout, so a hung hook hangs the render.
//!
//! A hook that cannot be launched or exits non-zero is fatal: the output tree
//! is assumed to be incomplete without it.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, error, info};

/// Errors reported for a failed hook run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The hook could not be started.
    #[error("could not call web assets hook {path}: {reason}")]
    LaunchFailed { path: PathBuf, reason: String },

    /// The hook ran and exited unsuccessfully.
    #[error("web assets hook {path} returned error (exit code {code:?})")]
    NonZeroExit { path: PathBuf, code: Option<i32> },
}

/// Outcome of one hook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    /// Whether the hook completed with a zero exit status.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
    /// Launch failure description, when the process never started.
    pub launch_error: Option<String>,
}

impl HookOutcome {
    /// Outcome when no hook is configured.
    pub fn skipped() -> Self {
        Self {
            success: true,
            exit_code: None,
            launch_error: None,
        }
    }
}

/// Runs the configured web assets hook, if any.
#[derive(Debug, Clone, Default)]
pub struct HookInvoker {
    hook_path: Option<PathBuf>,
}

impl HookInvoker {
    /// Create an invoker for an optional hook program.
    pub fn new(hook_path: Option<PathBuf>) -> Self {
        Self { hook_path }
    }

    /// The configured hook program.
    pub fn hook_path(&self) -> Option<&Path> {
        self.hook_path.as_deref()
    }

    /// Run the hook with `dest_dir` made absolute, blocking until it exits.
    pub fn run(&self, dest_dir: &Path) -> HookOutcome {
        let Some(hook) = &self.hook_path else {
            debug!("No web assets hook configured");
            return HookOutcome::skipped();
        };

        let dest = std::path::absolute(dest_dir).unwrap_or_else(|_| dest_dir.to_path_buf());
        info!(hook = %hook.display(), dest = %dest.display(), "Running web assets hook");

        match Command::new(hook).arg(&dest).status() {
            Ok(status) => HookOutcome {
                success: status.success(),
                exit_code: status.code(),
                launch_error: None,
            },
            Err(e) => HookOutcome {
                success: false,
                exit_code: None,
                launch_error: Some(e.to_string()),
            },
        }
    }

    /// Convert an outcome into a result, logging the failure cause.
    pub fn check(&self, outcome: HookOutcome) -> Result<(), HookError> {
        if outcome.success {
            return Ok(());
        }

        let path = self.hook_path.clone().unwrap_or_default();
        let err = match outcome.launch_error {
            Some(reason) => HookError::LaunchFailed { path, reason },
            None => HookError::NonZeroExit {
                path,
                code: outcome.exit_code,
            },
        };
        error!("{}", err);
        Err(err)
    }

    /// Run the hook and convert the outcome into a result.
    pub fn run_checked(&self, dest_dir: &Path) -> Result<(), HookError> {
        let outcome = self.run(dest_dir);
        self.check(outcome)
    }
}
