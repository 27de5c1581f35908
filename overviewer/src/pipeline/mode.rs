//! Run mode selection.

use super::PipelineError;

/// What one invocation does. Exactly one mode is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Preprocess the world and generate tiles.
    Render,
    /// Delete the cache marker.
    DeleteCache,
    /// Print the merged configuration.
    DisplayConfig,
}

impl RunMode {
    /// Pick the mode from the command-line switches.
    ///
    /// Precedence is DisplayConfig, then DeleteCache, then Render. A
    /// destination directory is required unless `--delete` is given.
    pub fn select(display_config: bool, delete: bool, has_dest: bool) -> Result<Self, PipelineError> {
        if !has_dest && !delete {
            return Err(PipelineError::MissingDestination);
        }

        Ok(if display_config {
            RunMode::DisplayConfig
        } else if delete {
            RunMode::DeleteCache
        } else {
            RunMode::Render
        })
    }
}
