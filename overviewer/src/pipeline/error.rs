//! Coordinator error type and its classification.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::PhaseError;
use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::hook::HookError;
use crate::optimize::OptimizeError;
use crate::world::LocateError;

/// Broad class of a failure, deciding how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input. Reported with usage text; nothing was changed.
    UserInput,
    /// An external program was missing or failed.
    ExternalTool,
    /// A pipeline phase failed part-way. Partial output is left on disk.
    Phase,
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No world selector was given.
    #[error("You need to give me your world number or directory")]
    NoWorldGiven,

    /// The selector did not resolve.
    #[error(transparent)]
    InvalidWorld(#[from] LocateError),

    /// The resolved world directory does not exist.
    #[error("world directory does not exist: {0}")]
    WorldMissing(PathBuf),

    /// Render requested without a destination directory.
    #[error("Where do you want to save the tiles?")]
    MissingDestination,

    /// Options failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The chunk list file could not be opened.
    #[error("could not open chunk list {path}: {source}")]
    ChunkListOpen { path: PathBuf, source: io::Error },

    /// The cache marker could not be deleted.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The web assets hook failed.
    #[error(transparent)]
    Hook(HookError),

    /// World preprocessing failed.
    #[error("world preprocessing failed: {0}")]
    Preprocess(PhaseError),

    /// Tile generation failed.
    #[error("tile generation failed: {0}")]
    TileGeneration(PhaseError),
}

impl PipelineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::NoWorldGiven
            | PipelineError::InvalidWorld(_)
            | PipelineError::WorldMissing(_)
            | PipelineError::MissingDestination
            | PipelineError::ChunkListOpen { .. } => ErrorKind::UserInput,
            PipelineError::Config(ConfigError::Optimize(OptimizeError::MissingTool(_))) => {
                ErrorKind::ExternalTool
            }
            PipelineError::Config(_) => ErrorKind::UserInput,
            PipelineError::Hook(_) => ErrorKind::ExternalTool,
            PipelineError::Cache(_)
            | PipelineError::Preprocess(_)
            | PipelineError::TileGeneration(_) => ErrorKind::Phase,
        }
    }
}
