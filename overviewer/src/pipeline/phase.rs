//! Phase collaborator traits and the data passed across them.
//!
//! The coordinator calls [`WorldPreprocessor`] and then [`TileGenerator`],
//! blocking on each. Each phase owns its worker pool: it is created, fed and
//! joined inside the call, so the phases never overlap.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::{ImageFormat, RenderMode, RunConfiguration};
use crate::hook::HookError;
use crate::optimize::{OptimizeError, OptimizeLevel};

/// Errors raised inside a phase. All of them abort the run.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// Filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// Worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    Pool(String),

    /// Image encoding or decoding failed.
    #[error("image error at {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    /// Image optimization failed.
    #[error(transparent)]
    Optimize(#[from] OptimizeError),

    /// Cache marker could not be written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The web assets hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl PhaseError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PhaseError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Chunk position in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Chunk list file opened by the coordinator; its contents are read by the
/// preprocessor.
#[derive(Debug)]
pub struct ChunkList {
    pub path: PathBuf,
    pub file: File,
}

/// Input to the preprocessing phase.
#[derive(Debug)]
pub struct PreprocessRequest {
    pub world_path: PathBuf,
    /// Where intermediate scan data goes. The cache marker stays in the world.
    pub cache_dir: PathBuf,
    /// Whether a `biomes` entry exists under the world.
    pub biome_data: bool,
    pub worker_count: usize,
    pub chunk_list: Option<ChunkList>,
}

/// Output of the preprocessing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessedWorld {
    pub world_path: PathBuf,
    pub biome_data: bool,
    /// Chunks to render, sorted and deduplicated.
    pub chunks: Vec<ChunkCoord>,
}

/// Parameters for tile generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileParams {
    pub dest_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub zoom: Option<u32>,
    pub image_format: ImageFormat,
    pub optimize_level: OptimizeLevel,
    pub render_mode: RenderMode,
    pub skip_aux_output: bool,
    pub worker_count: usize,
}

impl From<&RunConfiguration> for TileParams {
    fn from(config: &RunConfiguration) -> Self {
        Self {
            dest_dir: config.dest_dir.clone(),
            cache_dir: config.cache_dir.clone(),
            zoom: config.zoom,
            image_format: config.image_format,
            optimize_level: config.optimize_level,
            render_mode: config.render_mode,
            skip_aux_output: config.skip_aux_output,
            worker_count: config.worker_count,
        }
    }
}

/// What tile generation produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileSummary {
    /// Quadtree depth used.
    pub depth: u32,
    /// Tiles written across all levels.
    pub tiles_written: u64,
}

/// Hook called by the tile generator after the web assets are written and
/// before tiles are rendered. An error must abort generation.
pub type WebAssetsHook<'a> = &'a (dyn Fn(&Path) -> Result<(), HookError> + Sync);

/// Phase 1: world-level preprocessing.
pub trait WorldPreprocessor: Send + Sync {
    /// Scan the world using `request.worker_count` workers, returning once
    /// every worker has finished.
    fn preprocess(&self, request: PreprocessRequest) -> Result<PreprocessedWorld, PhaseError>;
}

/// Phase 2: quadtree tile generation.
pub trait TileGenerator: Send + Sync {
    /// Prepare the destination, call `hook`, then render tiles using
    /// `params.worker_count` workers, returning once every worker has
    /// finished. A hook error stops generation before any tile is rendered.
    fn generate(
        &self,
        world: &PreprocessedWorld,
        params: &TileParams,
        hook: WebAssetsHook<'_>,
    ) -> Result<TileSummary, PhaseError>;
}
