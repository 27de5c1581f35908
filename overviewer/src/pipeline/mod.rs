//! Two-phase render pipeline.
//!
//! [`PipelineCoordinator`] resolves the world, selects the [`RunMode`], and
//! for a render runs the [`WorldPreprocessor`] then the [`TileGenerator`],
//! each to completion, each with its own pool of `worker_count` workers.

mod coordinator;
mod error;
mod mode;
mod phase;
mod workers;

pub use coordinator::{PipelineCoordinator, RenderSummary, RunOutcome, RunRequest};
pub use error::{ErrorKind, PipelineError};
pub use mode::RunMode;
pub use phase::{
    ChunkCoord, ChunkList, PhaseError, PreprocessRequest, PreprocessedWorld, TileGenerator,
    TileParams, TileSummary, WebAssetsHook, WorldPreprocessor,
};
pub use workers::{build_pool, detect_worker_count};
