//! Render cache marker lifecycle.
//!
//! A single file, `overviewer.dat`, lives in the world directory. `--cachedir`
//! moves intermediate data elsewhere but never the marker. Its existence means
//! intermediate render state from a previous run may be reused. The orchestrator only creates, reads and
//! deletes it; the state it carries belongs to the preprocessing engine.
//!
//! Invalidation deletes the marker and nothing else. Generated tiles are left
//! in place.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the cache marker file.
pub const CACHE_MARKER_FILENAME: &str = "overviewer.dat";

/// Current layout of [`CacheState`].
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while reading or writing the cache marker.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error on the marker file.
    #[error("cache marker I/O error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The marker exists but could not be decoded.
    #[error("cache marker at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Result of [`CacheMarker::invalidate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidateOutcome {
    /// The marker existed and was removed.
    Deleted(PathBuf),
    /// There was no marker to remove.
    NotPresent,
}

/// State persisted in the marker by the preprocessing phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheState {
    /// Layout version of this struct.
    pub format_version: u32,
    /// Number of chunks found by the last scan.
    pub chunk_count: u64,
    /// Unix time (seconds) of the last scan.
    pub scanned_at: i64,
}

/// Handle to the cache marker of one world.
#[derive(Debug, Clone)]
pub struct CacheMarker {
    path: PathBuf,
}

impl CacheMarker {
    /// Marker inside `world_path`.
    pub fn new(world_path: &Path) -> Self {
        Self {
            path: world_path.join(CACHE_MARKER_FILENAME),
        }
    }

    /// Full path of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the marker exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Delete the marker.
    ///
    /// A missing marker is not an error, so this is idempotent.
    pub fn invalidate_all(&self) -> Result<InvalidateOutcome, CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Deleted cache marker");
                Ok(InvalidateOutcome::Deleted(self.path.clone()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache marker to delete");
                Ok(InvalidateOutcome::NotPresent)
            }
            Err(source) => Err(CacheError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Read the persisted state, if any.
    pub fn load(&self) -> Result<Option<CacheState>, CacheError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let state: CacheState =
            bincode::deserialize(&bytes).map_err(|e| CacheError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if state.format_version != CACHE_FORMAT_VERSION {
            return Err(CacheError::Corrupt {
                path: self.path.clone(),
                reason: format!("unsupported format version {}", state.format_version),
            });
        }

        Ok(Some(state))
    }

    /// Persist state, replacing any previous marker.
    pub fn store(&self, state: &CacheState) -> Result<(), CacheError> {
        let bytes = bincode::serialize(state).map_err(|e| CacheError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let tmp = self.path.with_extension("dat.tmp");
        std::fs::write(&tmp, bytes)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Delete the cache marker under `world_path`.
pub fn invalidate_all(world_path: &Path) -> Result<InvalidateOutcome, CacheError> {
    CacheMarker::new(world_path).invalidate_all()
}
