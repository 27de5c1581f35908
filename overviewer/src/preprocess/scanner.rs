//! Parallel world scan producing the chunk set to render.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::names::{parse_world_file, WorldFile};
use super::region::{read_region_chunks, region_origin};
use crate::cache::{CacheError, CacheMarker, CacheState, CACHE_FORMAT_VERSION};
use crate::pipeline::{
    build_pool, ChunkCoord, ChunkList, PhaseError, PreprocessRequest, PreprocessedWorld,
    WorldPreprocessor,
};

/// Chunk index written to the cache directory after each scan.
pub const CHUNK_INDEX_FILENAME: &str = "chunks.idx";

/// Scans a world directory for chunk and region files.
///
/// Files are read across a pool of `worker_count` threads. When a chunk list
/// is given, only the listed files are read. On success the chunk index is
/// written to the cache directory and the cache marker in the world directory
/// is rewritten with the new chunk count.
#[derive(Debug, Clone, Default)]
pub struct RegionScanner;

impl RegionScanner {
    pub fn new() -> Self {
        Self
    }
}

impl WorldPreprocessor for RegionScanner {
    fn preprocess(&self, request: PreprocessRequest) -> Result<PreprocessedWorld, PhaseError> {
        let files = match request.chunk_list {
            Some(list) => listed_files(list, &request.world_path)?,
            None => {
                let mut found = Vec::new();
                collect_world_files(&request.world_path, &mut found)?;
                found
            }
        };
        let files = drop_out_of_range(files);
        debug!(files = files.len(), "Collected world files");

        let pool = build_pool("preprocess", request.worker_count)?;
        let per_file: Vec<Vec<ChunkCoord>> = pool.install(|| {
            files
                .par_iter()
                .map(|(path, kind)| chunks_in(path, *kind))
                .collect::<Result<_, _>>()
        })?;

        let chunks: Vec<ChunkCoord> = per_file
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(
            world = %request.world_path.display(),
            chunks = chunks.len(),
            "World scan complete"
        );

        write_chunk_index(&request.cache_dir, &chunks)?;
        record_scan(&request.world_path, chunks.len())?;

        Ok(PreprocessedWorld {
            world_path: request.world_path,
            biome_data: request.biome_data,
            chunks,
        })
    }
}

fn drop_out_of_range(files: Vec<(PathBuf, WorldFile)>) -> Vec<(PathBuf, WorldFile)> {
    files
        .into_iter()
        .filter(|(path, kind)| match kind {
            WorldFile::Region { x, z } if region_origin(*x, *z).is_none() => {
                warn!(path = %path.display(), "Region coordinates out of range, skipping");
                false
            }
            _ => true,
        })
        .collect()
}

fn chunks_in(path: &Path, kind: WorldFile) -> Result<Vec<ChunkCoord>, PhaseError> {
    match kind {
        WorldFile::Chunk(coord) => Ok(vec![coord]),
        WorldFile::Region { x, z } => {
            read_region_chunks(path, x, z).map_err(|e| PhaseError::io(path, e))
        }
    }
}

/// Recursively collect chunk and region files under `dir`. Symlinks are not
/// followed.
fn collect_world_files(dir: &Path, out: &mut Vec<(PathBuf, WorldFile)>) -> Result<(), PhaseError> {
    let entries = fs::read_dir(dir).map_err(|e| PhaseError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| PhaseError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| PhaseError::io(&path, e))?;

        if file_type.is_dir() {
            collect_world_files(&path, out)?;
        } else if file_type.is_file() {
            let name = entry.file_name();
            if let Some(kind) = parse_world_file(&name.to_string_lossy()) {
                out.push((path, kind));
            }
        }
    }

    Ok(())
}

/// Files named in a chunk list, one path per line. Relative paths are taken
/// from the world directory. Unrecognised or missing entries are skipped.
fn listed_files(list: ChunkList, world_path: &Path) -> Result<Vec<(PathBuf, WorldFile)>, PhaseError> {
    let reader = BufReader::new(list.file);
    let mut files = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| PhaseError::io(&list.path, e))?;
        let entry = line.trim();
        if entry.is_empty() {
            continue;
        }

        let path = world_path.join(entry);
        let kind = path
            .file_name()
            .and_then(|name| parse_world_file(&name.to_string_lossy()));

        match kind {
            Some(kind) if path.is_file() => files.push((path, kind)),
            Some(_) => warn!(entry, "Chunk list entry does not exist, skipping"),
            None => warn!(entry, "Chunk list entry is not a chunk or region file, skipping"),
        }
    }

    info!(
        list = %list.path.display(),
        files = files.len(),
        "Restricting scan to chunk list"
    );
    Ok(files)
}

fn write_chunk_index(cache_dir: &Path, chunks: &[ChunkCoord]) -> Result<(), PhaseError> {
    fs::create_dir_all(cache_dir).map_err(|e| PhaseError::io(cache_dir, e))?;
    let path = cache_dir.join(CHUNK_INDEX_FILENAME);

    let bytes = bincode::serialize(chunks).map_err(|e| CacheError::Corrupt {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(&path, bytes).map_err(|e| PhaseError::io(&path, e))?;

    debug!(path = %path.display(), chunks = chunks.len(), "Wrote chunk index");
    Ok(())
}

fn record_scan(world_path: &Path, chunk_count: usize) -> Result<(), PhaseError> {
    let marker = CacheMarker::new(world_path);

    match marker.load() {
        Ok(Some(previous)) => debug!(
            previous_chunks = previous.chunk_count,
            scanned_at = previous.scanned_at,
            "Found previous cache state"
        ),
        Ok(None) => debug!("No previous cache state"),
        Err(CacheError::Corrupt { reason, .. }) => {
            warn!(reason = %reason, "Ignoring unreadable cache state")
        }
        Err(e) => return Err(e.into()),
    }

    marker.store(&CacheState {
        format_version: CACHE_FORMAT_VERSION,
        chunk_count: chunk_count as u64,
        scanned_at: chrono::Utc::now().timestamp(),
    })?;
    Ok(())
}
