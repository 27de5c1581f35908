//! Quadtree tile generation over a worker pool.

use std::collections::BTreeMap;

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::assets::write_web_assets;
use super::layout::{base_tile, required_depth, tile_origin, tile_path, TileIndex, MAX_DEPTH};
use super::render::{compose_parent, render_base_tile, save_tile};
use crate::config::ImageFormat;
use crate::optimize::optimize_png;
use crate::pipeline::{
    build_pool, ChunkCoord, PhaseError, PreprocessedWorld, TileGenerator, TileParams,
    TileSummary, WebAssetsHook,
};

/// Renders a quadtree of tiles from a preprocessed chunk set.
///
/// Order of work:
/// 1. Pick the depth (explicit zoom, or the smallest tree covering every chunk)
/// 2. Write the web assets
/// 3. Run the hook; an error stops here
/// 4. Render base tiles in parallel
/// 5. Build each level above from its children, up to `base.<ext>`
///
/// One level of tiles is held in memory at a time.
#[derive(Debug, Clone, Default)]
pub struct QuadtreeTileGenerator;

impl QuadtreeTileGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TileGenerator for QuadtreeTileGenerator {
    fn generate(
        &self,
        world: &PreprocessedWorld,
        params: &TileParams,
        hook: WebAssetsHook<'_>,
    ) -> Result<TileSummary, PhaseError> {
        let depth = choose_depth(&world.chunks, params.zoom);

        write_web_assets(depth, params)?;
        hook(&params.dest_dir)?;

        let base = group_by_tile(&world.chunks, depth);
        info!(
            depth,
            base_tiles = base.len(),
            workers = params.worker_count,
            "Rendering tiles"
        );

        let pool = build_pool("tiles", params.worker_count)?;

        let mut level_tiles: BTreeMap<TileIndex, RgbaImage> = pool.install(|| {
            base.par_iter()
                .map(|(tile, chunks)| {
                    let image =
                        render_base_tile(tile_origin(*tile, depth), chunks, params.render_mode);
                    write_tile(&image, *tile, depth, params)?;
                    Ok((*tile, image))
                })
                .collect::<Result<_, PhaseError>>()
        })?;
        let mut tiles_written = level_tiles.len() as u64;
        debug!(level = depth, tiles = level_tiles.len(), "Rendered base level");

        for level in (0..depth).rev() {
            let mut parents: BTreeMap<TileIndex, [Option<&RgbaImage>; 4]> = BTreeMap::new();
            for (tile, image) in &level_tiles {
                parents.entry(tile.parent()).or_insert([None; 4])[tile.quadrant() as usize] =
                    Some(image);
            }

            let next: BTreeMap<TileIndex, RgbaImage> = pool.install(|| {
                parents
                    .into_par_iter()
                    .map(|(tile, children)| {
                        let image = compose_parent(&children);
                        write_tile(&image, tile, level, params)?;
                        Ok((tile, image))
                    })
                    .collect::<Result<_, PhaseError>>()
            })?;

            tiles_written += next.len() as u64;
            debug!(level, tiles = next.len(), "Rendered level");
            level_tiles = next;
        }

        Ok(TileSummary {
            depth,
            tiles_written,
        })
    }
}

fn choose_depth(chunks: &[ChunkCoord], zoom: Option<u32>) -> u32 {
    let required = required_depth(chunks);
    match zoom {
        Some(zoom) => {
            let depth = zoom.clamp(1, MAX_DEPTH);
            if depth < required {
                warn!(
                    zoom = depth,
                    required, "Zoom level is too small to show the whole world"
                );
            }
            depth
        }
        None => required,
    }
}

/// Bucket chunks by base tile, dropping chunks outside the tree.
fn group_by_tile(chunks: &[ChunkCoord], depth: u32) -> BTreeMap<TileIndex, Vec<ChunkCoord>> {
    let mut tiles: BTreeMap<TileIndex, Vec<ChunkCoord>> = BTreeMap::new();
    let mut outside = 0usize;

    for chunk in chunks {
        match base_tile(*chunk, depth) {
            Some(tile) => tiles.entry(tile).or_default().push(*chunk),
            None => outside += 1,
        }
    }

    if outside > 0 {
        warn!(chunks = outside, "Chunks outside the map were skipped");
    }
    tiles
}

fn write_tile(
    image: &RgbaImage,
    tile: TileIndex,
    level: u32,
    params: &TileParams,
) -> Result<(), PhaseError> {
    let path = tile_path(
        &params.dest_dir,
        tile,
        level,
        params.image_format.extension(),
    );
    save_tile(image, &path, params.image_format)?;

    if params.image_format == ImageFormat::Png && params.optimize_level.is_enabled() {
        optimize_png(&path, params.optimize_level)?;
    }
    Ok(())
}
