//! Tile image rendering and encoding.
//!
//! Base tiles draw one [`CHUNK_PIXELS`]-square block per present chunk,
//! shaded by render mode. Upper tiles are their four children, each scaled to
//! half size.

use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use super::layout::CHUNKS_PER_TILE;
use crate::config::{ImageFormat, RenderMode};
use crate::pipeline::{ChunkCoord, PhaseError};

/// Pixels along one side of a chunk block.
pub const CHUNK_PIXELS: u32 = 16;

/// Pixels along one side of every tile.
pub const TILE_PIXELS: u32 = CHUNK_PIXELS * CHUNKS_PER_TILE as u32;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Block colours for a render mode, as (even, odd) checkerboard pair.
pub fn chunk_colours(mode: RenderMode) -> (Rgba<u8>, Rgba<u8>) {
    match mode {
        RenderMode::Normal => (Rgba([96, 142, 62, 255]), Rgba([88, 132, 56, 255])),
        RenderMode::Lighting => (Rgba([124, 170, 86, 255]), Rgba([112, 158, 76, 255])),
        RenderMode::Night => (Rgba([28, 40, 72, 255]), Rgba([22, 32, 60, 255])),
        RenderMode::Spawn => (Rgba([176, 64, 52, 255]), Rgba([158, 56, 46, 255])),
    }
}

/// Draw a base tile whose top-left chunk is `origin`.
///
/// Chunks outside the tile are ignored.
pub fn render_base_tile(origin: ChunkCoord, chunks: &[ChunkCoord], mode: RenderMode) -> RgbaImage {
    let mut tile = RgbaImage::from_pixel(TILE_PIXELS, TILE_PIXELS, TRANSPARENT);
    let (even, odd) = chunk_colours(mode);

    for chunk in chunks {
        let dx = chunk.x - origin.x;
        let dz = chunk.z - origin.z;
        if !(0..CHUNKS_PER_TILE).contains(&dx) || !(0..CHUNKS_PER_TILE).contains(&dz) {
            continue;
        }

        let colour = if (chunk.x + chunk.z).rem_euclid(2) == 0 {
            even
        } else {
            odd
        };
        let left = dx as u32 * CHUNK_PIXELS;
        let top = dz as u32 * CHUNK_PIXELS;
        for y in top..top + CHUNK_PIXELS {
            for x in left..left + CHUNK_PIXELS {
                tile.put_pixel(x, y, colour);
            }
        }
    }

    tile
}

/// Combine four children (indexed by quadrant) into one tile.
pub fn compose_parent(children: &[Option<&RgbaImage>; 4]) -> RgbaImage {
    let mut tile = RgbaImage::from_pixel(TILE_PIXELS, TILE_PIXELS, TRANSPARENT);
    let half = TILE_PIXELS / 2;

    for (quadrant, child) in children.iter().enumerate() {
        let Some(child) = child else { continue };
        let scaled = imageops::resize(*child, half, half, FilterType::Triangle);
        let x = (quadrant as u32 % 2) * half;
        let y = (quadrant as u32 / 2) * half;
        imageops::overlay(&mut tile, &scaled, x as i64, y as i64);
    }

    tile
}

/// Encode `tile` to `path`, creating parent directories.
///
/// JPEG has no alpha channel, so transparent areas become black.
pub fn save_tile(tile: &RgbaImage, path: &Path, format: ImageFormat) -> Result<(), PhaseError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PhaseError::io(parent, e))?;
    }

    let result = match format {
        ImageFormat::Png => tile.save_with_format(path, image::ImageFormat::Png),
        ImageFormat::Jpg => DynamicImage::ImageRgba8(tile.clone())
            .to_rgb8()
            .save_with_format(path, image::ImageFormat::Jpeg),
    };

    result.map_err(|e| PhaseError::Image {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
