//! Quadtree tile addressing.
//!
//! A quadtree of depth `d` has `2^d x 2^d` base tiles, each covering
//! [`CHUNKS_PER_TILE`] x [`CHUNKS_PER_TILE`] chunks, centred on chunk (0, 0).
//! A tile at level `l` (root is level 0) is addressed by `l` quadrant digits:
//!
//! ```text
//! +---+---+
//! | 0 | 1 |     <dest>/base.png            level 0
//! +---+---+     <dest>/3.png               level 1
//! | 2 | 3 |     <dest>/3/0.png             level 2
//! +---+---+     <dest>/3/0/2.png           level 3
//! ```

use std::path::{Path, PathBuf};

use crate::pipeline::ChunkCoord;

/// Chunks along one side of a base tile.
pub const CHUNKS_PER_TILE: i32 = 16;

/// Deepest quadtree the generator will build.
pub const MAX_DEPTH: u32 = 24;

/// File stem of the root tile.
pub const ROOT_TILE_STEM: &str = "base";

/// Tile position within one level, in tiles from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub col: u32,
    pub row: u32,
}

impl TileIndex {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// The tile one level up that contains this one.
    pub fn parent(self) -> TileIndex {
        TileIndex::new(self.col / 2, self.row / 2)
    }

    /// Which quadrant of its parent this tile occupies.
    pub fn quadrant(self) -> u8 {
        ((self.col & 1) + 2 * (self.row & 1)) as u8
    }
}

/// Half the width of a depth-`depth` tree, in chunks.
fn half_span(depth: u32) -> i64 {
    (1i64 << (depth - 1)) * CHUNKS_PER_TILE as i64
}

/// Smallest depth (at least 1) whose tree covers every chunk.
pub fn required_depth(chunks: &[ChunkCoord]) -> u32 {
    let mut depth = 1;
    while depth < MAX_DEPTH && !chunks.iter().all(|c| base_tile(*c, depth).is_some()) {
        depth += 1;
    }
    depth
}

/// Base tile holding `chunk` in a depth-`depth` tree, or `None` if the chunk
/// lies outside it.
pub fn base_tile(chunk: ChunkCoord, depth: u32) -> Option<TileIndex> {
    let half = half_span(depth);
    let x = chunk.x as i64 + half;
    let z = chunk.z as i64 + half;
    if x < 0 || z < 0 || x >= 2 * half || z >= 2 * half {
        return None;
    }

    let per_tile = CHUNKS_PER_TILE as i64;
    Some(TileIndex::new((x / per_tile) as u32, (z / per_tile) as u32))
}

/// Top-left chunk of a base tile.
pub fn tile_origin(tile: TileIndex, depth: u32) -> ChunkCoord {
    let half = half_span(depth);
    let per_tile = CHUNKS_PER_TILE as i64;
    ChunkCoord::new(
        (tile.col as i64 * per_tile - half) as i32,
        (tile.row as i64 * per_tile - half) as i32,
    )
}

/// Quadrant digits of `tile` at `level`, root first.
pub fn quadrant_path(tile: TileIndex, level: u32) -> Vec<u8> {
    (0..level)
        .rev()
        .map(|bit| TileIndex::new(tile.col >> bit, tile.row >> bit).quadrant())
        .collect()
}

/// File path of `tile` at `level` under `dest`.
pub fn tile_path(dest: &Path, tile: TileIndex, level: u32, extension: &str) -> PathBuf {
    let digits = quadrant_path(tile, level);
    let Some((last, parents)) = digits.split_last() else {
        return dest.join(format!("{}.{}", ROOT_TILE_STEM, extension));
    };

    let mut path = dest.to_path_buf();
    for digit in parents {
        path.push(digit.to_string());
    }
    path.push(format!("{}.{}", last, extension));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_depth() {
        assert_eq!(required_depth(&[]), 1);
        assert_eq!(required_depth(&[ChunkCoord::new(0, 0)]), 1);
        assert_eq!(required_depth(&[ChunkCoord::new(15, -16)]), 1);
        assert_eq!(required_depth(&[ChunkCoord::new(16, 0)]), 2);
        assert_eq!(required_depth(&[ChunkCoord::new(-17, 0)]), 2);
        assert_eq!(required_depth(&[ChunkCoord::new(0, 100)]), 4);
    }

    #[test]
    fn test_base_tile_bounds() {
        assert_eq!(base_tile(ChunkCoord::new(-16, -16), 1), Some(TileIndex::new(0, 0)));
        assert_eq!(base_tile(ChunkCoord::new(0, 0), 1), Some(TileIndex::new(1, 1)));
        assert_eq!(base_tile(ChunkCoord::new(-1, 15), 1), Some(TileIndex::new(0, 1)));
        assert_eq!(base_tile(ChunkCoord::new(16, 0), 1), None);
        assert_eq!(base_tile(ChunkCoord::new(0, -17), 1), None);
    }

    #[test]
    fn test_tile_origin_inverts_base_tile() {
        let chunk = ChunkCoord::new(37, -5);
        let tile = base_tile(chunk, 3).unwrap();
        let origin = tile_origin(tile, 3);

        assert!(origin.x <= chunk.x && chunk.x < origin.x + CHUNKS_PER_TILE);
        assert!(origin.z <= chunk.z && chunk.z < origin.z + CHUNKS_PER_TILE);
    }

    #[test]
    fn test_quadrant_path() {
        assert!(quadrant_path(TileIndex::new(0, 0), 0).is_empty());
        assert_eq!(quadrant_path(TileIndex::new(1, 1), 1), vec![3]);
        // col 2 = 0b10, row 1 = 0b01 at level 2
        assert_eq!(quadrant_path(TileIndex::new(2, 1), 2), vec![1, 2]);
    }

    #[test]
    fn test_tile_path() {
        let dest = Path::new("tiles");
        assert_eq!(
            tile_path(dest, TileIndex::new(0, 0), 0, "png"),
            PathBuf::from("tiles/base.png")
        );
        assert_eq!(
            tile_path(dest, TileIndex::new(1, 0), 1, "jpg"),
            PathBuf::from("tiles/1.jpg")
        );
        assert_eq!(
            tile_path(dest, TileIndex::new(2, 1), 2, "png"),
            PathBuf::from("tiles/1/2.png")
        );
    }

    #[test]
    fn test_parent_and_quadrant() {
        let tile = TileIndex::new(5, 2);
        assert_eq!(tile.parent(), TileIndex::new(2, 1));
        assert_eq!(tile.quadrant(), 1);
    }
}
