//! Chunk and region file name parsing.
//!
//! Two world layouts are recognised:
//!
//! ```text
//! <world>/<a>/<b>/c.<x>.<z>.dat     one file per chunk, base-36 coordinates
//! <world>/region/r.<x>.<z>.mca      32x32 chunks per file, decimal coordinates
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::pipeline::ChunkCoord;

/// Chunks along one side of a region file.
pub const REGION_SIDE: i32 = 32;

/// A world file that holds chunk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldFile {
    /// `c.<x>.<z>.dat`, holding exactly one chunk.
    Chunk(ChunkCoord),
    /// `r.<x>.<z>.mcr` or `.mca`, holding up to 32x32 chunks.
    Region { x: i32, z: i32 },
}

fn chunk_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^c\.(-?[0-9a-z]+)\.(-?[0-9a-z]+)\.dat$").unwrap())
}

fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^r\.(-?\d+)\.(-?\d+)\.mc[ar]$").unwrap())
}

/// Parse a signed base-36 number as written in chunk file names.
pub fn parse_base36(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, 36).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Classify a file name, returning `None` for anything that is not chunk data.
pub fn parse_world_file(name: &str) -> Option<WorldFile> {
    if let Some(caps) = chunk_pattern().captures(name) {
        let x = parse_base36(&caps[1])?;
        let z = parse_base36(&caps[2])?;
        return Some(WorldFile::Chunk(ChunkCoord::new(x, z)));
    }

    if let Some(caps) = region_pattern().captures(name) {
        let x = caps[1].parse().ok()?;
        let z = caps[2].parse().ok()?;
        return Some(WorldFile::Region { x, z });
    }

    None
}
