//! Region file location table.
//!
//! A region file starts with 1024 big-endian `u32` entries, one per chunk
//! slot in x-major order (`index = x + z * 32`). The top 24 bits hold the
//! sector offset and the low 8 bits the sector count; an all-zero entry means
//! the chunk was never generated.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::names::REGION_SIDE;
use crate::pipeline::ChunkCoord;

/// Size of the location table in bytes.
pub const LOCATION_TABLE_LEN: usize = 4096;

/// First chunk of region `(region_x, region_z)`, or `None` when any chunk of
/// the region falls outside the `i32` chunk coordinate range.
pub fn region_origin(region_x: i32, region_z: i32) -> Option<ChunkCoord> {
    let first = |r: i32| {
        let origin = r.checked_mul(REGION_SIDE)?;
        origin.checked_add(REGION_SIDE - 1).map(|_| origin)
    };
    Some(ChunkCoord::new(first(region_x)?, first(region_z)?))
}

/// Chunks present in the region file at `path`, region coordinates
/// `(region_x, region_z)`.
///
/// A file shorter than the location table holds no chunks. Regions outside
/// the chunk coordinate range are an `InvalidInput` error.
pub fn read_region_chunks(path: &Path, region_x: i32, region_z: i32) -> io::Result<Vec<ChunkCoord>> {
    let origin = region_origin(region_x, region_z).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("region ({}, {}) is outside the chunk coordinate range", region_x, region_z),
        )
    })?;

    let mut table = Vec::with_capacity(LOCATION_TABLE_LEN);
    File::open(path)?
        .take(LOCATION_TABLE_LEN as u64)
        .read_to_end(&mut table)?;

    if table.len() < LOCATION_TABLE_LEN {
        return Ok(Vec::new());
    }

    Ok(present_slots(&table)
        .map(|index| {
            let local_x = index as i32 % REGION_SIDE;
            let local_z = index as i32 / REGION_SIDE;
            ChunkCoord::new(origin.x + local_x, origin.z + local_z)
        })
        .collect())
}

fn present_slots(table: &[u8]) -> impl Iterator<Item = usize> + '_ {
    table
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, entry)| u32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]) != 0)
        .map(|(index, _)| index)
}
