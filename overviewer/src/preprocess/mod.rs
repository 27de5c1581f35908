//! Reference world preprocessor.
//!
//! [`RegionScanner`] finds every generated chunk in a world directory and
//! records the scan in the cache marker and a chunk index. It does not decode
//! chunk contents.

mod names;
mod region;
mod scanner;

pub use names::{parse_base36, parse_world_file, WorldFile, REGION_SIDE};
pub use region::{read_region_chunks, region_origin, LOCATION_TABLE_LEN};
pub use scanner::{RegionScanner, CHUNK_INDEX_FILENAME};
