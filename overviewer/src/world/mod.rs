//! World selection.
//!
//! A world is the directory tree being rendered. This module discovers saves
//! in the default location, resolves a user selector (path, index, or name)
//! to a [`WorldDescriptor`], and formats the listing of known saves.
//!
//! # Example
//!
//! ```ignore
//! use overviewer::world::{resolve, WorldDiscovery};
//!
//! let registry = WorldDiscovery::for_default_location()
//!     .map(|d| d.scan())
//!     .unwrap_or_default();
//! let world = resolve("2", &registry)?;
//! println!("Rendering {}", world.path().display());
//! ```

mod discovery;
mod level_dat;
mod locator;
mod registry;
pub mod summary;

pub use discovery::{default_saves_dir, legacy_index, WorldDiscovery, LEVEL_DAT};
pub use level_dat::{parse_level_info, read_level_info, LevelInfo};
pub use locator::{resolve, LocateError};
pub use registry::{WorldDescriptor, WorldKey, WorldRegistry};
