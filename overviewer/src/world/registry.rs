//! World descriptors and the per-invocation registry of discovered saves.

use std::fmt;
use std::path::{Path, PathBuf};

/// Key under which a world is registered.
///
/// Legacy saves named `World1`..`World5` are reachable both by their folder
/// name and by the bare number, so one descriptor may appear under two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorldKey {
    /// Numeric index, e.g. `3` for `World3`.
    Index(i64),
    /// Save folder name.
    Name(String),
}

impl fmt::Display for WorldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldKey::Index(i) => write!(f, "{}", i),
            WorldKey::Name(name) => f.write_str(name),
        }
    }
}

/// A world save resolved to a concrete directory.
///
/// Metadata fields are zero when the world was given as a bare path and the
/// registry was never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldDescriptor {
    /// Raw user input that selected this world.
    pub identifier: String,

    /// Directory holding the world data.
    pub resolved_path: PathBuf,

    /// `Data.LastPlayed` from level.dat, in milliseconds since the epoch.
    pub last_played_ms: i64,

    /// `Data.Time` from level.dat, in game ticks (20 per second).
    pub total_play_ticks: i64,

    /// `Data.SizeOnDisk` from level.dat, in bytes.
    pub size_on_disk_bytes: i64,
}

impl WorldDescriptor {
    /// Create a descriptor for a path with no known metadata.
    pub fn from_path(identifier: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            resolved_path: path.into(),
            last_played_ms: 0,
            total_play_ticks: 0,
            size_on_disk_bytes: 0,
        }
    }

    /// Set the level.dat metadata.
    pub fn with_metadata(mut self, last_played_ms: i64, play_ticks: i64, size_bytes: i64) -> Self {
        self.last_played_ms = last_played_ms;
        self.total_play_ticks = play_ticks;
        self.size_on_disk_bytes = size_bytes;
        self
    }

    /// Directory holding the world data.
    pub fn path(&self) -> &Path {
        &self.resolved_path
    }

    /// Whether a `biomes` entry is present under the world.
    ///
    /// This is an existence signal only; biome files are never parsed here.
    pub fn has_biome_data(&self) -> bool {
        self.resolved_path.join("biomes").exists()
    }
}

/// Worlds discovered in the saves directory, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    entries: Vec<(WorldKey, WorldDescriptor)>,
}

impl WorldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a world under a key.
    ///
    /// A later insert with the same key replaces the earlier descriptor but
    /// keeps its original position.
    pub fn insert(&mut self, key: WorldKey, descriptor: WorldDescriptor) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = descriptor,
            None => self.entries.push((key, descriptor)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: WorldKey, descriptor: WorldDescriptor) -> Self {
        self.insert(key, descriptor);
        self
    }

    /// Look up a world by numeric index.
    pub fn by_index(&self, index: i64) -> Option<&WorldDescriptor> {
        self.get(&WorldKey::Index(index))
    }

    /// Look up a world by folder name.
    pub fn by_name(&self, name: &str) -> Option<&WorldDescriptor> {
        self.entries.iter().find_map(|(k, d)| match k {
            WorldKey::Name(n) if n == name => Some(d),
            _ => None,
        })
    }

    /// Look up a world by key.
    pub fn get(&self, key: &WorldKey) -> Option<&WorldDescriptor> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    /// Iterate entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&WorldKey, &WorldDescriptor)> {
        self.entries.iter().map(|(k, d)| (k, d))
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no worlds were discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
