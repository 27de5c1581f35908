//! Discovery of world saves in the game's saves directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::level_dat::read_level_info;
use super::registry::{WorldDescriptor, WorldKey, WorldRegistry};

/// Marker file that identifies a directory as a world save.
pub const LEVEL_DAT: &str = "level.dat";

/// Scans a saves directory and builds a [`WorldRegistry`].
#[derive(Debug, Clone)]
pub struct WorldDiscovery {
    saves_dir: PathBuf,
}

impl WorldDiscovery {
    /// Create a discovery for the given saves directory.
    pub fn new(saves_dir: impl Into<PathBuf>) -> Self {
        Self {
            saves_dir: saves_dir.into(),
        }
    }

    /// Create a discovery for the platform's default saves directory.
    ///
    /// Returns `None` when the home directory cannot be determined.
    pub fn for_default_location() -> Option<Self> {
        default_saves_dir().map(Self::new)
    }

    /// The directory being scanned.
    pub fn saves_dir(&self) -> &Path {
        &self.saves_dir
    }

    /// Scan the saves directory.
    ///
    /// Every directory containing a readable `level.dat` is registered under
    /// its folder name. Folders named `World<digit>` are also registered under
    /// that digit. Worlds whose `level.dat` cannot be read are skipped. A
    /// missing saves directory produces an empty registry.
    pub fn scan(&self) -> WorldRegistry {
        let mut registry = WorldRegistry::new();

        let entries = match std::fs::read_dir(&self.saves_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    path = %self.saves_dir.display(),
                    error = %e,
                    "Saves directory not readable"
                );
                return registry;
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.join(LEVEL_DAT).is_file())
            .collect();
        dirs.sort();

        for path in dirs {
            let name = match path.file_name() {
                Some(n) => n.to_string_lossy().to_string(),
                None => continue,
            };

            let info = match read_level_info(&path.join(LEVEL_DAT)) {
                Ok(info) => info,
                Err(e) => {
                    warn!(world = %name, error = %e, "Skipping world with unreadable level.dat");
                    continue;
                }
            };

            let descriptor = WorldDescriptor::from_path(&name, &path).with_metadata(
                info.last_played_ms,
                info.time_ticks,
                info.size_on_disk,
            );

            if let Some(index) = legacy_index(&name) {
                registry.insert(
                    WorldKey::Index(index),
                    WorldDescriptor {
                        identifier: index.to_string(),
                        ..descriptor.clone()
                    },
                );
            }
            registry.insert(WorldKey::Name(name), descriptor);
        }

        debug!(worlds = registry.len(), "World discovery complete");
        registry
    }
}

/// Index for legacy slot names `World1`..`World9`.
pub fn legacy_index(name: &str) -> Option<i64> {
    let digit = name.strip_prefix("World")?;
    if digit.len() != 1 {
        return None;
    }
    digit.parse().ok()
}

/// Platform default saves directory.
///
/// - Linux: `~/.minecraft/saves`
/// - macOS: `~/Library/Application Support/minecraft/saves`
/// - Windows: `%APPDATA%\.minecraft\saves`
pub fn default_saves_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::data_dir().map(|d| d.join("minecraft").join("saves"))
    } else if cfg!(windows) {
        dirs::config_dir().map(|d| d.join(".minecraft").join("saves"))
    } else {
        dirs::home_dir().map(|h| h.join(".minecraft").join("saves"))
    }
}
