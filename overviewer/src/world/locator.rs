//! Resolution of a user-supplied world selector.
//!
//! Precedence is path, then numeric index, then save name. A bare `3` always
//! means index 3 even when a save is literally named `3`; such a save is still
//! reachable through its path.

use std::path::Path;

use thiserror::Error;

use super::registry::{WorldDescriptor, WorldRegistry};

/// Errors that can occur while resolving a world selector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The selector is not a path, index, or known save name.
    #[error("Invalid world name or path: {0}")]
    WorldNotFound(String),

    /// The selector parsed as a number but no save has that index.
    #[error("Invalid world number: {0}")]
    InvalidIndex(i64),
}

/// Resolve `identifier` to a world.
///
/// The registry is not consulted when `identifier` names an existing path.
pub fn resolve(identifier: &str, registry: &WorldRegistry) -> Result<WorldDescriptor, LocateError> {
    if Path::new(identifier).exists() {
        return Ok(WorldDescriptor::from_path(identifier, identifier));
    }

    if let Ok(index) = identifier.trim().parse::<i64>() {
        return registry
            .by_index(index)
            .map(|d| with_identifier(d, identifier))
            .ok_or(LocateError::InvalidIndex(index));
    }

    registry
        .by_name(identifier)
        .map(|d| with_identifier(d, identifier))
        .ok_or_else(|| LocateError::WorldNotFound(identifier.to_string()))
}

fn with_identifier(descriptor: &WorldDescriptor, identifier: &str) -> WorldDescriptor {
    WorldDescriptor {
        identifier: identifier.to_string(),
        ..descriptor.clone()
    }
}
