//! Settings file loading.
//!
//! The settings file is INI. Keys may sit at the top of the file or under an
//! `[overviewer]` section:
//!
//! ```ini
//! processes = 4
//! rendermode = lighting
//! imgformat = jpg
//! web_assets_hook = /home/me/bin/copy-assets.sh
//! ```
//!
//! Unknown keys and command-line-only keys are rejected.

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use tracing::debug;

use super::options::{find_option, OptionKind};
use super::settings::OptionOverrides;
use super::ConfigError;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.ini";

/// Section name accepted in addition to the general section.
pub const SETTINGS_SECTION: &str = "overviewer";

/// Load a settings file.
pub fn load_settings_file(path: &Path) -> Result<OptionOverrides, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text, path)
}

/// Load the settings file if one applies.
///
/// An explicit path must exist. Without one, `settings.ini` in the working
/// directory is used when present and silently skipped otherwise.
pub fn load_optional(explicit: Option<&Path>) -> Result<OptionOverrides, ConfigError> {
    match explicit {
        Some(path) => load_settings_file(path),
        None => {
            let default = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if default.is_file() {
                load_settings_file(&default)
            } else {
                debug!("No settings file found, using command line and defaults");
                Ok(OptionOverrides::default())
            }
        }
    }
}

/// Parse settings text. `origin` is used in error messages.
pub fn parse_settings(text: &str, origin: &Path) -> Result<OptionOverrides, ConfigError> {
    // Escapes stay off so Windows paths keep their backslashes.
    let options = ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, options).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut overrides = OptionOverrides::default();

    for (section, props) in ini.iter() {
        if let Some(name) = section {
            if !name.eq_ignore_ascii_case(SETTINGS_SECTION) {
                return Err(ConfigError::UnknownSection {
                    path: origin.to_path_buf(),
                    section: name.to_string(),
                });
            }
        }

        for (key, value) in props.iter() {
            apply(&mut overrides, key, value, origin)?;
        }
    }

    debug!(path = %origin.display(), "Loaded settings file");
    Ok(overrides)
}

fn apply(
    overrides: &mut OptionOverrides,
    key: &str,
    value: &str,
    origin: &Path,
) -> Result<(), ConfigError> {
    let spec = find_option(key).ok_or_else(|| ConfigError::UnknownOption {
        path: origin.to_path_buf(),
        key: key.to_string(),
    })?;

    if !spec.scope.allows_file() {
        return Err(ConfigError::CliOnlyOption {
            path: origin.to_path_buf(),
            key: spec.name.to_string(),
        });
    }

    let value = value.trim();
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: spec.name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match (spec.name, spec.kind) {
        ("processes", _) => {
            overrides.processes = Some(value.parse().map_err(|_| invalid("expected an integer"))?)
        }
        ("zoom", _) => {
            overrides.zoom = Some(value.parse().map_err(|_| invalid("expected an integer"))?)
        }
        ("optimize-img", _) => {
            overrides.optimize_img =
                Some(value.parse().map_err(|_| invalid("expected 0, 1 or 2"))?)
        }
        ("cachedir", _) => overrides.cachedir = Some(PathBuf::from(value)),
        ("chunklist", _) => overrides.chunklist = Some(PathBuf::from(value)),
        ("web-assets-hook", _) => overrides.web_assets_hook = Some(PathBuf::from(value)),
        ("rendermode", OptionKind::Choice(_)) => overrides.rendermode = Some(value.parse()?),
        ("imgformat", _) => overrides.imgformat = Some(value.to_string()),
        ("skip-js", OptionKind::Flag) => {
            overrides.skip_js =
                Some(parse_bool(value).ok_or_else(|| invalid("expected true or false"))?)
        }
        _ => return Err(invalid("not settable from a settings file")),
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
