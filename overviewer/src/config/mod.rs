//! Configuration: option table, settings file, merge, and render validation.
//!
//! Options come from the command line and an optional INI settings file.
//! [`Settings::merge`] combines them (command line wins) into typed values;
//! [`RunConfiguration::build`] validates those values for a render before any
//! pipeline phase runs.

mod file;
pub mod options;
mod run;
mod settings;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::optimize::OptimizeError;

pub use file::{
    load_optional, load_settings_file, parse_settings, DEFAULT_SETTINGS_FILE, SETTINGS_SECTION,
};
pub use options::{find_option, OptionKind, OptionScope, OptionSpec, OPTIONS};
pub use run::{ImageFormat, RunConfiguration};
pub use settings::{OptionOverrides, RenderMode, Settings};

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// Settings file is not valid INI.
    #[error("failed to parse settings file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Settings file uses a key that is not an option.
    #[error("unknown option '{key}' in {path}")]
    UnknownOption { path: PathBuf, key: String },

    /// Settings file sets a command-line-only option.
    #[error("option '{key}' can only be given on the command line (found in {path})")]
    CliOnlyOption { path: PathBuf, key: String },

    /// Settings file has a section other than the general one or `[overviewer]`.
    #[error("unknown section [{section}] in {path}")]
    UnknownSection { path: PathBuf, section: String },

    /// Option value could not be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Image format other than png or jpg.
    #[error("Unknown imgformat '{0}' (expected png or jpg)")]
    UnsupportedImageFormat(String),

    /// Web assets hook path does not exist.
    #[error("Provided hook script does not exist: {0}")]
    HookNotFound(PathBuf),

    /// Optimization level or tool problem.
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}
