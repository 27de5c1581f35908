//! PNG size optimization through external tools.
//!
//! Level 1 runs `pngcrush`. Level 2 additionally runs `optipng` and `advdef`.
//! Tool availability is checked once at startup so a missing binary fails the
//! run before any rendering happens.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Highest supported optimization level.
pub const MAX_OPTIMIZE_LEVEL: u8 = 2;

/// Errors that can occur when checking or running optimization tools.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    /// Level outside `0..=2`.
    #[error("invalid image optimization level {0} (expected 0, 1 or 2)")]
    InvalidLevel(u8),

    /// A required program is not on the search path.
    #[error("optimizing images requires '{0}' in PATH")]
    MissingTool(String),

    /// A tool failed while processing an image.
    #[error("'{tool}' failed on {path}: {reason}")]
    ToolFailed {
        tool: String,
        path: PathBuf,
        reason: String,
    },
}

/// Validated optimization level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct OptimizeLevel(u8);

impl OptimizeLevel {
    /// No optimization.
    pub const NONE: OptimizeLevel = OptimizeLevel(0);

    /// Validate a raw level.
    pub fn new(level: u8) -> Result<Self, OptimizeError> {
        if level > MAX_OPTIMIZE_LEVEL {
            return Err(OptimizeError::InvalidLevel(level));
        }
        Ok(Self(level))
    }

    /// Raw level value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether any optimization is requested.
    pub fn is_enabled(self) -> bool {
        self.0 > 0
    }

    /// Programs this level needs.
    pub fn required_tools(self) -> &'static [&'static str] {
        match self.0 {
            0 => &[],
            1 => &["pngcrush"],
            _ => &["pngcrush", "optipng", "advdef"],
        }
    }
}

impl fmt::Display for OptimizeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability query for external programs.
pub trait ToolProbe: Send + Sync {
    /// Whether `tool` can be executed.
    fn is_available(&self, tool: &str) -> bool;
}

/// Probe that searches the `PATH` environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl ToolProbe for PathProbe {
    fn is_available(&self, tool: &str) -> bool {
        find_in_path(tool).is_some()
    }
}

/// Locate `tool` in `PATH`.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", tool));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Check that every tool required by `level` is available.
pub fn check_programs(level: OptimizeLevel, probe: &dyn ToolProbe) -> Result<(), OptimizeError> {
    for tool in level.required_tools() {
        if !probe.is_available(tool) {
            return Err(OptimizeError::MissingTool(tool.to_string()));
        }
        debug!(tool, "Found image optimization tool");
    }
    Ok(())
}

/// Optimize one PNG file in place.
pub fn optimize_png(path: &Path, level: OptimizeLevel) -> Result<(), OptimizeError> {
    if !level.is_enabled() {
        return Ok(());
    }

    let crushed = path.with_extension("crush.png");
    run_tool(
        "pngcrush",
        Command::new("pngcrush").arg("-q").arg(path).arg(&crushed),
        path,
    )?;
    std::fs::rename(&crushed, path).map_err(|e| OptimizeError::ToolFailed {
        tool: "pngcrush".to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if level.get() >= 2 {
        run_tool(
            "optipng",
            Command::new("optipng").arg("-quiet").arg("-o2").arg(path),
            path,
        )?;
        run_tool("advdef", Command::new("advdef").arg("-q").arg("-z4").arg(path), path)?;
    }

    Ok(())
}

fn run_tool(tool: &str, command: &mut Command, path: &Path) -> Result<(), OptimizeError> {
    let failed = |reason: String| OptimizeError::ToolFailed {
        tool: tool.to_string(),
        path: path.to_path_buf(),
        reason,
    };

    match command.output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string())),
        Err(e) => Err(failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakeProbe(HashSet<&'static str>);

    impl ToolProbe for FakeProbe {
        fn is_available(&self, tool: &str) -> bool {
            self.0.contains(tool)
        }
    }

    #[test]
    fn test_level_validation() {
        assert!(OptimizeLevel::new(0).is_ok());
        assert!(OptimizeLevel::new(2).is_ok());
        assert_eq!(OptimizeLevel::new(3), Err(OptimizeError::InvalidLevel(3)));
    }

    #[test]
    fn test_required_tools_per_level() {
        assert!(OptimizeLevel::NONE.required_tools().is_empty());
        assert_eq!(OptimizeLevel::new(1).unwrap().required_tools(), &["pngcrush"]);
        assert_eq!(OptimizeLevel::new(2).unwrap().required_tools().len(), 3);
    }

    #[test]
    fn test_check_programs_reports_first_missing_tool() {
        let probe = FakeProbe(["pngcrush"].into_iter().collect());

        assert!(check_programs(OptimizeLevel::new(1).unwrap(), &probe).is_ok());
        assert_eq!(
            check_programs(OptimizeLevel::new(2).unwrap(), &probe),
            Err(OptimizeError::MissingTool("optipng".to_string()))
        );
    }

    #[test]
    fn test_level_zero_needs_nothing() {
        let probe = FakeProbe(HashSet::new());
        assert!(check_programs(OptimizeLevel::NONE, &probe).is_ok());
    }

    #[test]
    fn test_optimize_disabled_is_noop() {
        assert!(optimize_png(Path::new("/nonexistent.png"), OptimizeLevel::NONE).is_ok());
    }

    #[test]
    fn test_find_in_path_misses_unknown_tool() {
        assert!(find_in_path("definitely-not-a-real-tool-0xdead").is_none());
    }
}
