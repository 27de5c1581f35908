//! Table of recognised options.
//!
//! Every option the tool understands is listed here once, with its value
//! kind, default, and where it may be given (command line, settings file, or
//! both). The CLI flags and the settings-file keys share these names.

/// Value kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Integer value.
    Int,
    /// Filesystem path.
    Path,
    /// Free-form string (validated later).
    Str,
    /// One of a fixed set of strings.
    Choice(&'static [&'static str]),
    /// Boolean switch.
    Flag,
    /// Repeatable switch counted by occurrence.
    Count,
}

/// Where an option may be specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    /// Command line only.
    CliOnly,
    /// Settings file only.
    ConfigOnly,
    /// Command line or settings file.
    Both,
}

impl OptionScope {
    /// Whether the settings file may set this option.
    pub fn allows_file(self) -> bool {
        matches!(self, OptionScope::ConfigOnly | OptionScope::Both)
    }

    /// Whether the command line may set this option.
    pub fn allows_cli(self) -> bool {
        matches!(self, OptionScope::CliOnly | OptionScope::Both)
    }
}

/// Description of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name, as used for `--name` and settings-file keys.
    pub name: &'static str,
    /// Value kind.
    pub kind: OptionKind,
    /// Default, for display.
    pub default: &'static str,
    /// Allowed sources.
    pub scope: OptionScope,
}

/// Render modes accepted by `rendermode`.
pub const RENDER_MODES: &[&str] = &["normal", "lighting", "night", "spawn"];

/// All recognised options, in display order.
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "processes",
        kind: OptionKind::Int,
        default: "number of CPUs",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "zoom",
        kind: OptionKind::Int,
        default: "computed from world size",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "delete",
        kind: OptionKind::Flag,
        default: "false",
        scope: OptionScope::CliOnly,
    },
    OptionSpec {
        name: "cachedir",
        kind: OptionKind::Path,
        default: "world directory",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "chunklist",
        kind: OptionKind::Path,
        default: "none",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "rendermode",
        kind: OptionKind::Choice(RENDER_MODES),
        default: "normal",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "imgformat",
        kind: OptionKind::Str,
        default: "png",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "optimize-img",
        kind: OptionKind::Int,
        default: "0",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "web-assets-hook",
        kind: OptionKind::Path,
        default: "none",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "quiet",
        kind: OptionKind::Count,
        default: "0",
        scope: OptionScope::CliOnly,
    },
    OptionSpec {
        name: "verbose",
        kind: OptionKind::Count,
        default: "0",
        scope: OptionScope::CliOnly,
    },
    OptionSpec {
        name: "skip-js",
        kind: OptionKind::Flag,
        default: "false",
        scope: OptionScope::Both,
    },
    OptionSpec {
        name: "display-config",
        kind: OptionKind::Flag,
        default: "false",
        scope: OptionScope::CliOnly,
    },
];

/// Look up an option by name.
///
/// Underscores are accepted in place of hyphens, so `web_assets_hook` finds
/// `web-assets-hook`.
pub fn find_option(name: &str) -> Option<&'static OptionSpec> {
    let normalized = name.trim().replace('_', "-").to_ascii_lowercase();
    OPTIONS.iter().find(|spec| spec.name == normalized)
}
