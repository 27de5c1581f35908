//! Typed option values and their merge.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::options::{OptionSpec, OPTIONS};
use super::ConfigError;
use crate::logging::LogSettings;

/// How chunks are shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    Lighting,
    Night,
    Spawn,
}

impl RenderMode {
    /// Name used on the command line and in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Normal => "normal",
            RenderMode::Lighting => "lighting",
            RenderMode::Night => "night",
            RenderMode::Spawn => "spawn",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(RenderMode::Normal),
            "lighting" => Ok(RenderMode::Lighting),
            "night" => Ok(RenderMode::Night),
            "spawn" => Ok(RenderMode::Spawn),
            _ => Err(ConfigError::InvalidValue {
                key: "rendermode".to_string(),
                value: s.to_string(),
                reason: "expected normal, lighting, night or spawn".to_string(),
            }),
        }
    }
}

/// Option values from one source. `None` means "not given here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub processes: Option<usize>,
    pub zoom: Option<u32>,
    pub delete: Option<bool>,
    pub cachedir: Option<PathBuf>,
    pub chunklist: Option<PathBuf>,
    pub rendermode: Option<RenderMode>,
    pub imgformat: Option<String>,
    pub optimize_img: Option<u8>,
    pub web_assets_hook: Option<PathBuf>,
    pub quiet: Option<u8>,
    pub verbose: Option<u8>,
    pub skip_js: Option<bool>,
    pub display_config: Option<bool>,
}

impl OptionOverrides {
    /// Fill every unset field from `lower`.
    pub fn or(self, lower: OptionOverrides) -> OptionOverrides {
        OptionOverrides {
            processes: self.processes.or(lower.processes),
            zoom: self.zoom.or(lower.zoom),
            delete: self.delete.or(lower.delete),
            cachedir: self.cachedir.or(lower.cachedir),
            chunklist: self.chunklist.or(lower.chunklist),
            rendermode: self.rendermode.or(lower.rendermode),
            imgformat: self.imgformat.or(lower.imgformat),
            optimize_img: self.optimize_img.or(lower.optimize_img),
            web_assets_hook: self.web_assets_hook.or(lower.web_assets_hook),
            quiet: self.quiet.or(lower.quiet),
            verbose: self.verbose.or(lower.verbose),
            skip_js: self.skip_js.or(lower.skip_js),
            display_config: self.display_config.or(lower.display_config),
        }
    }
}

/// Merged option values with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub processes: usize,
    pub zoom: Option<u32>,
    pub delete: bool,
    pub cachedir: Option<PathBuf>,
    pub chunklist: Option<PathBuf>,
    pub rendermode: RenderMode,
    pub imgformat: String,
    pub optimize_img: u8,
    pub web_assets_hook: Option<PathBuf>,
    pub quiet: u8,
    pub verbose: u8,
    pub skip_js: bool,
    pub display_config: bool,
}

impl Settings {
    /// Merge command-line values over settings-file values over defaults.
    ///
    /// `default_processes` is used when neither source sets `processes`.
    pub fn merge(cli: OptionOverrides, file: OptionOverrides, default_processes: usize) -> Self {
        let merged = cli.or(file);
        Self {
            processes: merged.processes.unwrap_or(default_processes),
            zoom: merged.zoom,
            delete: merged.delete.unwrap_or(false),
            cachedir: merged.cachedir,
            chunklist: merged.chunklist,
            rendermode: merged.rendermode.unwrap_or_default(),
            imgformat: merged.imgformat.unwrap_or_else(|| "png".to_string()),
            optimize_img: merged.optimize_img.unwrap_or(0),
            web_assets_hook: merged.web_assets_hook,
            quiet: merged.quiet.unwrap_or(0),
            verbose: merged.verbose.unwrap_or(0),
            skip_js: merged.skip_js.unwrap_or(false),
            display_config: merged.display_config.unwrap_or(false),
        }
    }

    /// Logging context derived from the quiet/verbose counters.
    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(self.quiet, self.verbose)
    }

    /// Value of one option, formatted for display. Empty means "not set".
    pub fn value_of(&self, spec: &OptionSpec) -> String {
        fn path(p: &Option<PathBuf>) -> String {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        }

        match spec.name {
            "processes" => self.processes.to_string(),
            "zoom" => self.zoom.map(|z| z.to_string()).unwrap_or_default(),
            "delete" => self.delete.to_string(),
            "cachedir" => path(&self.cachedir),
            "chunklist" => path(&self.chunklist),
            "rendermode" => self.rendermode.to_string(),
            "imgformat" => self.imgformat.clone(),
            "optimize-img" => self.optimize_img.to_string(),
            "web-assets-hook" => path(&self.web_assets_hook),
            "quiet" => self.quiet.to_string(),
            "verbose" => self.verbose.to_string(),
            "skip-js" => self.skip_js.to_string(),
            "display-config" => self.display_config.to_string(),
            _ => String::new(),
        }
    }

    /// Render every option as `name = value` lines.
    pub fn display(&self) -> String {
        let mut out = String::from("Configuration Settings\n======================\n");
        for spec in OPTIONS {
            let value = self.value_of(spec);
            if value.is_empty() {
                out.push_str(&format!("  {} = (not set)\n", spec.name));
            } else {
                out.push_str(&format!("  {} = {}\n", spec.name, value));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_parse() {
        assert_eq!("night".parse::<RenderMode>().unwrap(), RenderMode::Night);
        assert_eq!(" Spawn ".parse::<RenderMode>().unwrap(), RenderMode::Spawn);
        assert!("cave".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_merge_defaults() {
        let settings = Settings::merge(OptionOverrides::default(), OptionOverrides::default(), 6);

        assert_eq!(settings.processes, 6);
        assert_eq!(settings.imgformat, "png");
        assert_eq!(settings.rendermode, RenderMode::Normal);
        assert_eq!(settings.optimize_img, 0);
        assert!(!settings.skip_js);
        assert_eq!(settings.zoom, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = OptionOverrides {
            processes: Some(2),
            ..Default::default()
        };
        let file = OptionOverrides {
            processes: Some(8),
            imgformat: Some("jpg".into()),
            ..Default::default()
        };

        let settings = Settings::merge(cli, file, 4);
        assert_eq!(settings.processes, 2);
        assert_eq!(settings.imgformat, "jpg");
    }

    #[test]
    fn test_display_lists_every_option() {
        let settings = Settings::merge(OptionOverrides::default(), OptionOverrides::default(), 1);
        let text = settings.display();

        for spec in OPTIONS {
            assert!(text.contains(&format!("  {} = ", spec.name)));
        }
        assert!(text.contains("  zoom = (not set)"));
        assert!(text.contains("  rendermode = normal"));
    }

    #[test]
    fn test_log_settings_from_counters() {
        let cli = OptionOverrides {
            quiet: Some(1),
            verbose: Some(2),
            ..Default::default()
        };
        let settings = Settings::merge(cli, OptionOverrides::default(), 1);
        assert_eq!(settings.log_settings(), LogSettings::new(1, 2));
    }
}
