//! Validated configuration for one render.

use std::fmt;
use std::path::{Path, PathBuf};

use super::settings::{RenderMode, Settings};
use super::ConfigError;
use crate::logging::LogSettings;
use crate::optimize::{check_programs, OptimizeLevel, ToolProbe};

/// Output image format for tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
}

impl ImageFormat {
    /// Parse a format name. Only `png` and `jpg` are accepted.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "png" => Ok(ImageFormat::Png),
            "jpg" => Ok(ImageFormat::Jpg),
            other => Err(ConfigError::UnsupportedImageFormat(other.to_string())),
        }
    }

    /// File extension for tiles.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Everything the render phases need, validated once before they start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    pub world_path: PathBuf,
    pub dest_dir: PathBuf,
    /// Always at least 1.
    pub worker_count: usize,
    pub zoom: Option<u32>,
    /// Intermediate data directory; the world directory unless overridden.
    /// The cache marker is always in the world directory.
    pub cache_dir: PathBuf,
    pub chunk_list: Option<PathBuf>,
    pub render_mode: RenderMode,
    pub image_format: ImageFormat,
    pub optimize_level: OptimizeLevel,
    pub hook_path: Option<PathBuf>,
    pub skip_aux_output: bool,
    pub log: LogSettings,
}

impl RunConfiguration {
    /// Validate merged settings for a render of `world_path` into `dest_dir`.
    ///
    /// Checks, in order: image format, optimization level and its tools,
    /// hook existence, worker count. Nothing is written to disk.
    pub fn build(
        world_path: &Path,
        dest_dir: &Path,
        settings: &Settings,
        probe: &dyn ToolProbe,
    ) -> Result<Self, ConfigError> {
        let image_format = ImageFormat::parse(&settings.imgformat)?;

        let optimize_level = OptimizeLevel::new(settings.optimize_img)?;
        if optimize_level.is_enabled() {
            check_programs(optimize_level, probe)?;
        }

        if let Some(hook) = &settings.web_assets_hook {
            if !hook.exists() {
                return Err(ConfigError::HookNotFound(hook.clone()));
            }
        }

        if settings.processes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "processes".to_string(),
                value: "0".to_string(),
                reason: "at least one worker is required".to_string(),
            });
        }

        Ok(Self {
            world_path: world_path.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            worker_count: settings.processes,
            zoom: settings.zoom,
            cache_dir: settings
                .cachedir
                .clone()
                .unwrap_or_else(|| world_path.to_path_buf()),
            chunk_list: settings.chunklist.clone(),
            render_mode: settings.rendermode,
            image_format,
            optimize_level,
            hook_path: settings.web_assets_hook.clone(),
            skip_aux_output: settings.skip_js,
            log: settings.log_settings(),
        })
    }
}
