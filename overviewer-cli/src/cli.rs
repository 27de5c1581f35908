//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use overviewer::config::{OptionOverrides, RenderMode};

/// Render a world save into a browsable quadtree of map tiles.
#[derive(Debug, Parser)]
#[command(
    name = "overviewer",
    version,
    override_usage = "overviewer [OPTIONS] <World # / Name / Path to World> <tiles dest dir>\n       \
                      overviewer -d <World # / Name / Path to World>"
)]
pub struct Cli {
    /// World number, world name, or path to a world directory
    pub world: Option<String>,

    /// Directory to write tiles into
    pub dest: Option<PathBuf>,

    /// Number of worker threads per phase [default: CPU count]
    #[arg(short = 'p', long)]
    pub processes: Option<usize>,

    /// Number of quadtree levels, overriding the computed depth
    #[arg(short = 'z', long)]
    pub zoom: Option<u32>,

    /// Delete the world's cache marker and exit
    #[arg(short = 'd', long)]
    pub delete: bool,

    /// Directory holding the cache marker [default: the world directory]
    #[arg(long)]
    pub cachedir: Option<PathBuf>,

    /// File listing the chunk or region files to render, one per line
    #[arg(long)]
    pub chunklist: Option<PathBuf>,

    /// How chunks are shaded
    #[arg(long, value_enum)]
    pub rendermode: Option<RenderModeArg>,

    /// Tile image format: png or jpg [default: png]
    #[arg(long)]
    pub imgformat: Option<String>,

    /// Run PNG optimizers on written tiles (1: pngcrush, 2: also optipng and advdef)
    #[arg(long = "optimize-img")]
    pub optimize_img: Option<u8>,

    /// Program run with the tile directory after web assets are written
    #[arg(long = "web-assets-hook")]
    pub web_assets_hook: Option<PathBuf>,

    /// Print less output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print more output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not write markers.js and regions.js
    #[arg(long = "skip-js")]
    pub skip_js: bool,

    /// Print the merged configuration and exit
    #[arg(long = "display-config")]
    pub display_config: bool,

    /// Settings file to read [default: ./settings.ini if present]
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

/// Render mode selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RenderModeArg {
    /// Daylight colours
    Normal,
    /// Daylight with lighting
    Lighting,
    /// Night colours
    Night,
    /// Highlight spawnable areas
    Spawn,
}

impl From<RenderModeArg> for RenderMode {
    fn from(arg: RenderModeArg) -> Self {
        match arg {
            RenderModeArg::Normal => RenderMode::Normal,
            RenderModeArg::Lighting => RenderMode::Lighting,
            RenderModeArg::Night => RenderMode::Night,
            RenderModeArg::Spawn => RenderMode::Spawn,
        }
    }
}

impl Cli {
    /// Option values given on the command line. Flags and counters that were
    /// not used stay unset so the settings file can supply them.
    pub fn overrides(&self) -> OptionOverrides {
        fn flag(set: bool) -> Option<bool> {
            set.then_some(true)
        }
        fn count(n: u8) -> Option<u8> {
            (n > 0).then_some(n)
        }

        OptionOverrides {
            processes: self.processes,
            zoom: self.zoom,
            delete: flag(self.delete),
            cachedir: self.cachedir.clone(),
            chunklist: self.chunklist.clone(),
            rendermode: self.rendermode.map(RenderMode::from),
            imgformat: self.imgformat.clone(),
            optimize_img: self.optimize_img,
            web_assets_hook: self.web_assets_hook.clone(),
            quiet: count(self.quiet),
            verbose: count(self.verbose),
            skip_js: flag(self.skip_js),
            display_config: flag(self.display_config),
        }
    }
}
