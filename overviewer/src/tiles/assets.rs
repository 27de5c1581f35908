//! Web viewer assets written next to the tiles.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::layout::{CHUNKS_PER_TILE, ROOT_TILE_STEM};
use super::render::TILE_PIXELS;
use crate::pipeline::{PhaseError, TileParams};

pub const INDEX_HTML: &str = "index.html";
pub const CONFIG_JS: &str = "overviewerConfig.js";
pub const MARKERS_JS: &str = "markers.js";
pub const REGIONS_JS: &str = "regions.js";

/// Viewer settings serialised into `overviewerConfig.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub max_zoom: u32,
    pub default_zoom: u32,
    pub tile_size: u32,
    pub chunks_per_tile: i32,
    pub image_format: String,
    pub render_mode: String,
    pub root_tile: String,
    pub markers: bool,
    pub version: String,
}

impl ViewerConfig {
    pub fn new(depth: u32, params: &TileParams) -> Self {
        Self {
            max_zoom: depth,
            default_zoom: depth.min(2),
            tile_size: TILE_PIXELS,
            chunks_per_tile: CHUNKS_PER_TILE,
            image_format: params.image_format.extension().to_string(),
            render_mode: params.render_mode.to_string(),
            root_tile: format!("{}.{}", ROOT_TILE_STEM, params.image_format.extension()),
            markers: !params.skip_aux_output,
            version: crate::VERSION.to_string(),
        }
    }
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Minecraft Overviewer</title>
  <script type="text/javascript" src="overviewerConfig.js"></script>
  {aux_scripts}
  <style>
    html, body { margin: 0; height: 100%; background: #000; }
    #map { width: 100%; height: 100%; }
  </style>
</head>
<body>
  <div id="map"></div>
</body>
</html>
"#;

fn index_html(skip_aux_output: bool) -> String {
    let aux = if skip_aux_output {
        String::new()
    } else {
        format!(
            r#"<script type="text/javascript" src="{}"></script>
  <script type="text/javascript" src="{}"></script>"#,
            MARKERS_JS, REGIONS_JS
        )
    };
    INDEX_TEMPLATE.replace("{aux_scripts}", &aux)
}

/// Write the viewer files into `params.dest_dir`, returning the paths written.
///
/// `markers.js` and `regions.js` are only written when auxiliary output is
/// enabled. Existing marker files are not overwritten.
pub fn write_web_assets(depth: u32, params: &TileParams) -> Result<Vec<PathBuf>, PhaseError> {
    let dest = &params.dest_dir;
    fs::create_dir_all(dest).map_err(|e| PhaseError::io(dest, e))?;

    let config = ViewerConfig::new(depth, params);
    let json = serde_json::to_string_pretty(&config).map_err(|e| PhaseError::Io {
        path: dest.join(CONFIG_JS),
        source: e.into(),
    })?;

    let mut written = vec![
        write_file(dest, INDEX_HTML, &index_html(params.skip_aux_output))?,
        write_file(dest, CONFIG_JS, &format!("var overviewerConfig = {};\n", json))?,
    ];

    if !params.skip_aux_output {
        for (name, body) in [
            (MARKERS_JS, "var markerData = [];\n"),
            (REGIONS_JS, "var regionData = [];\n"),
        ] {
            if !dest.join(name).exists() {
                written.push(write_file(dest, name, body)?);
            }
        }
    }

    debug!(dest = %dest.display(), files = written.len(), "Wrote web assets");
    Ok(written)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, PhaseError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| PhaseError::io(&path, e))?;
    Ok(path)
}
