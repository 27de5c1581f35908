//! Reference tile generator.
//!
//! [`QuadtreeTileGenerator`] lays the preprocessed chunks out on a quadtree
//! (see [`layout`]), writes the viewer files, runs the web assets hook and
//! renders every level from the base tiles up.

pub mod assets;
mod generator;
pub mod layout;
mod render;

pub use generator::QuadtreeTileGenerator;
pub use render::{
    chunk_colours, compose_parent, render_base_tile, save_tile, CHUNK_PIXELS, TILE_PIXELS,
};
