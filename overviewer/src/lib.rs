//! Overviewer - world-to-tile render orchestration
//!
//! This library resolves which world save to render, owns the lifecycle of the
//! on-disk cache marker, and drives the two-phase render pipeline (world
//! preprocessing, then quadtree tile generation) across a pool of workers.
//!
//! # Pipeline
//!
//! ```text
//! selector ──► WorldLocator ──► RunMode ─┬─► DisplayConfig (print, exit)
//!                                        ├─► DeleteCache   (CacheMarker::invalidate_all)
//!                                        └─► Render
//!                                              1. WorldPreprocessor::preprocess
//!                                              2. TileGenerator::generate
//!                                                   └── web assets hook (HookInvoker)
//! ```
//!
//! The two phases are traits ([`pipeline::WorldPreprocessor`] and
//! [`pipeline::TileGenerator`]). Reference implementations live in
//! [`preprocess`] and [`tiles`].

pub mod cache;
pub mod config;
pub mod hook;
pub mod logging;
pub mod optimize;
pub mod pipeline;
pub mod preprocess;
pub mod tiles;
pub mod world;

/// Library version, as recorded in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
