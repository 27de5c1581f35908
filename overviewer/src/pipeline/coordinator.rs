//! Top-level run driver.
//!
//! ```text
//! Start ──► WorldValidated ──► ModeSelected ─┬─► Displaying ──┐
//!                                            ├─► Deleting ────┼─► Done
//!                                            └─► Rendering ───┘
//!                                                  1. preprocess (blocking)
//!                                                  2. generate tiles (blocking)
//! ```
//!
//! Validation failures happen before anything is written. Failures inside a
//! phase end the run immediately; partial output stays on disk for the next
//! run's cache to reconcile.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::error::PipelineError;
use super::mode::RunMode;
use super::phase::{
    ChunkList, PhaseError, PreprocessRequest, TileGenerator, TileParams, TileSummary,
    WorldPreprocessor,
};
use crate::cache::{invalidate_all, InvalidateOutcome};
use crate::config::{RunConfiguration, Settings};
use crate::hook::{HookError, HookInvoker};
use crate::optimize::{PathProbe, ToolProbe};
use crate::world::{resolve, WorldDescriptor, WorldRegistry};

/// One invocation's inputs.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Positional world selector (path, index or name).
    pub world_selector: Option<String>,
    /// Positional tile destination directory.
    pub dest_dir: Option<PathBuf>,
    /// Merged options.
    pub settings: Settings,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The merged configuration, ready to print.
    ConfigDisplayed(String),
    /// The cache marker was deleted (or already absent).
    CacheInvalidated(InvalidateOutcome),
    /// Both phases completed.
    Rendered(RenderSummary),
}

/// Result of a completed render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub world_path: PathBuf,
    pub dest_dir: PathBuf,
    pub chunk_count: usize,
    pub tiles: TileSummary,
}

/// Sequences mode selection and the two render phases.
pub struct PipelineCoordinator {
    preprocessor: Arc<dyn WorldPreprocessor>,
    generator: Arc<dyn TileGenerator>,
    probe: Arc<dyn ToolProbe>,
}

impl PipelineCoordinator {
    /// Create a coordinator over the given phase implementations.
    pub fn new(preprocessor: Arc<dyn WorldPreprocessor>, generator: Arc<dyn TileGenerator>) -> Self {
        Self {
            preprocessor,
            generator,
            probe: Arc::new(PathProbe),
        }
    }

    /// Use a different probe for optimization tools.
    pub fn with_tool_probe(mut self, probe: Arc<dyn ToolProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Execute one invocation.
    pub fn run(
        &self,
        request: RunRequest,
        registry: &WorldRegistry,
    ) -> Result<RunOutcome, PipelineError> {
        let selector = request
            .world_selector
            .as_deref()
            .ok_or(PipelineError::NoWorldGiven)?;
        let world = resolve(selector, registry)?;
        debug!(selector, path = %world.path().display(), "Resolved world");

        let settings = &request.settings;
        let mode = RunMode::select(
            settings.display_config,
            settings.delete,
            request.dest_dir.is_some(),
        )?;

        match mode {
            RunMode::DisplayConfig => Ok(RunOutcome::ConfigDisplayed(settings.display())),
            RunMode::DeleteCache => {
                if let Some(dest) = &request.dest_dir {
                    debug!(dest = %dest.display(), "Tile directory is left untouched by --delete");
                }
                Ok(RunOutcome::CacheInvalidated(invalidate_all(world.path())?))
            }
            RunMode::Render => {
                // select() guarantees a destination for Render.
                let dest = request
                    .dest_dir
                    .as_deref()
                    .ok_or(PipelineError::MissingDestination)?;
                self.render(&world, dest, settings)
            }
        }
    }

    fn render(
        &self,
        world: &WorldDescriptor,
        dest: &Path,
        settings: &Settings,
    ) -> Result<RunOutcome, PipelineError> {
        if !world.path().is_dir() {
            return Err(PipelineError::WorldMissing(world.path().to_path_buf()));
        }

        let config = RunConfiguration::build(world.path(), dest, settings, self.probe.as_ref())?;

        let chunk_list = match &config.chunk_list {
            Some(path) => Some(ChunkList {
                path: path.clone(),
                file: File::open(path).map_err(|source| PipelineError::ChunkListOpen {
                    path: path.clone(),
                    source,
                })?,
            }),
            None => None,
        };

        info!("Welcome to Minecraft Overviewer!");

        let biome_data = world.has_biome_data();
        if !biome_data {
            info!("Notice: Not using biome data for tinting");
        }

        info!(
            world = %config.world_path.display(),
            workers = config.worker_count,
            "Preprocessing world"
        );
        let preprocessed = self
            .preprocessor
            .preprocess(PreprocessRequest {
                world_path: config.world_path.clone(),
                cache_dir: config.cache_dir.clone(),
                biome_data,
                worker_count: config.worker_count,
                chunk_list,
            })
            .map_err(PipelineError::Preprocess)?;

        let invoker = HookInvoker::new(config.hook_path.clone());
        let hook =
            move |dest_dir: &Path| -> Result<(), HookError> { invoker.run_checked(dest_dir) };

        info!(
            dest = %config.dest_dir.display(),
            format = %config.image_format,
            mode = %config.render_mode,
            "Generating tiles"
        );
        let params = TileParams::from(&config);
        let tiles = self
            .generator
            .generate(&preprocessed, &params, &hook)
            .map_err(|e| match e {
                PhaseError::Hook(h) => PipelineError::Hook(h),
                other => PipelineError::TileGeneration(other),
            })?;

        info!(
            depth = tiles.depth,
            tiles = tiles.tiles_written,
            "Render complete"
        );

        Ok(RunOutcome::Rendered(RenderSummary {
            world_path: config.world_path,
            dest_dir: config.dest_dir,
            chunk_count: preprocessed.chunks.len(),
            tiles,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CACHE_MARKER_FILENAME;
    use crate::config::OptionOverrides;
    use crate::pipeline::{ChunkCoord, PreprocessedWorld, WebAssetsHook};
    use crate::world::{WorldDescriptor, WorldKey};
    use std::io::Read;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records each call and returns a fixed chunk set.
    #[derive(Default)]
    struct RecordingPreprocessor {
        calls: Mutex<Vec<(PathBuf, bool, usize, Option<String>)>>,
    }

    impl WorldPreprocessor for RecordingPreprocessor {
        fn preprocess(&self, request: PreprocessRequest) -> Result<PreprocessedWorld, PhaseError> {
            let list = request.chunk_list.map(|mut list| {
                let mut text = String::new();
                list.file.read_to_string(&mut text).unwrap();
                text
            });
            self.calls.lock().unwrap().push((
                request.world_path.clone(),
                request.biome_data,
                request.worker_count,
                list,
            ));
            Ok(PreprocessedWorld {
                world_path: request.world_path,
                biome_data: request.biome_data,
                chunks: vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, -1)],
            })
        }
    }

    /// Calls the hook then records that rendering happened.
    #[derive(Default)]
    struct RecordingGenerator {
        rendered: Mutex<Vec<TileParams>>,
    }

    impl TileGenerator for RecordingGenerator {
        fn generate(
            &self,
            _world: &PreprocessedWorld,
            params: &TileParams,
            hook: WebAssetsHook<'_>,
        ) -> Result<TileSummary, PhaseError> {
            hook(&params.dest_dir)?;
            self.rendered.lock().unwrap().push(params.clone());
            Ok(TileSummary {
                depth: 2,
                tiles_written: 5,
            })
        }
    }

    struct AllTools;

    impl ToolProbe for AllTools {
        fn is_available(&self, _tool: &str) -> bool {
            true
        }
    }

    struct Fixture {
        pre: Arc<RecordingPreprocessor>,
        gen: Arc<RecordingGenerator>,
        coordinator: PipelineCoordinator,
    }

    fn fixture() -> Fixture {
        let pre = Arc::new(RecordingPreprocessor::default());
        let gen = Arc::new(RecordingGenerator::default());
        let coordinator = PipelineCoordinator::new(pre.clone(), gen.clone())
            .with_tool_probe(Arc::new(AllTools));
        Fixture {
            pre,
            gen,
            coordinator,
        }
    }

    fn request(world: Option<&Path>, dest: Option<&Path>, cli: OptionOverrides) -> RunRequest {
        RunRequest {
            world_selector: world.map(|p| p.display().to_string()),
            dest_dir: dest.map(Path::to_path_buf),
            settings: Settings::merge(cli, OptionOverrides::default(), 3),
        }
    }

    #[test]
    fn test_no_world_given() {
        let f = fixture();
        let result = f
            .coordinator
            .run(request(None, None, OptionOverrides::default()), &WorldRegistry::new());
        assert!(matches!(result, Err(PipelineError::NoWorldGiven)));
    }

    #[test]
    fn test_unknown_world_is_invalid() {
        let f = fixture();
        let req = RunRequest {
            world_selector: Some("save-nowhere".into()),
            dest_dir: Some(PathBuf::from("tiles")),
            settings: Settings::merge(OptionOverrides::default(), OptionOverrides::default(), 1),
        };
        let result = f.coordinator.run(req, &WorldRegistry::new());
        assert!(matches!(result, Err(PipelineError::InvalidWorld(_))));
    }

    #[test]
    fn test_render_requires_destination() {
        let world = TempDir::new().unwrap();
        let f = fixture();
        let result = f.coordinator.run(
            request(Some(world.path()), None, OptionOverrides::default()),
            &WorldRegistry::new(),
        );
        assert!(matches!(result, Err(PipelineError::MissingDestination)));
        assert!(f.pre.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_render_runs_both_phases() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let f = fixture();

        let outcome = f
            .coordinator
            .run(
                request(Some(world.path()), Some(dest.path()), OptionOverrides::default()),
                &WorldRegistry::new(),
            )
            .unwrap();

        let calls = f.pre.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (world.path().to_path_buf(), false, 3, None));

        let rendered = f.gen.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].worker_count, 3);
        assert_eq!(rendered[0].cache_dir, world.path());

        match outcome {
            RunOutcome::Rendered(summary) => {
                assert_eq!(summary.chunk_count, 2);
                assert_eq!(summary.tiles.tiles_written, 5);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_biome_directory_is_detected() {
        let world = TempDir::new().unwrap();
        std::fs::create_dir(world.path().join("biomes")).unwrap();
        let dest = TempDir::new().unwrap();
        let f = fixture();

        f.coordinator
            .run(
                request(Some(world.path()), Some(dest.path()), OptionOverrides::default()),
                &WorldRegistry::new(),
            )
            .unwrap();

        assert!(f.pre.calls.lock().unwrap()[0].1);
    }

    #[test]
    fn test_chunk_list_is_opened_for_preprocessor() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let list = world.path().join("chunks.txt");
        std::fs::write(&list, "region/r.0.0.mca\n").unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            chunklist: Some(list),
            ..Default::default()
        };
        f.coordinator
            .run(request(Some(world.path()), Some(dest.path()), cli), &WorldRegistry::new())
            .unwrap();

        let calls = f.pre.calls.lock().unwrap();
        assert_eq!(calls[0].3.as_deref(), Some("region/r.0.0.mca\n"));
    }

    #[test]
    fn test_missing_chunk_list_fails_before_preprocessing() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            chunklist: Some(world.path().join("missing.txt")),
            ..Default::default()
        };
        let result = f
            .coordinator
            .run(request(Some(world.path()), Some(dest.path()), cli), &WorldRegistry::new());

        assert!(matches!(result, Err(PipelineError::ChunkListOpen { .. })));
        assert!(f.pre.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_format_runs_no_phase() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            imgformat: Some("gif".into()),
            ..Default::default()
        };
        let result = f
            .coordinator
            .run(request(Some(world.path()), Some(dest.path()), cli), &WorldRegistry::new());

        assert!(matches!(
            result,
            Err(PipelineError::Config(crate::config::ConfigError::UnsupportedImageFormat(_)))
        ));
        assert!(f.pre.calls.lock().unwrap().is_empty());
        assert!(f.gen.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_marker_only() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let marker = world.path().join(CACHE_MARKER_FILENAME);
        std::fs::write(&marker, b"state").unwrap();
        std::fs::write(dest.path().join("base.png"), b"tile").unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            delete: Some(true),
            ..Default::default()
        };
        let outcome = f
            .coordinator
            .run(request(Some(world.path()), Some(dest.path()), cli), &WorldRegistry::new())
            .unwrap();

        assert_eq!(outcome, RunOutcome::CacheInvalidated(InvalidateOutcome::Deleted(marker.clone())));
        assert!(!marker.exists());
        assert!(dest.path().join("base.png").exists());
        assert!(f.pre.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delete_without_marker_or_destination() {
        let world = TempDir::new().unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            delete: Some(true),
            ..Default::default()
        };
        let outcome = f
            .coordinator
            .run(request(Some(world.path()), None, cli), &WorldRegistry::new())
            .unwrap();

        assert_eq!(outcome, RunOutcome::CacheInvalidated(InvalidateOutcome::NotPresent));
    }

    #[test]
    fn test_display_config_touches_nothing() {
        let world = TempDir::new().unwrap();
        let marker = world.path().join(CACHE_MARKER_FILENAME);
        std::fs::write(&marker, b"state").unwrap();
        let dest = world.path().join("tiles");
        let f = fixture();

        let cli = OptionOverrides {
            display_config: Some(true),
            delete: Some(true),
            ..Default::default()
        };
        let outcome = f
            .coordinator
            .run(request(Some(world.path()), Some(&dest), cli), &WorldRegistry::new())
            .unwrap();

        match outcome {
            RunOutcome::ConfigDisplayed(text) => assert!(text.contains("processes = 3")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(marker.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_index_selector_uses_registry() {
        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let registry = WorldRegistry::new().with(
            WorldKey::Index(2),
            WorldDescriptor::from_path("2", world.path()),
        );
        let f = fixture();

        let req = RunRequest {
            world_selector: Some("2".into()),
            dest_dir: Some(dest.path().to_path_buf()),
            settings: Settings::merge(OptionOverrides::default(), OptionOverrides::default(), 1),
        };
        f.coordinator.run(req, &registry).unwrap();

        assert_eq!(f.pre.calls.lock().unwrap()[0].0, world.path());
    }

    #[test]
    fn test_registry_entry_without_directory_is_missing() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone");
        let registry =
            WorldRegistry::new().with(WorldKey::Index(1), WorldDescriptor::from_path("1", &gone));
        let f = fixture();

        let req = RunRequest {
            world_selector: Some("1".into()),
            dest_dir: Some(temp.path().join("tiles")),
            settings: Settings::merge(OptionOverrides::default(), OptionOverrides::default(), 1),
        };
        let result = f.coordinator.run(req, &registry);

        assert!(matches!(result, Err(PipelineError::WorldMissing(p)) if p == gone));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_hook_stops_rendering() {
        use std::os::unix::fs::PermissionsExt;

        let world = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let hook = world.path().join("hook.sh");
        std::fs::write(&hook, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();
        let f = fixture();

        let cli = OptionOverrides {
            web_assets_hook: Some(hook),
            ..Default::default()
        };
        let result = f
            .coordinator
            .run(request(Some(world.path()), Some(dest.path()), cli), &WorldRegistry::new());

        assert!(matches!(
            result,
            Err(PipelineError::Hook(HookError::NonZeroExit { code: Some(1), .. }))
        ));
        assert_eq!(f.pre.calls.lock().unwrap().len(), 1);
        assert!(f.gen.rendered.lock().unwrap().is_empty());
    }
}
