//! Overviewer CLI
//!
//! Parses options, merges them with the settings file, and hands the run to
//! the library's [`PipelineCoordinator`].

mod cli;
mod error;

use std::sync::Arc;

use clap::{CommandFactory, Parser};
use overviewer::cache::InvalidateOutcome;
use overviewer::config::{load_optional, Settings};
use overviewer::logging;
use overviewer::pipeline::{
    detect_worker_count, PipelineCoordinator, PipelineError, RunOutcome, RunRequest,
};
use overviewer::preprocess::RegionScanner;
use overviewer::tiles::QuadtreeTileGenerator;
use overviewer::world::summary::format_listing;
use overviewer::world::{WorldDiscovery, WorldRegistry};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = load_optional(cli.settings.as_deref())?;
    let settings = Settings::merge(cli.overrides(), file, detect_worker_count());
    logging::init(&settings.log_settings());

    let registry = discover_worlds();

    let coordinator = PipelineCoordinator::new(
        Arc::new(RegionScanner::new()),
        Arc::new(QuadtreeTileGenerator::new()),
    );
    let request = RunRequest {
        world_selector: cli.world,
        dest_dir: cli.dest,
        settings,
    };

    match coordinator.run(request, &registry) {
        Ok(outcome) => {
            print_outcome(&outcome);
            Ok(())
        }
        Err(PipelineError::NoWorldGiven) => Err(CliError::NoWorldGiven {
            listing: format_listing(&registry),
        }),
        Err(e) => Err(CliError::Pipeline(e)),
    }
}

fn discover_worlds() -> WorldRegistry {
    match WorldDiscovery::for_default_location() {
        Some(discovery) => {
            debug!(saves = %discovery.saves_dir().display(), "Scanning for world saves");
            discovery.scan()
        }
        None => WorldRegistry::new(),
    }
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::ConfigDisplayed(text) => print!("{}", text),
        RunOutcome::CacheInvalidated(InvalidateOutcome::Deleted(path)) => {
            println!("Deleted cache marker: {}", path.display());
        }
        RunOutcome::CacheInvalidated(InvalidateOutcome::NotPresent) => {
            println!("No cache marker found; nothing to delete");
        }
        RunOutcome::Rendered(summary) => {
            println!(
                "Rendered {} tiles ({} chunks, {} zoom levels) into {}",
                summary.tiles.tiles_written,
                summary.chunk_count,
                summary.tiles.depth,
                summary.dest_dir.display()
            );
        }
    }
}

fn report(err: &CliError) {
    eprintln!("Error: {}", err);

    if err.shows_usage() {
        eprintln!();
        eprintln!("{}", Cli::command().render_usage());
    }

    if let CliError::NoWorldGiven { listing } = err {
        eprintln!();
        eprintln!("{}", listing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overviewer::cache::CACHE_MARKER_FILENAME;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("overviewer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_delete_removes_marker() {
        let world = TempDir::new().unwrap();
        let marker = world.path().join(CACHE_MARKER_FILENAME);
        std::fs::write(&marker, b"state").unwrap();
        let settings = world.path().join("none.ini");
        std::fs::write(&settings, "").unwrap();

        let cli = parse(&[
            "--settings",
            settings.to_str().unwrap(),
            "-d",
            world.path().to_str().unwrap(),
        ]);
        run(cli).unwrap();

        assert!(!marker.exists());
    }

    #[test]
    fn test_missing_explicit_settings_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ini");

        let cli = parse(&["--settings", missing.to_str().unwrap(), "-d", "anything"]);
        let err = run(cli).unwrap_err();

        assert!(matches!(err, CliError::Settings(_)));
        assert_eq!(err.exit_code(), error::EXIT_USAGE);
    }

    #[test]
    fn test_settings_file_supplies_image_format() {
        let temp = TempDir::new().unwrap();
        let world = temp.path().join("world");
        std::fs::create_dir(&world).unwrap();
        let settings = temp.path().join("settings.ini");
        std::fs::write(&settings, "imgformat = gif\n").unwrap();

        let cli = parse(&[
            "--settings",
            settings.to_str().unwrap(),
            world.to_str().unwrap(),
            temp.path().join("tiles").to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();

        assert_eq!(err.exit_code(), error::EXIT_USAGE);
        assert!(!temp.path().join("tiles").exists());
    }
}
