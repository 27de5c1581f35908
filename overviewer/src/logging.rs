//! Logging setup.
//!
//! The log threshold uses numeric levels: 10 DEBUG, 20 INFO, 30 WARN,
//! 40 ERROR. It starts at INFO, each `--quiet` raises it by 10 and each
//! `--verbose` then lowers it by 10. `RUST_LOG`, when set, takes precedence.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Threshold before any quiet/verbose adjustment.
pub const DEFAULT_THRESHOLD: i32 = 20;

/// Threshold change per `--quiet` or `--verbose` occurrence.
pub const THRESHOLD_STEP: i32 = 10;

/// Logging context for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Number of `--quiet` occurrences.
    pub quiet: u8,
    /// Number of `--verbose` occurrences.
    pub verbose: u8,
}

impl LogSettings {
    /// Create settings from quiet/verbose counters.
    pub fn new(quiet: u8, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Numeric threshold after applying quiet, then verbose.
    pub fn threshold(&self) -> i32 {
        DEFAULT_THRESHOLD + THRESHOLD_STEP * self.quiet as i32
            - THRESHOLD_STEP * self.verbose as i32
    }

    /// `tracing` filter for the threshold.
    pub fn level_filter(&self) -> LevelFilter {
        match self.threshold() {
            t if t < 10 => LevelFilter::TRACE,
            t if t < 20 => LevelFilter::DEBUG,
            t if t < 30 => LevelFilter::INFO,
            t if t < 40 => LevelFilter::WARN,
            t if t < 50 => LevelFilter::ERROR,
            _ => LevelFilter::OFF,
        }
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(settings: &LogSettings) {
    let filter = EnvFilter::builder()
        .with_default_directive(settings.level_filter().into())
        .from_env_lossy();

    let timer = LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .try_init()
    {
        tracing::debug!(error = %e, "Subscriber already installed, keeping it");
    }

    tracing::debug!(threshold = settings.threshold(), "Current log level");
}
