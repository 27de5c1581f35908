//! Worker pool sizing and construction.

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::PhaseError;

/// Best-effort CPU count, never less than 1.
///
/// Falls back to a single worker when the platform cannot report its
/// parallelism.
pub fn detect_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

/// Build a bounded pool of `workers` threads for one phase.
///
/// The pool is torn down when dropped, after all submitted work has joined.
pub fn build_pool(label: &'static str, workers: usize) -> Result<ThreadPool, PhaseError> {
    ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(move |i| format!("{}-{}", label, i))
        .build()
        .map_err(|e| PhaseError::Pool(e.to_string()))
}
