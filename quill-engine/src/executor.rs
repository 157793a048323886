//! Scheduling of per-chunk calls

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Execution mode selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One chunk at a time, in order
    #[default]
    Sequential,
    /// Chunks fanned out over a thread pool; results keep chunk order
    Parallel,
}

impl ExecutionMode {
    /// Mode name as written in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

/// Apply `f` to every item and collect the results in input order
///
/// Stops at the first error. In parallel mode calls already in flight run to
/// completion, items after a failed index are not started, and the error
/// reported is the one with the lowest index.
pub fn map_ordered<T, R, E, F>(
    mode: ExecutionMode,
    max_concurrency: Option<usize>,
    items: &[T],
    f: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<R, E> + Sync + Send,
{
    match mode {
        ExecutionMode::Sequential => map_sequential(items, f),
        ExecutionMode::Parallel => map_parallel(max_concurrency, items, f),
    }
}

fn map_sequential<T, R, E, F>(items: &[T], f: F) -> Result<Vec<R>, E>
where
    F: Fn(usize, &T) -> Result<R, E>,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}

#[cfg(feature = "parallel")]
fn map_parallel<T, R, E, F>(max_concurrency: Option<usize>, items: &[T], f: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(usize, &T) -> Result<R, E> + Sync + Send,
{
    // Lowest index that has failed so far; later items are skipped
    let first_failure = AtomicUsize::new(usize::MAX);

    let run = || {
        let outcomes: Vec<Option<Result<R, E>>> = items
            .par_iter()
            .enumerate()
            .map(|(index, item)| {
                if index > first_failure.load(Ordering::Acquire) {
                    return None;
                }
                let outcome = f(index, item);
                if outcome.is_err() {
                    first_failure.fetch_min(index, Ordering::AcqRel);
                }
                Some(outcome)
            })
            .collect();

        // Skipped items all sit after a failure, so the first error by index
        // is reached before any gap
        outcomes.into_iter().flatten().collect()
    };

    let Some(threads) = max_concurrency else {
        return run();
    };

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(err) => {
            log::warn!("could not build a {threads}-thread pool, using the global pool: {err}");
            run()
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn map_parallel<T, R, E, F>(_max_concurrency: Option<usize>, items: &[T], f: F) -> Result<Vec<R>, E>
where
    F: Fn(usize, &T) -> Result<R, E>,
{
    log::warn!("parallel execution requested but the `parallel` feature is disabled");
    map_sequential(items, f)
}
