//! Running a job over many documents
//!
//! Documents are independent: each job call builds its own graphs and
//! identifier allocator. A failing document is logged and counted, the
//! rest of the batch carries on.

use crate::config::PerformanceConfig;
use crate::error::{EngineError, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Results of a batch, in input order
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Successful documents and their results
    pub results: Vec<(PathBuf, T)>,
    /// Failed documents and their errors
    pub failures: Vec<(PathBuf, EngineError)>,
}

impl<T> BatchOutcome<T> {
    /// Number of documents processed successfully
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    /// Number of documents that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn collect(paths: &[PathBuf], outcomes: Vec<Result<T>>) -> Self {
        let mut batch = BatchOutcome {
            results: Vec::with_capacity(outcomes.len()),
            failures: Vec::new(),
        };
        for (path, outcome) in paths.iter().zip(outcomes) {
            match outcome {
                Ok(result) => batch.results.push((path.clone(), result)),
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    batch.failures.push((path.clone(), e));
                }
            }
        }
        info!(
            "batch finished: {} succeeded, {} failed",
            batch.succeeded(),
            batch.failed()
        );
        batch
    }
}

/// Thread count for a batch, every core when unset
pub fn thread_count(settings: &PerformanceConfig) -> usize {
    if settings.sequential {
        1
    } else if settings.threads == 0 {
        all_cores()
    } else {
        settings.threads
    }
}

#[cfg(feature = "parallel")]
fn all_cores() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "parallel"))]
fn all_cores() -> usize {
    1
}

/// Run `job` over every path
///
/// Only a failure to set up the worker pool is returned as an error.
pub fn run_batch<T, F>(
    paths: &[PathBuf],
    settings: &PerformanceConfig,
    job: F,
) -> Result<BatchOutcome<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    let threads = thread_count(settings);
    if threads <= 1 || paths.len() <= 1 {
        let outcomes = paths.iter().map(|path| job(path.as_path())).collect();
        return Ok(BatchOutcome::collect(paths, outcomes));
    }
    run_parallel(paths, threads, job)
}

#[cfg(feature = "parallel")]
fn run_parallel<T, F>(paths: &[PathBuf], threads: usize, job: F) -> Result<BatchOutcome<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| EngineError::ParallelError(e.to_string()))?;
    info!("processing {} documents on {threads} threads", paths.len());
    let outcomes = pool.install(|| paths.par_iter().map(|path| job(path.as_path())).collect());
    Ok(BatchOutcome::collect(paths, outcomes))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<T, F>(paths: &[PathBuf], _threads: usize, job: F) -> Result<BatchOutcome<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    let outcomes = paths.iter().map(|path| job(path.as_path())).collect();
    Ok(BatchOutcome::collect(paths, outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("doc-{i}.lif"))).collect()
    }

    fn job(path: &Path) -> Result<usize> {
        let name = path.to_string_lossy();
        let n: usize = name
            .trim_start_matches("doc-")
            .trim_end_matches(".lif")
            .parse()
            .map_err(|_| EngineError::IoError(name.to_string()))?;
        if n % 3 == 2 {
            return Err(EngineError::MissingView {
                view: "tokens".to_string(),
            });
        }
        Ok(n * 10)
    }

    #[test]
    fn test_failures_are_counted_not_fatal() {
        let outcome = run_batch(&paths(7), &PerformanceConfig::default(), job).unwrap();
        assert_eq!(outcome.succeeded(), 5);
        assert_eq!(outcome.failed(), 2);
        assert_eq!(outcome.failures[0].0, PathBuf::from("doc-2.lif"));
    }

    #[test]
    fn test_order_is_preserved() {
        let settings = PerformanceConfig {
            threads: 4,
            sequential: false,
        };
        let outcome = run_batch(&paths(40), &settings, job).unwrap();
        let values: Vec<usize> = outcome.results.iter().map(|(_, v)| *v).collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(values, sorted);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let sequential = PerformanceConfig {
            threads: 0,
            sequential: true,
        };
        assert_eq!(thread_count(&sequential), 1);
        let a = run_batch(&paths(12), &sequential, job).unwrap();
        let b = run_batch(&paths(12), &PerformanceConfig::default(), job).unwrap();
        assert_eq!(a.results, b.results);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = run_batch(&[], &PerformanceConfig::default(), job).unwrap();
        assert_eq!(outcome.succeeded() + outcome.failed(), 0);
    }
}
