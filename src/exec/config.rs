//! Execution configuration for the worker gang.

use std::env;
use std::thread;

/// Environment variable overriding the number of workers.
pub const ENV_WORKERS: &str = "FLATSEG_WORKERS";

/// Environment variable overriding the minimum chunk length.
pub const ENV_MIN_CHUNK: &str = "FLATSEG_MIN_CHUNK";

/// How arrays are partitioned across worker threads.
///
/// An array of `n` elements is cut into at most `workers * chunks_per_worker`
/// contiguous chunks, none shorter than `min_chunk` (except when the whole
/// array is shorter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Number of worker threads in the pool.
    pub workers: usize,

    /// Smallest chunk worth handing to a worker.
    pub min_chunk: usize,

    /// Chunks per worker (1 = one fixed partition per worker).
    pub chunks_per_worker: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            min_chunk: 4096,
            chunks_per_worker: 1,
        }
    }
}

impl ExecConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads (clamped to at least 1).
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the minimum chunk length (clamped to at least 1).
    #[must_use]
    pub fn min_chunk(mut self, min_chunk: usize) -> Self {
        self.min_chunk = min_chunk.max(1);
        self
    }

    /// Sets how many chunks each worker receives.
    #[must_use]
    pub fn chunks_per_worker(mut self, chunks: usize) -> Self {
        self.chunks_per_worker = chunks.max(1);
        self
    }

    /// Defaults overridden by `FLATSEG_WORKERS` / `FLATSEG_MIN_CHUNK`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(workers) = read_env(ENV_WORKERS) {
            config = config.workers(workers);
        }
        if let Some(min_chunk) = read_env(ENV_MIN_CHUNK) {
            config = config.min_chunk(min_chunk);
        }
        config
    }

    /// Upper bound on the number of chunks for one array.
    pub fn max_chunks(&self) -> usize {
        self.workers.saturating_mul(self.chunks_per_worker).max(1)
    }
}

fn read_env(key: &str) -> Option<usize> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, "ignoring malformed setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps() {
        let config = ExecConfig::new().workers(0).min_chunk(0).chunks_per_worker(0);
        assert_eq!(config.workers, 1);
        assert_eq!(config.min_chunk, 1);
        assert_eq!(config.chunks_per_worker, 1);
        assert_eq!(config.max_chunks(), 1);
    }

    #[test]
    fn test_max_chunks() {
        let config = ExecConfig::new().workers(4).chunks_per_worker(3);
        assert_eq!(config.max_chunks(), 12);
    }
}
