//! Fixed-partition parallel execution
//!
//! A `Gang` owns a rayon thread pool and a partitioning policy. Kernels ask it
//! to `split` an index space into contiguous chunks, run per-chunk work with
//! `run`, and write into disjoint output slices with `fill`.
//!
//! ```text
//!   [0 ............................................ n)
//!   |  chunk 0   |  chunk 1   |  chunk 2   |  chunk 3 |
//!        ↓            ↓            ↓            ↓        parallel
//!     local        local        local        local
//!        └──────────→ boundary pass (sequential) ←──┘
//! ```

pub mod config;

pub use config::ExecConfig;

use std::cell::RefCell;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

static GLOBAL: OnceLock<Arc<Gang>> = OnceLock::new();

thread_local! {
    static CURRENT: RefCell<Option<Arc<Gang>>> = const { RefCell::new(None) };
}

/// Worker pool plus chunking policy
pub struct Gang {
    pool: Option<ThreadPool>,
    config: ExecConfig,
}

impl Gang {
    /// Build a gang with its own thread pool.
    ///
    /// A single-worker gang runs every chunk on the calling thread.
    pub fn new(config: ExecConfig) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = if config.workers > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("flatseg-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        tracing::debug!(
            workers = config.workers,
            min_chunk = config.min_chunk,
            chunks_per_worker = config.chunks_per_worker,
            "gang ready"
        );
        Ok(Self { pool, config })
    }

    /// Gang that runs everything on the calling thread.
    pub fn sequential() -> Self {
        Self {
            pool: None,
            config: ExecConfig::new().workers(1),
        }
    }

    /// Process-wide gang, configured from the environment on first use.
    pub fn global() -> Arc<Gang> {
        Arc::clone(GLOBAL.get_or_init(|| {
            let config = ExecConfig::from_env();
            match Gang::new(config) {
                Ok(gang) => Arc::new(gang),
                Err(err) => {
                    tracing::warn!(error = %err, "thread pool unavailable, running sequentially");
                    Arc::new(Gang::sequential())
                }
            }
        }))
    }

    /// Gang installed on this thread, or the global one.
    pub fn current() -> Arc<Gang> {
        CURRENT
            .with(|cur| cur.borrow().clone())
            .unwrap_or_else(Gang::global)
    }

    /// Run `f` with `self` as the current gang on this thread.
    pub fn install<R>(self: &Arc<Self>, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Arc<Gang>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT.with(|cur| *cur.borrow_mut() = prev);
            }
        }

        let prev = CURRENT.with(|cur| cur.borrow_mut().replace(Arc::clone(self)));
        let _restore = Restore(prev);
        f()
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Cut `[0, n)` into contiguous, non-empty, balanced chunks in order.
    pub fn split(&self, n: usize) -> Vec<Range<usize>> {
        if n == 0 {
            return Vec::new();
        }
        let by_size = (n + self.config.min_chunk - 1) / self.config.min_chunk;
        let chunks = by_size.min(self.config.max_chunks()).max(1);
        let base = n / chunks;
        let rem = n % chunks;

        let mut ranges = Vec::with_capacity(chunks);
        let mut start = 0;
        for c in 0..chunks {
            let len = base + usize::from(c < rem);
            ranges.push(start..start + len);
            start += len;
        }
        ranges
    }

    /// Apply `f` to every item on the pool; results come back in item order.
    pub fn run<I, R, F>(&self, items: Vec<I>, f: F) -> Vec<R>
    where
        I: Send,
        R: Send,
        F: Fn(I) -> R + Sync,
    {
        match &self.pool {
            Some(pool) if items.len() > 1 => {
                let f = &f;
                pool.install(|| items.into_par_iter().map(f).collect())
            }
            _ => items.into_iter().map(f).collect(),
        }
    }

    /// Per-chunk work over `[0, n)`.
    pub fn map_chunks<R, F>(&self, n: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Sync,
    {
        self.run(self.split(n), f)
    }

    /// Fill `out` chunk by chunk; `f` receives the chunk's global offset.
    pub fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let ranges = self.split(out.len());
        let starts: Vec<usize> = ranges.iter().map(|r| r.start).collect();
        let parts = split_lengths(out, ranges.iter().map(|r| r.len()));
        self.run(starts.into_iter().zip(parts).collect(), |(start, part)| f(start, part));
    }

    /// Build a vector of `n` elements from `f(i)`.
    pub fn tabulate<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Copy + Default + Send,
        F: Fn(usize) -> T + Sync,
    {
        let mut out = vec![T::default(); n];
        self.fill(&mut out, |start, part| {
            for (k, slot) in part.iter_mut().enumerate() {
                *slot = f(start + k);
            }
        });
        out
    }
}

impl std::fmt::Debug for Gang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gang")
            .field("config", &self.config)
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

/// Split `out` into consecutive disjoint slices of the given lengths.
///
/// The lengths must not sum past `out.len()`.
pub(crate) fn split_lengths<T>(
    mut out: &mut [T],
    lengths: impl IntoIterator<Item = usize>,
) -> Vec<&mut [T]> {
    let mut parts = Vec::new();
    for len in lengths {
        let (head, tail) = std::mem::take(&mut out).split_at_mut(len);
        parts.push(head);
        out = tail;
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_gang(workers: usize) -> Gang {
        Gang::new(ExecConfig::new().workers(workers).min_chunk(1)).expect("pool")
    }

    #[test]
    fn test_split_covers_range() {
        let gang = small_gang(4);
        let ranges = gang.split(10);
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0], 0..3);
        assert_eq!(ranges[1], 3..6);
        assert_eq!(ranges[2], 6..8);
        assert_eq!(ranges[3], 8..10);
    }

    #[test]
    fn test_split_small_and_empty() {
        let gang = small_gang(8);
        assert!(gang.split(0).is_empty());
        assert_eq!(gang.split(3), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_split_respects_min_chunk() {
        let gang = Gang::new(ExecConfig::new().workers(8).min_chunk(100)).expect("pool");
        assert_eq!(gang.split(250).len(), 3);
        assert_eq!(gang.split(50), vec![0..50]);
    }

    #[test]
    fn test_run_preserves_order() {
        let gang = small_gang(3);
        let out = gang.run((0..100).collect(), |x: usize| x * 2);
        assert_eq!(out, (0..100).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_tabulate() {
        let gang = small_gang(3);
        assert_eq!(gang.tabulate(7, |i| i as i64 - 3), vec![-3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_install_scopes_gang() {
        let gang = Arc::new(small_gang(2));
        gang.install(|| {
            assert_eq!(Gang::current().config().min_chunk, 1);
        });
        assert!(CURRENT.with(|cur| cur.borrow().is_none()));
    }

    #[test]
    fn test_split_lengths() {
        let mut data = [1, 2, 3, 4, 5];
        let parts = split_lengths(&mut data, [2, 0, 3]);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], &[1, 2]);
        assert!(parts[1].is_empty());
        assert_eq!(parts[2], &[3, 4, 5]);
    }
}
