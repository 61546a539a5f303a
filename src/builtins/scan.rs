//! Scans and reductions
//!
//! All three follow the same chunked plan:
//!
//! 1. every chunk reduces its own elements (`fold1`, in parallel),
//! 2. the chunk totals are folded left to right starting from `zero`
//!    (the only sequential step, one value per chunk),
//! 3. for `scan`, every chunk replays its elements from its carry (in parallel).
//!
//! Only associativity of `f` is assumed. Element order is preserved, so
//! non-commutative operators are safe, and `zero` does not have to be neutral.

use std::ops::Add;

use crate::array::{Array, Elt};
use crate::error::{Error, Result};
use crate::exec::{split_lengths, Gang};

#[inline]
pub(crate) fn reduce1<T: Elt, F: Fn(T, T) -> T>(f: &F, xs: &[T]) -> Option<T> {
    xs.iter().copied().reduce(f)
}

/// Exclusive prefix scan: `result[0] = zero`, `result[i] = f(result[i-1], src[i-1])`.
pub fn scan<T, F>(f: F, zero: T, src: &Array<T>) -> Array<T>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    scan_total(f, zero, src).0
}

/// Exclusive scan together with the overall total (`fold f zero src`).
pub fn scan_total<T, F>(f: F, zero: T, src: &Array<T>) -> (Array<T>, T)
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    let gang = Gang::current();
    let ranges = gang.split(src.len());
    tracing::trace!(op = "scan", len = src.len(), chunks = ranges.len());

    // Phase 1: local totals
    let locals = gang.run(ranges.clone(), |r| reduce1(&f, &src[r]));

    // Phase 2: carries across chunk boundaries
    let mut carries = Vec::with_capacity(locals.len());
    let mut acc = zero;
    for local in locals.into_iter().flatten() {
        carries.push(acc);
        acc = f(acc, local);
    }

    // Phase 3: distribute
    let mut out = vec![T::default(); src.len()];
    let parts = split_lengths(&mut out, ranges.iter().map(|r| r.len()));
    let work: Vec<_> = ranges.into_iter().zip(parts).zip(carries).collect();
    gang.run(work, |((range, part), carry)| {
        let mut run = carry;
        for (slot, &x) in part.iter_mut().zip(&src[range]) {
            *slot = run;
            run = f(run, x);
        }
    });

    (out.into(), acc)
}

/// Left-to-right reduction starting from `zero`.
pub fn fold<T, F>(f: F, zero: T, src: &Array<T>) -> T
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    let gang = Gang::current();
    let locals = gang.map_chunks(src.len(), |r| reduce1(&f, &src[r]));
    locals.into_iter().flatten().fold(zero, &f)
}

/// Reduction of a non-empty array.
pub fn fold1<T, F>(f: F, src: &Array<T>) -> Result<T>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    let gang = Gang::current();
    let locals = gang.map_chunks(src.len(), |r| reduce1(&f, &src[r]));
    locals
        .into_iter()
        .flatten()
        .reduce(&f)
        .ok_or(Error::EmptyArray { op: "fold1" })
}

/// Sum of all elements (`T::default()` is taken as zero).
pub fn sum<T>(src: &Array<T>) -> T
where
    T: Elt + Add<Output = T>,
{
    fold(|a, b| a + b, T::default(), src)
}

/// Conjunction of all flags (`true` for the empty array).
pub fn and(src: &Array<bool>) -> bool {
    fold(|a, b| a && b, true, src)
}
