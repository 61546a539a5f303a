//! Pack and combine
//!
//! Both are chunked the same way: count per chunk (parallel), turn the counts
//! into per-chunk cursors (sequential, one step per chunk), then let every
//! chunk write its own disjoint slice of the output (parallel).

use crate::array::{Array, Elt};
use crate::builtins::selector::check_tags;
use crate::error::{check_len, Result};
use crate::exec::{split_lengths, Gang};

/// Keep `src[i]` wherever `keep(i)`; order preserved.
pub(crate) fn pack_where<T, P>(gang: &Gang, src: &[T], keep: P) -> Vec<T>
where
    T: Elt,
    P: Fn(usize) -> bool + Sync,
{
    let ranges = gang.split(src.len());
    let counts = gang.run(ranges.clone(), |r| r.filter(|&i| keep(i)).count());

    let mut out = vec![T::default(); counts.iter().sum()];
    let parts = split_lengths(&mut out, counts);
    gang.run(ranges.into_iter().zip(parts).collect(), |(r, part)| {
        let kept = r.filter(|&i| keep(i)).map(|i| src[i]);
        for (slot, x) in part.iter_mut().zip(kept) {
            *slot = x;
        }
    });
    out
}

/// Merge two sources under a per-position choice (`true` = first source).
fn combine_where<T, C>(
    op: &'static str,
    n: usize,
    first: C,
    src1: &Array<T>,
    src2: &Array<T>,
) -> Result<Array<T>>
where
    T: Elt,
    C: Fn(usize) -> bool + Sync,
{
    let gang = Gang::current();
    let ranges = gang.split(n);
    let counts = gang.run(ranges.clone(), |r| r.filter(|&i| first(i)).count());

    let firsts: usize = counts.iter().sum();
    check_len(op, firsts, src1.len())?;
    check_len(op, n - firsts, src2.len())?;
    tracing::trace!(op, len = n, firsts, chunks = ranges.len());

    let mut cursors = Vec::with_capacity(counts.len());
    let (mut i1, mut i2) = (0, 0);
    for (r, c) in ranges.iter().zip(&counts) {
        cursors.push((i1, i2));
        i1 += c;
        i2 += r.len() - c;
    }

    let mut out = vec![T::default(); n];
    let parts = split_lengths(&mut out, ranges.iter().map(|r| r.len()));
    let work: Vec<_> = ranges.into_iter().zip(parts).zip(cursors).collect();
    gang.run(work, |((r, part), (mut i1, mut i2))| {
        for (slot, i) in part.iter_mut().zip(r) {
            if first(i) {
                *slot = src1[i1];
                i1 += 1;
            } else {
                *slot = src2[i2];
                i2 += 1;
            }
        }
    });
    Ok(out.into())
}

/// Elements whose flag is set, in order.
pub fn pack<T: Elt>(src: &Array<T>, flags: &Array<bool>) -> Result<Array<T>> {
    check_len("pack", src.len(), flags.len())?;
    let gang = Gang::current();
    tracing::trace!(op = "pack", len = src.len());
    Ok(pack_where(&gang, src, |i| flags[i]).into())
}

/// Elements satisfying `pred`, in order.
pub fn filter<T, P>(pred: P, src: &Array<T>) -> Array<T>
where
    T: Elt,
    P: Fn(T) -> bool + Sync,
{
    let gang = Gang::current();
    pack_where(&gang, src, |i| pred(src[i])).into()
}

/// Interleave two arrays: position `i` takes the next element of `src1`
/// when `flags[i]`, otherwise the next element of `src2`.
pub fn combine<T: Elt>(flags: &Array<bool>, src1: &Array<T>, src2: &Array<T>) -> Result<Array<T>> {
    combine_where("combine", flags.len(), |i| flags[i], src1, src2)
}

/// `combine` driven by a 0/1 tag array; tag 0 draws from `src1`.
pub fn combine2_by_tag<T: Elt>(tags: &Array<usize>, src1: &Array<T>, src2: &Array<T>) -> Result<Array<T>> {
    check_tags(&Gang::current(), tags, 2)?;
    combine_where("combine2_by_tag", tags.len(), |i| tags[i] == 0, src1, src2)
}
