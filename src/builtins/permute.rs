//! Permutations, gathers and scatters
//!
//! Gathers (`bpermute`) read through an index map and parallelize trivially.
//! Scatters (`permute`, `bpermute_dft`, `update`) first resolve, for every
//! target slot, which source position writes it. Resolution goes through an
//! atomic per target, so the final gather is a plain parallel tabulation and
//! no two workers ever write the same output slot.
//!
//! Colliding scatter targets resolve last-write-wins in supplied order:
//! each target keeps the highest source position (`fetch_max`), which makes
//! the outcome independent of how chunks are scheduled.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::array::{Array, Elt};
use crate::error::{check_len, Error, Result};
use crate::exec::Gang;

/// First position (in index order) whose target is `>= len`.
pub(crate) fn check_bounds(gang: &Gang, targets: &[usize], len: usize) -> Result<()> {
    let bad = gang.map_chunks(targets.len(), |r| {
        r.clone()
            .zip(&targets[r])
            .find(|&(_, &t)| t >= len)
            .map(|(_, &t)| t)
    });
    match bad.into_iter().flatten().next() {
        Some(index) => Err(Error::IndexOutOfBounds { index, len }),
        None => Ok(()),
    }
}

/// Per target slot: 1 + the last position in `targets` naming it, or 0.
fn last_writers(gang: &Gang, size: usize, targets: &[usize]) -> Vec<AtomicUsize> {
    let winners: Vec<AtomicUsize> = (0..size).map(|_| AtomicUsize::new(0)).collect();
    gang.map_chunks(targets.len(), |r| {
        for k in r {
            winners[targets[k]].fetch_max(k + 1, Ordering::Relaxed);
        }
    });
    winners
}

/// Backward permute: `result[i] = src[index_map[i]]`.
pub fn bpermute<T: Elt>(src: &Array<T>, index_map: &Array<usize>) -> Result<Array<T>> {
    mbpermute(|x| x, src, index_map)
}

/// `bpermute` fused with an element map: `result[i] = f(src[index_map[i]])`.
pub fn mbpermute<T, U, F>(f: F, src: &Array<T>, index_map: &Array<usize>) -> Result<Array<U>>
where
    T: Elt,
    U: Elt,
    F: Fn(T) -> U + Sync,
{
    let gang = Gang::current();
    check_bounds(&gang, index_map, src.len())?;
    tracing::trace!(op = "bpermute", len = index_map.len(), src = src.len());
    Ok(gang.tabulate(index_map.len(), |i| f(src[index_map[i]])).into())
}

/// Forward permute: `result[index_map[i]] = src[i]`.
///
/// Targets out of range always fail with `IndexOutOfBounds`. Whether the map
/// is a bijection is checked only in debug builds (`InvalidPermutation`);
/// in release builds a slot nobody targets holds `T::default()` and a
/// doubly targeted slot holds the later source.
pub fn permute<T: Elt>(src: &Array<T>, index_map: &Array<usize>) -> Result<Array<T>> {
    check_len("permute", src.len(), index_map.len())?;
    let gang = Gang::current();
    let n = src.len();
    check_bounds(&gang, index_map, n)?;
    tracing::trace!(op = "permute", len = n);

    // inverse[j] = 1 + source position landing on j, 0 if none
    let inverse: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
    let clashes = gang.map_chunks(n, |r| {
        let mut clash = None;
        for i in r {
            let target = index_map[i];
            if cfg!(debug_assertions) {
                if inverse[target].swap(i + 1, Ordering::Relaxed) != 0 && clash.is_none() {
                    clash = Some(target);
                }
            } else {
                inverse[target].fetch_max(i + 1, Ordering::Relaxed);
            }
        }
        clash
    });

    if let Some(target) = clashes.into_iter().flatten().next() {
        return Err(Error::invalid_permutation(format!(
            "target {target} is assigned more than once"
        )));
    }

    let out = gang.tabulate(n, |j| match inverse[j].load(Ordering::Relaxed) {
        0 => T::default(),
        i => src[i - 1],
    });
    Ok(out.into())
}

/// Default-filled backward permute.
///
/// Starts from `default(j)` for every `j < size` and overwrites with the
/// `(j, value)` pairs; the last pair naming a slot wins.
pub fn bpermute_dft<T, D>(size: usize, default: D, pairs: &Array<(usize, T)>) -> Result<Array<T>>
where
    T: Elt,
    D: Fn(usize) -> T + Sync,
{
    let gang = Gang::current();
    let targets: Vec<usize> = pairs.iter().map(|&(j, _)| j).collect();
    check_bounds(&gang, &targets, size)?;
    tracing::trace!(op = "bpermute_dft", size, pairs = pairs.len());

    let winners = last_writers(&gang, size, &targets);
    let out = gang.tabulate(size, |j| match winners[j].load(Ordering::Relaxed) {
        0 => default(j),
        w => pairs[w - 1].1,
    });
    Ok(out.into())
}

/// Copy of `src` with `src[indices[k]] = values[k]`; the last write wins.
pub fn update<T: Elt>(src: &Array<T>, indices: &Array<usize>, values: &Array<T>) -> Result<Array<T>> {
    check_len("update", indices.len(), values.len())?;
    let gang = Gang::current();
    check_bounds(&gang, indices, src.len())?;
    tracing::trace!(op = "update", len = src.len(), writes = indices.len());

    let winners = last_writers(&gang, src.len(), indices);
    let out = gang.tabulate(src.len(), |j| match winners[j].load(Ordering::Relaxed) {
        0 => src[j],
        w => values[w - 1],
    });
    Ok(out.into())
}
