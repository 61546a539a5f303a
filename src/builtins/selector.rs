//! Selector (tag array) operations
//!
//! A tag array classifies each element of a co-indexed array into one of `k`
//! groups. Partitioning by tags is stable: each group keeps the relative order
//! of its elements.

use crate::array::{Array, Elt, Segd};
use crate::builtins::basic::map;
use crate::builtins::combine::pack_where;
use crate::builtins::segmented::sum_s;
use crate::error::{check_len, Error, Result};
use crate::exec::{split_lengths, Gang};

/// Fail with `InvalidTag` on the first tag outside `[0, bound)`.
pub(crate) fn check_tags(gang: &Gang, tags: &[usize], bound: usize) -> Result<()> {
    let bad = gang.map_chunks(tags.len(), |r| {
        r.clone().zip(&tags[r]).find(|&(_, &t)| t >= bound).map(|(i, &t)| (i, t))
    });
    match bad.into_iter().flatten().next() {
        Some((index, tag)) => Err(Error::InvalidTag { index, tag, bound }),
        None => Ok(()),
    }
}

/// Per-chunk histograms of tags in `[0, k)`.
fn chunk_histograms(gang: &Gang, tags: &[usize], k: usize) -> (Vec<std::ops::Range<usize>>, Vec<Vec<usize>>) {
    let ranges = gang.split(tags.len());
    let counts = gang.run(ranges.clone(), |r| {
        let mut hist = vec![0usize; k];
        for &t in &tags[r] {
            hist[t] += 1;
        }
        hist
    });
    (ranges, counts)
}

/// Destination of every element under a stable 2-way partition
/// (all tag-0 elements first, then all tag-1 elements).
pub fn selector_to_indices2(tags: &Array<usize>) -> Result<Array<usize>> {
    let gang = Gang::current();
    check_tags(&gang, tags, 2)?;
    let (ranges, counts) = chunk_histograms(&gang, tags, 2);
    let zeros: usize = counts.iter().map(|h| h[0]).sum();

    let mut cursors = Vec::with_capacity(counts.len());
    let (mut z, mut o) = (0, zeros);
    for hist in &counts {
        cursors.push((z, o));
        z += hist[0];
        o += hist[1];
    }

    let mut out = vec![0usize; tags.len()];
    let parts = split_lengths(&mut out, ranges.iter().map(|r| r.len()));
    let work: Vec<_> = ranges.into_iter().zip(parts).zip(cursors).collect();
    gang.run(work, |((r, part), (mut z, mut o))| {
        for (slot, &t) in part.iter_mut().zip(&tags[r]) {
            if t == 0 {
                *slot = z;
                z += 1;
            } else {
                *slot = o;
                o += 1;
            }
        }
    });
    Ok(out.into())
}

/// Stable k-way partition of `src` by tag.
///
/// The result holds every tag-0 element, then every tag-1 element, and so on.
/// `tag_segd` describes the group boundaries.
pub fn pack_by_tag<T: Elt>(k: usize, tags: &Array<usize>, src: &Array<T>) -> Result<Array<T>> {
    check_len("pack_by_tag", src.len(), tags.len())?;
    let gang = Gang::current();
    check_tags(&gang, tags, k)?;
    let (ranges, counts) = chunk_histograms(&gang, tags, k);
    tracing::trace!(op = "pack_by_tag", len = src.len(), groups = k, chunks = ranges.len());

    // Output pieces in (tag, chunk) order, regrouped per chunk.
    let mut out = vec![T::default(); src.len()];
    let hists = &counts;
    let lens = (0..k).flat_map(move |t| hists.iter().map(move |h| h[t]));
    let nchunks = ranges.len();
    let mut per_chunk: Vec<Vec<&mut [T]>> = (0..nchunks).map(|_| Vec::with_capacity(k)).collect();
    for (p, piece) in split_lengths(&mut out, lens).into_iter().enumerate() {
        per_chunk[p % nchunks].push(piece);
    }

    gang.run(ranges.into_iter().zip(per_chunk).collect(), |(r, mut pieces)| {
        let mut cursor = vec![0usize; k];
        for i in r {
            let t = tags[i];
            pieces[t][cursor[t]] = src[i];
            cursor[t] += 1;
        }
    });
    Ok(out.into())
}

/// Group sizes of `pack_by_tag(k, tags, _)` as a segment descriptor.
pub fn tag_segd(k: usize, tags: &Array<usize>) -> Result<Segd> {
    let gang = Gang::current();
    check_tags(&gang, tags, k)?;
    let (_, counts) = chunk_histograms(&gang, tags, k);
    let mut sizes = vec![0usize; k];
    for hist in counts {
        for (total, c) in sizes.iter_mut().zip(hist) {
            *total += c;
        }
    }
    Ok(Segd::from_lengths(sizes))
}

/// Elements of `src` whose tag equals `tag`.
pub fn pack_tag<T: Elt>(src: &Array<T>, tags: &Array<usize>, tag: usize) -> Result<Array<T>> {
    check_len("pack_tag", src.len(), tags.len())?;
    let gang = Gang::current();
    Ok(pack_where(&gang, src, |i| tags[i] == tag).into())
}

/// Mask of elements equal to `value`.
pub fn pick<T: Elt + PartialEq>(src: &Array<T>, value: T) -> Array<bool> {
    map(|x| x == value, src)
}

/// Number of elements equal to `value`.
pub fn count<T: Elt + PartialEq>(src: &Array<T>, value: T) -> usize {
    Gang::current()
        .map_chunks(src.len(), |r| src[r].iter().filter(|&&x| x == value).count())
        .into_iter()
        .sum()
}

/// Per-segment number of elements equal to `value`.
pub fn count_s<T: Elt + PartialEq>(segd: &Segd, src: &Array<T>, value: T) -> Result<Array<usize>> {
    let hits = map(|x| usize::from(x == value), src);
    sum_s(segd, &hits)
}
