//! Segmented operations
//!
//! Every operation here works on the flat representation directly: a `Segd`
//! plus a flat `Array`. Nothing is ever materialized as nested vectors.
//!
//! Generators (`replicate_s`, `append_s`, `indices_s`, ...) fill the output
//! chunk by chunk; each chunk binary-searches the descriptor once for its
//! first segment and then walks forward.
//!
//! Segmented folds split the *elements* into chunks, so a segment may be cut
//! by chunk boundaries:
//!
//! ```text
//! segments   |  s0  |      s1       | s2 |s3|      s4      |
//! chunks     |   chunk 0   |   chunk 1    |    chunk 2     |
//!                      tail ─┘ └─ head
//! ```
//!
//! A chunk owns the segments from the one containing its first element up
//! to (not including) the one containing the next chunk's first element. It
//! folds those locally and also folds its share of the straddling segment
//! (`tail`). A short sequential pass then merges every tail into the head of
//! the owning chunk, in segment order.

use std::ops::{Add, Range};

use crate::array::{Array, Elt, Segd};
use crate::builtins::basic::zip_with;
use crate::builtins::scan::reduce1;
use crate::error::{check_len, Error, Result};
use crate::exec::Gang;

/// Build `segd.elements()` values from `f(segment, offset_in_segment)`.
pub(crate) fn generate_s<T, F>(segd: &Segd, f: F) -> Vec<T>
where
    T: Elt,
    F: Fn(usize, usize) -> T + Sync,
{
    let (indices, lengths) = (segd.indices(), segd.lengths());
    let mut out = vec![T::default(); segd.elements()];
    Gang::current().fill(&mut out, |start, part| {
        let mut s = segd.segment_of(start);
        let mut end = indices[s] + lengths[s];
        for (k, slot) in part.iter_mut().enumerate() {
            let pos = start + k;
            while pos >= end {
                s += 1;
                end = indices[s] + lengths[s];
            }
            *slot = f(s, pos - indices[s]);
        }
    });
    out
}

/// Replicate `src[i]` across segment `i`.
pub fn replicate_s<T: Elt>(segd: &Segd, src: &Array<T>) -> Result<Array<T>> {
    check_len("replicate_s", segd.len(), src.len())?;
    tracing::trace!(op = "replicate_s", segments = segd.len(), elements = segd.elements());
    Ok(generate_s(segd, |s, _| src[s]).into())
}

/// Replicate every element exactly `n` times (no descriptor needed).
pub fn replicate_rs<T: Elt>(n: usize, src: &Array<T>) -> Array<T> {
    Array::generate(n * src.len(), |i| src[i / n])
}

/// Segment-wise concatenation: segment `i` of the result is segment `i` of
/// `a` followed by segment `i` of `b`.
pub fn append_s<T: Elt>(segd_a: &Segd, a: &Array<T>, segd_b: &Segd, b: &Array<T>) -> Result<(Segd, Array<T>)> {
    check_len("append_s", segd_a.len(), segd_b.len())?;
    check_len("append_s", segd_a.elements(), a.len())?;
    check_len("append_s", segd_b.elements(), b.len())?;

    let segd = Segd::from_lengths(zip_with(|x, y| x + y, segd_a.lengths(), segd_b.lengths())?);
    let (len_a, idx_a, idx_b) = (segd_a.lengths(), segd_a.indices(), segd_b.indices());
    let out = generate_s(&segd, |s, k| {
        if k < len_a[s] {
            a[idx_a[s] + k]
        } else {
            b[idx_b[s] + k - len_a[s]]
        }
    });
    Ok((segd, out.into()))
}

/// Segment `i` repeated `counts[i]` times, segments in order.
///
/// `total` must equal the generated length.
pub fn repeat_c<T: Elt>(total: usize, counts: &Array<usize>, segd: &Segd, src: &Array<T>) -> Result<Array<T>> {
    check_len("repeat_c", segd.len(), counts.len())?;
    check_len("repeat_c", segd.elements(), src.len())?;

    let out_segd = Segd::from_lengths(zip_with(|c, l| c * l, counts, segd.lengths())?);
    check_len("repeat_c", total, out_segd.elements())?;
    let (indices, lengths) = (segd.indices(), segd.lengths());
    Ok(generate_s(&out_segd, |s, k| src[indices[s] + k % lengths[s]]).into())
}

/// Position of every element within its own segment.
pub fn indices_s(segd: &Segd) -> Array<usize> {
    generate_s(segd, |_, k| k).into()
}

/// Chunk-local result of a segmented fold.
struct SegChunk<T> {
    /// Whether the chunk owns any segment.
    owns: bool,
    /// Partial of its first owned segment (which may have begun earlier).
    head: Option<T>,
    /// Finished values of the remaining owned segments.
    body: Vec<T>,
    /// Partial of the segment continuing into the next chunk.
    tail: Option<T>,
}

#[inline]
fn merge<T: Elt, F: Fn(T, T) -> T>(f: &F, a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(f(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Per-segment fold; `finish` turns a segment's partial (None when empty)
/// into its result.
fn fold_segments<T, F, G>(f: &F, finish: &G, segd: &Segd, src: &Array<T>) -> Vec<T>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
    G: Fn(Option<T>) -> T + Sync,
{
    let nsegs = segd.len();
    let gang = Gang::current();
    let ranges = gang.split(src.len());
    tracing::trace!(op = "fold_s", segments = nsegs, elements = src.len(), chunks = ranges.len());
    if ranges.is_empty() {
        return (0..nsegs).map(|_| finish(None)).collect();
    }

    let firsts: Vec<usize> = ranges
        .iter()
        .enumerate()
        .map(|(c, r)| if c == 0 { 0 } else { segd.segment_of(r.start) })
        .collect();
    let work: Vec<(Range<usize>, usize, usize)> = ranges
        .into_iter()
        .enumerate()
        .map(|(c, r)| (r, firsts[c], firsts.get(c + 1).copied().unwrap_or(nsegs)))
        .collect();

    let chunks = gang.run(work, |(r, lo, hi)| {
        let part = |s: usize| {
            let seg = segd.segment(s);
            let (from, to) = (seg.start.max(r.start), seg.end.min(r.end));
            if from < to {
                reduce1(f, &src[from..to])
            } else {
                None
            }
        };
        SegChunk {
            owns: lo < hi,
            head: if lo < hi { part(lo) } else { None },
            body: (lo + 1..hi).map(|s| finish(part(s))).collect(),
            tail: if hi < nsegs { part(hi) } else { None },
        }
    });

    // Boundary pass: one step per chunk.
    let mut out = Vec::with_capacity(nsegs);
    let mut carry = None;
    for chunk in chunks {
        if chunk.owns {
            out.push(finish(merge(f, carry.take(), chunk.head)));
            out.extend(chunk.body);
            carry = chunk.tail;
        } else {
            carry = merge(f, carry, chunk.tail);
        }
    }
    out
}

/// Left fold of every segment from `zero`; empty segments yield `zero`.
pub fn fold_s<T, F>(f: F, zero: T, segd: &Segd, src: &Array<T>) -> Result<Array<T>>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    check_len("fold_s", segd.elements(), src.len())?;
    let finish = |p: Option<T>| p.map_or(zero, |v| f(zero, v));
    Ok(fold_segments(&f, &finish, segd, src).into())
}

/// Fold of every segment without a seed; every segment must be non-empty.
pub fn fold1_s<T, F>(f: F, segd: &Segd, src: &Array<T>) -> Result<Array<T>>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    check_len("fold1_s", segd.elements(), src.len())?;
    let lengths = segd.lengths();
    let empty = Gang::current().map_chunks(lengths.len(), |r| r.clone().find(|&s| lengths[s] == 0));
    if let Some(segment) = empty.into_iter().flatten().next() {
        return Err(Error::EmptySegment { segment });
    }
    // every segment has a partial here
    let finish = |p: Option<T>| p.unwrap_or_default();
    Ok(fold_segments(&f, &finish, segd, src).into())
}

/// Per-segment sum.
pub fn sum_s<T>(segd: &Segd, src: &Array<T>) -> Result<Array<T>>
where
    T: Elt + Add<Output = T>,
{
    fold_s(|a, b| a + b, T::default(), segd, src)
}

/// Fold of consecutive groups of exactly `n` elements.
pub fn fold_r<T, F>(n: usize, f: F, zero: T, src: &Array<T>) -> Result<Array<T>>
where
    T: Elt,
    F: Fn(T, T) -> T + Sync,
{
    if n == 0 {
        check_len("fold_r", 0, src.len())?;
        return Ok(Array::empty());
    }
    if src.len() % n != 0 {
        return Err(Error::shape("fold_r", src.len() - src.len() % n, src.len()));
    }
    Ok(Array::generate(src.len() / n, |g| {
        src[g * n..(g + 1) * n].iter().copied().fold(zero, &f)
    }))
}

/// Sum of consecutive groups of exactly `n` elements.
pub fn sum_r<T>(n: usize, src: &Array<T>) -> Result<Array<T>>
where
    T: Elt + Add<Output = T>,
{
    fold_r(n, |a, b| a + b, T::default(), src)
}
