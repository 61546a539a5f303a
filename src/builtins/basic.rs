//! Elementwise operations, construction and enumeration
//!
//! Everything here is a parallel tabulation over the output index space.

use crate::array::{Array, Elt, Segd};
use crate::builtins::segmented::generate_s;
use crate::error::{check_len, Error, Result};
use crate::exec::Gang;

#[inline]
fn tabulate<T: Elt, F: Fn(usize) -> T + Sync>(n: usize, f: F) -> Array<T> {
    Array::generate(n, f)
}

pub fn length<T: Elt>(src: &Array<T>) -> usize {
    src.len()
}

pub fn empty<T: Elt>() -> Array<T> {
    Array::empty()
}

/// `n` copies of `x`.
pub fn replicate<T: Elt>(n: usize, x: T) -> Array<T> {
    tabulate(n, |_| x)
}

/// `n` copies of `src`, back to back.
pub fn repeat<T: Elt>(n: usize, src: &Array<T>) -> Array<T> {
    let len = src.len();
    tabulate(n * len, |i| src[i % len])
}

/// Concatenation (`+:+`).
pub fn append<T: Elt>(a: &Array<T>, b: &Array<T>) -> Array<T> {
    let split = a.len();
    tabulate(a.len() + b.len(), |i| if i < split { a[i] } else { b[i - split] })
}

/// Checked element access (`!:`).
pub fn index<T: Elt>(src: &Array<T>, i: usize) -> Result<T> {
    src.index(i)
}

/// The `n` elements starting at `start`.
pub fn extract<T: Elt>(src: &Array<T>, start: usize, n: usize) -> Result<Array<T>> {
    let end = start.checked_add(n).filter(|&end| end <= src.len());
    match end {
        Some(end) => Ok(Array::from(&src[start..end])),
        None => Err(Error::IndexOutOfBounds {
            index: start.saturating_add(n),
            len: src.len(),
        }),
    }
}

/// Everything after the first `n` elements (empty if `n >= len`).
pub fn drop<T: Elt>(n: usize, src: &Array<T>) -> Array<T> {
    Array::from(&src[n.min(src.len())..])
}

/// Number of values in `[from, to]`.
#[inline]
fn span_len(from: i64, to: i64) -> usize {
    if to < from {
        0
    } else {
        (i128::from(to) - i128::from(from) + 1) as usize
    }
}

/// `[from, from+1, ..., to]`, empty when `to < from`.
pub fn enum_from_to(from: i64, to: i64) -> Array<i64> {
    enum_from_step_len(from, 1, span_len(from, to))
}

/// `[from, then, ...]` up to and including `to` when reachable.
///
/// The step is `then - from`; a zero step, or one pointing away from `to`,
/// yields the empty array.
pub fn enum_from_then_to(from: i64, then: i64, to: i64) -> Array<i64> {
    let (from_w, then_w, to_w) = (i128::from(from), i128::from(then), i128::from(to));
    let len = if from < then && from <= to {
        ((to_w - from_w) / (then_w - from_w) + 1) as usize
    } else if from > then && from >= to {
        ((from_w - to_w) / (from_w - then_w) + 1) as usize
    } else {
        0
    };
    // the step may not fit in i64; every generated value does
    enum_from_step_len(from, then.wrapping_sub(from), len)
}

/// `len` values `start, start+step, ...`.
///
/// Arithmetic wraps, so values that land inside `i64` are exact even when
/// `step` itself was computed with wrap-around.
pub fn enum_from_step_len(start: i64, step: i64, len: usize) -> Array<i64> {
    tabulate(len, |i| start.wrapping_add(step.wrapping_mul(i as i64)))
}

/// Concatenation of the inclusive ranges in `ranges`; `n` must equal the total length.
pub fn enum_from_to_each(n: usize, ranges: &Array<(i64, i64)>) -> Result<Array<i64>> {
    let lens: Array<usize> = map(|(from, to)| span_len(from, to), ranges);
    let segd = Segd::from_lengths(lens);
    check_len("enum_from_to_each", n, segd.elements())?;
    Ok(generate_s(&segd, |s, k| ranges[s].0 + k as i64).into())
}

/// Concatenation of `enum_from_step_len(starts[i], steps[i], lens[i])`.
pub fn enum_from_step_len_each(
    n: usize,
    starts: &Array<i64>,
    steps: &Array<i64>,
    lens: &Array<usize>,
) -> Result<Array<i64>> {
    check_len("enum_from_step_len_each", starts.len(), steps.len())?;
    check_len("enum_from_step_len_each", starts.len(), lens.len())?;
    let segd = Segd::from_lengths(lens.clone());
    check_len("enum_from_step_len_each", n, segd.elements())?;
    Ok(generate_s(&segd, |s, k| starts[s] + steps[s] * k as i64).into())
}

/// Pair every element with its index.
pub fn indexed<T: Elt>(src: &Array<T>) -> Array<(usize, T)> {
    tabulate(src.len(), |i| (i, src[i]))
}

pub fn map<T, U, F>(f: F, src: &Array<T>) -> Array<U>
where
    T: Elt,
    U: Elt,
    F: Fn(T) -> U + Sync,
{
    let mut out = vec![U::default(); src.len()];
    Gang::current().fill(&mut out, |start, part| {
        for (slot, &x) in part.iter_mut().zip(&src[start..]) {
            *slot = f(x);
        }
    });
    out.into()
}

pub fn zip_with<A, B, C, F>(f: F, a: &Array<A>, b: &Array<B>) -> Result<Array<C>>
where
    A: Elt,
    B: Elt,
    C: Elt,
    F: Fn(A, B) -> C + Sync,
{
    check_len("zip_with", a.len(), b.len())?;
    Ok(tabulate(a.len(), |i| f(a[i], b[i])))
}

pub fn zip_with3<A, B, C, D, F>(f: F, a: &Array<A>, b: &Array<B>, c: &Array<C>) -> Result<Array<D>>
where
    A: Elt,
    B: Elt,
    C: Elt,
    D: Elt,
    F: Fn(A, B, C) -> D + Sync,
{
    check_len("zip_with3", a.len(), b.len())?;
    check_len("zip_with3", a.len(), c.len())?;
    Ok(tabulate(a.len(), |i| f(a[i], b[i], c[i])))
}

pub fn zip<A: Elt, B: Elt>(a: &Array<A>, b: &Array<B>) -> Result<Array<(A, B)>> {
    zip_with(|x, y| (x, y), a, b)
}

pub fn zip3<A: Elt, B: Elt, C: Elt>(a: &Array<A>, b: &Array<B>, c: &Array<C>) -> Result<Array<(A, B, C)>> {
    zip_with3(|x, y, z| (x, y, z), a, b, c)
}

pub fn unzip<A: Elt, B: Elt>(src: &Array<(A, B)>) -> (Array<A>, Array<B>) {
    (fsts(src), snds(src))
}

pub fn unzip3<A: Elt, B: Elt, C: Elt>(src: &Array<(A, B, C)>) -> (Array<A>, Array<B>, Array<C>) {
    (map(|t| t.0, src), map(|t| t.1, src), map(|t| t.2, src))
}

pub fn fsts<A: Elt, B: Elt>(src: &Array<(A, B)>) -> Array<A> {
    map(|(a, _)| a, src)
}

pub fn snds<A: Elt, B: Elt>(src: &Array<(A, B)>) -> Array<B> {
    map(|(_, b)| b, src)
}
