//! Seeded random arrays
//!
//! The same seed always yields the same array, whatever the gang size.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Standard, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::array::{Array, Elt};
use crate::error::{Error, Result};

/// `n` values from the standard distribution of `T`.
pub fn randoms<T>(n: usize, seed: u64) -> Array<T>
where
    T: Elt,
    Standard: Distribution<T>,
{
    let rng = StdRng::seed_from_u64(seed);
    Standard.sample_iter(rng).take(n).collect()
}

/// `n` values drawn uniformly from `range` (both ends included).
pub fn random_rs<T>(n: usize, range: RangeInclusive<T>, seed: u64) -> Result<Array<T>>
where
    T: Elt + SampleUniform + PartialOrd,
{
    let (lo, hi) = range.into_inner();
    // unordered bounds (NaN) count as empty
    if !matches!(lo.partial_cmp(&hi), Some(Ordering::Less | Ordering::Equal)) {
        return Err(Error::EmptyRange { op: "random_rs" });
    }
    let dist = Uniform::new_inclusive(lo, hi);
    let rng = StdRng::seed_from_u64(seed);
    Ok(dist.sample_iter(rng).take(n).collect())
}
