//! Segment descriptor
//!
//! Describes how a flat array decomposes into contiguous, variable-length
//! segments:
//!
//! ```text
//! lengths  = [2, 0, 3, 1]
//! indices  = [0, 2, 2, 5]
//! elements = 6
//!
//! data     = [a b | | c d e | f]
//! ```
//!
//! A `Segd` carries no back-reference to the data it describes, so several
//! identically segmented arrays can share one descriptor. Cloning is O(1).

use std::ops::Range;

use super::Array;
use crate::builtins::scan;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Segd {
    lengths: Array<usize>,
    indices: Array<usize>,
    elements: usize,
}

impl Segd {
    /// Descriptor from precomputed fields, with the invariants verified.
    pub fn new(lengths: Array<usize>, indices: Array<usize>, elements: usize) -> Result<Self> {
        if lengths.len() != indices.len() {
            return Err(Error::invalid_segd(format!(
                "{} lengths but {} indices",
                lengths.len(),
                indices.len()
            )));
        }

        let mut expected = 0usize;
        for (i, (&len, &start)) in lengths.iter().zip(indices.iter()).enumerate() {
            if start != expected {
                return Err(Error::invalid_segd(format!(
                    "segment {i} starts at {start}, expected {expected}"
                )));
            }
            expected = start
                .checked_add(len)
                .ok_or_else(|| Error::invalid_segd(format!("segment {i} overflows")))?;
        }

        if elements != expected {
            return Err(Error::invalid_segd(format!(
                "elements is {elements}, lengths sum to {expected}"
            )));
        }

        Ok(Self {
            lengths,
            indices,
            elements,
        })
    }

    /// Descriptor from segment lengths (start offsets by exclusive prefix sum).
    pub fn from_lengths(lengths: impl Into<Array<usize>>) -> Self {
        let lengths = lengths.into();
        let indices = scan(|a, b| a + b, 0, &lengths);
        let elements = match (indices.last(), lengths.last()) {
            (Some(&start), Some(&len)) => start + len,
            _ => 0,
        };
        tracing::trace!(segments = lengths.len(), elements, "segd built");
        Self {
            lengths,
            indices,
            elements,
        }
    }

    /// Descriptor with no segments.
    pub fn empty() -> Self {
        Self {
            lengths: Array::empty(),
            indices: Array::empty(),
            elements: 0,
        }
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    #[inline]
    pub fn lengths(&self) -> &Array<usize> {
        &self.lengths
    }

    #[inline]
    pub fn indices(&self) -> &Array<usize> {
        &self.indices
    }

    /// Total number of elements across all segments.
    #[inline]
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Flat range covered by segment `i`.
    #[inline]
    pub fn segment(&self, i: usize) -> Range<usize> {
        let start = self.indices[i];
        start..start + self.lengths[i]
    }

    /// Segment containing flat position `pos`.
    ///
    /// Requires `pos < self.elements()`. Empty segments sharing the start
    /// offset are skipped.
    #[inline]
    pub fn segment_of(&self, pos: usize) -> usize {
        debug_assert!(pos < self.elements);
        self.indices.partition_point(|&start| start <= pos) - 1
    }
}

impl Default for Segd {
    fn default() -> Self {
        Self::empty()
    }
}

/// `mkSegd`: build from precomputed fields, failing with `InvalidSegd`.
pub fn mk_segd(lengths: Array<usize>, indices: Array<usize>, elements: usize) -> Result<Segd> {
    Segd::new(lengths, indices, elements)
}

/// `lengthsToSegd`: the normal constructor.
pub fn lengths_to_segd(lengths: &Array<usize>) -> Segd {
    Segd::from_lengths(lengths.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lengths() {
        let segd = Segd::from_lengths(vec![2, 0, 3, 1]);
        assert_eq!(segd.len(), 4);
        assert_eq!(segd.indices().as_slice(), &[0, 2, 2, 5]);
        assert_eq!(segd.elements(), 6);
        assert_eq!(segd.segment(2), 2..5);
    }

    #[test]
    fn test_from_no_lengths() {
        let segd = Segd::from_lengths(Vec::<usize>::new());
        assert!(segd.is_empty());
        assert_eq!(segd.elements(), 0);
        assert_eq!(segd, Segd::empty());
    }

    #[test]
    fn test_segment_of_skips_empty() {
        let segd = Segd::from_lengths(vec![2, 0, 0, 3, 1]);
        assert_eq!(segd.segment_of(0), 0);
        assert_eq!(segd.segment_of(1), 0);
        assert_eq!(segd.segment_of(2), 3);
        assert_eq!(segd.segment_of(4), 3);
        assert_eq!(segd.segment_of(5), 4);
    }

    #[test]
    fn test_mk_segd_valid() {
        let segd = mk_segd(vec![1, 2].into(), vec![0, 1].into(), 3).unwrap();
        assert_eq!(segd, lengths_to_segd(&vec![1, 2].into()));
    }

    #[test]
    fn test_mk_segd_rejects_bad_start() {
        let err = mk_segd(vec![1, 2].into(), vec![1, 2].into(), 3).unwrap_err();
        assert!(matches!(err, Error::InvalidSegd { .. }));
    }

    #[test]
    fn test_mk_segd_rejects_gap() {
        let err = mk_segd(vec![1, 2].into(), vec![0, 2].into(), 4).unwrap_err();
        assert!(matches!(err, Error::InvalidSegd { .. }));
    }

    #[test]
    fn test_mk_segd_rejects_elements() {
        let err = mk_segd(vec![1, 2].into(), vec![0, 1].into(), 4).unwrap_err();
        assert!(matches!(err, Error::InvalidSegd { .. }));
        let err = mk_segd(vec![1].into(), vec![0, 1].into(), 1).unwrap_err();
        assert!(matches!(err, Error::InvalidSegd { .. }));
    }
}
