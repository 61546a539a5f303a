//! Error types for flat and segmented primitives
//!
//! Every failure is a precondition violation reported to the direct caller.
//! No operation returns a partial result.

use std::io;
use thiserror::Error;

use crate::table::EltType;

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by array primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand lengths or segment counts disagree.
    #[error("{op}: shape mismatch (expected {expected}, got {actual})")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        op: &'static str,
        /// Length the operation required.
        expected: usize,
        /// Length it was given.
        actual: usize,
    },

    /// Segment descriptor fields are inconsistent.
    #[error("invalid segment descriptor: {reason}")]
    InvalidSegd {
        /// Which invariant failed.
        reason: String,
    },

    /// `fold1_s` reached a zero-length segment.
    #[error("segment {segment} is empty")]
    EmptySegment {
        /// Index of the first empty segment.
        segment: usize,
    },

    /// `fold1` (or similar) on an empty array.
    #[error("{op}: empty array")]
    EmptyArray {
        /// Operation that required a non-empty input.
        op: &'static str,
    },

    /// An index fell outside `[0, len)`.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Length of the indexed array.
        len: usize,
    },

    /// The target map of `permute` is not a bijection.
    #[error("invalid permutation: {reason}")]
    InvalidPermutation {
        /// Description of the violation.
        reason: String,
    },

    /// A tag array contains a value outside `[0, bound)`.
    #[error("tag {tag} at position {index} is outside [0, {bound})")]
    InvalidTag {
        /// Position of the tag.
        index: usize,
        /// The tag value.
        tag: usize,
        /// Exclusive upper bound for tags.
        bound: usize,
    },

    /// Two columns of different element types were combined.
    #[error("element type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        /// Element type of the left operand.
        expected: EltType,
        /// Element type of the right operand.
        actual: EltType,
    },

    /// The lower bound of a value range exceeds the upper bound.
    #[error("{op}: empty range")]
    EmptyRange {
        /// Operation that required a non-empty range.
        op: &'static str,
    },

    /// A table has no column with this name.
    #[error("no column named {name:?}")]
    UnknownColumn {
        /// Requested column name.
        name: String,
    },

    /// Binary stream read or write failed.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the underlying failure.
        message: String,
    },
}

impl Error {
    /// Create a shape mismatch error.
    pub fn shape(op: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            op,
            expected,
            actual,
        }
    }

    /// Create an invalid segment descriptor error.
    pub fn invalid_segd(reason: impl Into<String>) -> Self {
        Self::InvalidSegd {
            reason: reason.into(),
        }
    }

    /// Create an invalid permutation error.
    pub fn invalid_permutation(reason: impl Into<String>) -> Self {
        Self::InvalidPermutation {
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Fail with `ShapeMismatch` unless `actual == expected`.
#[inline]
pub(crate) fn check_len(op: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::shape(op, expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::shape("zip", 3, 4);
        assert_eq!(err.to_string(), "zip: shape mismatch (expected 3, got 4)");

        let err = Error::IndexOutOfBounds { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of bounds for length 3");
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("pack", 2, 2).is_ok());
        assert_eq!(check_len("pack", 2, 1), Err(Error::shape("pack", 2, 1)));
    }

    #[test]
    fn test_from_io() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
