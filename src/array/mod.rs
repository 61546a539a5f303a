//! Immutable flat arrays and segment descriptors

pub mod segd;

pub use segd::Segd;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::exec::Gang;

/// Unboxed element types.
///
/// Anything `Copy` with a default value can live in an `Array`, including
/// pairs and triples of element types (the zipped representation).
pub trait Elt: Copy + Send + Sync + Default + 'static {}

impl<T: Copy + Send + Sync + Default + 'static> Elt for T {}

/// Immutable, contiguous, homogeneous array
///
/// Storage is shared: cloning an `Array` bumps a reference count, and no
/// operation ever mutates an existing array.
#[derive(Clone, PartialEq)]
pub struct Array<T> {
    data: Arc<[T]>,
}

impl<T: Elt> Array<T> {
    /// The empty array.
    pub fn empty() -> Self {
        Self {
            data: Arc::from(Vec::new()),
        }
    }

    /// Build from `f(i)` for every `i` in `[0, n)`, in parallel.
    pub fn generate<F>(n: usize, f: F) -> Self
    where
        F: Fn(usize) -> T + Sync,
    {
        Gang::current().tabulate(n, f).into()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Checked element access (`!:`).
    pub fn index(&self, i: usize) -> Result<T> {
        self.data.get(i).copied().ok_or(Error::IndexOutOfBounds {
            index: i,
            len: self.len(),
        })
    }

    /// Copy out into an ordinary vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// True when both arrays share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            data: Arc::from(data),
        }
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: Arc::from(data),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(data: [T; N]) -> Self {
        Self {
            data: Arc::from(Vec::from(data)),
        }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<T>>().into()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: Elt> Default for Array<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index() {
        let arr = Array::from(vec![5, 6, 7]);
        assert_eq!(arr.index(1), Ok(6));
        assert_eq!(arr.index(3), Err(Error::IndexOutOfBounds { index: 3, len: 3 }));
    }

    #[test]
    fn test_clone_shares_storage() {
        let arr = Array::from(vec![1.0, 2.0]);
        let shared = arr.clone();
        assert!(arr.ptr_eq(&shared));
        assert!(!arr.ptr_eq(&Array::from(vec![1.0, 2.0])));
    }

    #[test]
    fn test_generate() {
        let arr = Array::generate(5, |i| (i * i) as i64);
        assert_eq!(arr.as_slice(), &[0, 1, 4, 9, 16]);
    }

    #[test]
    fn test_empty() {
        let arr: Array<u8> = Array::empty();
        assert!(arr.is_empty());
        assert_eq!(format!("{:?}", Array::from([1, 2])), "[1, 2]");
    }
}
