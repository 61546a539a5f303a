//! Typed column over a closed set of element types
//!
//! Every operation dispatches on the variant and runs the generic kernel for
//! that element type. Binary operations require both sides to hold the same
//! type.

use crate::array::{Array, Segd};
use crate::builtins::{self, basic::map};
use crate::error::{Error, Result};

/// Element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EltType {
    Int,
    Double,
    Bool,
    Word8,
}

impl std::fmt::Display for EltType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EltType::Int => "Int",
            EltType::Double => "Double",
            EltType::Bool => "Bool",
            EltType::Word8 => "Word8",
        };
        f.write_str(name)
    }
}

/// A flat array of one of the supported element types.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// 64-bit signed integers
    Int(Array<i64>),
    Double(Array<f64>),
    Bool(Array<bool>),
    /// Raw bytes
    Word8(Array<u8>),
}

impl Column {
    pub fn new_int(data: impl Into<Array<i64>>) -> Self {
        Column::Int(data.into())
    }

    pub fn new_double(data: impl Into<Array<f64>>) -> Self {
        Column::Double(data.into())
    }

    pub fn new_bool(data: impl Into<Array<bool>>) -> Self {
        Column::Bool(data.into())
    }

    pub fn new_word8(data: impl Into<Array<u8>>) -> Self {
        Column::Word8(data.into())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(data) => data.len(),
            Column::Double(data) => data.len(),
            Column::Bool(data) => data.len(),
            Column::Word8(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elt_type(&self) -> EltType {
        match self {
            Column::Int(_) => EltType::Int,
            Column::Double(_) => EltType::Double,
            Column::Bool(_) => EltType::Bool,
            Column::Word8(_) => EltType::Word8,
        }
    }

    /// Int data, or `TypeMismatch`.
    pub fn as_int(&self) -> Result<&Array<i64>> {
        match self {
            Column::Int(data) => Ok(data),
            other => Err(other.mismatch(EltType::Int)),
        }
    }

    /// Double data, or `TypeMismatch`.
    pub fn as_double(&self) -> Result<&Array<f64>> {
        match self {
            Column::Double(data) => Ok(data),
            other => Err(other.mismatch(EltType::Double)),
        }
    }

    pub fn as_bool(&self) -> Result<&Array<bool>> {
        match self {
            Column::Bool(data) => Ok(data),
            other => Err(other.mismatch(EltType::Bool)),
        }
    }

    pub fn as_word8(&self) -> Result<&Array<u8>> {
        match self {
            Column::Word8(data) => Ok(data),
            other => Err(other.mismatch(EltType::Word8)),
        }
    }

    fn mismatch(&self, expected: EltType) -> Error {
        Error::TypeMismatch {
            expected,
            actual: self.elt_type(),
        }
    }

    pub fn pack(&self, flags: &Array<bool>) -> Result<Column> {
        Ok(match self {
            Column::Int(data) => Column::Int(builtins::pack(data, flags)?),
            Column::Double(data) => Column::Double(builtins::pack(data, flags)?),
            Column::Bool(data) => Column::Bool(builtins::pack(data, flags)?),
            Column::Word8(data) => Column::Word8(builtins::pack(data, flags)?),
        })
    }

    /// Merge `self` (taken where `flags` is true) with `other`.
    pub fn combine(&self, flags: &Array<bool>, other: &Column) -> Result<Column> {
        Ok(match (self, other) {
            (Column::Int(a), Column::Int(b)) => Column::Int(builtins::combine(flags, a, b)?),
            (Column::Double(a), Column::Double(b)) => Column::Double(builtins::combine(flags, a, b)?),
            (Column::Bool(a), Column::Bool(b)) => Column::Bool(builtins::combine(flags, a, b)?),
            (Column::Word8(a), Column::Word8(b)) => Column::Word8(builtins::combine(flags, a, b)?),
            (a, b) => return Err(b.mismatch(a.elt_type())),
        })
    }

    /// Merge `self` (tag 0) with `other` (tag 1).
    pub fn combine2_by_tag(&self, tags: &Array<usize>, other: &Column) -> Result<Column> {
        Ok(match (self, other) {
            (Column::Int(a), Column::Int(b)) => Column::Int(builtins::combine2_by_tag(tags, a, b)?),
            (Column::Double(a), Column::Double(b)) => {
                Column::Double(builtins::combine2_by_tag(tags, a, b)?)
            }
            (Column::Bool(a), Column::Bool(b)) => Column::Bool(builtins::combine2_by_tag(tags, a, b)?),
            (Column::Word8(a), Column::Word8(b)) => {
                Column::Word8(builtins::combine2_by_tag(tags, a, b)?)
            }
            (a, b) => return Err(b.mismatch(a.elt_type())),
        })
    }

    pub fn pack_by_tag(&self, k: usize, tags: &Array<usize>) -> Result<Column> {
        Ok(match self {
            Column::Int(data) => Column::Int(builtins::pack_by_tag(k, tags, data)?),
            Column::Double(data) => Column::Double(builtins::pack_by_tag(k, tags, data)?),
            Column::Bool(data) => Column::Bool(builtins::pack_by_tag(k, tags, data)?),
            Column::Word8(data) => Column::Word8(builtins::pack_by_tag(k, tags, data)?),
        })
    }

    pub fn bpermute(&self, index_map: &Array<usize>) -> Result<Column> {
        Ok(match self {
            Column::Int(data) => Column::Int(builtins::bpermute(data, index_map)?),
            Column::Double(data) => Column::Double(builtins::bpermute(data, index_map)?),
            Column::Bool(data) => Column::Bool(builtins::bpermute(data, index_map)?),
            Column::Word8(data) => Column::Word8(builtins::bpermute(data, index_map)?),
        })
    }

    /// Expand one value per segment to the segment's length.
    pub fn replicate_s(&self, segd: &Segd) -> Result<Column> {
        Ok(match self {
            Column::Int(data) => Column::Int(builtins::replicate_s(segd, data)?),
            Column::Double(data) => Column::Double(builtins::replicate_s(segd, data)?),
            Column::Bool(data) => Column::Bool(builtins::replicate_s(segd, data)?),
            Column::Word8(data) => Column::Word8(builtins::replicate_s(segd, data)?),
        })
    }

    /// Segment-wise concatenation; returns the combined descriptor with the data.
    pub fn append_s(&self, segd_a: &Segd, segd_b: &Segd, other: &Column) -> Result<(Segd, Column)> {
        match (self, other) {
            (Column::Int(a), Column::Int(b)) => {
                let (segd, data) = builtins::append_s(segd_a, a, segd_b, b)?;
                Ok((segd, Column::Int(data)))
            }
            (Column::Double(a), Column::Double(b)) => {
                let (segd, data) = builtins::append_s(segd_a, a, segd_b, b)?;
                Ok((segd, Column::Double(data)))
            }
            (Column::Bool(a), Column::Bool(b)) => {
                let (segd, data) = builtins::append_s(segd_a, a, segd_b, b)?;
                Ok((segd, Column::Bool(data)))
            }
            (Column::Word8(a), Column::Word8(b)) => {
                let (segd, data) = builtins::append_s(segd_a, a, segd_b, b)?;
                Ok((segd, Column::Word8(data)))
            }
            (a, b) => Err(b.mismatch(a.elt_type())),
        }
    }

    /// Per-segment sums.
    ///
    /// Int and Double sum in place; Bool counts true flags and Word8 widens,
    /// both to Int.
    pub fn sum_s(&self, segd: &Segd) -> Result<Column> {
        Ok(match self {
            Column::Int(data) => Column::Int(builtins::sum_s(segd, data)?),
            Column::Double(data) => Column::Double(builtins::sum_s(segd, data)?),
            Column::Bool(data) => Column::Int(builtins::sum_s(segd, &map(i64::from, data))?),
            Column::Word8(data) => Column::Int(builtins::sum_s(segd, &map(i64::from, data))?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_and_type() {
        let col = Column::new_double(vec![1.0, 2.0]);
        assert_eq!(col.len(), 2);
        assert_eq!(col.elt_type(), EltType::Double);
        assert!(Column::new_word8(Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn test_accessors() {
        let col = Column::new_int(vec![3, 4]);
        assert_eq!(col.as_int().unwrap().as_slice(), &[3, 4]);
        assert_eq!(
            col.as_bool().unwrap_err(),
            Error::TypeMismatch {
                expected: EltType::Bool,
                actual: EltType::Int
            }
        );
    }

    #[test]
    fn test_pack_and_bpermute() {
        let col = Column::new_int(vec![10, 20, 30, 40]);
        let flags = Array::from(vec![true, false, true, false]);
        assert_eq!(col.pack(&flags).unwrap(), Column::new_int(vec![10, 30]));

        let col = Column::new_word8(vec![5u8, 6, 7]);
        let out = col.bpermute(&Array::from(vec![2, 0, 1])).unwrap();
        assert_eq!(out, Column::new_word8(vec![7u8, 5, 6]));
    }

    #[test]
    fn test_combine_type_mismatch() {
        let flags = Array::from(vec![true, false]);
        let a = Column::new_int(vec![1]);
        let b = Column::new_double(vec![2.0]);
        assert_eq!(
            a.combine(&flags, &b).unwrap_err(),
            Error::TypeMismatch {
                expected: EltType::Int,
                actual: EltType::Double
            }
        );
        let c = Column::new_int(vec![9]);
        assert_eq!(a.combine(&flags, &c).unwrap(), Column::new_int(vec![1, 9]));
    }

    #[test]
    fn test_combine2_by_tag_and_pack_by_tag() {
        let tags = Array::from(vec![1, 0, 1]);
        let a = Column::new_bool(vec![true]);
        let b = Column::new_bool(vec![false, false]);
        let merged = a.combine2_by_tag(&tags, &b).unwrap();
        assert_eq!(merged, Column::new_bool(vec![false, true, false]));

        let grouped = Column::new_int(vec![1, 2, 3]).pack_by_tag(2, &tags).unwrap();
        assert_eq!(grouped, Column::new_int(vec![2, 1, 3]));
    }

    #[test]
    fn test_segmented() {
        let segd = Segd::from_lengths(vec![2, 0, 1]);
        let reps = Column::new_double(vec![0.5, 9.0, 1.5]).replicate_s(&segd).unwrap();
        assert_eq!(reps, Column::new_double(vec![0.5, 0.5, 1.5]));

        let flags = Column::new_bool(vec![true, true, false]);
        assert_eq!(flags.sum_s(&segd).unwrap(), Column::new_int(vec![2, 0, 0]));

        let bytes = Column::new_word8(vec![200u8, 100, 7]);
        assert_eq!(bytes.sum_s(&segd).unwrap(), Column::new_int(vec![300, 0, 7]));

        let other = Segd::from_lengths(vec![1, 1, 0]);
        let (merged, data) = Column::new_int(vec![1, 2, 3])
            .append_s(&segd, &other, &Column::new_int(vec![8, 9]))
            .unwrap();
        assert_eq!(merged.lengths().as_slice(), &[3, 1, 1]);
        assert_eq!(data, Column::new_int(vec![1, 2, 8, 9, 3]));
    }
}
