//! Segmented tables: named typed columns sharing one segment descriptor

pub mod column;

use std::sync::Arc;

pub use column::{Column, EltType};

use crate::array::Segd;
use crate::builtins::zip_with;
use crate::error::{check_len, Error, Result};

/// A collection of named, typed columns
///
/// All columns have `segd.elements()` rows and are segmented the same way.
/// The descriptor is shared, so clones and derived tables do not copy it.
#[derive(Debug, Clone)]
pub struct Table {
    pub names: Vec<String>,
    pub columns: Vec<Column>,
    segd: Arc<Segd>,
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Column>, segd: impl Into<Arc<Segd>>) -> Result<Self> {
        let segd = segd.into();
        if names.len() != columns.len() {
            return Err(Error::shape("Table::new", names.len(), columns.len()));
        }
        for col in &columns {
            if col.len() != segd.elements() {
                return Err(Error::shape("Table::new", segd.elements(), col.len()));
            }
        }
        Ok(Self { names, columns, segd })
    }

    pub fn row_count(&self) -> usize {
        self.segd.elements()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn segd(&self) -> &Arc<Segd> {
        &self.segd
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Segment-wise append of two tables with the same column names and types.
    pub fn append_s(&self, other: &Table) -> Result<Table> {
        check_len("Table::append_s", self.col_count(), other.col_count())?;
        if let Some(name) = other.names.iter().find(|n| !self.names.contains(n)) {
            return Err(Error::UnknownColumn { name: name.clone() });
        }
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut segd = None;
        for (name, a) in self.names.iter().zip(&self.columns) {
            let b = other.column(name).ok_or_else(|| Error::UnknownColumn { name: name.clone() })?;
            let (merged, col) = a.append_s(&self.segd, &other.segd, b)?;
            segd.get_or_insert(merged);
            columns.push(col);
        }
        let segd = match segd {
            Some(segd) => segd,
            None => {
                check_len("Table::append_s", self.segd.len(), other.segd.len())?;
                let lengths = zip_with(|x, y| x + y, self.segd.lengths(), other.segd.lengths())?;
                Segd::from_lengths(lengths)
            }
        };
        tracing::trace!(op = "Table::append_s", rows = segd.elements(), cols = columns.len());
        Table::new(self.names.clone(), columns, segd)
    }

    /// Per-segment sums of one column.
    pub fn sum_s(&self, name: &str) -> Result<Column> {
        let col = self.column(name).ok_or_else(|| Error::UnknownColumn { name: name.to_string() })?;
        col.sum_s(&self.segd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["qty".to_string(), "px".to_string()],
            vec![
                Column::new_int(vec![1, 2, 3]),
                Column::new_double(vec![1.0, 2.0, 4.0]),
            ],
            Segd::from_lengths(vec![2, 1]),
        )
        .unwrap()
    }

    #[test]
    fn test_table_new_checks_rows() {
        let err = Table::new(
            vec!["a".to_string()],
            vec![Column::new_int(vec![1, 2])],
            Segd::from_lengths(vec![3]),
        )
        .unwrap_err();
        assert_eq!(err, Error::shape("Table::new", 3, 2));
    }

    #[test]
    fn test_table_shape() {
        let t = sample();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.col_count(), 2);
        assert_eq!(t.column("px").map(|c| c.elt_type()), Some(EltType::Double));
        assert!(t.column("nope").is_none());
    }

    #[test]
    fn test_table_sum_s() {
        let t = sample();
        assert_eq!(t.sum_s("qty").unwrap(), Column::new_int(vec![3, 3]));
        assert_eq!(t.sum_s("px").unwrap(), Column::new_double(vec![3.0, 4.0]));
    }

    #[test]
    fn test_table_append_s() {
        let t = sample();
        let merged = t.append_s(&t).unwrap();
        assert_eq!(merged.segd().lengths().as_slice(), &[4, 2]);
        assert_eq!(
            merged.column("qty"),
            Some(&Column::new_int(vec![1, 2, 1, 2, 3, 3]))
        );
    }

    #[test]
    fn test_table_unknown_column() {
        let t = sample();
        assert_eq!(
            t.sum_s("vol").unwrap_err(),
            Error::UnknownColumn { name: "vol".to_string() }
        );
        let other = Table::new(
            vec!["qty".to_string(), "vol".to_string()],
            vec![Column::new_int(vec![1]), Column::new_int(vec![2])],
            Segd::from_lengths(vec![1, 0]),
        )
        .unwrap();
        assert_eq!(
            t.append_s(&other).unwrap_err(),
            Error::UnknownColumn { name: "vol".to_string() }
        );
    }

    #[test]
    fn test_table_clone_shares_segd() {
        let t = sample();
        let u = t.clone();
        assert!(Arc::ptr_eq(t.segd(), u.segd()));
    }
}
