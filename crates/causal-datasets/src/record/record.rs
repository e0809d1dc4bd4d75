//! Named, ordered collection of fields sharing a batch dimension.

use ndarray::{concatenate, Array2, ArrayView2, Axis};

use super::Field;
use crate::error::{DecodeError, Result};

/// Mapping from group name to a `[n_rows, width]` [`Field`].
///
/// Fields keep insertion order, which for decoded data is catalog order.
/// Every field has exactly `n_rows` rows.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StructuredRecord {
    n_rows: usize,
    fields: Vec<(String, Field)>,
}

impl StructuredRecord {
    /// An empty record with the given batch size.
    pub fn new(n_rows: usize) -> Self {
        Self {
            n_rows,
            fields: Vec::new(),
        }
    }

    /// Batch size shared by all fields.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total width over all fields.
    pub fn n_columns(&self) -> usize {
        self.fields.iter().map(|(_, f)| f.ncols()).sum()
    }

    /// Insert a field, replacing any field with the same name in place.
    ///
    /// # Errors
    ///
    /// [`DecodeError::BatchMismatch`] if the field's row count differs from the record's.
    pub fn insert(&mut self, name: impl Into<String>, field: Field) -> Result<()> {
        let name = name.into();
        if field.nrows() != self.n_rows {
            return Err(DecodeError::BatchMismatch {
                group: name,
                expected: self.n_rows,
                actual: field.nrows(),
            });
        }
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((name, field)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Single-row record holding row `idx` of every field, or `None` if out of range.
    pub fn row(&self, idx: usize) -> Option<StructuredRecord> {
        if idx >= self.n_rows {
            return None;
        }
        let fields = self
            .fields
            .iter()
            .map(|(n, f)| Some((n.clone(), f.row(idx)?)))
            .collect::<Option<Vec<_>>>()?;
        Some(StructuredRecord { n_rows: 1, fields })
    }

    /// Shorthand for `row(0)`.
    pub fn first_row(&self) -> Option<StructuredRecord> {
        self.row(0)
    }

    /// Record restricted to `names`, in the order given. Repeated names are kept once.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownGroup`] if a name is not present.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<StructuredRecord> {
        let mut out = StructuredRecord::new(self.n_rows);
        for name in names {
            let name = name.as_ref();
            if out.contains(name) {
                continue;
            }
            let field = self
                .get(name)
                .ok_or_else(|| DecodeError::UnknownGroup(name.to_string()))?;
            out.fields.push((name.to_string(), field.clone()));
        }
        Ok(out)
    }

    /// Apply `f` to every field, keeping names and order.
    pub fn try_map_fields<F>(self, mut f: F) -> Result<StructuredRecord>
    where
        F: FnMut(&str, Field) -> Result<Field>,
    {
        let n_rows = self.n_rows;
        let mut out = StructuredRecord::new(n_rows);
        for (name, field) in self.fields {
            let field = f(&name, field)?;
            out.insert(name, field)?;
        }
        Ok(out)
    }

    /// Concatenate all fields along the column axis as `f64`.
    pub fn to_matrix(&self) -> Array2<f64> {
        let blocks: Vec<Array2<f64>> = self.fields.iter().map(|(_, f)| f.to_f64()).collect();
        if blocks.is_empty() {
            return Array2::zeros((self.n_rows, 0));
        }
        let views: Vec<ArrayView2<'_, f64>> = blocks.iter().map(|b| b.view()).collect();
        // Row counts are equal by construction.
        concatenate(Axis(1), &views).unwrap_or_else(|_| Array2::zeros((self.n_rows, 0)))
    }

    pub fn into_fields(self) -> Vec<(String, Field)> {
        self.fields
    }
}
