//! Column-group slicing of flat numeric matrices.

use ndarray::{s, Array2, ArrayView2, ArrayViewD, Ix2};

use crate::error::{DecodeError, Result};
use crate::record::{Field, StructuredRecord};
use crate::variables::{DTypeMap, VariableCatalog};

/// Partition `data` into one typed field per catalog group.
///
/// Groups consume contiguous column ranges in catalog order. Each slice is
/// cast to the dtype `dtypes` registers for the group's type.
///
/// # Errors
///
/// - [`DecodeError::ColumnCountMismatch`] if `data` is not exactly as wide as the catalog.
/// - [`DecodeError::MissingDType`] if a group's type has no registered dtype.
pub fn slice_columns(
    data: ArrayView2<'_, f64>,
    catalog: &VariableCatalog,
    dtypes: &DTypeMap,
) -> Result<StructuredRecord> {
    if data.ncols() != catalog.n_columns() {
        return Err(DecodeError::ColumnCountMismatch {
            expected: catalog.n_columns(),
            actual: data.ncols(),
        });
    }

    let mut record = StructuredRecord::new(data.nrows());
    for group in catalog.iter() {
        let dtype = dtypes.resolve(group.variable_type())?;
        let block = data.slice(s![.., group.columns()]);
        record.insert(group.name(), Field::cast_from(block, dtype))?;
    }
    Ok(record)
}

/// [`slice_columns`] for data of unchecked dimensionality.
///
/// # Errors
///
/// [`DecodeError::NotTwoDimensional`] unless `data` has exactly two axes.
pub fn slice_columns_dyn(
    data: ArrayViewD<'_, f64>,
    catalog: &VariableCatalog,
    dtypes: &DTypeMap,
) -> Result<StructuredRecord> {
    let ndim = data.ndim();
    let data = data
        .into_dimensionality::<Ix2>()
        .map_err(|_| DecodeError::NotTwoDimensional { ndim })?;
    slice_columns(data, catalog, dtypes)
}

/// Build a row-major matrix from nested rows.
///
/// An empty row list yields a `[0, empty_cols]` matrix.
///
/// # Errors
///
/// [`DecodeError::RaggedRows`] if rows differ in length.
pub fn matrix_from_rows(rows: &[Vec<f64>], empty_cols: usize) -> Result<Array2<f64>> {
    let Some(first) = rows.first() else {
        return Ok(Array2::zeros((0, empty_cols)));
    };
    let n_cols = first.len();

    let mut flat = Vec::with_capacity(rows.len() * n_cols);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != n_cols {
            return Err(DecodeError::RaggedRows {
                row,
                expected: n_cols,
                actual: values.len(),
            });
        }
        flat.extend_from_slice(values);
    }

    Array2::from_shape_vec((rows.len(), n_cols), flat).map_err(|_| DecodeError::RaggedRows {
        row: 0,
        expected: n_cols,
        actual: n_cols,
    })
}
