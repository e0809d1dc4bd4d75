//! Typed 2-D field storage.

use approx::RelativeEq;
use ndarray::{s, Array2, ArrayView2};

use crate::error::{DecodeError, Result};
use crate::variables::DType;

/// A `[n_rows, width]` array holding one variable group.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Float32(Array2<f32>),
    Float64(Array2<f64>),
    Int32(Array2<i32>),
    Int64(Array2<i64>),
}

/// Apply `$body` to the inner array of any variant.
macro_rules! with_array {
    ($field:expr, $arr:ident => $body:expr) => {
        match $field {
            Field::Float32($arr) => $body,
            Field::Float64($arr) => $body,
            Field::Int32($arr) => $body,
            Field::Int64($arr) => $body,
        }
    };
}

/// Rebuild a field of the same variant from an expression over the inner array.
macro_rules! map_array {
    ($field:expr, $arr:ident => $body:expr) => {
        match $field {
            Field::Float32($arr) => Field::Float32($body),
            Field::Float64($arr) => Field::Float64($body),
            Field::Int32($arr) => Field::Int32($body),
            Field::Int64($arr) => Field::Int64($body),
        }
    };
}

impl Field {
    /// Cast a block of raw `f64` columns to `dtype`.
    ///
    /// Integer casts truncate toward zero.
    pub fn cast_from(data: ArrayView2<'_, f64>, dtype: DType) -> Self {
        match dtype {
            DType::Float32 => Field::Float32(data.mapv(|v| v as f32)),
            DType::Float64 => Field::Float64(data.to_owned()),
            DType::Int32 => Field::Int32(data.mapv(|v| v as i32)),
            DType::Int64 => Field::Int64(data.mapv(|v| v as i64)),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Field::Float32(_) => DType::Float32,
            Field::Float64(_) => DType::Float64,
            Field::Int32(_) => DType::Int32,
            Field::Int64(_) => DType::Int64,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        with_array!(self, a => a.nrows())
    }

    /// Number of columns (the group width).
    #[inline]
    pub fn ncols(&self) -> usize {
        with_array!(self, a => a.ncols())
    }

    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Copy of the values widened to `f64`.
    pub fn to_f64(&self) -> Array2<f64> {
        match self {
            Field::Float32(a) => a.mapv(f64::from),
            Field::Float64(a) => a.clone(),
            Field::Int32(a) => a.mapv(f64::from),
            Field::Int64(a) => a.mapv(|v| v as f64),
        }
    }

    /// Single-row field holding row `idx`, or `None` if out of range.
    pub fn row(&self, idx: usize) -> Option<Field> {
        if idx >= self.nrows() {
            return None;
        }
        Some(map_array!(self, a => a.slice(s![idx..idx + 1, ..]).to_owned()))
    }

    /// First row that differs from row 0, if any.
    ///
    /// Floats compare with `approx` relative equality (`atol` absolute floor,
    /// `rtol` relative bound); integers compare exactly. NaN never matches.
    pub fn first_divergent_row(&self, atol: f64, rtol: f64) -> Option<usize> {
        match self {
            Field::Float32(a) => {
                first_divergent(a, |x, y| x.relative_eq(y, atol as f32, rtol as f32))
            }
            Field::Float64(a) => first_divergent(a, |x, y| x.relative_eq(y, atol, rtol)),
            Field::Int32(a) => first_divergent(a, |x, y| x == y),
            Field::Int64(a) => first_divergent(a, |x, y| x == y),
        }
    }

    /// Expand a single category-index column into a `width`-wide one-hot block.
    ///
    /// The stored value `v` sets position `v - lower`. The result keeps this
    /// field's dtype.
    pub fn one_hot(&self, group: &str, lower: i64, width: usize) -> Result<Field> {
        if self.ncols() != 1 {
            return Err(DecodeError::CategoricalWidth {
                group: group.to_string(),
                width: self.ncols(),
                target: width,
            });
        }

        let values = self.to_f64();
        let mut out = Array2::<f64>::zeros((values.nrows(), width));
        for (row, &value) in values.column(0).iter().enumerate() {
            let pos = value - lower as f64;
            if !pos.is_finite() || pos.fract() != 0.0 || pos < 0.0 || pos >= width as f64 {
                return Err(DecodeError::CategoricalValue {
                    group: group.to_string(),
                    value,
                    lower,
                    width,
                });
            }
            out[[row, pos as usize]] = 1.0;
        }
        Ok(Field::cast_from(out.view(), self.dtype()))
    }
}

fn first_divergent<T>(a: &Array2<T>, same: impl Fn(&T, &T) -> bool) -> Option<usize> {
    let mut rows = a.rows().into_iter();
    let first = rows.next()?;
    rows.position(|row| !row.iter().zip(first.iter()).all(|(x, y)| same(x, y)))
        .map(|p| p + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn cast_truncates_integers() {
        let raw = array![[1.7, -1.7], [2.0, 0.0]];
        let field = Field::cast_from(raw.view(), DType::Int32);
        assert_eq!(field, Field::Int32(array![[1, -1], [2, 0]]));
        assert_eq!(field.dim(), (2, 2));
        assert_eq!(field.dtype(), DType::Int32);
    }

    #[test]
    fn row_keeps_two_dimensions() {
        let field = Field::Float32(array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(field.row(1), Some(Field::Float32(array![[3.0, 4.0]])));
        assert_eq!(field.row(2), None);
    }

    #[test]
    fn divergent_row_detection() {
        let constant = Field::Float32(array![[0.5], [0.5], [0.5]]);
        assert_eq!(constant.first_divergent_row(1e-8, 1e-5), None);

        let drifting = Field::Float64(array![[0.5, 1.0], [0.5, 1.0], [0.5, 1.1]]);
        assert_eq!(drifting.first_divergent_row(1e-8, 1e-5), Some(2));

        let ints = Field::Int32(array![[2], [3]]);
        assert_eq!(ints.first_divergent_row(1e-8, 1e-5), Some(1));
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let field = Field::Float64(array![[1.0], [1.0 + 1e-9]]);
        assert_eq!(field.first_divergent_row(1e-8, 1e-5), None);
        assert_eq!(field.first_divergent_row(0.0, 0.0), Some(1));
    }

    #[test]
    fn nan_is_never_constant() {
        let field = Field::Float32(array![[f32::NAN], [f32::NAN]]);
        assert_eq!(field.first_divergent_row(1e-8, 1e-5), Some(1));
    }

    #[test]
    fn one_hot_offsets_by_lower() {
        let field = Field::Int32(array![[1], [3], [2]]);
        let expanded = field.one_hot("c", 1, 3).unwrap();
        assert_eq!(expanded, Field::Int32(array![[1, 0, 0], [0, 0, 1], [0, 1, 0]]));
    }

    #[test]
    fn one_hot_rejects_out_of_range() {
        let field = Field::Int32(array![[0], [2]]);
        let err = field.one_hot("c", 0, 2).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalValue { width: 2, .. }));
    }

    #[test]
    fn one_hot_rejects_fractional_float() {
        let field = Field::Float32(array![[0.5]]);
        assert!(field.one_hot("c", 0, 2).is_err());
    }

    #[test]
    fn one_hot_requires_single_column() {
        let field = Field::Int32(array![[0, 1]]);
        let err = field.one_hot("c", 0, 3).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalWidth { width: 2, target: 3, .. }));
    }
}
