//! One-hot expansion of categorical fields.
//!
//! Categorical groups either declare both `lower` and `upper` (expanded to
//! `upper - lower + 1` indicator columns) or neither (left as stored, the
//! field is assumed to be one-hot already).

use crate::error::{DecodeError, Result};
use crate::record::StructuredRecord;
use crate::variables::VariableCatalog;

/// Target width for one categorical group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoricalWidth {
    /// Expand to `width` columns; stored value `lower` maps to column 0.
    Fixed { lower: i64, width: usize },
    /// No bounds declared: leave the field unexpanded.
    Inferred,
}

impl CategoricalWidth {
    /// Raw value used for [`CategoricalWidth::Inferred`] in size tables.
    pub const INFERRED: i64 = -1;

    /// The width as a plain integer, `-1` for [`CategoricalWidth::Inferred`].
    pub fn as_raw(self) -> i64 {
        match self {
            CategoricalWidth::Fixed { width, .. } => width as i64,
            CategoricalWidth::Inferred => Self::INFERRED,
        }
    }
}

/// Per-group one-hot target widths, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoricalSizes {
    entries: Vec<(String, CategoricalWidth)>,
}

impl CategoricalSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the width of a group.
    pub fn set(&mut self, name: impl Into<String>, width: CategoricalWidth) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = width,
            None => self.entries.push((name, width)),
        }
    }

    pub fn get(&self, name: &str) -> Option<CategoricalWidth> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CategoricalWidth)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose group is present in `record`.
    pub fn intersect(&self, record: &StructuredRecord) -> CategoricalSizes {
        CategoricalSizes {
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| record.contains(n))
                .cloned()
                .collect(),
        }
    }
}

/// Resolve the one-hot width of every categorical group in `catalog`.
///
/// Bounds are taken from the group's representative descriptor. Every
/// descriptor of a categorical group must declare both limits or neither.
///
/// # Errors
///
/// - [`DecodeError::CategoricalBounds`] if a descriptor declares exactly one limit.
/// - [`DecodeError::CategoricalRange`] if `upper < lower` or the width overflows.
pub fn resolve_categorical_sizes(catalog: &VariableCatalog) -> Result<CategoricalSizes> {
    let mut sizes = CategoricalSizes::new();
    for group in catalog.iter().filter(|g| g.variable_type().is_categorical()) {
        if catalog
            .group_descriptors(group)
            .any(|d| d.lower.is_some() != d.upper.is_some())
        {
            return Err(DecodeError::CategoricalBounds {
                group: group.name().to_string(),
            });
        }

        let rep = &catalog.descriptors()[group.representative()];
        let width = match (rep.lower, rep.upper) {
            (Some(lower), Some(upper)) => {
                let width = upper
                    .checked_sub(lower)
                    .filter(|d| *d >= 0)
                    .and_then(|d| d.checked_add(1))
                    .and_then(|w| usize::try_from(w).ok())
                    .ok_or_else(|| DecodeError::CategoricalRange {
                        group: group.name().to_string(),
                        lower,
                        upper,
                    })?;
                CategoricalWidth::Fixed { lower, width }
            }
            _ => CategoricalWidth::Inferred,
        };
        sizes.set(group.name(), width);
    }
    Ok(sizes)
}

/// Replace categorical fields of `record` with their one-hot expansion.
///
/// Only groups present in both `record` and `sizes` with a fixed width are
/// touched, so the same size table serves full batches and single-row value
/// records alike. A multi-column field already at its target width is taken
/// to be expanded and passes through. Single-column fields are always
/// validated against `lower`.
///
/// # Errors
///
/// Propagates [`DecodeError::CategoricalWidth`] and
/// [`DecodeError::CategoricalValue`] from the expansion.
pub fn expand_one_hot(record: StructuredRecord, sizes: &CategoricalSizes) -> Result<StructuredRecord> {
    let sizes = sizes.intersect(&record);
    if sizes.is_empty() {
        return Ok(record);
    }
    record.try_map_fields(|name, field| match sizes.get(name) {
        Some(CategoricalWidth::Fixed { lower, width }) => {
            if width > 1 && field.ncols() == width {
                Ok(field)
            } else {
                field.one_hot(name, lower, width)
            }
        }
        Some(CategoricalWidth::Inferred) | None => Ok(field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;
    use crate::variables::{GroupTypePolicy, VariableDescriptor};
    use ndarray::array;

    fn catalog(descriptors: Vec<VariableDescriptor>) -> VariableCatalog {
        VariableCatalog::build(descriptors, GroupTypePolicy::default()).unwrap()
    }

    #[test]
    fn sizes_from_bounds() {
        let cat = catalog(vec![
            VariableDescriptor::continuous("x"),
            VariableDescriptor::categorical("y").with_bounds(0, 2),
            VariableDescriptor::categorical("z"),
            VariableDescriptor::categorical("z"),
        ]);
        let sizes = resolve_categorical_sizes(&cat).unwrap();

        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes.get("x"), None);
        assert_eq!(sizes.get("y"), Some(CategoricalWidth::Fixed { lower: 0, width: 3 }));
        assert_eq!(sizes.get("z"), Some(CategoricalWidth::Inferred));
        assert_eq!(sizes.get("z").unwrap().as_raw(), -1);
        assert_eq!(sizes.get("y").unwrap().as_raw(), 3);
    }

    #[test]
    fn one_sided_bounds_are_rejected() {
        let mut half = VariableDescriptor::categorical("y");
        half.upper = Some(4);
        let err = resolve_categorical_sizes(&catalog(vec![half])).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalBounds { ref group } if group == "y"));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let cat = catalog(vec![VariableDescriptor::categorical("y").with_bounds(3, 1)]);
        let err = resolve_categorical_sizes(&cat).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalRange { lower: 3, upper: 1, .. }));
    }

    #[test]
    fn overflowing_bounds_are_rejected() {
        let cat = catalog(vec![VariableDescriptor::categorical("c").with_bounds(i64::MIN, i64::MAX)]);
        let err = resolve_categorical_sizes(&cat).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalRange { ref group, .. } if group == "c"));
    }

    #[test]
    fn single_width_values_are_checked_against_lower() {
        let mut sizes = CategoricalSizes::new();
        sizes.set("c", CategoricalWidth::Fixed { lower: 0, width: 1 });

        let mut ok = StructuredRecord::new(2);
        ok.insert("c", Field::Int32(array![[0], [0]])).unwrap();
        let out = expand_one_hot(ok, &sizes).unwrap();
        assert_eq!(out.get("c"), Some(&Field::Int32(array![[1], [1]])));

        let mut bad = StructuredRecord::new(1);
        bad.insert("c", Field::Int32(array![[1]])).unwrap();
        let err = expand_one_hot(bad, &sizes).unwrap_err();
        assert!(matches!(err, DecodeError::CategoricalValue { lower: 0, width: 1, .. }));
    }

    #[test]
    fn expands_only_fields_present() {
        let mut sizes = CategoricalSizes::new();
        sizes.set("y", CategoricalWidth::Fixed { lower: 0, width: 2 });
        sizes.set("absent", CategoricalWidth::Fixed { lower: 0, width: 4 });

        let mut rec = StructuredRecord::new(2);
        rec.insert("x", Field::Float32(array![[1.0], [1.0]])).unwrap();
        rec.insert("y", Field::Int32(array![[0], [1]])).unwrap();

        let out = expand_one_hot(rec, &sizes).unwrap();
        assert_eq!(out.names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(out.get("x"), Some(&Field::Float32(array![[1.0], [1.0]])));
        assert_eq!(out.get("y"), Some(&Field::Int32(array![[1, 0], [0, 1]])));
    }

    #[test]
    fn inferred_width_passes_through() {
        let mut sizes = CategoricalSizes::new();
        sizes.set("y", CategoricalWidth::Inferred);

        let mut rec = StructuredRecord::new(1);
        rec.insert("y", Field::Int32(array![[0, 0, 1]])).unwrap();
        let out = expand_one_hot(rec.clone(), &sizes).unwrap();
        assert_eq!(out, rec);
    }

    #[test]
    fn expanding_twice_is_stable() {
        let mut sizes = CategoricalSizes::new();
        sizes.set("y", CategoricalWidth::Fixed { lower: 1, width: 3 });

        let mut rec = StructuredRecord::new(2);
        rec.insert("y", Field::Int32(array![[3], [1]])).unwrap();

        let once = expand_one_hot(rec, &sizes).unwrap();
        let twice = expand_one_hot(once.clone(), &sizes).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.get("y"), Some(&Field::Int32(array![[0, 0, 1], [1, 0, 0]])));
    }

    #[test]
    fn intersect_keeps_left_order() {
        let mut sizes = CategoricalSizes::new();
        sizes.set("b", CategoricalWidth::Inferred);
        sizes.set("a", CategoricalWidth::Fixed { lower: 0, width: 2 });

        let mut rec = StructuredRecord::new(1);
        rec.insert("a", Field::Int32(array![[0]])).unwrap();
        rec.insert("b", Field::Int32(array![[1, 0]])).unwrap();
        rec.insert("c", Field::Int32(array![[1]])).unwrap();

        let both = sizes.intersect(&rec);
        assert_eq!(both.iter().map(|(n, _)| n).collect::<Vec<_>>(), ["b", "a"]);
    }
}
