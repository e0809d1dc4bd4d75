//! Fixture builders shared by unit tests, integration tests and benches.

use ndarray::Array2;
use rand::prelude::*;

use crate::variables::{VariableCatalog, VariableDescriptor, VariableType, VariablesMetadata};

/// A small catalog covering every decoding path.
///
/// Groups, in order: `x` (two continuous columns), `y` (categorical, values
/// 0..=2), `z` (binary), `w` (categorical, values 1..=2).
pub fn mixed_metadata() -> VariablesMetadata {
    VariablesMetadata::new(vec![
        VariableDescriptor::continuous("x"),
        VariableDescriptor::continuous("x"),
        VariableDescriptor::categorical("y").with_bounds(0, 2),
        VariableDescriptor::binary("z"),
        VariableDescriptor::categorical("w").with_bounds(1, 2),
    ])
}

/// `n` single-column continuous groups named `v0..vn`.
pub fn continuous_metadata(n: usize) -> VariablesMetadata {
    VariablesMetadata::new((0..n).map(|i| VariableDescriptor::continuous(format!("v{i}"))).collect())
}

/// Random flat data that decodes cleanly against `catalog`.
///
/// Continuous and text columns are uniform in `[-1, 1)`, binary columns are
/// 0 or 1, and categorical columns hold integers within their group's bounds
/// (0 or 1 when unbounded).
pub fn random_table(catalog: &VariableCatalog, rows: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::<f64>::zeros((rows, catalog.n_columns()));

    for group in catalog.iter() {
        let descriptor = &catalog.descriptors()[group.representative()];
        let (lower, upper) = match (descriptor.lower, descriptor.upper) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => (0, 1),
        };
        for col in group.columns() {
            for row in 0..rows {
                data[[row, col]] = match group.variable_type() {
                    VariableType::Continuous | VariableType::Text => rng.gen_range(-1.0..1.0),
                    VariableType::Binary => f64::from(rng.gen_range(0u8..=1)),
                    VariableType::Categorical => rng.gen_range(lower..=upper) as f64,
                };
            }
        }
    }
    data
}

/// Convert a matrix to the nested rows used by experiment files.
pub fn to_rows(data: &Array2<f64>) -> Vec<Vec<f64>> {
    data.rows().into_iter().map(|row| row.to_vec()).collect()
}
