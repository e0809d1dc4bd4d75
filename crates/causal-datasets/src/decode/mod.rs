//! The decoding pipeline: slicing, categorical expansion and index resolution.
//!
//! [`DatasetDecoder`] binds a [`VariableCatalog`] to a [`DecodeConfig`] and the
//! categorical size table derived from it. It decodes train/test matrices
//! directly; experiment files are decoded through the `experiment` module,
//! which extends it.
//!
//! # Example
//!
//! ```
//! use causal_datasets::{DatasetDecoder, DecodeConfig, Field, VariablesMetadata};
//! use ndarray::array;
//!
//! let metadata: VariablesMetadata = serde_json::from_str(r#"{"variables": [
//!     {"group_name": "x", "type": "continuous"},
//!     {"group_name": "y", "type": "categorical", "lower": 0, "upper": 1}
//! ]}"#).unwrap();
//!
//! let decoder = DatasetDecoder::from_metadata(&metadata, DecodeConfig::default()).unwrap();
//! let record = decoder.decode_table(array![[1.0, 0.0], [1.0, 1.0]].view()).unwrap();
//!
//! assert_eq!(record.get("y"), Some(&Field::Int32(array![[1, 0], [0, 1]])));
//! ```

mod categorical;
mod effects;
mod slicer;

pub use categorical::{expand_one_hot, resolve_categorical_sizes, CategoricalSizes, CategoricalWidth};
pub use effects::{resolve_effect_set, resolve_names, EffectSet};
pub use slicer::{matrix_from_rows, slice_columns, slice_columns_dyn};

use ndarray::ArrayView2;

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::record::StructuredRecord;
use crate::variables::{VariableCatalog, VariablesMetadata};

/// Decodes flat matrices against one variable catalog.
///
/// Immutable after construction and safe to share across threads.
#[derive(Clone, Debug)]
pub struct DatasetDecoder {
    catalog: VariableCatalog,
    config: DecodeConfig,
    sizes: CategoricalSizes,
}

impl DatasetDecoder {
    /// Create a decoder, resolving categorical sizes up front.
    pub fn new(catalog: VariableCatalog, config: DecodeConfig) -> Result<Self> {
        let sizes = resolve_categorical_sizes(&catalog)?;
        Ok(Self {
            catalog,
            config,
            sizes,
        })
    }

    /// Build the catalog from `variables.json` content using `config.group_types`.
    pub fn from_metadata(metadata: &VariablesMetadata, config: DecodeConfig) -> Result<Self> {
        let catalog = VariableCatalog::from_metadata(metadata, config.group_types)?;
        Self::new(catalog, config)
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn categorical_sizes(&self) -> &CategoricalSizes {
        &self.sizes
    }

    /// Slice `data` into typed per-group fields without categorical expansion.
    pub fn slice(&self, data: ArrayView2<'_, f64>) -> Result<StructuredRecord> {
        slice_columns(data, &self.catalog, &self.config.dtypes)
    }

    /// One-hot expand the categorical fields present in `record`.
    pub fn encode(&self, record: StructuredRecord) -> Result<StructuredRecord> {
        expand_one_hot(record, &self.sizes)
    }

    /// Slice and expand a train/test matrix.
    pub fn decode_table(&self, data: ArrayView2<'_, f64>) -> Result<StructuredRecord> {
        self.encode(self.slice(data)?)
    }

    /// Convert nested rows to a matrix as wide as the catalog when empty.
    pub fn matrix(&self, rows: &[Vec<f64>]) -> Result<ndarray::Array2<f64>> {
        matrix_from_rows(rows, self.catalog.n_columns())
    }
}
