//! causal-datasets: decoding of causal-inference benchmark datasets.
//!
//! Benchmark datasets store every variable as flat numeric columns next to a
//! `variables.json` that names and types them. This crate turns those flat
//! matrices, and the intervention and counterfactual experiment files that
//! accompany them, into typed per-variable records.
//!
//! # Key Types
//!
//! - [`VariableCatalog`] - Ordered variable groups with column ranges and types
//! - [`DatasetDecoder`] - Slices and one-hot expands tables; reconstructs experiments
//! - [`StructuredRecord`] / [`Field`] - Decoded data, one typed 2-D array per group
//! - [`DecodeConfig`] - Configuration builder
//! - [`io::DatasetLoader`] - Fetch and decode whole datasets
//!
//! # Decoding
//!
//! Build a decoder from the dataset's metadata, then decode tables with
//! [`DatasetDecoder::decode_table`] and experiment files with
//! [`DatasetDecoder::decode_interventions`] or
//! [`DatasetDecoder::decode_counterfactuals`]. See the [`decode`] module.

pub mod config;
pub mod decode;
pub mod error;
pub mod experiment;
pub mod io;
pub mod record;
pub mod testing;
pub mod utils;
pub mod variables;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, DecodeConfig};
pub use decode::{CategoricalSizes, CategoricalWidth, DatasetDecoder, EffectSet};
pub use error::{DecodeError, ErrorKind, Result};
pub use experiment::{
    CounterfactualData, CounterfactualWithEffects, Environment, ExperimentDescriptor,
    InterventionData, InterventionWithEffects,
};
pub use record::{Field, StructuredRecord};
pub use utils::Parallelism;
pub use variables::{
    DType, DTypeMap, GroupTypePolicy, VariableCatalog, VariableDescriptor, VariableType,
    VariablesMetadata,
};
