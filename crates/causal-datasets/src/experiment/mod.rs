//! Reconstruction of intervention and counterfactual experiments.
//!
//! An experiment file lists environments; each environment is reconstructed
//! independently into typed records plus the set of groups whose effect is
//! evaluated. Environments may be reconstructed in parallel
//! (see [`DecodeConfig::n_threads`](crate::DecodeConfig::n_threads)).
//!
//! Every intervened group must hold the same value on every sampled row;
//! the value is taken from the first row.

mod counterfactual;
mod intervention;
mod json;

pub use counterfactual::{CounterfactualData, CounterfactualWithEffects};
pub use intervention::{InterventionData, InterventionWithEffects};
pub use json::{Environment, ExperimentDescriptor, ExperimentMetadata};

use crate::decode::DatasetDecoder;
use crate::error::{DecodeError, Result};
use crate::record::StructuredRecord;
use crate::utils::run_with_threads;
use crate::variables::ColumnMap;

impl DatasetDecoder {
    /// Reconstruct every environment of `descriptor` with `reconstruct`, in order.
    fn decode_environments<T, F>(&self, descriptor: &ExperimentDescriptor, reconstruct: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &Environment, &ColumnMap) -> Result<T> + Sync + Send,
    {
        let columns = self.catalog().column_map(&descriptor.metadata.columns_to_nodes)?;
        let environments = &descriptor.environments;
        run_with_threads(self.config().n_threads, |parallelism| {
            parallelism.maybe_par_try_map(0..environments.len(), |idx| {
                reconstruct(idx, &environments[idx], &columns)
            })
        })
    }

    /// Slice a sampled batch. Empty batches are rejected.
    fn sample_batch(&self, environment: usize, rows: &[Vec<f64>]) -> Result<StructuredRecord> {
        if rows.is_empty() {
            return Err(DecodeError::EmptyBatch { environment });
        }
        self.slice(self.matrix(rows)?.view())
    }

    /// First row of `batch`, after checking every group in `nodes` is constant.
    fn constant_first_row(
        &self,
        environment: usize,
        batch: &StructuredRecord,
        nodes: &[String],
    ) -> Result<StructuredRecord> {
        let first = batch
            .first_row()
            .ok_or(DecodeError::EmptyBatch { environment })?;
        let (atol, rtol) = (self.config().constant_atol, self.config().constant_rtol);

        for name in nodes {
            let field = batch
                .get(name)
                .ok_or_else(|| DecodeError::UnknownGroup(name.clone()))?;
            if let Some(row) = field.first_divergent_row(atol, rtol) {
                return Err(DecodeError::NonConstantIntervention {
                    environment,
                    group: name.clone(),
                    row,
                });
            }
        }
        Ok(first)
    }
}
