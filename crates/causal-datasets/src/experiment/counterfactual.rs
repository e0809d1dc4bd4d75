//! Counterfactual environments.

use super::{Environment, ExperimentDescriptor};
use crate::decode::{resolve_effect_set, resolve_names, DatasetDecoder, EffectSet};
use crate::error::{DecodeError, Result};
use crate::record::StructuredRecord;
use crate::variables::ColumnMap;

/// Outcomes of the same units with and without an intervention.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterfactualData {
    /// Single-row record of the intervened groups' values.
    pub intervention_values: StructuredRecord,
    /// Outcomes under the intervention.
    pub counterfactual_data: StructuredRecord,
    /// Outcomes without the intervention.
    pub factual_data: StructuredRecord,
}

impl CounterfactualData {
    /// Groups present in the counterfactual batch.
    pub fn sampled_nodes(&self) -> impl Iterator<Item = &str> {
        self.counterfactual_data.names()
    }
}

/// A reconstructed counterfactual, its optional reference, and the groups to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterfactualWithEffects {
    pub counterfactual: CounterfactualData,
    /// `None` when the file carries no ground-truth reference.
    pub reference: Option<CounterfactualData>,
    pub effect_nodes: EffectSet,
}

impl DatasetDecoder {
    /// Reconstruct every environment of a counterfactuals file.
    pub fn decode_counterfactuals(
        &self,
        descriptor: &ExperimentDescriptor,
    ) -> Result<Vec<CounterfactualWithEffects>> {
        self.decode_environments(descriptor, |idx, env, columns| {
            self.reconstruct_counterfactual(idx, env, columns)
        })
    }

    /// Reconstruct one counterfactual environment.
    ///
    /// Unlike interventions, a missing `reference_data` is not an error.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownColumn`] for an index missing from `columns`.
    /// - [`DecodeError::MissingFactualData`] if `conditioning_values` is absent.
    /// - [`DecodeError::NonConstantIntervention`] if an intervened group varies over the batch.
    /// - Schema errors from slicing and expansion.
    pub fn reconstruct_counterfactual(
        &self,
        environment: usize,
        env: &Environment,
        columns: &ColumnMap,
    ) -> Result<CounterfactualWithEffects> {
        let factual_rows = env
            .conditioning_values
            .as_deref()
            .ok_or(DecodeError::MissingFactualData { environment })?;
        let intervention_nodes = resolve_names(&env.intervention_idxs, columns)?;

        let counterfactual =
            self.to_counterfactual(environment, &env.test_data, factual_rows, &intervention_nodes)?;
        let reference = env
            .reference_data
            .as_deref()
            .map(|rows| self.to_counterfactual(environment, rows, factual_rows, &intervention_nodes))
            .transpose()?;

        let effect_nodes =
            resolve_effect_set(&env.effect_idxs, columns, counterfactual.sampled_nodes())?;

        Ok(CounterfactualWithEffects {
            counterfactual,
            reference,
            effect_nodes,
        })
    }

    fn to_counterfactual(
        &self,
        environment: usize,
        rows: &[Vec<f64>],
        factual_rows: &[Vec<f64>],
        intervention_nodes: &[String],
    ) -> Result<CounterfactualData> {
        let batch = self.sample_batch(environment, rows)?;
        let first = self.constant_first_row(environment, &batch, intervention_nodes)?;
        let factual = self.slice(self.matrix(factual_rows)?.view())?;

        Ok(CounterfactualData {
            intervention_values: self.encode(first.select(intervention_nodes)?)?,
            counterfactual_data: self.encode(batch)?,
            factual_data: self.encode(factual)?,
        })
    }
}
