//! Interventional environments.

use super::{Environment, ExperimentDescriptor};
use crate::decode::{resolve_effect_set, resolve_names, DatasetDecoder, EffectSet};
use crate::error::{DecodeError, Result};
use crate::record::StructuredRecord;
use crate::variables::ColumnMap;

/// Samples drawn under one intervention.
#[derive(Clone, Debug, PartialEq)]
pub struct InterventionData {
    /// Single-row record of the intervened groups' values.
    pub intervention_values: StructuredRecord,
    /// The full sampled batch.
    pub intervention_data: StructuredRecord,
    /// Single-row record of the conditioning assignment (possibly empty).
    pub condition_values: StructuredRecord,
}

impl InterventionData {
    /// Groups present in the sampled batch.
    pub fn sampled_nodes(&self) -> impl Iterator<Item = &str> {
        self.intervention_data.names()
    }
}

/// A reconstructed intervention, its reference, and the groups to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub struct InterventionWithEffects {
    pub intervention: InterventionData,
    pub reference: InterventionData,
    pub effect_nodes: EffectSet,
}

impl DatasetDecoder {
    /// Reconstruct every environment of an interventions file.
    ///
    /// # Errors
    ///
    /// Fails on the first environment that fails; see [`reconstruct_intervention`](Self::reconstruct_intervention).
    pub fn decode_interventions(&self, descriptor: &ExperimentDescriptor) -> Result<Vec<InterventionWithEffects>> {
        self.decode_environments(descriptor, |idx, env, columns| {
            self.reconstruct_intervention(idx, env, columns)
        })
    }

    /// Reconstruct one interventional environment.
    ///
    /// `environment` is the environment's position in its file, used in errors.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownColumn`] for an index missing from `columns`.
    /// - [`DecodeError::NonConstantIntervention`] if an intervened group varies over the batch.
    /// - [`DecodeError::MissingReference`] if `reference_data` is absent.
    /// - Schema errors from slicing and expansion.
    pub fn reconstruct_intervention(
        &self,
        environment: usize,
        env: &Environment,
        columns: &ColumnMap,
    ) -> Result<InterventionWithEffects> {
        let condition_nodes = match &env.conditioning_idxs {
            Some(idxs) => resolve_names(idxs, columns)?,
            None => Vec::new(),
        };
        let intervention_nodes = resolve_names(&env.intervention_idxs, columns)?;

        let intervention =
            self.to_intervention(environment, &env.test_data, &intervention_nodes, &condition_nodes)?;

        let reference_rows = env
            .reference_data
            .as_deref()
            .ok_or(DecodeError::MissingReference { environment })?;
        let reference =
            self.to_intervention(environment, reference_rows, &intervention_nodes, &condition_nodes)?;

        let effect_nodes = resolve_effect_set(&env.effect_idxs, columns, intervention.sampled_nodes())?;

        Ok(InterventionWithEffects {
            intervention,
            reference,
            effect_nodes,
        })
    }

    fn to_intervention(
        &self,
        environment: usize,
        rows: &[Vec<f64>],
        intervention_nodes: &[String],
        condition_nodes: &[String],
    ) -> Result<InterventionData> {
        let batch = self.sample_batch(environment, rows)?;
        let first = self.constant_first_row(environment, &batch, intervention_nodes)?;

        Ok(InterventionData {
            intervention_values: self.encode(first.select(intervention_nodes)?)?,
            condition_values: self.encode(first.select(condition_nodes)?)?,
            intervention_data: self.encode(batch)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use crate::error::ErrorKind;
    use crate::record::Field;
    use crate::variables::{VariableDescriptor, VariablesMetadata};
    use ndarray::array;

    fn decoder() -> DatasetDecoder {
        let metadata = VariablesMetadata::new(vec![
            VariableDescriptor::continuous("x"),
            VariableDescriptor::categorical("y").with_bounds(0, 1),
            VariableDescriptor::continuous("z"),
        ]);
        DatasetDecoder::from_metadata(&metadata, DecodeConfig::default()).unwrap()
    }

    fn columns(decoder: &DatasetDecoder) -> ColumnMap {
        decoder.catalog().column_map(&[0, 1, 2]).unwrap()
    }

    fn environment() -> Environment {
        Environment {
            conditioning_idxs: Some(vec![2]),
            intervention_idxs: vec![1],
            effect_idxs: vec![0],
            test_data: vec![vec![0.1, 1.0, 5.0], vec![0.2, 1.0, 6.0]],
            reference_data: Some(vec![vec![0.3, 0.0, 5.0], vec![0.4, 0.0, 7.0]]),
            conditioning_values: None,
        }
    }

    #[test]
    fn reconstructs_values_and_reference() {
        let decoder = decoder();
        let out = decoder
            .reconstruct_intervention(0, &environment(), &columns(&decoder))
            .unwrap();

        let values = &out.intervention.intervention_values;
        assert_eq!(values.names().collect::<Vec<_>>(), ["y"]);
        assert_eq!(values.get("y"), Some(&Field::Int32(array![[0, 1]])));

        let cond = &out.intervention.condition_values;
        assert_eq!(cond.get("z"), Some(&Field::Float32(array![[5.0]])));

        assert_eq!(out.intervention.intervention_data.n_rows(), 2);
        assert_eq!(
            out.reference.intervention_values.get("y"),
            Some(&Field::Int32(array![[1, 0]]))
        );
        assert_eq!(out.effect_nodes.iter().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn missing_conditioning_gives_empty_record() {
        let decoder = decoder();
        let mut env = environment();
        env.conditioning_idxs = None;
        let out = decoder.reconstruct_intervention(0, &env, &columns(&decoder)).unwrap();
        assert!(out.intervention.condition_values.is_empty());
        assert_eq!(out.intervention.condition_values.n_rows(), 1);
    }

    #[test]
    fn effect_set_defaults_to_sampled_nodes() {
        let decoder = decoder();
        let mut env = environment();
        env.effect_idxs.clear();
        let out = decoder.reconstruct_intervention(0, &env, &columns(&decoder)).unwrap();
        assert_eq!(out.effect_nodes.iter().collect::<Vec<_>>(), ["x", "y", "z"]);
    }

    #[test]
    fn varying_intervention_is_fatal() {
        let decoder = decoder();
        let mut env = environment();
        env.test_data[1][1] = 0.0;
        let err = decoder.reconstruct_intervention(4, &env, &columns(&decoder)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert!(matches!(
            err,
            DecodeError::NonConstantIntervention { environment: 4, ref group, row: 1 } if group == "y"
        ));
    }

    #[test]
    fn varying_reference_is_fatal() {
        let decoder = decoder();
        let mut env = environment();
        env.reference_data = Some(vec![vec![0.3, 0.0, 5.0], vec![0.4, 1.0, 7.0]]);
        let err = decoder.reconstruct_intervention(0, &env, &columns(&decoder)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn missing_reference_is_fatal() {
        let decoder = decoder();
        let mut env = environment();
        env.reference_data = None;
        let err = decoder.reconstruct_intervention(2, &env, &columns(&decoder)).unwrap_err();
        assert!(matches!(err, DecodeError::MissingReference { environment: 2 }));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let decoder = decoder();
        let mut env = environment();
        env.test_data.clear();
        let err = decoder.reconstruct_intervention(0, &env, &columns(&decoder)).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyBatch { environment: 0 }));
    }

    #[test]
    fn unknown_intervention_index() {
        let decoder = decoder();
        let mut env = environment();
        env.intervention_idxs = vec![9];
        let err = decoder.reconstruct_intervention(0, &env, &columns(&decoder)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexMapping);
    }
}
