//! Serialized experiment descriptors (`interventions.json`, `counterfactuals.json`).

use serde::{Deserialize, Serialize};

/// Top-level content of an experiment file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDescriptor {
    pub metadata: ExperimentMetadata,
    pub environments: Vec<Environment>,
}

impl ExperimentDescriptor {
    /// Parse from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment column index of each catalog group (or flat column).
    pub columns_to_nodes: Vec<usize>,
}

/// One intervention or counterfactual scenario.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub conditioning_idxs: Option<Vec<usize>>,

    #[serde(default)]
    pub intervention_idxs: Vec<usize>,

    /// Columns whose outcome is evaluated. Empty means all sampled groups.
    #[serde(default)]
    pub effect_idxs: Vec<usize>,

    /// Samples drawn under the intervention, one row per sample.
    pub test_data: Vec<Vec<f64>>,

    #[serde(default)]
    pub reference_data: Option<Vec<Vec<f64>>>,

    /// Factual observations of the counterfactual units.
    #[serde(default)]
    pub conditioning_values: Option<Vec<Vec<f64>>>,
}
