//! Serialized variable metadata (`variables.json`).

use serde::{Deserialize, Serialize};

use super::VariableType;

/// One column of the flat data matrix.
///
/// Several descriptors sharing a `group_name` form one multi-column variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub group_name: String,

    #[serde(rename = "type")]
    pub variable_type: VariableType,

    /// Lowest category index (categorical only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<i64>,

    /// Highest category index (categorical only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<i64>,
}

impl VariableDescriptor {
    pub fn new(group_name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            group_name: group_name.into(),
            variable_type,
            lower: None,
            upper: None,
        }
    }

    pub fn continuous(group_name: impl Into<String>) -> Self {
        Self::new(group_name, VariableType::Continuous)
    }

    pub fn binary(group_name: impl Into<String>) -> Self {
        Self::new(group_name, VariableType::Binary)
    }

    pub fn categorical(group_name: impl Into<String>) -> Self {
        Self::new(group_name, VariableType::Categorical)
    }

    /// Set both category limits.
    pub fn with_bounds(mut self, lower: i64, upper: i64) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }
}

/// Top-level content of `variables.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariablesMetadata {
    pub variables: Vec<VariableDescriptor>,
}

impl VariablesMetadata {
    pub fn new(variables: Vec<VariableDescriptor>) -> Self {
        Self { variables }
    }

    /// Parse from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serialize back to JSON with string type tags.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
