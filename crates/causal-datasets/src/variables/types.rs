//! Variable type tags and the type → storage dtype registry.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

/// Logical type of a variable.
///
/// Stored as a lowercase string in `variables.json`; use [`VariableType::as_str`]
/// and [`FromStr`] to convert explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VariableType {
    /// Real-valued variable.
    #[default]
    Continuous,
    /// Two-valued variable stored as `0` / `1`.
    Binary,
    /// Integer category index, or an already one-hot encoded group.
    Categorical,
    /// Text variable stored as a numeric (embedding) vector.
    Text,
}

impl VariableType {
    /// All variants, in declaration order.
    pub const ALL: [VariableType; 4] = [
        VariableType::Continuous,
        VariableType::Binary,
        VariableType::Categorical,
        VariableType::Text,
    ];

    /// The tag used in serialized metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            VariableType::Continuous => "continuous",
            VariableType::Binary => "binary",
            VariableType::Categorical => "categorical",
            VariableType::Text => "text",
        }
    }

    #[inline]
    pub fn is_categorical(self) -> bool {
        matches!(self, VariableType::Categorical)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownVariableType(s.to_string()))
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VariableType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as SerdeError;

        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(SerdeError::custom)
    }
}

/// Element type of a decoded field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Float32,
    Float64,
    Int32,
    Int64,
}

impl DType {
    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

/// Mapping from [`VariableType`] to the [`DType`] its columns are cast to.
///
/// The default registry is:
///
/// | type          | dtype     |
/// |---------------|-----------|
/// | `continuous`  | `Float32` |
/// | `binary`      | `Float32` |
/// | `categorical` | `Int32`   |
/// | `text`        | `Float32` |
///
/// Use [`DTypeMap::empty`] and [`DTypeMap::with`] to build a custom registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DTypeMap {
    entries: HashMap<VariableType, DType>,
}

impl DTypeMap {
    /// A registry with no entries. Decoding any group fails until types are added.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) the dtype for a variable type.
    pub fn with(mut self, ty: VariableType, dtype: DType) -> Self {
        self.entries.insert(ty, dtype);
        self
    }

    /// Look up the dtype for a variable type.
    pub fn get(&self, ty: VariableType) -> Option<DType> {
        self.entries.get(&ty).copied()
    }

    /// Look up the dtype for a variable type, failing if unregistered.
    pub fn resolve(&self, ty: VariableType) -> Result<DType, DecodeError> {
        self.get(ty).ok_or(DecodeError::MissingDType(ty))
    }
}

impl Default for DTypeMap {
    fn default() -> Self {
        Self::empty()
            .with(VariableType::Continuous, DType::Float32)
            .with(VariableType::Binary, DType::Float32)
            .with(VariableType::Categorical, DType::Int32)
            .with(VariableType::Text, DType::Float32)
    }
}
