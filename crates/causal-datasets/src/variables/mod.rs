//! Variable metadata: type tags, descriptors and the group catalog.
//!
//! - [`VariableDescriptor`] / [`VariablesMetadata`]: serialized `variables.json`
//! - [`VariableCatalog`]: ordered groups with column ranges and types
//! - [`DTypeMap`]: injectable mapping from [`VariableType`] to storage [`DType`]

mod catalog;
mod descriptor;
mod types;

pub use catalog::{ColumnMap, GroupTypePolicy, VariableCatalog, VariableGroup};
pub use descriptor::{VariableDescriptor, VariablesMetadata};
pub use types::{DType, DTypeMap, VariableType};
