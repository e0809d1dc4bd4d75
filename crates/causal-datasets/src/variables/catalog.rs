//! Ordered catalog of variable groups.
//!
//! The catalog is the authoritative mapping between flat column positions and
//! named variable groups. Groups appear in the order their first descriptor
//! appears in the metadata; each group owns a contiguous column range.

use std::collections::HashMap;
use std::ops::Range;

use super::{VariableDescriptor, VariableType, VariablesMetadata};
use crate::error::{DecodeError, Result};

/// How to pick a group's type when its descriptors disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GroupTypePolicy {
    /// The first descriptor of the group decides.
    #[default]
    FirstWins,
    /// The last descriptor of the group decides (overwrite semantics).
    LastWins,
    /// Disagreeing descriptors are a schema error.
    Strict,
}

/// A named variable spanning one or more contiguous columns.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableGroup {
    name: String,
    offset: usize,
    variable_type: VariableType,
    /// Indices into the catalog's descriptor list, in declaration order.
    members: Vec<usize>,
    /// Member whose type (and bounds) represent the group.
    representative: usize,
    mixed_types: bool,
}

impl VariableGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns (descriptors) in the group.
    #[inline]
    pub fn width(&self) -> usize {
        self.members.len()
    }

    /// First column of the group in the flat matrix.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Column range `offset..offset + width`.
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.offset..self.offset + self.width()
    }

    #[inline]
    pub fn variable_type(&self) -> VariableType {
        self.variable_type
    }

    /// Descriptor indices belonging to this group.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Descriptor index that decided the group's type.
    pub fn representative(&self) -> usize {
        self.representative
    }

    /// Whether the group's descriptors declare more than one type.
    pub fn has_mixed_types(&self) -> bool {
        self.mixed_types
    }
}

/// Ordered collection of [`VariableGroup`]s built from variable descriptors.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableCatalog {
    descriptors: Vec<VariableDescriptor>,
    groups: Vec<VariableGroup>,
    name_index: HashMap<String, usize>,
}

impl VariableCatalog {
    /// Group descriptors by `group_name`, preserving first-occurrence order.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MixedGroupTypes`] if `policy` is [`GroupTypePolicy::Strict`]
    /// and some group declares more than one type.
    pub fn build(descriptors: Vec<VariableDescriptor>, policy: GroupTypePolicy) -> Result<Self> {
        let mut groups: Vec<VariableGroup> = Vec::new();
        let mut name_index: HashMap<String, usize> = HashMap::new();

        for (idx, descriptor) in descriptors.iter().enumerate() {
            let Some(&g) = name_index.get(&descriptor.group_name) else {
                name_index.insert(descriptor.group_name.clone(), groups.len());
                groups.push(VariableGroup {
                    name: descriptor.group_name.clone(),
                    offset: 0,
                    variable_type: descriptor.variable_type,
                    members: vec![idx],
                    representative: idx,
                    mixed_types: false,
                });
                continue;
            };

            let group = &mut groups[g];
            let first_type = descriptors[group.members[0]].variable_type;
            group.members.push(idx);
            if descriptor.variable_type != first_type {
                if policy == GroupTypePolicy::Strict {
                    return Err(DecodeError::MixedGroupTypes {
                        group: group.name.clone(),
                        first: first_type,
                        other: descriptor.variable_type,
                    });
                }
                group.mixed_types = true;
            }
            if policy == GroupTypePolicy::LastWins {
                group.variable_type = descriptor.variable_type;
                group.representative = idx;
            }
        }

        let mut offset = 0;
        for group in &mut groups {
            group.offset = offset;
            offset += group.width();
        }

        Ok(Self {
            descriptors,
            groups,
            name_index,
        })
    }

    /// Build from parsed `variables.json` content.
    pub fn from_metadata(metadata: &VariablesMetadata, policy: GroupTypePolicy) -> Result<Self> {
        Self::build(metadata.variables.clone(), policy)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total column width declared by the catalog.
    pub fn n_columns(&self) -> usize {
        self.descriptors.len()
    }

    /// Groups in column order.
    pub fn groups(&self) -> &[VariableGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableGroup> {
        self.groups.iter()
    }

    /// Group names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&VariableGroup> {
        self.name_index.get(name).map(|&i| &self.groups[i])
    }

    /// The descriptors the catalog was built from, in declaration order.
    pub fn descriptors(&self) -> &[VariableDescriptor] {
        &self.descriptors
    }

    /// Descriptors of one group.
    pub fn group_descriptors<'a>(
        &'a self,
        group: &'a VariableGroup,
    ) -> impl Iterator<Item = &'a VariableDescriptor> + 'a {
        group.members.iter().map(|&i| &self.descriptors[i])
    }

    /// Groups whose descriptors declare more than one type.
    pub fn mixed_type_groups(&self) -> impl Iterator<Item = &VariableGroup> {
        self.groups.iter().filter(|g| g.mixed_types)
    }

    /// Pair an experiment file's `columns_to_nodes` list with the catalog.
    ///
    /// The list is paired positionally with the catalog's groups. A list with
    /// one entry per descriptor (flat columns) is also accepted; each entry then
    /// maps to its descriptor's group.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::ColumnMapLength`] if the list matches neither length.
    /// - [`DecodeError::DuplicateColumn`] if a column index repeats for
    ///   different groups. Flat lists repeat the index of a multi-column group.
    pub fn column_map(&self, columns_to_nodes: &[usize]) -> Result<ColumnMap> {
        let names: Vec<&str> = if columns_to_nodes.len() == self.groups.len() {
            self.names().collect()
        } else if columns_to_nodes.len() == self.descriptors.len() {
            self.descriptors.iter().map(|d| d.group_name.as_str()).collect()
        } else {
            return Err(DecodeError::ColumnMapLength {
                columns: columns_to_nodes.len(),
                groups: self.groups.len(),
                descriptors: self.descriptors.len(),
            });
        };

        let mut entries: HashMap<usize, String> = HashMap::with_capacity(names.len());
        for (&column, name) in columns_to_nodes.iter().zip(names) {
            match entries.get(&column) {
                Some(existing) if existing.as_str() != name => {
                    return Err(DecodeError::DuplicateColumn(column));
                }
                Some(_) => {}
                None => {
                    entries.insert(column, name.to_string());
                }
            }
        }
        Ok(ColumnMap { entries })
    }
}

/// Resolves experiment-file column indices to group names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    entries: HashMap<usize, String>,
}

impl ColumnMap {
    /// Group occupying column `idx`.
    pub fn group(&self, idx: usize) -> Result<&str> {
        self.entries
            .get(&idx)
            .map(String::as_str)
            .ok_or(DecodeError::UnknownColumn(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
