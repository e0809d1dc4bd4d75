//! Resolution of experiment column indices to variable groups.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::variables::ColumnMap;

/// Group names whose outcome is evaluated for an environment.
pub type EffectSet = BTreeSet<String>;

/// Map each index to its group name. Duplicates are kept.
///
/// # Errors
///
/// [`DecodeError::UnknownColumn`](crate::DecodeError::UnknownColumn) for an unmapped index.
pub fn resolve_names(idxs: &[usize], columns: &ColumnMap) -> Result<Vec<String>> {
    idxs.iter()
        .map(|&idx| columns.group(idx).map(str::to_string))
        .collect()
}

/// Resolve `effect_idxs` to a set of names, or use `fallback` when none are given.
pub fn resolve_effect_set<I, S>(effect_idxs: &[usize], columns: &ColumnMap, fallback: I) -> Result<EffectSet>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    if effect_idxs.is_empty() {
        return Ok(fallback.into_iter().map(Into::into).collect());
    }
    Ok(resolve_names(effect_idxs, columns)?.into_iter().collect())
}
