//! Group key encoding: raw categorical effect values → dense group ids.
//!
//! Purpose
//! -------
//! Map each observation's raw categorical value (entity, time period, or any
//! user-supplied category) to a compact 0-based integer id per effect
//! dimension, producing the [`GroupIndex`] every accumulation and demeaning
//! pass operates on.
//!
//! Key behaviors
//! -------------
//! - Ids are assigned in **first-seen order**: the first distinct value
//!   observed receives id 0, the next new value id 1, and so on. Assignment
//!   order therefore depends only on the order of the input column, never on
//!   hash-map iteration order, which keeps encoding deterministic for
//!   unbalanced and streamed input.
//! - [`encode_groups_checked`] treats `Option::None` as the missing-value
//!   sentinel and rejects it: the engine's contract requires callers to drop
//!   or impute missing effect values before absorbing.
//! - [`GroupIndex::from_ids`] admits pre-encoded columns after range-checking
//!   every id against the declared group count.
//!
//! Invariants & assumptions
//! ------------------------
//! - A returned `GroupIndex` always satisfies `ids[i] < n_groups` for all `i`
//!   and `n_groups >= 1`; downstream passes index per-group buffers without
//!   bounds checks on the group dimension.
//!
//! Lifecycle
//! ---------
//! - A `GroupIndex` is built once per transform call and is immutable
//!   afterward; it is not persisted across calls unless the caller reuses it
//!   for the same dataset.
use crate::absorb::errors::{AbsorbError, AbsorbResult};
use std::collections::HashMap;
use std::hash::Hash;

/// `GroupIndex` — dense group ids for one effect dimension.
///
/// Purpose
/// -------
/// Hold the encoded form of one categorical effect column: for each of the N
/// observations a group id in `[0, n_groups)`, plus the distinct group count.
///
/// Fields
/// ------
/// - `ids`: `Vec<usize>`
///   Per-observation group id, length N.
/// - `n_groups`: `usize`
///   Number of distinct groups G; every id is strictly below it.
///
/// Invariants
/// ----------
/// - `!ids.is_empty()` and `n_groups >= 1`.
/// - `ids[i] < n_groups` for all `i`.
///
/// Notes
/// -----
/// - Constructed via [`encode_groups`], [`encode_groups_checked`], or
///   [`GroupIndex::from_ids`]; fields are public because the invariants are
///   established at construction and the hot loops read them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIndex {
    /// Per-observation dense group id in `[0, n_groups)`.
    pub ids: Vec<usize>,
    /// Number of distinct groups.
    pub n_groups: usize,
}

impl GroupIndex {
    /// Build a [`GroupIndex`] from an already-encoded id column.
    ///
    /// Parameters
    /// ----------
    /// - `ids`: `Vec<usize>`
    ///   Pre-encoded group ids, one per observation.
    /// - `n_groups`: `usize`
    ///   Declared distinct-group count.
    ///
    /// Returns
    /// -------
    /// `AbsorbResult<GroupIndex>`
    ///   - `Ok` when the column is non-empty and every id is in range.
    ///   - `Err(AbsorbError::EmptyEffectColumn)` for an empty column.
    ///   - `Err(AbsorbError::GroupIdOutOfRange { .. })` for the first id at or
    ///     above `n_groups`.
    pub fn from_ids(ids: Vec<usize>, n_groups: usize) -> AbsorbResult<Self> {
        if ids.is_empty() {
            return Err(AbsorbError::EmptyEffectColumn);
        }
        for (index, &group_id) in ids.iter().enumerate() {
            if group_id >= n_groups {
                return Err(AbsorbError::GroupIdOutOfRange { index, group_id, n_groups });
            }
        }
        Ok(GroupIndex { ids, n_groups })
    }

    /// Number of observations covered by this index.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the index covers no observations. Never holds for a
    /// successfully constructed `GroupIndex`.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Encode a raw categorical column into dense first-seen-order group ids.
///
/// Parameters
/// ----------
/// - `column`: `&[K]`
///   Raw category values, one per observation. `K` may be any hashable,
///   comparable, cloneable type (integer codes, strings, tuples, ...).
///
/// Returns
/// -------
/// `AbsorbResult<GroupIndex>`
///   - `Ok(GroupIndex)` with ids assigned in first-seen order.
///   - `Err(AbsorbError::EmptyEffectColumn)` when the column is empty.
///
/// Notes
/// -----
/// - O(N) expected time and one `HashMap<K, usize>` of size G; the map is
///   used only for membership/lookup, so hash iteration order never
///   influences the assigned ids.
pub fn encode_groups<K>(column: &[K]) -> AbsorbResult<GroupIndex>
where
    K: Eq + Hash + Clone,
{
    if column.is_empty() {
        return Err(AbsorbError::EmptyEffectColumn);
    }
    let mut table: HashMap<K, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(column.len());
    for value in column {
        let next_id = table.len();
        let id = *table.entry(value.clone()).or_insert(next_id);
        ids.push(id);
    }
    let n_groups = table.len();
    Ok(GroupIndex { ids, n_groups })
}

/// Encode a categorical column that may carry an explicit missing sentinel.
///
/// `None` marks a missing effect value. The engine's contract requires the
/// caller to drop or impute missing rows before absorbing, so the first
/// `None` encountered is rejected rather than silently grouped.
///
/// Returns
/// -------
/// `AbsorbResult<GroupIndex>`
///   - `Ok(GroupIndex)` when every entry is `Some`, encoded exactly as by
///     [`encode_groups`].
///   - `Err(AbsorbError::MissingEffectValue { index })` at the first `None`.
///   - `Err(AbsorbError::EmptyEffectColumn)` when the column is empty.
pub fn encode_groups_checked<K>(column: &[Option<K>]) -> AbsorbResult<GroupIndex>
where
    K: Eq + Hash + Clone,
{
    if column.is_empty() {
        return Err(AbsorbError::EmptyEffectColumn);
    }
    let mut table: HashMap<K, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(column.len());
    for (index, value) in column.iter().enumerate() {
        match value {
            Some(key) => {
                let next_id = table.len();
                let id = *table.entry(key.clone()).or_insert(next_id);
                ids.push(id);
            }
            None => return Err(AbsorbError::MissingEffectValue { index }),
        }
    }
    let n_groups = table.len();
    Ok(GroupIndex { ids, n_groups })
}
