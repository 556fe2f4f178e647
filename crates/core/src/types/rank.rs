//! Display-order assignments for ranked catalog collections.
//!
//! Ranks carry no meaning beyond sort order. They are neither dense nor
//! unique; validation only guarantees each id is named once per call.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected rank or membership list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("id {0} appears more than once")]
    DuplicateId(i32),
}

/// One `{id, displayOrder}` pair of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub id: i32,
    #[serde(rename = "displayOrder", alias = "rank")]
    pub rank: i32,
}

/// A validated reorder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankList(Vec<RankAssignment>);

impl RankList {
    /// # Errors
    ///
    /// Returns `RankError::DuplicateId` if an id is named twice.
    pub fn new(assignments: Vec<RankAssignment>) -> Result<Self, RankError> {
        let mut seen = HashSet::with_capacity(assignments.len());
        for a in &assignments {
            if !seen.insert(a.id) {
                return Err(RankError::DuplicateId(a.id));
            }
        }
        Ok(Self(assignments))
    }

    /// Ids in request order, for binding as an `int4[]`.
    #[must_use]
    pub fn ids(&self) -> Vec<i32> {
        self.0.iter().map(|a| a.id).collect()
    }

    /// Ranks in request order, parallel to [`RankList::ids`].
    #[must_use]
    pub fn ranks(&self) -> Vec<i32> {
        self.0.iter().map(|a| a.rank).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a full membership list (e.g. a promotion's products).
///
/// # Errors
///
/// Returns `RankError::DuplicateId` for the first repeated id.
pub fn validate_members(ids: &[i32]) -> Result<(), RankError> {
    let mut seen = HashSet::with_capacity(ids.len());
    match ids.iter().find(|id| !seen.insert(**id)) {
        Some(dup) => Err(RankError::DuplicateId(*dup)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_arrays_keep_request_order() {
        let list: Vec<RankAssignment> =
            serde_json::from_str(r#"[{"id":5,"displayOrder":0},{"id":3,"displayOrder":1},{"id":9,"displayOrder":2}]"#)
                .unwrap();
        let list = RankList::new(list).unwrap();
        assert_eq!(list.ids(), vec![5, 3, 9]);
        assert_eq!(list.ranks(), vec![0, 1, 2]);
    }

    #[test]
    fn test_rank_alias_accepted() {
        let a: RankAssignment = serde_json::from_str(r#"{"id":1,"rank":4}"#).unwrap();
        assert_eq!(a, RankAssignment { id: 1, rank: 4 });
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = RankList::new(vec![
            RankAssignment { id: 1, rank: 0 },
            RankAssignment { id: 1, rank: 1 },
        ])
        .unwrap_err();
        assert_eq!(err, RankError::DuplicateId(1));
    }

    #[test]
    fn test_equal_ranks_allowed() {
        let list = RankList::new(vec![
            RankAssignment { id: 1, rank: 0 },
            RankAssignment { id: 2, rank: 0 },
        ])
        .unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_validate_members() {
        assert!(validate_members(&[]).is_ok());
        assert!(validate_members(&[4, 2, 7]).is_ok());
        assert_eq!(validate_members(&[4, 2, 4]), Err(RankError::DuplicateId(4)));
    }
}
