//! Category Sets
//!
//! A sorted, de-duplicated set of category ids supporting linear-time intersection checks.

use std::{cmp::Ordering, string::ToString};

use smallvec::SmallVec;

/// A set of category ids kept sorted so intersections can be checked with two pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    ids: SmallVec<[String; 4]>,
}

impl CategorySet {
    /// Create a new category set, sorting and de-duplicating the ids.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let mut ids: SmallVec<[String; 4]> = ids.into_iter().collect();

        ids.sort();
        ids.dedup();

        Self { ids }
    }

    /// Create a new category set from string slices.
    pub fn from_strs(ids: &[&str]) -> Self {
        Self::new(ids.iter().map(ToString::to_string))
    }

    /// Returns true if the two sets share at least one category.
    pub fn intersects(&self, other: &Self) -> bool {
        let mut left = self.ids.iter();
        let mut right = other.ids.iter();
        let mut left_id = left.next();
        let mut right_id = right.next();

        while let (Some(left_ref), Some(right_ref)) = (left_id, right_id) {
            match left_ref.cmp(right_ref) {
                Ordering::Equal => return true,
                Ordering::Less => left_id = left.next(),
                Ordering::Greater => right_id = right.next(),
            }
        }

        false
    }

    /// Returns true if the set contains `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.ids
            .binary_search_by(|candidate| candidate.as_str().cmp(id))
            .is_ok()
    }

    /// Returns true if the set has no categories.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of categories in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterate the category ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl FromIterator<String> for CategorySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter)
    }
}
