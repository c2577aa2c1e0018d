//! Split an ordered candidate list into per-category buckets.
//!
//! Iteration over [`CategoryBuckets`] always follows first-seen order of the
//! categories in the input. Since retrieval sorts by interest level
//! descending, that is also the order of decreasing user interest.

use indexmap::IndexMap;

use crate::core::model::Candidate;

/// Candidates of one category, in upstream rank order.
pub type Bucket = Vec<Candidate>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBuckets {
    buckets: IndexMap<i64, Bucket>,
}

impl CategoryBuckets {
    /// Partition `candidates` in a single pass without dropping or duplicating any.
    pub fn partition(candidates: Vec<Candidate>) -> Self {
        let mut buckets: IndexMap<i64, Bucket> = IndexMap::new();

        for candidate in candidates {
            buckets
                .entry(candidate.category_id())
                .or_default()
                .push(candidate);
        }

        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Number of candidates across every bucket.
    pub fn total_candidates(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn get(&self, category_id: i64) -> Option<&[Candidate]> {
        self.buckets.get(&category_id).map(Vec::as_slice)
    }

    /// Category ids in first-seen order.
    pub fn category_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.buckets.keys().copied()
    }

    /// `(category id, bucket)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[Candidate])> + '_ {
        self.buckets.iter().map(|(id, bucket)| (*id, bucket.as_slice()))
    }
}

impl IntoIterator for CategoryBuckets {
    type Item = (i64, Bucket);
    type IntoIter = indexmap::map::IntoIter<i64, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}
